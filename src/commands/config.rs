use anyhow::Result;
use log::debug;
use reqwest::{
    Client,
    header::{AUTHORIZATION, HeaderMap, HeaderValue},
};
use std::path::PathBuf;

use crate::{
    http::{HttpClient, RetryPolicy},
    inventory::{FileInventoryProvider, HttpInventoryProvider, InventoryProvider},
    runtime::Runtime,
};

/// Environment variable holding an optional bearer token for the inventory endpoint.
pub const AUTH_TOKEN_VAR: &str = "RELWIN_AUTH_TOKEN";

/// Where the release-line inventory comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InventorySource {
    Url(String),
    File(PathBuf),
}

impl InventorySource {
    /// Pick the source from the mutually exclusive CLI options.
    pub fn from_args(url: Option<String>, file: Option<PathBuf>) -> Result<Self> {
        match (url, file) {
            (Some(url), None) => Ok(InventorySource::Url(url)),
            (None, Some(file)) => Ok(InventorySource::File(file)),
            (Some(_), Some(_)) => {
                anyhow::bail!("Use either --inventory-url or --inventory-file, not both.")
            }
            (None, None) => anyhow::bail!(
                "No inventory configured. Pass --inventory-url, --inventory-file or set RELWIN_INVENTORY_URL."
            ),
        }
    }
}

pub struct Config<R: Runtime> {
    pub runtime: R,
    pub require: String,
    pub umbrella: String,
    pub source: InventorySource,
    pub client: Client,
    pub retry: RetryPolicy,
}

impl<R: Runtime> Config<R> {
    /// Creates the configuration and its HTTP client.
    ///
    /// When `RELWIN_AUTH_TOKEN` is set, it is sent as a bearer token on every request.
    pub fn new(runtime: R, require: &str, umbrella: &str, source: InventorySource) -> Result<Self> {
        let mut headers = HeaderMap::new();
        if let Ok(token) = runtime.env_var(AUTH_TOKEN_VAR) {
            let mut auth_value = HeaderValue::from_str(&format!("Bearer {}", token))?;
            auth_value.set_sensitive(true);
            headers.insert(AUTHORIZATION, auth_value);
            debug!("Using {} for authentication: {}", AUTH_TOKEN_VAR, mask(&token));
        }

        let client = Client::builder()
            .user_agent("relwin-cli")
            .default_headers(headers)
            .build()?;

        Ok(Self {
            runtime,
            require: require.to_string(),
            umbrella: umbrella.to_string(),
            source,
            client,
            retry: RetryPolicy::default(),
        })
    }

    /// The provider for the configured source.
    pub fn provider(&self) -> Box<dyn InventoryProvider + '_> {
        match &self.source {
            InventorySource::Url(url) => {
                let http_client = HttpClient::with_policy(self.client.clone(), self.retry);
                Box::new(HttpInventoryProvider::new(http_client, url))
            }
            InventorySource::File(path) => Box::new(FileInventoryProvider::new(&self.runtime, path)),
        }
    }
}

fn mask(token: &str) -> String {
    let chars: Vec<char> = token.chars().collect();
    if chars.len() <= 8 {
        return "*********".to_string();
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}*********{}", head, tail)
}
