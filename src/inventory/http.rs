//! Remote inventory provider.

use anyhow::{Context, Result};
use async_trait::async_trait;
use log::debug;
use serde_json::Value;

use crate::http::HttpClient;

use super::{Inventory, InventoryProvider};

/// Fetches the inventory document from an HTTP endpoint.
pub struct HttpInventoryProvider {
    http_client: HttpClient,
    url: String,
}

impl HttpInventoryProvider {
    /// Creates a provider fetching the document at `url`.
    pub fn new(http_client: HttpClient, url: &str) -> Self {
        Self {
            http_client,
            url: url.to_string(),
        }
    }

    /// The endpoint this provider queries.
    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl InventoryProvider for HttpInventoryProvider {
    #[tracing::instrument(skip(self))]
    async fn release_lines(&self) -> Result<Inventory> {
        debug!("Fetching release-line inventory from {}...", self.url);
        let document: Value = self.http_client.get_json(&self.url).await?;
        let inventory = Inventory::from_value(document)
            .with_context(|| format!("Invalid inventory document at {}", self.url))?;
        debug!("Inventory lists {} famil(ies)", inventory.families().count());
        Ok(inventory)
    }
}
