//! JSON HTTP client with retries.

use anyhow::{Context, Result};
use log::{debug, warn};
use reqwest::Client;
use serde::de::DeserializeOwned;

use super::retry::{NonRetryableError, RetryPolicy, check_retryable};

/// Wraps a reqwest client with the retry loop used for inventory fetches.
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    policy: RetryPolicy,
}

impl HttpClient {
    /// Creates a new HTTP client wrapping the given reqwest Client, with the default retry policy.
    pub fn new(client: Client) -> Self {
        Self::with_policy(client, RetryPolicy::default())
    }

    /// Creates a new HTTP client with an explicit retry policy.
    pub fn with_policy(client: Client, policy: RetryPolicy) -> Self {
        Self { client, policy }
    }

    /// The retry policy used by every request.
    pub fn policy(&self) -> RetryPolicy {
        self.policy
    }

    /// GET `url` and deserialize the JSON body, retrying transient failures.
    #[tracing::instrument(skip(self))]
    pub async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        debug!("GET JSON from {}...", url);

        self.with_retry("GET JSON", || async {
            let response = self
                .client
                .get(url)
                .send()
                .await
                .context("Failed to send request")?;

            let response = response.error_for_status().map_err(check_retryable)?;

            response
                .json::<T>()
                .await
                .context("Failed to parse JSON response")
        })
        .await
    }

    async fn with_retry<F, Fut, T>(&self, operation_name: &str, operation: F) -> Result<T>
    where
        F: Fn() -> Fut,
        Fut: std::future::Future<Output = Result<T>>,
    {
        let attempts = self.policy.attempts.max(1);
        let mut attempt = 1;

        loop {
            match operation().await {
                Ok(result) => return Ok(result),
                Err(e) if e.downcast_ref::<NonRetryableError>().is_some() => {
                    debug!("{}: non-retryable error: {}", operation_name, e);
                    return Err(e);
                }
                Err(e) if attempt >= attempts => {
                    return Err(e.context(format!(
                        "{}: failed after {} attempt(s)",
                        operation_name, attempts
                    )));
                }
                Err(e) => {
                    warn!(
                        "{}: attempt {}/{} failed ({}), retrying in {:?}...",
                        operation_name, attempt, attempts, e, self.policy.delay
                    );
                    tokio::time::sleep(self.policy.delay).await;
                    attempt += 1;
                }
            }
        }
    }
}
