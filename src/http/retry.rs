//! Retry policy and status classification for inventory requests.

use reqwest::StatusCode;
use std::time::Duration;
use thiserror::Error;

/// Default number of attempts for a request.
pub const MAX_RETRIES: usize = 3;

/// Default delay between attempts in milliseconds.
pub const RETRY_DELAY_MS: u64 = 1000;

/// How often and how patiently a request is retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub attempts: usize,
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: MAX_RETRIES,
            delay: Duration::from_millis(RETRY_DELAY_MS),
        }
    }
}

impl RetryPolicy {
    /// A single attempt, no waiting.
    pub fn none() -> Self {
        Self {
            attempts: 1,
            delay: Duration::ZERO,
        }
    }
}

/// Responses that will not improve on retry.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NonRetryableError {
    #[error("Rate limit exceeded (HTTP {0}). Try again later or set RELWIN_AUTH_TOKEN.")]
    RateLimitExceeded(u16),
    #[error("Authentication failed. Check RELWIN_AUTH_TOKEN.")]
    AuthenticationFailed,
    #[error("Access forbidden. The inventory endpoint may require RELWIN_AUTH_TOKEN.")]
    Forbidden,
    #[error("Inventory not found at the configured URL")]
    NotFound,
    #[error("Request error: HTTP {0}")]
    ClientError(u16),
}

/// Classify a response status. `None` means the failure is worth retrying.
pub fn classify_status(status: StatusCode) -> Option<NonRetryableError> {
    match status {
        StatusCode::UNAUTHORIZED => Some(NonRetryableError::AuthenticationFailed),
        StatusCode::FORBIDDEN => Some(NonRetryableError::Forbidden),
        StatusCode::TOO_MANY_REQUESTS => Some(NonRetryableError::RateLimitExceeded(
            status.as_u16(),
        )),
        StatusCode::NOT_FOUND => Some(NonRetryableError::NotFound),
        s if s.is_client_error() => Some(NonRetryableError::ClientError(s.as_u16())),
        _ => None,
    }
}

/// Classify a reqwest error; transport errors and 5xx responses are retryable.
pub fn classify_error(error: &reqwest::Error) -> Result<(), NonRetryableError> {
    match error.status().and_then(classify_status) {
        Some(non_retryable) => Err(non_retryable),
        None => Ok(()),
    }
}

/// Convert an `error_for_status()` failure into an error the retry loop understands.
pub fn check_retryable(error: reqwest::Error) -> anyhow::Error {
    match classify_error(&error) {
        Ok(()) => anyhow::Error::from(error),
        Err(non_retryable) => anyhow::Error::from(non_retryable),
    }
}
