use anyhow::{Context, Result};
use log::debug;

use crate::{filter::ReleaseWindowFilter, runtime::Runtime};

pub mod config;
mod filter;
mod window;

pub use filter::{filter, render_filtered};
pub use window::{render_windows, window};

use config::Config;

/// Fetch the inventory once and build the filter for the configured constraint.
#[tracing::instrument(skip(config))]
pub async fn build_filter<R: Runtime>(config: &Config<R>) -> Result<ReleaseWindowFilter> {
    debug!(
        "Building release window for {} with constraint {}",
        config.umbrella, config.require
    );
    let provider = config.provider();
    ReleaseWindowFilter::from_provider(&config.require, &config.umbrella, provider.as_ref())
        .await
        .context("Failed to build release window")
}
