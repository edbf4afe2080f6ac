//! Runtime abstraction for system operations.
//!
//! Environment and file-system access go through this trait so commands and
//! providers can be tested against a mock.

use anyhow::{Context, Result};
use std::env;
use std::fs;
use std::path::Path;

#[cfg_attr(test, mockall::automock)]
pub trait Runtime: Send + Sync {
    // Environment
    fn env_var(&self, key: &str) -> Result<String, env::VarError>;

    // File System
    fn read_to_string(&self, path: &Path) -> Result<String>;
    fn exists(&self, path: &Path) -> bool;
}

pub struct RealRuntime;

impl Runtime for RealRuntime {
    #[tracing::instrument(skip(self))]
    fn env_var(&self, key: &str) -> Result<String, env::VarError> {
        env::var(key)
    }

    #[tracing::instrument(skip(self))]
    fn read_to_string(&self, path: &Path) -> Result<String> {
        fs::read_to_string(path).with_context(|| format!("Failed to read {:?}", path))
    }

    #[tracing::instrument(skip(self))]
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }
}
