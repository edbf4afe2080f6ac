use anyhow::{Context, Result};
use async_trait::async_trait;
use log::debug;
use std::path::{Path, PathBuf};

use crate::runtime::Runtime;

use super::{Inventory, InventoryProvider};

/// Reads the inventory document from a local file.
pub struct FileInventoryProvider<'a, R: Runtime> {
    runtime: &'a R,
    path: PathBuf,
}

impl<'a, R: Runtime> FileInventoryProvider<'a, R> {
    /// Creates a provider reading `path` through `runtime`.
    pub fn new(runtime: &'a R, path: &Path) -> Self {
        Self {
            runtime,
            path: path.to_path_buf(),
        }
    }
}

#[async_trait]
impl<'a, R: Runtime> InventoryProvider for FileInventoryProvider<'a, R> {
    #[tracing::instrument(skip(self))]
    async fn release_lines(&self) -> Result<Inventory> {
        debug!("Reading release-line inventory from {:?}", self.path);
        if !self.runtime.exists(&self.path) {
            anyhow::bail!("Inventory file {:?} does not exist", self.path);
        }
        let content = self.runtime.read_to_string(&self.path)?;
        Inventory::from_json(&content).with_context(|| format!("Invalid inventory file {:?}", self.path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::MockRuntime;
    use mockall::predicate::eq;

    #[tokio::test]
    async fn test_release_lines_from_file() {
        let path = PathBuf::from("/project/versions.json");
        let mut runtime = MockRuntime::new();
        runtime
            .expect_exists()
            .with(eq(path.clone()))
            .returning(|_| true);
        runtime
            .expect_read_to_string()
            .with(eq(path.clone()))
            .times(1)
            .returning(|_| Ok(r#"{"splits": {"acme/foo": ["2.8", "3.0"]}}"#.to_string()));

        let provider = FileInventoryProvider::new(&runtime, &path);
        let inventory = provider.release_lines().await.unwrap();

        assert_eq!(inventory.lines("acme/foo").unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_release_lines_missing_file() {
        let path = PathBuf::from("/project/missing.json");
        let mut runtime = MockRuntime::new();
        runtime.expect_exists().returning(|_| false);
        runtime.expect_read_to_string().never();

        let provider = FileInventoryProvider::new(&runtime, &path);
        let err = provider.release_lines().await.unwrap_err();

        assert!(err.to_string().contains("does not exist"));
    }

    #[tokio::test]
    async fn test_release_lines_invalid_file() {
        let mut runtime = MockRuntime::new();
        runtime.expect_exists().returning(|_| true);
        runtime
            .expect_read_to_string()
            .returning(|_| Ok("not json".to_string()));

        let provider = FileInventoryProvider::new(&runtime, Path::new("/project/versions.json"));
        let err = provider.release_lines().await.unwrap_err();

        assert!(err.to_string().contains("Invalid inventory file"));
    }
}
