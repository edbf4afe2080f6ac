use anyhow::{Context, Result};
use log::{debug, info};
use std::path::Path;

use crate::{
    filter::ReleaseWindowFilter,
    package::ComposerPackage,
    runtime::Runtime,
};

use super::{build_filter, config::Config};

/// Filter the candidate document at `candidates_path` and print the survivors as JSON.
#[tracing::instrument(skip(config))]
pub async fn filter<R: Runtime>(config: Config<R>, candidates_path: &Path) -> Result<()> {
    let release_filter = build_filter(&config).await?;

    debug!("Reading candidates from {:?}", candidates_path);
    let content = config
        .runtime
        .read_to_string(candidates_path)
        .with_context(|| format!("Failed to read candidates from {:?}", candidates_path))?;

    println!("{}", render_filtered(&release_filter, &content)?);
    Ok(())
}

/// Filter a candidate document and render the kept packages as pretty JSON.
pub fn render_filtered(release_filter: &ReleaseWindowFilter, content: &str) -> Result<String> {
    let packages = ComposerPackage::parse_list(content)?;
    let kept = release_filter.filter_legacy(&packages);
    info!(
        "Kept {} of {} candidate(s) for \"{}\"",
        kept.len(),
        packages.len(),
        release_filter.constraint()
    );
    serde_json::to_string_pretty(&kept).context("Failed to serialize filtered packages")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::config::{AUTH_TOKEN_VAR, InventorySource};
    use crate::inventory::Inventory;
    use crate::runtime::MockRuntime;
    use mockall::predicate::eq;
    use std::path::PathBuf;

    const CANDIDATES: &str = r#"[
        {"name": "other/unrelated", "version": "1.0.0"},
        {"name": "acme/acme", "version": "3.3.0", "version_normalized": "3.3.0.0"},
        {"name": "acme/acme", "version": "3.4.0", "version_normalized": "3.4.0.0"},
        {"name": "acme/acme", "version": "dev-master",
         "extra": {"branch-alias": {"dev-master": "3.5-dev"}}},
        {"name": "acme/foo", "version": "3.3.0", "version_normalized": "3.3.0.0"},
        {"name": "acme/foo", "version": "3.4.0", "version_normalized": "3.4.0.0"},
        {"name": "acme/foo", "version": "dev-master",
         "extra": {"branch-alias": {"dev-master": "3.5-dev"}}}
    ]"#;

    fn inventory() -> Inventory {
        Inventory::from_json(r#"{"splits": {"acme/foo": ["3.3", "3.4", "3.5"]}}"#).unwrap()
    }

    fn kept_versions(output: &str) -> Vec<(String, String)> {
        let packages = ComposerPackage::parse_list(output).unwrap();
        packages.into_iter().map(|p| (p.name, p.version)).collect()
    }

    #[test]
    fn test_render_filtered_drops_old_line() {
        let release_filter = ReleaseWindowFilter::from_parts("~3.4", "acme/acme", &inventory()).unwrap();
        let output = render_filtered(&release_filter, CANDIDATES).unwrap();

        let kept = kept_versions(&output);
        assert_eq!(kept.len(), 5);
        assert!(!kept.contains(&("acme/foo".to_string(), "3.3.0".to_string())));
        assert!(!kept.contains(&("acme/acme".to_string(), "3.3.0".to_string())));
        assert!(output.contains("\"version_normalized\": \"3.4.0.0\""));
        assert!(output.contains("\"branch-alias\""));
    }

    #[test]
    fn test_render_filtered_out_of_range_constraint() {
        let release_filter = ReleaseWindowFilter::from_parts("~2.0", "acme/acme", &inventory()).unwrap();
        let output = render_filtered(&release_filter, CANDIDATES).unwrap();
        assert_eq!(kept_versions(&output).len(), 7);
    }

    #[test]
    fn test_render_filtered_invalid_document() {
        let release_filter = ReleaseWindowFilter::from_parts("~3.4", "acme/acme", &inventory()).unwrap();
        assert!(render_filtered(&release_filter, "{\"nope\": 1}").is_err());
    }

    #[tokio::test]
    async fn test_filter_command_with_file_inventory() {
        let inventory_path = PathBuf::from("/project/versions.json");
        let candidates_path = PathBuf::from("/project/candidates.json");

        let mut runtime = MockRuntime::new();
        runtime
            .expect_env_var()
            .with(eq(AUTH_TOKEN_VAR))
            .returning(|_| Err(std::env::VarError::NotPresent));
        runtime
            .expect_exists()
            .with(eq(inventory_path.clone()))
            .returning(|_| true);
        runtime
            .expect_read_to_string()
            .with(eq(inventory_path.clone()))
            .times(1)
            .returning(|_| Ok(r#"{"splits": {"acme/foo": ["3.3", "3.4", "3.5"]}}"#.to_string()));
        runtime
            .expect_read_to_string()
            .with(eq(candidates_path.clone()))
            .times(1)
            .returning(|_| Ok(CANDIDATES.to_string()));

        let config = Config::new(
            runtime,
            "~3.4",
            "acme/acme",
            InventorySource::File(inventory_path),
        )
        .unwrap();

        assert!(filter(config, &candidates_path).await.is_ok());
    }

    #[tokio::test]
    async fn test_filter_command_invalid_constraint() {
        let mut runtime = MockRuntime::new();
        runtime
            .expect_env_var()
            .returning(|_| Err(std::env::VarError::NotPresent));
        runtime.expect_read_to_string().never();

        let config = Config::new(
            runtime,
            "not a constraint",
            "acme/acme",
            InventorySource::File(PathBuf::from("/project/versions.json")),
        )
        .unwrap();

        let err = filter(config, Path::new("/project/candidates.json"))
            .await
            .unwrap_err();
        assert!(format!("{:#}", err).contains("Invalid constraint"));
    }
}
