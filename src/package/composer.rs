use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

use super::alias::branch_alias_for;
use super::record::Candidate;

/// A package entry as found in Composer repository metadata.
///
/// Only the fields the filter reads are typed; everything else is kept in
/// `rest` so a filtered document serializes back with its original metadata.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ComposerPackage {
    pub name: String,
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version_normalized: Option<String>,
    #[serde(default, skip_serializing_if = "ComposerExtra::is_empty")]
    pub extra: ComposerExtra,
    #[serde(flatten)]
    pub rest: Map<String, Value>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct ComposerExtra {
    #[serde(
        rename = "branch-alias",
        default,
        skip_serializing_if = "BTreeMap::is_empty"
    )]
    pub branch_alias: BTreeMap<String, String>,
    #[serde(flatten)]
    pub rest: Map<String, Value>,
}

impl ComposerExtra {
    fn is_empty(&self) -> bool {
        self.branch_alias.is_empty() && self.rest.is_empty()
    }
}

/// Accepted layouts for a candidate document.
#[derive(Deserialize)]
#[serde(untagged)]
enum CandidateDocument {
    List(Vec<ComposerPackage>),
    Wrapped { packages: Vec<ComposerPackage> },
}

impl ComposerPackage {
    /// Parse a JSON array of packages, or an object with a `packages` array.
    #[tracing::instrument(skip(content))]
    pub fn parse_list(content: &str) -> Result<Vec<Self>> {
        let document: CandidateDocument =
            serde_json::from_str(content).context("Failed to parse candidate packages")?;
        Ok(match document {
            CandidateDocument::List(packages) => packages,
            CandidateDocument::Wrapped { packages } => packages,
        })
    }
}

impl Candidate for ComposerPackage {
    fn name(&self) -> &str {
        &self.name
    }

    fn version(&self) -> &str {
        &self.version
    }

    fn branch_alias(&self) -> Option<&str> {
        branch_alias_for(&self.version, &self.extra.branch_alias)
    }
}
