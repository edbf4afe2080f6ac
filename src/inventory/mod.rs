//! Release-line inventory
//!
//! The inventory maps each tracked family to the release lines known to
//! exist for it. Providers abstract where that mapping comes from (a remote
//! endpoint, a local file, or memory).

mod file;
mod http;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::{BTreeMap, BTreeSet};

use crate::package::ReleaseLine;

pub use file::FileInventoryProvider;
pub use http::HttpInventoryProvider;

/// Known release lines per family.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Inventory {
    families: BTreeMap<String, BTreeSet<ReleaseLine>>,
}

/// Wire layout of an inventory document. Keys other than `splits` are ignored.
#[derive(Deserialize)]
struct InventoryDocument {
    #[serde(default)]
    splits: BTreeMap<String, Vec<ReleaseLine>>,
}

impl Inventory {
    /// Creates an empty inventory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse `{"splits": {"<family>": ["3.3", "3.4"], ...}}`.
    pub fn from_json(content: &str) -> Result<Self> {
        let value: serde_json::Value =
            serde_json::from_str(content).context("Failed to parse release-line inventory")?;
        Self::from_value(value)
    }

    /// Decode an already parsed inventory document; anything but an object is rejected.
    pub fn from_value(value: serde_json::Value) -> Result<Self> {
        if !value.is_object() {
            anyhow::bail!("Invalid release-line inventory: expected a JSON object");
        }
        let document: InventoryDocument =
            serde_json::from_value(value).context("Invalid release-line inventory")?;
        Ok(document.splits.into_iter().collect())
    }

    /// Adds `lines` to `family`, creating the family if needed.
    pub fn insert<I>(&mut self, family: &str, lines: I)
    where
        I: IntoIterator<Item = ReleaseLine>,
    {
        self.families
            .entry(family.to_string())
            .or_default()
            .extend(lines);
    }

    /// The known lines of `family`, `None` when it is not tracked.
    pub fn lines(&self, family: &str) -> Option<&BTreeSet<ReleaseLine>> {
        self.families.get(family)
    }

    /// Whether `family` has an entry.
    pub fn contains(&self, family: &str) -> bool {
        self.families.contains_key(family)
    }

    /// Every tracked family with its lines, ordered by name.
    pub fn families(&self) -> impl Iterator<Item = (&str, &BTreeSet<ReleaseLine>)> {
        self.families.iter().map(|(name, lines)| (name.as_str(), lines))
    }

    /// Deduplicated union of every family's lines.
    pub fn all_lines(&self) -> BTreeSet<ReleaseLine> {
        self.families.values().flatten().copied().collect()
    }

    /// Whether no family is tracked.
    pub fn is_empty(&self) -> bool {
        self.families.is_empty()
    }
}

impl<S, I> FromIterator<(S, I)> for Inventory
where
    S: Into<String>,
    I: IntoIterator<Item = ReleaseLine>,
{
    fn from_iter<T: IntoIterator<Item = (S, I)>>(iter: T) -> Self {
        let mut families: BTreeMap<String, BTreeSet<ReleaseLine>> = BTreeMap::new();
        for (name, lines) in iter {
            families.entry(name.into()).or_default().extend(lines);
        }
        Inventory { families }
    }
}

/// How a filterable package name relates to the inventory.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Family {
    /// The meta-package tracking the family as a whole.
    Umbrella,
    /// A family with its own inventory entry.
    Component(String),
}

impl Family {
    /// Classify `name`; `None` means the package is not tracked at all.
    pub fn classify(name: &str, umbrella: &str, inventory: &Inventory) -> Option<Family> {
        if name == umbrella {
            Some(Family::Umbrella)
        } else if inventory.contains(name) {
            Some(Family::Component(name.to_string()))
        } else {
            None
        }
    }
}

/// Source of the release-line inventory.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait InventoryProvider: Send + Sync {
    /// Fetch the complete inventory.
    async fn release_lines(&self) -> Result<Inventory>;
}

/// Provider over an inventory already held in memory.
#[derive(Debug, Clone, Default)]
pub struct StaticInventoryProvider {
    inventory: Inventory,
}

impl StaticInventoryProvider {
    /// Creates a provider that always returns `inventory`.
    pub fn new(inventory: Inventory) -> Self {
        Self { inventory }
    }
}

#[async_trait]
impl InventoryProvider for StaticInventoryProvider {
    async fn release_lines(&self) -> Result<Inventory> {
        Ok(self.inventory.clone())
    }
}
