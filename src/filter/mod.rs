//! Release-window filtering
//!
//! Removes candidates of tracked families whose release line is known to
//! exist but falls outside the declared constraint. Untracked packages pass
//! through untouched, and a family whose known lines never meet the
//! constraint is left unfiltered so it stays installable.

mod window;

use log::{debug, info, warn};
use std::collections::{BTreeMap, HashMap};
use thiserror::Error;

use crate::constraint::{Constraint, ConstraintError};
use crate::inventory::{Family, Inventory, InventoryProvider};
use crate::package::{Candidate, VersionToken};

pub use window::FamilyWindow;

#[derive(Error, Debug)]
pub enum FilterError {
    #[error("Invalid constraint: {0}")]
    InvalidConstraint(#[from] ConstraintError),
    #[error("Failed to obtain release-line inventory: {0:#}")]
    Inventory(anyhow::Error),
}

/// Filters candidate lists against one constraint and one inventory.
#[derive(Debug, Clone)]
pub struct ReleaseWindowFilter {
    constraint: Constraint,
    umbrella: String,
    windows: HashMap<String, FamilyWindow>,
}

impl ReleaseWindowFilter {
    /// Build the filter from an already parsed constraint and a fetched inventory.
    pub fn new(constraint: Constraint, umbrella: &str, inventory: &Inventory) -> Self {
        let mut windows = HashMap::new();

        let names = inventory
            .families()
            .map(|(name, _)| name)
            .chain(std::iter::once(umbrella));
        for name in names {
            let Some(family) = Family::classify(name, umbrella, inventory) else {
                continue;
            };
            let window = FamilyWindow::compute(family, umbrella, inventory, &constraint);
            debug!(
                "{}: known lines [{}], window [{}]",
                name,
                join(window.known().iter()),
                join(window.intersecting().iter())
            );
            windows.insert(name.to_string(), window);
        }

        Self {
            constraint,
            umbrella: umbrella.to_string(),
            windows,
        }
    }

    /// Parse `constraint` and build the filter; an invalid constraint is fatal.
    pub fn from_parts(constraint: &str, umbrella: &str, inventory: &Inventory) -> Result<Self, FilterError> {
        let constraint = Constraint::parse(constraint)?;
        Ok(Self::new(constraint, umbrella, inventory))
    }

    /// Parse `constraint`, then query `provider` exactly once.
    #[tracing::instrument(skip(provider))]
    pub async fn from_provider<P>(constraint: &str, umbrella: &str, provider: &P) -> Result<Self, FilterError>
    where
        P: InventoryProvider + ?Sized,
    {
        let constraint = Constraint::parse(constraint)?;
        let inventory = provider.release_lines().await.map_err(FilterError::Inventory)?;
        Ok(Self::new(constraint, umbrella, &inventory))
    }

    /// The constraint every window was computed from.
    pub fn constraint(&self) -> &Constraint {
        &self.constraint
    }

    /// Name of the umbrella family.
    pub fn umbrella(&self) -> &str {
        &self.umbrella
    }

    /// The window of a filterable family, `None` for untracked names.
    pub fn window(&self, name: &str) -> Option<&FamilyWindow> {
        self.windows.get(name)
    }

    /// Every filterable family's window, ordered by name.
    pub fn windows(&self) -> BTreeMap<&str, &FamilyWindow> {
        self.windows
            .iter()
            .map(|(name, window)| (name.as_str(), window))
            .collect()
    }

    /// Decide whether one candidate survives.
    pub fn keeps<C: Candidate + ?Sized>(&self, candidate: &C) -> bool {
        let Some(window) = self.windows.get(candidate.name()) else {
            return true;
        };
        if !window.is_active() {
            return true;
        }

        match VersionToken::parse(candidate.version(), candidate.branch_alias()) {
            Ok(token) => token.line().is_none_or(|line| window.keeps(&line)),
            Err(e) => {
                warn!(
                    "Keeping {} {}: {}",
                    candidate.name(),
                    candidate.version(),
                    e
                );
                true
            }
        }
    }

    /// Return the candidates that survive, in their original order.
    pub fn filter_legacy<C: Candidate + Clone>(&self, candidates: &[C]) -> Vec<C> {
        let mut dropped: BTreeMap<&str, usize> = BTreeMap::new();
        let mut kept = Vec::with_capacity(candidates.len());

        for candidate in candidates {
            if self.keeps(candidate) {
                kept.push(candidate.clone());
            } else {
                debug!("Dropping {} {}", candidate.name(), candidate.version());
                *dropped.entry(candidate.name()).or_default() += 1;
            }
        }

        for (name, count) in dropped {
            info!(
                "Restricting packages listed in \"{}\" to \"{}\" ({} dropped)",
                name, self.constraint, count
            );
        }

        kept
    }
}

fn join<'a, I: Iterator<Item = &'a crate::package::ReleaseLine>>(lines: I) -> String {
    lines.map(ToString::to_string).collect::<Vec<_>>().join(", ")
}
