use std::collections::BTreeSet;

use crate::constraint::Constraint;
use crate::inventory::{Family, Inventory};
use crate::package::ReleaseLine;

/// The known and admitted release lines of one filterable family.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FamilyWindow {
    family: Family,
    known: BTreeSet<ReleaseLine>,
    intersecting: BTreeSet<ReleaseLine>,
}

impl FamilyWindow {
    /// Compute the window from the complete inventory.
    ///
    /// The umbrella family uses its own entry when it has one, otherwise the
    /// union of every entry.
    pub fn compute(family: Family, umbrella: &str, inventory: &Inventory, constraint: &Constraint) -> Self {
        let known = match &family {
            Family::Umbrella => match inventory.lines(umbrella) {
                Some(lines) => lines.clone(),
                None => inventory.all_lines(),
            },
            Family::Component(name) => inventory.lines(name).cloned().unwrap_or_default(),
        };
        let intersecting = known
            .iter()
            .filter(|line| constraint.admits_line(line))
            .copied()
            .collect();

        FamilyWindow {
            family,
            known,
            intersecting,
        }
    }

    /// Whether this window belongs to the umbrella or a component.
    pub fn family(&self) -> &Family {
        &self.family
    }

    /// Every line the inventory lists for the family.
    pub fn known(&self) -> &BTreeSet<ReleaseLine> {
        &self.known
    }

    /// The known lines the constraint admits.
    pub fn intersecting(&self) -> &BTreeSet<ReleaseLine> {
        &self.intersecting
    }

    /// An empty intersection disables filtering for the family.
    pub fn is_active(&self) -> bool {
        !self.intersecting.is_empty()
    }

    /// Whether a candidate on `line` survives this window.
    pub fn keeps(&self, line: &ReleaseLine) -> bool {
        !self.is_active() || !self.known.contains(line) || self.intersecting.contains(line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(list: &[&str]) -> Vec<ReleaseLine> {
        list.iter().map(|s| s.parse().unwrap()).collect()
    }

    fn set(list: &[&str]) -> BTreeSet<ReleaseLine> {
        lines(list).into_iter().collect()
    }

    fn inventory() -> Inventory {
        [
            ("acme/foo", lines(&["2.8", "3.0"])),
            ("acme/new", lines(&["3.0", "3.1"])),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_component_window() {
        let constraint = Constraint::parse("~2.8").unwrap();
        let window = FamilyWindow::compute(
            Family::Component("acme/foo".into()),
            "acme/acme",
            &inventory(),
            &constraint,
        );

        assert_eq!(window.known(), &set(&["2.8", "3.0"]));
        assert_eq!(window.intersecting(), &set(&["2.8"]));
        assert!(window.is_active());
        assert!(window.keeps(&"2.8".parse().unwrap()));
        assert!(!window.keeps(&"3.0".parse().unwrap()));
        assert!(window.keeps(&"4.2".parse().unwrap()));
    }

    #[test]
    fn test_umbrella_falls_back_to_union() {
        let constraint = Constraint::parse("~3.0").unwrap();
        let window = FamilyWindow::compute(Family::Umbrella, "acme/acme", &inventory(), &constraint);

        assert_eq!(window.family(), &Family::Umbrella);
        assert_eq!(window.known(), &set(&["2.8", "3.0", "3.1"]));
        assert_eq!(window.intersecting(), &set(&["3.0", "3.1"]));
    }

    #[test]
    fn test_umbrella_prefers_own_entry() {
        let mut inventory = inventory();
        inventory.insert("acme/acme", lines(&["3.1"]));
        let constraint = Constraint::parse("*").unwrap();

        let window = FamilyWindow::compute(Family::Umbrella, "acme/acme", &inventory, &constraint);
        assert_eq!(window.known(), &set(&["3.1"]));
    }

    #[test]
    fn test_empty_intersection_keeps_everything() {
        let constraint = Constraint::parse("~2.8").unwrap();
        let window = FamilyWindow::compute(
            Family::Component("acme/new".into()),
            "acme/acme",
            &inventory(),
            &constraint,
        );

        assert!(!window.is_active());
        assert!(window.keeps(&"3.0".parse().unwrap()));
        assert!(window.keeps(&"3.1".parse().unwrap()));
    }
}
