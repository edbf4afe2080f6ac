//! Branch-alias resolution for development versions.
//!
//! Package metadata can alias a symbolic branch such as `dev-master` to the
//! release line it will become (`extra.branch-alias: {"dev-master": "3.5-dev"}`).

use log::debug;
use std::collections::BTreeMap;

use super::ReleaseLine;

/// Look up the alias declared for `version` in a `branch-alias` map.
pub fn branch_alias_for<'a>(version: &str, aliases: &'a BTreeMap<String, String>) -> Option<&'a str> {
    aliases.get(version).map(String::as_str)
}

/// Derive the release line an alias points at.
///
/// Accepts `3.5-dev`, `3.5.x-dev`, `v3.5.*-dev` and `3.5.0-dev`. Returns `None`
/// when the alias does not name a minor version (e.g. `3.x-dev`) or does not parse.
pub fn alias_line(alias: &str) -> Option<ReleaseLine> {
    let trimmed = alias.trim();
    let without_dev = trimmed
        .strip_suffix("-dev")
        .or_else(|| trimmed.strip_suffix("-DEV"))
        .unwrap_or(trimmed);
    let numeric = without_dev
        .strip_prefix('v')
        .or_else(|| without_dev.strip_prefix('V'))
        .unwrap_or(without_dev);

    let mut numbers = Vec::with_capacity(2);
    for part in numeric.split('.') {
        if matches!(part, "x" | "X" | "*") {
            break;
        }
        match part.parse::<u64>() {
            Ok(n) => numbers.push(n),
            Err(_) => {
                debug!("Ignoring unparsable branch alias '{}'", alias);
                return None;
            }
        }
        if numbers.len() == 2 {
            break;
        }
    }

    match numbers.as_slice() {
        [major, minor] => Some(ReleaseLine::new(*major, *minor)),
        _ => {
            debug!("Branch alias '{}' does not name a release line", alias);
            None
        }
    }
}
