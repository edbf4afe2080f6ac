//! Comparable line tokens for candidate versions.
//!
//! A candidate is judged by the release line its version belongs to. Numeric
//! versions truncate to `major.minor`; symbolic `dev-*` branches borrow the
//! line from their branch alias, if they have one.

use anyhow::Result;

use super::ReleaseLine;
use super::alias::alias_line;

const STABILITY_WORDS: &[&str] = &[
    "dev", "alpha", "a", "beta", "b", "rc", "patch", "pl", "p", "stable",
];

/// The line-level view of one candidate version.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionToken {
    /// A numeric version (release, pre-release or numeric dev branch).
    Stable(ReleaseLine),
    /// A symbolic branch such as `dev-master`, with the line from its alias.
    Development(Option<ReleaseLine>),
}

impl VersionToken {
    /// Classify `version`, using `branch_alias` only for symbolic versions.
    pub fn parse(version: &str, branch_alias: Option<&str>) -> Result<Self> {
        let trimmed = version.trim();
        if trimmed.starts_with("dev-") {
            return Ok(VersionToken::Development(branch_alias.and_then(alias_line)));
        }

        let without_build = trimmed.split('+').next().unwrap_or(trimmed);
        let (numeric, suffix) = match without_build.split_once('-') {
            Some((numeric, suffix)) => (numeric, Some(suffix)),
            None => (without_build, None),
        };

        if let Some(suffix) = suffix {
            if !is_stability_suffix(suffix) {
                anyhow::bail!("Unrecognized version '{}'", version);
            }
        }

        let numeric = numeric
            .strip_prefix('v')
            .or_else(|| numeric.strip_prefix('V'))
            .unwrap_or(numeric);
        let parts: Vec<&str> = numeric.split('.').collect();
        if parts.is_empty() || parts.len() > 4 {
            anyhow::bail!("Unrecognized version '{}'", version);
        }

        let major = parse_number(parts[0], version)?;
        let minor = match parts.get(1) {
            None => 0,
            // `3.x-dev` tracks a whole major; there is no single line to compare.
            Some(part) if is_wildcard(part) => return Ok(VersionToken::Development(None)),
            Some(part) => parse_number(part, version)?,
        };
        for part in parts.iter().skip(2) {
            if !is_wildcard(part) {
                parse_number(part, version)?;
            }
        }

        Ok(VersionToken::Stable(ReleaseLine::new(major, minor)))
    }

    /// The comparable line token, if the version has one.
    pub fn line(&self) -> Option<ReleaseLine> {
        match self {
            VersionToken::Stable(line) => Some(*line),
            VersionToken::Development(line) => *line,
        }
    }
}

fn is_wildcard(part: &str) -> bool {
    matches!(part, "x" | "X" | "*")
}

fn parse_number(part: &str, version: &str) -> Result<u64> {
    if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
        anyhow::bail!("Unrecognized version '{}'", version);
    }
    Ok(part.parse()?)
}

fn is_stability_suffix(suffix: &str) -> bool {
    let lower = suffix.to_ascii_lowercase();
    let word_end = lower
        .find(|c: char| !c.is_ascii_alphabetic())
        .unwrap_or(lower.len());
    let (word, rest) = lower.split_at(word_end);
    let rest = rest.trim_start_matches(['.', '-']);
    STABILITY_WORDS.contains(&word) && rest.bytes().all(|b| b.is_ascii_digit() || b == b'.')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stable(major: u64, minor: u64) -> VersionToken {
        VersionToken::Stable(ReleaseLine::new(major, minor))
    }

    #[test]
    fn test_parse_plain_versions() {
        assert_eq!(VersionToken::parse("3.4.0", None).unwrap(), stable(3, 4));
        assert_eq!(VersionToken::parse("3.4.0.0", None).unwrap(), stable(3, 4));
        assert_eq!(VersionToken::parse("v3.4.1", None).unwrap(), stable(3, 4));
        assert_eq!(VersionToken::parse("3", None).unwrap(), stable(3, 0));
    }

    #[test]
    fn test_parse_pre_releases() {
        assert_eq!(VersionToken::parse("3.4.0-beta1", None).unwrap(), stable(3, 4));
        assert_eq!(VersionToken::parse("3.4.0-RC2", None).unwrap(), stable(3, 4));
        assert_eq!(VersionToken::parse("3.4.0-alpha.1", None).unwrap(), stable(3, 4));
        assert_eq!(VersionToken::parse("3.4.0-p1", None).unwrap(), stable(3, 4));
    }

    #[test]
    fn test_parse_numeric_dev_branch() {
        assert_eq!(VersionToken::parse("3.4.x-dev", None).unwrap(), stable(3, 4));
        assert_eq!(
            VersionToken::parse("3.4.9999999.9999999-dev", None).unwrap(),
            stable(3, 4)
        );
        assert_eq!(
            VersionToken::parse("3.x-dev", None).unwrap(),
            VersionToken::Development(None)
        );
    }

    #[test]
    fn test_parse_symbolic_branch_uses_alias() {
        let token = VersionToken::parse("dev-master", Some("3.5-dev")).unwrap();
        assert_eq!(token, VersionToken::Development(Some(ReleaseLine::new(3, 5))));
        assert_eq!(token.line(), Some(ReleaseLine::new(3, 5)));
    }

    #[test]
    fn test_parse_symbolic_branch_without_alias() {
        let token = VersionToken::parse("dev-feature/foo", None).unwrap();
        assert_eq!(token, VersionToken::Development(None));
        assert_eq!(token.line(), None);
    }

    #[test]
    fn test_alias_ignored_for_numeric_versions() {
        let token = VersionToken::parse("3.3.0", Some("3.5-dev")).unwrap();
        assert_eq!(token, stable(3, 3));
    }

    #[test]
    fn test_parse_garbage() {
        assert!(VersionToken::parse("", None).is_err());
        assert!(VersionToken::parse("latest", None).is_err());
        assert!(VersionToken::parse("3.4.0-nightly", None).is_err());
        assert!(VersionToken::parse("1.2.3.4.5", None).is_err());
        assert!(VersionToken::parse("1..2", None).is_err());
    }
}
