//! Release lines: the major.minor granularity used for window comparisons.

use anyhow::{Context, Result};
use serde::{Deserialize, Deserializer};
use std::fmt;
use std::str::FromStr;

/// A coarse `major.minor` identifier such as `3.4`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ReleaseLine {
    pub major: u64,
    pub minor: u64,
}

impl ReleaseLine {
    /// Creates the line `major.minor`.
    pub fn new(major: u64, minor: u64) -> Self {
        Self { major, minor }
    }

    /// The line as the exact version `major.minor.0`, the form constraints test against.
    pub fn as_version(&self) -> semver::Version {
        semver::Version::new(self.major, self.minor, 0)
    }
}

impl fmt::Display for ReleaseLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

impl FromStr for ReleaseLine {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let mut parts = trimmed.split('.');

        let major = match parts.next() {
            Some(part) if !part.is_empty() => part
                .parse::<u64>()
                .with_context(|| format!("Invalid release line '{}'", s))?,
            _ => anyhow::bail!("Invalid release line '{}'. Expected 'major.minor'.", s),
        };
        let minor = match parts.next() {
            Some(part) => part
                .parse::<u64>()
                .with_context(|| format!("Invalid release line '{}'", s))?,
            None => 0,
        };

        if parts.next().is_some() {
            anyhow::bail!("Invalid release line '{}'. Expected 'major.minor'.", s);
        }

        Ok(ReleaseLine { major, minor })
    }
}

impl<'de> Deserialize<'de> for ReleaseLine {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_major_minor() {
        let line: ReleaseLine = "3.4".parse().unwrap();
        assert_eq!(line, ReleaseLine::new(3, 4));
        assert_eq!(line.to_string(), "3.4");
    }

    #[test]
    fn test_parse_major_only() {
        let line: ReleaseLine = "5".parse().unwrap();
        assert_eq!(line, ReleaseLine::new(5, 0));
    }

    #[test]
    fn test_parse_invalid() {
        assert!("".parse::<ReleaseLine>().is_err());
        assert!("3.4.1".parse::<ReleaseLine>().is_err());
        assert!("three.four".parse::<ReleaseLine>().is_err());
        assert!("3.x".parse::<ReleaseLine>().is_err());
    }

    #[test]
    fn test_ordering_is_numeric() {
        let a: ReleaseLine = "3.9".parse().unwrap();
        let b: ReleaseLine = "3.10".parse().unwrap();
        assert!(a < b);
    }

    #[test]
    fn test_deserialize_from_string() {
        let lines: Vec<ReleaseLine> = serde_json::from_str(r#"["2.8", "3.0"]"#).unwrap();
        assert_eq!(lines, vec![ReleaseLine::new(2, 8), ReleaseLine::new(3, 0)]);
        assert!(serde_json::from_str::<Vec<ReleaseLine>>("[3.4]").is_err());
    }

    #[test]
    fn test_as_version() {
        assert_eq!(
            ReleaseLine::new(3, 4).as_version(),
            semver::Version::new(3, 4, 0)
        );
    }
}
