//! Version constraints
//!
//! Parses the single range expression a project declares (e.g. `~3.4`) and
//! decides which release lines it admits.

mod parser;

use semver::Version;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::package::ReleaseLine;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConstraintError {
    #[error("Empty constraint expression")]
    Empty,
    #[error("Empty alternative in constraint \"{0}\"")]
    EmptyAlternative(String),
    #[error("Invalid version \"{version}\" in constraint \"{constraint}\"")]
    InvalidVersion { version: String, constraint: String },
    #[error("Operator \"{operator}\" is missing a version in constraint \"{constraint}\"")]
    DanglingOperator { operator: String, constraint: String },
    #[error("Unsupported non-zero fourth version component in \"{0}\"")]
    FourthComponent(String),
}

/// One comparison inside a conjunction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Comparator {
    Any,
    /// A named development branch; never admits a numeric version.
    Branch(String),
    Equal(Version),
    NotEqual(Version),
    Less(Version),
    LessOrEqual(Version),
    Greater(Version),
    GreaterOrEqual(Version),
}

impl Comparator {
    /// Whether `version` satisfies this single comparison.
    pub fn matches(&self, version: &Version) -> bool {
        match self {
            Comparator::Any => true,
            Comparator::Branch(_) => false,
            Comparator::Equal(v) => version == v,
            Comparator::NotEqual(v) => version != v,
            Comparator::Less(v) => version < v,
            Comparator::LessOrEqual(v) => version <= v,
            Comparator::Greater(v) => version > v,
            Comparator::GreaterOrEqual(v) => version >= v,
        }
    }
}

/// A parsed range expression: a disjunction of conjunctions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Constraint {
    source: String,
    alternatives: Vec<Vec<Comparator>>,
}

impl Constraint {
    /// Parses a range expression such as `~3.4`, `>=2.8 <4.0` or `^3.0 || ^4.0`.
    pub fn parse(input: &str) -> Result<Self, ConstraintError> {
        let alternatives = parser::parse_expression(input)?;
        Ok(Constraint {
            source: input.trim().to_string(),
            alternatives,
        })
    }

    /// Whether any alternative admits `version` in full.
    pub fn matches(&self, version: &Version) -> bool {
        self.alternatives
            .iter()
            .any(|all| all.iter().all(|c| c.matches(version)))
    }

    /// Whether the line, taken as the exact version `major.minor.0`, is admitted.
    pub fn admits_line(&self, line: &ReleaseLine) -> bool {
        self.matches(&line.as_version())
    }

    /// The trimmed expression as it was written.
    pub fn as_str(&self) -> &str {
        &self.source
    }
}

impl FromStr for Constraint {
    type Err = ConstraintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Constraint::parse(s)
    }
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}
