/// Anything the filter can judge: a named release with an optional branch alias.
pub trait Candidate {
    fn name(&self) -> &str;
    fn version(&self) -> &str;
    /// The alias declared for this candidate's own version, if any.
    fn branch_alias(&self) -> Option<&str>;
}

/// One concrete installable release.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageRecord {
    pub name: String,
    pub version: String,
    pub branch_alias: Option<String>,
}

impl PackageRecord {
    /// Creates a record without a branch alias.
    pub fn new(name: &str, version: &str) -> Self {
        Self {
            name: name.to_string(),
            version: version.to_string(),
            branch_alias: None,
        }
    }

    /// Creates a record whose version carries a branch alias, e.g. `dev-master` as `3.5-dev`.
    pub fn with_alias(name: &str, version: &str, alias: &str) -> Self {
        Self {
            branch_alias: Some(alias.to_string()),
            ..Self::new(name, version)
        }
    }
}

impl Candidate for PackageRecord {
    fn name(&self) -> &str {
        &self.name
    }

    fn version(&self) -> &str {
        &self.version
    }

    fn branch_alias(&self) -> Option<&str> {
        self.branch_alias.as_deref()
    }
}
