//! Package model
//!
//! Release lines, the line-level view of candidate versions, branch-alias
//! resolution, and the candidate records the filter operates on.

mod alias;
mod composer;
mod line;
mod record;
mod version;

pub use alias::{alias_line, branch_alias_for};
pub use composer::{ComposerExtra, ComposerPackage};
pub use line::ReleaseLine;
pub use record::{Candidate, PackageRecord};
pub use version::VersionToken;
