pub mod commands;
pub mod constraint;
pub mod filter;
pub mod http;
pub mod inventory;
pub mod package;
pub mod runtime;

pub use constraint::{Constraint, ConstraintError};
pub use filter::{FamilyWindow, FilterError, ReleaseWindowFilter};
pub use inventory::{Family, Inventory, InventoryProvider};
pub use package::{Candidate, ComposerPackage, PackageRecord, ReleaseLine, VersionToken};
