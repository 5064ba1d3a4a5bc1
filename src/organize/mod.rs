/// Renaming and folder organization
///
/// - `rename.rs` - collision-safe rename planning and directory batches
/// - `planner.rs` - grouping images by content, date, size or format

pub mod rename;
pub mod planner;

pub use planner::{organize, OrganizationMethod, OrganizationPlan};
pub use rename::{plan_rename, rename_directory, BatchOptions, BatchRun};
