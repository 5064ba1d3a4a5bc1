//! Heuristic image analysis, renaming and folder organization
//!
//! - `scan` - pixel sampling, header and EXIF metadata
//! - `color` - dominant colors, color family, grayscale and brightness
//! - `hints` - content hints from filename keywords
//! - `analysis` - the per-image analysis record
//! - `naming` - filename synthesis in four styles
//! - `library` - supported image discovery
//! - `organize` - collision-safe renaming and category folders
//! - `report` - text rendering for the command line
//! - `config` - TOML configuration

pub mod analysis;
pub mod color;
pub mod config;
pub mod error;
pub mod hints;
pub mod library;
pub mod naming;
pub mod organize;
pub mod report;
pub mod scan;

pub use analysis::{analyze, AnalysisOutcome, AnalysisRecord};
pub use error::{AnalysisError, Result};
pub use naming::{synthesize_name, NamingStyle};
pub use organize::{organize, plan_rename, rename_directory, OrganizationMethod};
