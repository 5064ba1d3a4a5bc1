//! Grouping images into category folders

use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::analysis::{self, AnalysisRecord, Orientation, SizeCategory};
use crate::error::{AnalysisError, Result};
use crate::hints::ContentHint;
use crate::library;
use crate::scan::metadata;

use super::rename::unique_destination;

/// Category for files whose date, size or format could not be read
pub const ERRORS_CATEGORY: &str = "errors";
/// Category for files no content rule matched
pub const MISC_CATEGORY: &str = "miscellaneous";

/// Grouping key used to bucket images
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum OrganizationMethod {
    /// Filename hints, provenance, orientation and color
    #[default]
    Content,
    /// Year and month the file was created
    Date,
    /// Pixel-count class
    Size,
    /// File extension
    Format,
}

impl OrganizationMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrganizationMethod::Content => "content",
            OrganizationMethod::Date => "date",
            OrganizationMethod::Size => "size",
            OrganizationMethod::Format => "format",
        }
    }
}

impl fmt::Display for OrganizationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrganizationMethod {
    type Err = AnalysisError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "content" => Ok(OrganizationMethod::Content),
            "date" => Ok(OrganizationMethod::Date),
            "size" => Ok(OrganizationMethod::Size),
            "format" => Ok(OrganizationMethod::Format),
            _ => Err(AnalysisError::UnknownOption {
                kind: "organization method",
                value: s.to_string(),
            }),
        }
    }
}

/// Files assigned to one category, in processing order
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryGroup {
    pub name: String,
    pub files: Vec<PathBuf>,
}

/// Result of moving files into category folders
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum MoveOutcome {
    Moved {
        category: String,
        from: PathBuf,
        to: PathBuf,
    },
    Failed {
        category: String,
        file: PathBuf,
        error: String,
    },
    FolderFailed {
        category: String,
        error: String,
    },
}

impl MoveOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, MoveOutcome::Moved { .. })
    }
}

/// Category assignment for a directory, plus move results when executed
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrganizationPlan {
    pub directory: PathBuf,
    pub method: OrganizationMethod,
    /// First-seen order
    pub categories: Vec<CategoryGroup>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub moves: Option<Vec<MoveOutcome>>,
}

impl OrganizationPlan {
    pub fn new(directory: impl Into<PathBuf>, method: OrganizationMethod) -> Self {
        Self {
            directory: directory.into(),
            method,
            categories: Vec::new(),
            moves: None,
        }
    }

    /// Append a file to a category, creating the category on first use
    pub fn assign(&mut self, category: &str, file: PathBuf) {
        match self.categories.iter_mut().find(|g| g.name == category) {
            Some(group) => group.files.push(file),
            None => self.categories.push(CategoryGroup {
                name: category.to_string(),
                files: vec![file],
            }),
        }
    }

    pub fn category(&self, name: &str) -> Option<&CategoryGroup> {
        self.categories.iter().find(|g| g.name == name)
    }

    pub fn total_files(&self) -> usize {
        self.categories.iter().map(|g| g.files.len()).sum()
    }

    pub fn moved_count(&self) -> usize {
        self.moves
            .iter()
            .flatten()
            .filter(|m| m.is_success())
            .count()
    }

    pub fn error_count(&self) -> usize {
        self.moves
            .iter()
            .flatten()
            .filter(|m| !m.is_success())
            .count()
    }
}

/// Content category, first matching rule wins
pub fn content_category(record: &AnalysisRecord) -> &'static str {
    if record.has_hint(ContentHint::Screenshot) {
        "screenshots"
    } else if record.has_hint(ContentHint::Photo) {
        "photos"
    } else if record.is_camera() {
        "camera_photos"
    } else if record.has_hint(ContentHint::Edited) {
        "edited_images"
    } else if record.orientation == Orientation::Portrait {
        "portraits"
    } else if record.orientation == Orientation::Landscape {
        "landscapes"
    } else if record.color_family.is_achromatic() {
        "black_white"
    } else {
        MISC_CATEGORY
    }
}

/// Lower-cased extension without the dot
pub fn format_category(path: &Path) -> String {
    path.extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .unwrap_or_default()
}

/// Category of one file under the given method
pub fn categorize(path: &Path, method: OrganizationMethod) -> Result<String> {
    match method {
        // An image that cannot be analyzed matches no content rule
        OrganizationMethod::Content => Ok(analysis::analyze(path)
            .record()
            .map_or(MISC_CATEGORY, content_category)
            .to_string()),
        OrganizationMethod::Date => {
            let stats = metadata::file_stats(path)?;
            Ok(stats.created.format("%Y-%m").to_string())
        }
        OrganizationMethod::Size => {
            let (width, height) =
                image::image_dimensions(path).map_err(|e| AnalysisError::decode(path, e))?;
            Ok(SizeCategory::from_dimensions(width, height).to_string())
        }
        OrganizationMethod::Format => Ok(format_category(path)),
    }
}

/// Group the images of a directory (not recursive), optionally moving them
pub fn organize(
    directory: &Path,
    method: OrganizationMethod,
    create_folders: bool,
) -> Result<OrganizationPlan> {
    let files = library::list_images(directory, false)?;
    let mut plan = OrganizationPlan::new(directory, method);

    for file in files {
        match categorize(&file, method) {
            Ok(category) => plan.assign(&category, file),
            Err(e) => {
                tracing::warn!("Error analyzing {}: {}", file.display(), e);
                plan.assign(ERRORS_CATEGORY, file);
            }
        }
    }

    if create_folders {
        plan.moves = Some(execute(&plan));
    }

    Ok(plan)
}

/// Create category folders and move each file into its folder
///
/// A folder that cannot be created only skips its own files.
pub fn execute(plan: &OrganizationPlan) -> Vec<MoveOutcome> {
    let mut outcomes = Vec::new();

    for group in &plan.categories {
        let category_dir = plan.directory.join(&group.name);
        if let Err(e) = fs::create_dir_all(&category_dir) {
            tracing::warn!("Failed to create folder {}: {}", category_dir.display(), e);
            outcomes.push(MoveOutcome::FolderFailed {
                category: group.name.clone(),
                error: e.to_string(),
            });
            continue;
        }

        for file in &group.files {
            let destination = unique_destination(&category_dir, file);
            match fs::rename(file, &destination) {
                Ok(()) => {
                    tracing::debug!("Moved {} -> {}", file.display(), destination.display());
                    outcomes.push(MoveOutcome::Moved {
                        category: group.name.clone(),
                        from: file.clone(),
                        to: destination,
                    });
                }
                Err(e) => {
                    tracing::warn!("Failed to move {}: {}", file.display(), e);
                    outcomes.push(MoveOutcome::Failed {
                        category: group.name.clone(),
                        file: file.clone(),
                        error: e.to_string(),
                    });
                }
            }
        }
    }

    outcomes
}
