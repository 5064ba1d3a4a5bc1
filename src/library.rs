//! Image discovery
//!
//! Finds the supported image files of a folder, optionally descending into
//! sub-folders, and returns them in sorted path order.

use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::error::{AnalysisError, Result};

/// Supported image extensions (compared case-insensitively)
pub const SUPPORTED_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "bmp", "tiff", "webp"];

/// Check if a path has a supported image extension
pub fn is_image_file(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .is_some_and(|ext| SUPPORTED_EXTENSIONS.contains(&ext.as_str()))
}

/// List the supported images of a directory in sorted order
///
/// Unreadable entries below the top level are skipped with a warning; an
/// unreadable top-level directory is an error.
pub fn list_images(directory: &Path, recursive: bool) -> Result<Vec<PathBuf>> {
    if !directory.is_dir() {
        return Err(AnalysisError::DirectoryScan {
            path: directory.to_path_buf(),
            reason: "not a directory".to_string(),
        });
    }

    let mut walker = WalkDir::new(directory).min_depth(1).follow_links(true);
    if !recursive {
        walker = walker.max_depth(1);
    }

    let mut images = Vec::new();
    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) if e.depth() == 0 => {
                return Err(AnalysisError::DirectoryScan {
                    path: directory.to_path_buf(),
                    reason: e.to_string(),
                })
            }
            Err(e) => {
                tracing::warn!("Skipping unreadable entry: {}", e);
                continue;
            }
        };

        let path = entry.path();

        // Only process files (not directories)
        if !path.is_file() || !is_image_file(path) {
            continue;
        }

        images.push(path.to_path_buf());
    }

    images.sort();
    tracing::debug!("Found {} images in {}", images.len(), directory.display());

    Ok(images)
}
