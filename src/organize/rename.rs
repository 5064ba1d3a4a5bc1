//! Collision-safe renaming
//!
//! Suggested names are turned into final paths by appending `_<n>` before
//! the extension until the path is free. Directory batches run strictly in
//! sorted order so the numbering is deterministic.

use serde::Serialize;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::vec;

use crate::analysis::{self, AnalysisOutcome, Orientation};
use crate::color::ColorFamily;
use crate::error::{AnalysisError, Result};
use crate::library;
use crate::naming::{self, NamingStyle};

/// `<stem>.<ext>` or `<stem>_<n>.<ext>`
fn numbered_name(stem: &str, counter: Option<u32>, extension: Option<&str>) -> String {
    let stem = match counter {
        Some(n) => format!("{}_{}", stem, n),
        None => stem.to_string(),
    };
    match extension {
        Some(ext) if !ext.is_empty() => format!("{}.{}", stem, ext),
        _ => stem,
    }
}

/// First free `<stem>[_<n>].<ext>` in `directory`
///
/// `is_taken` decides whether a candidate is occupied; numbering starts at 1.
fn first_free(
    directory: &Path,
    stem: &str,
    extension: Option<&str>,
    mut is_taken: impl FnMut(&Path) -> bool,
) -> PathBuf {
    let mut candidate = directory.join(numbered_name(stem, None, extension));
    let mut counter = 1;
    while is_taken(&candidate) {
        candidate = directory.join(numbered_name(stem, Some(counter), extension));
        counter += 1;
    }
    candidate
}

/// Final path for moving `file` into `directory`, keeping its name if free
pub fn unique_destination(directory: &Path, file: &Path) -> PathBuf {
    let stem = file.file_stem().unwrap_or_default().to_string_lossy();
    let extension = file.extension().map(|e| e.to_string_lossy().to_string());
    first_free(directory, &stem, extension.as_deref(), |candidate| {
        candidate.exists()
    })
}

/// Hands out rename targets, remembering the ones already given out
///
/// A path counts as taken if it was planned earlier by the same planner, or
/// exists on disk and has not been vacated by an earlier rename. This keeps
/// a dry run's names identical to the ones a real run produces.
#[derive(Debug, Default)]
pub struct RenamePlanner {
    claimed: HashSet<PathBuf>,
    vacated: HashSet<PathBuf>,
}

impl RenamePlanner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Collision-free target for renaming `path` to `base_name`
    ///
    /// The original extension is kept (lower-cased). The source path itself
    /// never counts as a collision.
    pub fn plan(&mut self, path: &Path, base_name: &str) -> PathBuf {
        let directory = path.parent().unwrap_or_else(|| Path::new(""));
        let extension = path
            .extension()
            .map(|ext| ext.to_string_lossy().to_lowercase());

        let (claimed, vacated) = (&self.claimed, &self.vacated);
        let target = first_free(directory, base_name, extension.as_deref(), |candidate| {
            candidate != path
                && ((candidate.exists() && !vacated.contains(candidate))
                    || claimed.contains(candidate))
        });

        self.claimed.insert(target.clone());
        target
    }

    /// Record that `path` has been (or in a dry run, would be) moved away
    pub fn vacate(&mut self, path: &Path) {
        self.vacated.insert(path.to_path_buf());
    }
}

/// Collision-free target for renaming a single file
pub fn plan_rename(path: &Path, base_name: &str) -> PathBuf {
    RenamePlanner::new().plan(path, base_name)
}

/// Settings for a directory run
#[derive(Debug, Clone, Default)]
pub struct BatchOptions {
    pub recursive: bool,
    /// Actually move files instead of only suggesting names
    pub rename: bool,
    /// Prepended as `<prefix>_` when non-empty
    pub prefix: String,
    pub style: NamingStyle,
}

/// What happened to one file of a batch
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum BatchStatus {
    /// Dry run, or the file already carries the suggested name
    Suggested,
    Renamed,
    RenameFailed { error: String },
    AnalysisFailed { error: String },
}

/// One file of a batch
#[derive(Debug, Clone, Serialize)]
pub struct BatchEntry {
    /// 1-based position in the batch
    pub index: usize,
    pub original: PathBuf,
    /// Suggested file name including extension
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggested_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<PathBuf>,
    #[serde(flatten)]
    pub status: BatchStatus,
    pub analysis: AnalysisOutcome,
}

impl BatchEntry {
    pub fn original_name(&self) -> String {
        self.original
            .file_name()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string()
    }
}

/// Lazily processes the images of a directory, one entry per file
#[derive(Debug)]
pub struct BatchRun {
    files: vec::IntoIter<PathBuf>,
    total: usize,
    position: usize,
    options: BatchOptions,
    planner: RenamePlanner,
}

impl BatchRun {
    pub fn new(files: Vec<PathBuf>, options: BatchOptions) -> Self {
        Self {
            total: files.len(),
            files: files.into_iter(),
            position: 0,
            options,
            planner: RenamePlanner::new(),
        }
    }

    /// Number of files the run will visit
    pub fn total(&self) -> usize {
        self.total
    }

    fn process(&mut self, path: PathBuf) -> BatchEntry {
        let analysis = analysis::analyze(&path);

        let record = match analysis.record() {
            Some(record) => record,
            None => {
                let error = analysis.error().unwrap_or_default().to_string();
                return BatchEntry {
                    index: self.position,
                    original: path,
                    suggested_name: None,
                    target: None,
                    status: BatchStatus::AnalysisFailed { error },
                    analysis,
                };
            }
        };

        let mut base_name = naming::synthesize_name(record, self.options.style);
        if !self.options.prefix.is_empty() {
            base_name = format!("{}_{}", self.options.prefix, base_name);
        }

        let target = self.planner.plan(&path, &base_name);
        let suggested_name = target
            .file_name()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string();

        let status = if target == path {
            BatchStatus::Suggested
        } else if self.options.rename {
            match fs::rename(&path, &target) {
                Ok(()) => {
                    tracing::info!("Renamed {} -> {}", path.display(), target.display());
                    self.planner.vacate(&path);
                    BatchStatus::Renamed
                }
                Err(e) => {
                    let error = AnalysisError::io(
                        format!("Failed to rename {}", path.display()),
                        e,
                    );
                    tracing::warn!("{}", error);
                    BatchStatus::RenameFailed {
                        error: error.to_string(),
                    }
                }
            }
        } else {
            self.planner.vacate(&path);
            BatchStatus::Suggested
        };

        BatchEntry {
            index: self.position,
            original: path,
            suggested_name: Some(suggested_name),
            target: Some(target),
            status,
            analysis,
        }
    }
}

impl Iterator for BatchRun {
    type Item = BatchEntry;

    fn next(&mut self) -> Option<Self::Item> {
        let path = self.files.next()?;
        self.position += 1;
        Some(self.process(path))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.files.size_hint()
    }
}

/// Analyze (and optionally rename) every image of a directory
pub fn rename_directory(directory: &Path, options: &BatchOptions) -> Result<BatchRun> {
    let files = library::list_images(directory, options.recursive)?;
    tracing::info!(
        "Processing {} images in {} ({} style)",
        files.len(),
        directory.display(),
        options.style
    );
    Ok(BatchRun::new(files, options.clone()))
}

/// Distribution of colors and orientations over a batch
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BatchSummary {
    pub processed: usize,
    pub renamed: usize,
    pub failed: usize,
    /// First-seen order
    pub color_families: Vec<(ColorFamily, usize)>,
    /// First-seen order
    pub orientations: Vec<(Orientation, usize)>,
}

impl BatchSummary {
    pub fn from_entries(entries: &[BatchEntry]) -> Self {
        let mut summary = BatchSummary {
            processed: entries.len(),
            ..Default::default()
        };

        for entry in entries {
            match entry.status {
                BatchStatus::Renamed => summary.renamed += 1,
                BatchStatus::RenameFailed { .. } | BatchStatus::AnalysisFailed { .. } => {
                    summary.failed += 1
                }
                BatchStatus::Suggested => {}
            }

            if let Some(record) = entry.analysis.record() {
                bump(&mut summary.color_families, record.color_family);
                bump(&mut summary.orientations, record.orientation);
            }
        }

        summary
    }
}

fn bump<K: PartialEq>(counts: &mut Vec<(K, usize)>, key: K) {
    match counts.iter_mut().find(|(k, _)| *k == key) {
        Some((_, count)) => *count += 1,
        None => counts.push((key, 1)),
    }
}
