//! Heuristic analysis of a single image
//!
//! Combines geometry, color, EXIF provenance and filename hints into one
//! `AnalysisRecord`. Any failure replaces the whole record with an error;
//! partial results are never returned.

use serde::Serialize;
use std::fmt;
use std::path::Path;

use crate::color::{self, ColorFamily, ColorSample};
use crate::error::{AnalysisError, Result};
use crate::hints::{self, ContentHint};
use crate::scan::metadata::{self, round_to, ExifTags};
use crate::scan::sampler;

/// Pixel-count thresholds
const HUGE_PIXELS: u64 = 8_000_000;
const LARGE_PIXELS: u64 = 2_000_000;
const MEDIUM_PIXELS: u64 = 500_000;

/// File-size thresholds in MB
const LARGE_FILE_MB: f64 = 10.0;
const MEDIUM_FILE_MB: f64 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Orientation {
    Landscape,
    Portrait,
    Square,
}

impl Orientation {
    pub fn from_dimensions(width: u32, height: u32) -> Self {
        if width > height {
            Orientation::Landscape
        } else if height > width {
            Orientation::Portrait
        } else {
            Orientation::Square
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Orientation::Landscape => "landscape",
            Orientation::Portrait => "portrait",
            Orientation::Square => "square",
        }
    }
}

/// Pixel-count class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SizeCategory {
    Small,
    Medium,
    Large,
    Huge,
}

impl SizeCategory {
    pub fn from_pixels(pixels: u64) -> Self {
        if pixels > HUGE_PIXELS {
            SizeCategory::Huge
        } else if pixels > LARGE_PIXELS {
            SizeCategory::Large
        } else if pixels > MEDIUM_PIXELS {
            SizeCategory::Medium
        } else {
            SizeCategory::Small
        }
    }

    pub fn from_dimensions(width: u32, height: u32) -> Self {
        Self::from_pixels(u64::from(width) * u64::from(height))
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SizeCategory::Small => "small",
            SizeCategory::Medium => "medium",
            SizeCategory::Large => "large",
            SizeCategory::Huge => "huge",
        }
    }
}

/// On-disk size class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FileSizeCategory {
    Small,
    Medium,
    Large,
}

impl FileSizeCategory {
    pub fn from_bytes(bytes: u64) -> Self {
        let mb = bytes as f64 / (1024.0 * 1024.0);
        if mb > LARGE_FILE_MB {
            FileSizeCategory::Large
        } else if mb > MEDIUM_FILE_MB {
            FileSizeCategory::Medium
        } else {
            FileSizeCategory::Small
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FileSizeCategory::Small => "small",
            FileSizeCategory::Medium => "medium",
            FileSizeCategory::Large => "large",
        }
    }
}

/// Where an image came from, when EXIF says so
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Source {
    Camera,
}

/// What produced the image, according to its software tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageKind {
    Screenshot,
    Edited,
}

impl ImageKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImageKind::Screenshot => "screenshot",
            ImageKind::Edited => "edited",
        }
    }
}

/// Provenance inferred from EXIF tags
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Provenance {
    pub source: Option<Source>,
    pub kind: Option<ImageKind>,
    pub has_timestamp: bool,
}

impl Provenance {
    /// Camera make/model, software and timestamp tags
    pub fn from_tags(tags: &ExifTags) -> Self {
        let source = (tags.contains("Make") || tags.contains("Model")).then_some(Source::Camera);

        let kind = tags.get("Software").and_then(|software| {
            let software = software.to_lowercase();
            if software.contains("screenshot") || software.contains("capture") {
                Some(ImageKind::Screenshot)
            } else if software.contains("photoshop") || software.contains("gimp") {
                Some(ImageKind::Edited)
            } else {
                None
            }
        });

        Provenance {
            source,
            kind,
            has_timestamp: tags.contains("DateTime"),
        }
    }
}

/// Everything the heuristics concluded about one image
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisRecord {
    pub width: u32,
    pub height: u32,
    pub orientation: Orientation,
    pub size_category: SizeCategory,
    pub aspect_ratio: f64,
    pub dominant_colors: Vec<ColorSample>,
    pub color_family: ColorFamily,
    pub is_grayscale: bool,
    pub brightness: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<Source>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<ImageKind>,
    pub has_timestamp: bool,
    pub file_size_category: FileSizeCategory,
    pub filename_hints: Vec<ContentHint>,
}

impl AnalysisRecord {
    pub fn has_hint(&self, hint: ContentHint) -> bool {
        self.filename_hints.contains(&hint)
    }

    pub fn is_camera(&self) -> bool {
        self.source == Some(Source::Camera)
    }
}

/// Either a full record or the reason there is none
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AnalysisOutcome {
    Record(Box<AnalysisRecord>),
    Failed { error: String },
}

impl AnalysisOutcome {
    pub fn record(&self) -> Option<&AnalysisRecord> {
        match self {
            AnalysisOutcome::Record(record) => Some(record.as_ref()),
            AnalysisOutcome::Failed { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            AnalysisOutcome::Record(_) => None,
            AnalysisOutcome::Failed { error } => Some(error.as_str()),
        }
    }
}

impl From<Result<AnalysisRecord>> for AnalysisOutcome {
    fn from(result: Result<AnalysisRecord>) -> Self {
        match result {
            Ok(record) => AnalysisOutcome::Record(Box::new(record)),
            Err(e) => AnalysisOutcome::Failed {
                error: e.to_string(),
            },
        }
    }
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for SizeCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for FileSizeCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Analyze one image, folding any failure into the outcome
pub fn analyze(path: &Path) -> AnalysisOutcome {
    let outcome = AnalysisOutcome::from(try_analyze(path));
    if let Some(error) = outcome.error() {
        tracing::warn!("Analysis failed for {}: {}", path.display(), error);
    }
    outcome
}

/// Analyze one image, propagating the first failure
pub fn try_analyze(path: &Path) -> Result<AnalysisRecord> {
    let info = metadata::read_image_info(path)?;
    let (width, height) = (info.width, info.height);
    if width == 0 || height == 0 {
        return Err(AnalysisError::InvalidDimensions { width, height });
    }

    let sample = sampler::sample_file(path)?;
    let colors = color::analyze_sample(&sample)?;

    // Missing or unreadable EXIF only means fewer hints
    let tags = metadata::extract_tags(path).unwrap_or_else(|e| {
        tracing::debug!("Ignoring EXIF of {}: {}", path.display(), e);
        ExifTags::default()
    });
    let provenance = Provenance::from_tags(&tags);

    let stats = metadata::file_stats(path)?;

    Ok(AnalysisRecord {
        width,
        height,
        orientation: Orientation::from_dimensions(width, height),
        size_category: SizeCategory::from_dimensions(width, height),
        aspect_ratio: round_to(f64::from(width) / f64::from(height), 2),
        dominant_colors: colors.dominant_colors,
        color_family: colors.color_family,
        is_grayscale: colors.is_grayscale,
        brightness: colors.brightness,
        source: provenance.source,
        kind: provenance.kind,
        has_timestamp: provenance.has_timestamp,
        file_size_category: FileSizeCategory::from_bytes(stats.size_bytes),
        filename_hints: hints::hints_for_path(path),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};
    use tempfile::TempDir;

    #[test]
    fn test_orientation() {
        assert_eq!(Orientation::from_dimensions(4000, 3000), Orientation::Landscape);
        assert_eq!(Orientation::from_dimensions(3000, 4000), Orientation::Portrait);
        assert_eq!(Orientation::from_dimensions(10, 10), Orientation::Square);
    }

    #[test]
    fn test_size_category_thresholds() {
        assert_eq!(SizeCategory::from_pixels(500_000), SizeCategory::Small);
        assert_eq!(SizeCategory::from_pixels(500_001), SizeCategory::Medium);
        assert_eq!(SizeCategory::from_pixels(2_000_001), SizeCategory::Large);
        assert_eq!(SizeCategory::from_dimensions(4000, 3000), SizeCategory::Huge);
        assert_eq!(SizeCategory::from_pixels(8_000_000), SizeCategory::Large);
    }

    #[test]
    fn test_file_size_category_thresholds() {
        const MB: u64 = 1024 * 1024;
        assert_eq!(FileSizeCategory::from_bytes(MB), FileSizeCategory::Small);
        assert_eq!(FileSizeCategory::from_bytes(MB + 1), FileSizeCategory::Medium);
        assert_eq!(FileSizeCategory::from_bytes(10 * MB), FileSizeCategory::Medium);
        assert_eq!(FileSizeCategory::from_bytes(10 * MB + 1), FileSizeCategory::Large);
    }

    #[test]
    fn test_provenance_camera_without_software() {
        let tags: ExifTags = vec![("Make", "Canon")].into_iter().collect();
        let provenance = Provenance::from_tags(&tags);
        assert_eq!(provenance.source, Some(Source::Camera));
        assert_eq!(provenance.kind, None);
        assert!(!provenance.has_timestamp);
    }

    #[test]
    fn test_provenance_software_screenshot_wins_over_edited() {
        let tags: ExifTags = vec![("Software", "Photoshop Screen Capture")]
            .into_iter()
            .collect();
        assert_eq!(Provenance::from_tags(&tags).kind, Some(ImageKind::Screenshot));

        let tags: ExifTags = vec![("Software", "GIMP 2.10"), ("DateTime", "2024:01:02 10:00:00")]
            .into_iter()
            .collect();
        let provenance = Provenance::from_tags(&tags);
        assert_eq!(provenance.kind, Some(ImageKind::Edited));
        assert!(provenance.has_timestamp);
        assert_eq!(provenance.source, None);
    }

    #[test]
    fn test_provenance_empty() {
        assert_eq!(Provenance::from_tags(&ExifTags::default()), Provenance::default());
    }

    #[test]
    fn test_analyze_png() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("Screenshot_2025.png");
        RgbImage::from_pixel(64, 32, Rgb([10, 20, 220])).save(&path).unwrap();

        let outcome = analyze(&path);
        let record = outcome.record().expect("analysis should succeed");
        assert_eq!(record.orientation, Orientation::Landscape);
        assert_eq!(record.size_category, SizeCategory::Small);
        assert_eq!(record.aspect_ratio, 2.0);
        assert_eq!(record.color_family, ColorFamily::Blue);
        assert_eq!(record.dominant_colors.len(), 1);
        assert_eq!(record.dominant_colors[0].percentage, 100.0);
        assert!(!record.is_grayscale);
        assert_eq!(record.source, None);
        assert_eq!(record.kind, None);
        assert!(!record.has_timestamp);
        assert_eq!(record.file_size_category, FileSizeCategory::Small);
        assert_eq!(record.filename_hints, vec![ContentHint::Screenshot]);
    }

    #[test]
    fn test_analyze_undecodable_file_is_error_only() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("broken.jpg");
        std::fs::write(&path, b"definitely not a jpeg").unwrap();

        let outcome = analyze(&path);
        assert!(outcome.record().is_none());
        assert!(outcome.error().is_some());

        let json = serde_json::to_value(&outcome).unwrap();
        let fields: Vec<_> = json.as_object().unwrap().keys().cloned().collect();
        assert_eq!(fields, vec!["error".to_string()]);
    }

    #[test]
    fn test_record_serializes_type_field() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("square.png");
        RgbImage::from_pixel(8, 8, Rgb([128, 128, 128])).save(&path).unwrap();

        let outcome = analyze(&path);
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["orientation"], "square");
        assert_eq!(json["color_family"], "gray");
        assert_eq!(json["is_grayscale"], true);
        assert!(json.get("type").is_none());
        assert!(json.get("error").is_none());
    }
}
