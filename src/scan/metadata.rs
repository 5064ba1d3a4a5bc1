//! Container and EXIF metadata
//!
//! Reads geometry, format and color mode from the image header without
//! decoding pixels, plus the EXIF tags used for provenance hints.

use chrono::{DateTime, Local};
use exif::{In, Value};
use image::{ColorType, ImageDecoder, ImageReader};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::BufReader;
use std::path::Path;
use std::time::SystemTime;

use crate::color::{self, ColorAnalysis};
use crate::error::{AnalysisError, Result};

const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// Header-level facts about an image
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageInfo {
    pub width: u32,
    pub height: u32,
    /// Container name, e.g. "JPEG"
    pub format: Option<String>,
    /// Color mode, e.g. "RGB" or "L"
    pub mode: String,
}

/// Filesystem facts about an image
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileStats {
    pub size_bytes: u64,
    /// Creation time, or modification time where creation is not tracked
    pub created: DateTime<Local>,
    pub modified: DateTime<Local>,
}

/// EXIF tag name to display value
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ExifTags(BTreeMap<String, String>);

impl ExifTags {
    pub fn get(&self, tag: &str) -> Option<&str> {
        self.0.get(tag).map(String::as_str)
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.0.contains_key(tag)
    }

    /// Insert a tag unless one with the same name was already recorded
    pub fn insert_first(&mut self, tag: impl Into<String>, value: impl Into<String>) {
        self.0.entry(tag.into()).or_insert_with(|| value.into());
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ExifTags {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut tags = ExifTags::default();
        for (k, v) in iter {
            tags.insert_first(k, v);
        }
        tags
    }
}

/// Everything known about a single image file, as emitted by `metadata`
#[derive(Debug, Clone, Serialize)]
pub struct ImageMetadata {
    pub filename: String,
    pub path: String,
    pub format: Option<String>,
    pub mode: String,
    pub width: u32,
    pub height: u32,
    pub aspect_ratio: f64,
    pub file_size_bytes: u64,
    pub file_size_mb: f64,
    pub created: String,
    pub modified: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exif: Option<ExifTags>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color_analysis: Option<ColorAnalysis>,
}

/// Read width, height, format and color mode from the image header
pub fn read_image_info(path: &Path) -> Result<ImageInfo> {
    let reader = ImageReader::open(path)
        .map_err(|e| AnalysisError::io(format!("Failed to open {}", path.display()), e))?
        .with_guessed_format()
        .map_err(|e| AnalysisError::io(format!("Failed to read {}", path.display()), e))?;

    let format = reader.format().map(|f| format!("{:?}", f).to_uppercase());
    let decoder = reader
        .into_decoder()
        .map_err(|e| AnalysisError::decode(path, e))?;
    let (width, height) = decoder.dimensions();

    Ok(ImageInfo {
        width,
        height,
        format,
        mode: mode_name(decoder.color_type()).to_string(),
    })
}

/// Short color mode label for a decoder color type
pub fn mode_name(color: ColorType) -> &'static str {
    match color {
        ColorType::L8 => "L",
        ColorType::La8 => "LA",
        ColorType::Rgb8 => "RGB",
        ColorType::Rgba8 => "RGBA",
        ColorType::L16 => "I;16",
        ColorType::La16 => "LA;16",
        ColorType::Rgb16 => "RGB;16",
        ColorType::Rgba16 => "RGBA;16",
        ColorType::Rgb32F => "RGB;F",
        ColorType::Rgba32F => "RGBA;F",
        _ => "unknown",
    }
}

/// Size and timestamps from the filesystem
pub fn file_stats(path: &Path) -> Result<FileStats> {
    let meta = fs::metadata(path)
        .map_err(|e| AnalysisError::io(format!("Failed to stat {}", path.display()), e))?;

    let modified = meta
        .modified()
        .map_err(|e| AnalysisError::io(format!("Failed to stat {}", path.display()), e))?;
    let created = meta.created().unwrap_or(modified);

    Ok(FileStats {
        size_bytes: meta.len(),
        created: local_time(created),
        modified: local_time(modified),
    })
}

fn local_time(time: SystemTime) -> DateTime<Local> {
    DateTime::<Local>::from(time)
}

/// Extract EXIF tags from the primary image directory
///
/// Files without an EXIF block (or in containers that cannot carry one)
/// yield an empty map rather than an error.
pub fn extract_tags(path: &Path) -> Result<ExifTags> {
    let file = File::open(path)
        .map_err(|e| AnalysisError::io(format!("Failed to open {}", path.display()), e))?;
    let mut reader = BufReader::new(file);

    let exif = match exif::Reader::new().read_from_container(&mut reader) {
        Ok(exif) => exif,
        Err(exif::Error::NotFound(_)) | Err(exif::Error::InvalidFormat(_)) => {
            return Ok(ExifTags::default())
        }
        Err(e) => return Err(e.into()),
    };

    Ok(exif
        .fields()
        .filter(|field| field.ifd_num == In::PRIMARY)
        .map(|field| (field.tag.to_string(), render_value(field)))
        .collect())
}

/// Text form of an EXIF value; byte strings are decoded as UTF-8 when valid
fn render_value(field: &exif::Field) -> String {
    match &field.value {
        Value::Ascii(parts) => parts
            .iter()
            .map(|bytes| decode_bytes(bytes))
            .collect::<Vec<_>>()
            .join(", "),
        Value::Byte(bytes) | Value::Undefined(bytes, _) => decode_bytes(bytes),
        _ => field.display_value().to_string(),
    }
}

fn decode_bytes(bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes) {
        Ok(text) => text.trim_end_matches('\0').to_string(),
        Err(_) => format!("{:?}", bytes),
    }
}

/// Gather header, filesystem, EXIF and (optionally) color facts for one file
///
/// EXIF and color failures are left out of the result instead of failing
/// the whole call.
pub fn collect_metadata(path: &Path, include_colors: bool) -> Result<ImageMetadata> {
    let info = read_image_info(path)?;
    if info.height == 0 || info.width == 0 {
        return Err(AnalysisError::InvalidDimensions {
            width: info.width,
            height: info.height,
        });
    }
    let stats = file_stats(path)?;

    let exif = match extract_tags(path) {
        Ok(tags) => Some(tags),
        Err(e) => {
            tracing::debug!("No EXIF for {}: {}", path.display(), e);
            None
        }
    };

    let color_analysis = if include_colors {
        match color::analyze_colors(path) {
            Ok(analysis) => Some(analysis),
            Err(e) => {
                tracing::warn!("Skipping color analysis for {}: {}", path.display(), e);
                None
            }
        }
    } else {
        None
    };

    Ok(ImageMetadata {
        filename: path
            .file_name()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string(),
        path: path.to_string_lossy().to_string(),
        format: info.format,
        mode: info.mode,
        width: info.width,
        height: info.height,
        aspect_ratio: round_to(f64::from(info.width) / f64::from(info.height), 3),
        file_size_bytes: stats.size_bytes,
        file_size_mb: round_to(stats.size_bytes as f64 / BYTES_PER_MB, 2),
        created: stats.created.to_rfc3339(),
        modified: stats.modified.to_rfc3339(),
        exif,
        color_analysis,
    })
}

/// Round half away from zero to the given number of decimals
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}
