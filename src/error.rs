//! Error types for the image-sorter library

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for image-sorter operations
pub type Result<T> = std::result::Result<T, AnalysisError>;

/// Everything that can go wrong while inspecting or moving a single image
#[derive(Error, Debug)]
pub enum AnalysisError {
    /// File could not be opened, read, renamed or created
    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    /// Image container could not be decoded
    #[error("Failed to decode {}: {source}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// Pixel sampling produced nothing usable
    #[error("Color analysis failed: {reason}")]
    ColorAnalysis { reason: String },

    /// EXIF block present but unreadable
    #[error("EXIF extraction failed: {source}")]
    Exif {
        #[source]
        source: exif::Error,
    },

    /// Width or height reported as zero
    #[error("Invalid image dimensions {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    /// Directory listing failed
    #[error("Error scanning directory {}: {reason}", path.display())]
    DirectoryScan { path: PathBuf, reason: String },

    /// A selector string did not name a known naming style or organization method
    #[error("Unknown {kind}: {value}")]
    UnknownOption { kind: &'static str, value: String },
}

impl AnalysisError {
    /// Wrap an I/O error with a short description of what was being attempted
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Wrap a decoder error for the given file
    pub fn decode(path: impl Into<PathBuf>, source: image::ImageError) -> Self {
        Self::Decode {
            path: path.into(),
            source,
        }
    }

    pub fn color_analysis(reason: impl Into<String>) -> Self {
        Self::ColorAnalysis {
            reason: reason.into(),
        }
    }
}

impl From<exif::Error> for AnalysisError {
    fn from(source: exif::Error) -> Self {
        Self::Exif { source }
    }
}
