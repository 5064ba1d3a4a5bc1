//! Filename synthesis from an analysis record

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::analysis::{AnalysisRecord, Orientation};
use crate::color::ColorFamily;
use crate::error::AnalysisError;
use crate::hints::ContentHint;

/// Name used when no part applies
pub const FALLBACK_NAME: &str = "image";

/// Brightness above which the artistic style says "bright"
const BRIGHT_THRESHOLD: f64 = 0.7;
/// Brightness below which the artistic style says "dark"
const DARK_THRESHOLD: f64 = 0.3;

/// Which analysis fields make up a suggested name
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum NamingStyle {
    /// Color family and orientation
    #[default]
    Descriptive,
    /// Resolution class, orientation and origin
    Technical,
    /// Color, mood and black & white
    Artistic,
    /// Timestamp marker and orientation
    Location,
}

impl NamingStyle {
    pub fn as_str(&self) -> &'static str {
        match self {
            NamingStyle::Descriptive => "descriptive",
            NamingStyle::Technical => "technical",
            NamingStyle::Artistic => "artistic",
            NamingStyle::Location => "location",
        }
    }
}

impl fmt::Display for NamingStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NamingStyle {
    type Err = AnalysisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "descriptive" => Ok(NamingStyle::Descriptive),
            "technical" => Ok(NamingStyle::Technical),
            "artistic" => Ok(NamingStyle::Artistic),
            "location" => Ok(NamingStyle::Location),
            _ => Err(AnalysisError::UnknownOption {
                kind: "naming style",
                value: s.to_string(),
            }),
        }
    }
}

/// Build a base name (no extension) for an analyzed image
///
/// Style parts come first, then the first filename hint if it is not
/// already one of them. Never returns an empty string.
pub fn synthesize_name(record: &AnalysisRecord, style: NamingStyle) -> String {
    let mut parts: Vec<String> = Vec::new();

    match style {
        NamingStyle::Descriptive => {
            if !matches!(record.color_family, ColorFamily::Mixed | ColorFamily::Gray) {
                parts.push(record.color_family.to_string());
            }
            if record.orientation != Orientation::Square {
                parts.push(record.orientation.to_string());
            }
        }
        NamingStyle::Technical => {
            parts.push(format!("{}_res", record.size_category));
            parts.push(record.orientation.to_string());
            if record.is_camera() {
                parts.push("camera".to_string());
            } else if record.has_hint(ContentHint::Screenshot) {
                parts.push(ContentHint::Screenshot.to_string());
            }
        }
        NamingStyle::Artistic => {
            parts.push(record.color_family.to_string());
            if record.brightness > BRIGHT_THRESHOLD {
                parts.push("bright".to_string());
            } else if record.brightness < DARK_THRESHOLD {
                parts.push("dark".to_string());
            }
            if record.is_grayscale {
                parts.push("bw".to_string());
            }
        }
        NamingStyle::Location => {
            if record.has_timestamp {
                parts.push("dated".to_string());
            }
            parts.push(record.orientation.to_string());
        }
    }

    if let Some(hint) = record.filename_hints.first() {
        let hint = hint.to_string();
        if !parts.contains(&hint) {
            parts.push(hint);
        }
    }

    if parts.is_empty() {
        FALLBACK_NAME.to_string()
    } else {
        parts.join("_")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{FileSizeCategory, SizeCategory, Source};

    fn record() -> AnalysisRecord {
        AnalysisRecord {
            width: 4000,
            height: 3000,
            orientation: Orientation::Landscape,
            size_category: SizeCategory::Huge,
            aspect_ratio: 1.33,
            dominant_colors: Vec::new(),
            color_family: ColorFamily::Blue,
            is_grayscale: false,
            brightness: 0.5,
            source: None,
            kind: None,
            has_timestamp: false,
            file_size_category: FileSizeCategory::Medium,
            filename_hints: Vec::new(),
        }
    }

    #[test]
    fn test_descriptive() {
        let mut r = record();
        r.source = Some(Source::Camera);
        assert_eq!(synthesize_name(&r, NamingStyle::Descriptive), "blue_landscape");

        r.color_family = ColorFamily::Mixed;
        assert_eq!(synthesize_name(&r, NamingStyle::Descriptive), "landscape");
    }

    #[test]
    fn test_descriptive_falls_back_to_image() {
        let mut r = record();
        r.color_family = ColorFamily::Gray;
        r.orientation = Orientation::Square;
        assert_eq!(synthesize_name(&r, NamingStyle::Descriptive), FALLBACK_NAME);

        // A hint alone is enough to avoid the fallback
        r.filename_hints = vec![ContentHint::Logo];
        assert_eq!(synthesize_name(&r, NamingStyle::Descriptive), "logo");
    }

    #[test]
    fn test_technical_screenshot_from_hint() {
        let mut r = record();
        r.size_category = SizeCategory::Medium;
        r.filename_hints = vec![ContentHint::Screenshot];
        assert_eq!(
            synthesize_name(&r, NamingStyle::Technical),
            "medium_res_landscape_screenshot"
        );
    }

    #[test]
    fn test_technical_camera_beats_screenshot_hint() {
        let mut r = record();
        r.source = Some(Source::Camera);
        r.filename_hints = vec![ContentHint::Screenshot];
        // Hint is still appended because "screenshot" is not among the parts
        assert_eq!(
            synthesize_name(&r, NamingStyle::Technical),
            "huge_res_landscape_camera_screenshot"
        );
    }

    #[test]
    fn test_artistic() {
        let mut r = record();
        r.color_family = ColorFamily::Gray;
        r.brightness = 0.2;
        r.is_grayscale = true;
        assert_eq!(synthesize_name(&r, NamingStyle::Artistic), "gray_dark_bw");

        r.brightness = 0.71;
        r.is_grayscale = false;
        r.color_family = ColorFamily::Yellow;
        assert_eq!(synthesize_name(&r, NamingStyle::Artistic), "yellow_bright");

        r.brightness = 0.7;
        assert_eq!(synthesize_name(&r, NamingStyle::Artistic), "yellow");
    }

    #[test]
    fn test_location() {
        let mut r = record();
        r.orientation = Orientation::Portrait;
        assert_eq!(synthesize_name(&r, NamingStyle::Location), "portrait");

        r.has_timestamp = true;
        r.filename_hints = vec![ContentHint::Photo, ContentHint::Edited];
        assert_eq!(synthesize_name(&r, NamingStyle::Location), "dated_portrait_photo");
    }

    #[test]
    fn test_only_first_hint_is_considered() {
        let mut r = record();
        r.filename_hints = vec![ContentHint::Screenshot, ContentHint::Photo];
        r.size_category = SizeCategory::Small;
        // First hint already present: nothing else is appended
        assert_eq!(
            synthesize_name(&r, NamingStyle::Technical),
            "small_res_landscape_screenshot"
        );
    }

    #[test]
    fn test_names_never_empty() {
        let styles = [
            NamingStyle::Descriptive,
            NamingStyle::Technical,
            NamingStyle::Artistic,
            NamingStyle::Location,
        ];
        let mut r = record();
        r.orientation = Orientation::Square;
        r.color_family = ColorFamily::Mixed;
        for style in styles {
            assert!(!synthesize_name(&r, style).is_empty());
        }
    }

    #[test]
    fn test_style_from_str() {
        assert_eq!("Technical".parse::<NamingStyle>().unwrap(), NamingStyle::Technical);
        assert!("poetic".parse::<NamingStyle>().is_err());
    }
}
