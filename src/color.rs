//! Color classification utilities
//!
//! This module turns sampled pixels into the color facts of an analysis:
//! - Dominant colors (top of the histogram, with hex and share)
//! - A coarse named color family for the most frequent color
//! - A cheap grayscale check
//! - Mean brightness

use image::RgbImage;
use serde::Serialize;
use std::fmt;
use std::path::Path;

use crate::error::{AnalysisError, Result};
use crate::scan::metadata::round_to;
use crate::scan::sampler::{self, ColorHistogram, SampledImage};

/// Channel difference below which a color counts as achromatic
const ACHROMATIC_TOLERANCE: i16 = 15;
/// Channel difference above which a pixel breaks the grayscale check
const GRAYSCALE_TOLERANCE: i16 = 10;
/// Pixels inspected by the grayscale check, in raster order
const GRAYSCALE_SAMPLE: usize = 100;
/// Number of dominant colors reported
const TOP_COLORS: usize = 5;

/// Named color families
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorFamily {
    Black,
    White,
    Gray,
    Red,
    Green,
    Blue,
    Yellow,
    Mixed,
}

impl ColorFamily {
    pub fn as_str(&self) -> &'static str {
        match self {
            ColorFamily::Black => "black",
            ColorFamily::White => "white",
            ColorFamily::Gray => "gray",
            ColorFamily::Red => "red",
            ColorFamily::Green => "green",
            ColorFamily::Blue => "blue",
            ColorFamily::Yellow => "yellow",
            ColorFamily::Mixed => "mixed",
        }
    }

    /// Black, white or gray
    pub fn is_achromatic(&self) -> bool {
        matches!(
            self,
            ColorFamily::Black | ColorFamily::White | ColorFamily::Gray
        )
    }
}

impl fmt::Display for ColorFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One entry of the dominant color list
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColorSample {
    pub rgb: [u8; 3],
    pub hex: String,
    /// Share of sampled pixels, 0-100 with 2 decimals
    pub percentage: f64,
}

/// Color facts of one image
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColorAnalysis {
    pub dominant_colors: Vec<ColorSample>,
    pub color_family: ColorFamily,
    pub is_grayscale: bool,
    pub brightness: f64,
}

/// Classify an RGB triple into a color family
///
/// Rules are checked in order:
/// 1. Near-equal channels are black, white or gray depending on red
/// 2. A strictly largest channel names the family
/// 3. Bright red + green with little blue is yellow
/// 4. Anything else is mixed
pub fn classify(rgb: [u8; 3]) -> ColorFamily {
    let [r, g, b] = rgb.map(i16::from);

    if (r - g).abs() < ACHROMATIC_TOLERANCE
        && (g - b).abs() < ACHROMATIC_TOLERANCE
        && (r - b).abs() < ACHROMATIC_TOLERANCE
    {
        return if r < 50 {
            ColorFamily::Black
        } else if r > 200 {
            ColorFamily::White
        } else {
            ColorFamily::Gray
        };
    }

    if r > g && r > b {
        ColorFamily::Red
    } else if g > r && g > b {
        ColorFamily::Green
    } else if b > r && b > g {
        ColorFamily::Blue
    } else if r > 150 && g > 150 && b < 100 {
        ColorFamily::Yellow
    } else {
        ColorFamily::Mixed
    }
}

/// Lowercase `#rrggbb`
pub fn hex(rgb: [u8; 3]) -> String {
    format!("#{:02x}{:02x}{:02x}", rgb[0], rgb[1], rgb[2])
}

/// Cheap grayscale check
///
/// Luminance-only sources are trusted. Otherwise only the first 100 pixels
/// are looked at, so an image whose top rows are neutral reads as grayscale.
pub fn is_grayscale(sample: &SampledImage) -> bool {
    if sample.source_is_luma {
        return true;
    }

    sample
        .pixels
        .pixels()
        .take(GRAYSCALE_SAMPLE)
        .all(|pixel| {
            let [r, g, b] = pixel.0.map(i16::from);
            (r - g).abs() <= GRAYSCALE_TOLERANCE && (g - b).abs() <= GRAYSCALE_TOLERANCE
        })
}

/// Mean luma (ITU-R 601, rounded per pixel) scaled to 0.0-1.0
///
/// Returns None for an empty image.
pub fn brightness(pixels: &RgbImage) -> Option<f64> {
    let count = u64::from(pixels.width()) * u64::from(pixels.height());
    if count == 0 {
        return None;
    }

    let sum: u64 = pixels
        .pixels()
        .map(|p| {
            let [r, g, b] = p.0.map(u32::from);
            u64::from((r * 299 + g * 587 + b * 114 + 500) / 1000)
        })
        .sum();

    Some(sum as f64 / count as f64 / 255.0)
}

/// The most frequent colors of a histogram
pub fn dominant_colors(histogram: &ColorHistogram) -> Vec<ColorSample> {
    histogram
        .entries
        .iter()
        .take(TOP_COLORS)
        .map(|&(count, rgb)| ColorSample {
            rgb,
            hex: hex(rgb),
            percentage: round_to(f64::from(count) / histogram.total as f64 * 100.0, 2),
        })
        .collect()
}

/// Color analysis of an already sampled image
///
/// An empty sample fails the whole analysis.
pub fn analyze_sample(sample: &SampledImage) -> Result<ColorAnalysis> {
    let histogram = sample.histogram()?;
    let dominant_colors = dominant_colors(&histogram);
    let color_family = classify(dominant_colors[0].rgb);

    let brightness = brightness(&sample.pixels)
        .ok_or_else(|| AnalysisError::color_analysis("no pixels to measure"))?;

    Ok(ColorAnalysis {
        dominant_colors,
        color_family,
        is_grayscale: is_grayscale(sample),
        brightness,
    })
}

/// Decode an image file and analyze its colors
pub fn analyze_colors(path: &Path) -> Result<ColorAnalysis> {
    let sample = sampler::sample_file(path)?;
    analyze_sample(&sample)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    fn sample(pixels: RgbImage) -> SampledImage {
        SampledImage {
            pixels,
            source_is_luma: false,
        }
    }

    #[test]
    fn test_classify_fixed_points() {
        assert_eq!(classify([10, 10, 10]), ColorFamily::Black);
        assert_eq!(classify([220, 220, 220]), ColorFamily::White);
        assert_eq!(classify([120, 120, 125]), ColorFamily::Gray);
        assert_eq!(classify([120, 250, 30]), ColorFamily::Green);
        assert_eq!(classify([200, 30, 30]), ColorFamily::Red);
        assert_eq!(classify([20, 40, 200]), ColorFamily::Blue);
    }

    #[test]
    fn test_classify_ties() {
        // Red and green tie, blue low: yellow
        assert_eq!(classify([200, 200, 50]), ColorFamily::Yellow);
        // Red and blue tie: nothing strictly largest, not yellow
        assert_eq!(classify([200, 50, 200]), ColorFamily::Mixed);
        // Dim red/green tie
        assert_eq!(classify([100, 100, 20]), ColorFamily::Mixed);
    }

    #[test]
    fn test_classify_tolerance_boundary() {
        // Difference of exactly 15 is no longer achromatic
        assert_eq!(classify([115, 100, 100]), ColorFamily::Red);
        assert_eq!(classify([114, 100, 100]), ColorFamily::Gray);
    }

    #[test]
    fn test_classify_is_total() {
        for r in (0..=255u8).step_by(17) {
            for g in (0..=255u8).step_by(17) {
                for b in (0..=255u8).step_by(17) {
                    let family = classify([r, g, b]);
                    let spread = r.max(g).max(b) - r.min(g).min(b);
                    assert_eq!(family.is_achromatic(), spread < 15, "{:?}", (r, g, b));
                }
            }
        }
    }

    #[test]
    fn test_hex() {
        assert_eq!(hex([255, 0, 16]), "#ff0010");
    }

    #[test]
    fn test_grayscale_only_checks_first_pixels() {
        // 100 neutral pixels in the first rows, colorful below
        let mut pixels = RgbImage::from_pixel(10, 20, Rgb([255, 0, 0]));
        for y in 0..10 {
            for x in 0..10 {
                pixels.put_pixel(x, y, Rgb([50, 50, 50]));
            }
        }
        assert!(is_grayscale(&sample(pixels)));

        let mut pixels = RgbImage::from_pixel(10, 20, Rgb([50, 50, 50]));
        pixels.put_pixel(9, 9, Rgb([50, 80, 50]));
        assert!(!is_grayscale(&sample(pixels)));
    }

    #[test]
    fn test_grayscale_trusts_luma_source() {
        let pixels = RgbImage::from_pixel(2, 2, Rgb([255, 0, 0]));
        let sampled = SampledImage {
            pixels,
            source_is_luma: true,
        };
        assert!(is_grayscale(&sampled));
    }

    #[test]
    fn test_brightness() {
        let white = RgbImage::from_pixel(3, 3, Rgb([255, 255, 255]));
        assert_eq!(brightness(&white), Some(1.0));

        let black = RgbImage::from_pixel(3, 3, Rgb([0, 0, 0]));
        assert_eq!(brightness(&black), Some(0.0));

        assert_eq!(brightness(&RgbImage::new(0, 0)), None);
    }

    #[test]
    fn test_brightness_rounds_luma() {
        // 2 * 299 / 1000 = 0.598, rounds to a luma of 1
        let dim = RgbImage::from_pixel(2, 2, Rgb([2, 0, 0]));
        assert_eq!(brightness(&dim), Some(1.0 / 255.0));

        // 0.299 rounds down
        let dimmer = RgbImage::from_pixel(2, 2, Rgb([1, 0, 0]));
        assert_eq!(brightness(&dimmer), Some(0.0));
    }

    #[test]
    fn test_analyze_sample() {
        let mut pixels = RgbImage::from_pixel(10, 10, Rgb([0, 0, 255]));
        for x in 0..10 {
            pixels.put_pixel(x, 0, Rgb([255, 255, 255]));
        }

        let analysis = analyze_sample(&sample(pixels)).unwrap();
        assert_eq!(analysis.color_family, ColorFamily::Blue);
        assert_eq!(analysis.dominant_colors.len(), 2);
        assert_eq!(analysis.dominant_colors[0].hex, "#0000ff");
        assert_eq!(analysis.dominant_colors[0].percentage, 90.0);
        assert_eq!(analysis.dominant_colors[1].percentage, 10.0);
        assert!(!analysis.is_grayscale);
    }

    #[test]
    fn test_analyze_empty_sample_fails() {
        assert!(analyze_sample(&sample(RgbImage::new(0, 0))).is_err());
    }
}
