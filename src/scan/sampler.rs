//! Pixel sampling for color analysis
//!
//! Decodes an image, normalizes it to 8-bit RGB and shrinks it to a small
//! thumbnail so the histogram cost does not depend on the source resolution.

use image::{ColorType, DynamicImage, ImageReader, RgbImage};
use std::collections::HashMap;
use std::path::Path;

use crate::error::{AnalysisError, Result};

/// Largest edge of the sampling thumbnail
pub const SAMPLE_SIZE: u32 = 150;

/// Downsampled RGB view of an image
#[derive(Debug, Clone)]
pub struct SampledImage {
    /// RGB thumbnail, at most SAMPLE_SIZE on each edge
    pub pixels: RgbImage,
    /// True when the source was stored as luminance only (L / LA)
    pub source_is_luma: bool,
}

/// Distinct colors of a sampled image, most frequent first
#[derive(Debug, Clone, PartialEq)]
pub struct ColorHistogram {
    /// (count, rgb) pairs
    pub entries: Vec<(u32, [u8; 3])>,
    /// Number of pixels counted
    pub total: u64,
}

/// Open and decode an image file, then sample it
pub fn sample_file(path: &Path) -> Result<SampledImage> {
    let img = ImageReader::open(path)
        .map_err(|e| AnalysisError::io(format!("Failed to open {}", path.display()), e))?
        .with_guessed_format()
        .map_err(|e| AnalysisError::io(format!("Failed to read {}", path.display()), e))?
        .decode()
        .map_err(|e| AnalysisError::decode(path, e))?;

    Ok(sample_image(&img))
}

/// Normalize an already decoded image to RGB and downsample it
pub fn sample_image(img: &DynamicImage) -> SampledImage {
    let source_is_luma = is_luma(img.color());

    // Only shrink; small images are counted at their own size
    let img = if img.width() > SAMPLE_SIZE || img.height() > SAMPLE_SIZE {
        img.thumbnail(SAMPLE_SIZE, SAMPLE_SIZE)
    } else {
        img.clone()
    };

    SampledImage {
        pixels: img.to_rgb8(),
        source_is_luma,
    }
}

fn is_luma(color: ColorType) -> bool {
    matches!(
        color,
        ColorType::L8 | ColorType::La8 | ColorType::L16 | ColorType::La16
    )
}

impl SampledImage {
    /// Count every distinct color in the thumbnail
    ///
    /// Entries are sorted by count descending; equal counts are ordered by
    /// color value descending so the result is fully deterministic.
    pub fn histogram(&self) -> Result<ColorHistogram> {
        let mut counts: HashMap<[u8; 3], u32> = HashMap::new();
        for pixel in self.pixels.pixels() {
            *counts.entry(pixel.0).or_insert(0) += 1;
        }

        if counts.is_empty() {
            return Err(AnalysisError::color_analysis("image has no pixels"));
        }

        let mut entries: Vec<(u32, [u8; 3])> =
            counts.into_iter().map(|(rgb, count)| (count, rgb)).collect();
        entries.sort_unstable_by(|a, b| b.cmp(a));

        let total = entries.iter().map(|(count, _)| u64::from(*count)).sum();

        Ok(ColorHistogram { entries, total })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, Luma, Rgb};

    #[test]
    fn test_large_image_is_downsampled() {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(600, 300, Rgb([1, 2, 3])));
        let sampled = sample_image(&img);
        assert!(sampled.pixels.width() <= SAMPLE_SIZE);
        assert!(sampled.pixels.height() <= SAMPLE_SIZE);
        assert_eq!(sampled.pixels.width(), 150);
        assert_eq!(sampled.pixels.height(), 75);
    }

    #[test]
    fn test_small_image_is_not_upscaled() {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(10, 20, Rgb([1, 2, 3])));
        let sampled = sample_image(&img);
        assert_eq!(sampled.pixels.dimensions(), (10, 20));
    }

    #[test]
    fn test_luma_source_is_flagged() {
        let img = DynamicImage::ImageLuma8(GrayImage::from_pixel(4, 4, Luma([90])));
        let sampled = sample_image(&img);
        assert!(sampled.source_is_luma);
        assert_eq!(sampled.pixels.get_pixel(0, 0).0, [90, 90, 90]);
    }

    #[test]
    fn test_histogram_order() {
        let mut pixels = RgbImage::from_pixel(4, 1, Rgb([0, 0, 255]));
        pixels.put_pixel(0, 0, Rgb([10, 10, 10]));
        let sampled = SampledImage {
            pixels,
            source_is_luma: false,
        };

        let histogram = sampled.histogram().unwrap();
        assert_eq!(histogram.total, 4);
        assert_eq!(histogram.entries, vec![(3, [0, 0, 255]), (1, [10, 10, 10])]);
    }

    #[test]
    fn test_histogram_ties_break_on_color_descending() {
        let mut pixels = RgbImage::from_pixel(2, 1, Rgb([5, 0, 0]));
        pixels.put_pixel(1, 0, Rgb([200, 0, 0]));
        let sampled = SampledImage {
            pixels,
            source_is_luma: false,
        };

        let histogram = sampled.histogram().unwrap();
        assert_eq!(histogram.entries[0], (1, [200, 0, 0]));
        assert_eq!(histogram.entries[1], (1, [5, 0, 0]));
    }

    #[test]
    fn test_sample_missing_file_fails() {
        let result = sample_file(Path::new("/nonexistent/path.png"));
        assert!(result.is_err());
    }
}
