/// Image reading module
///
/// This module handles:
/// - Decoding images and downsampling them for color counting
/// - Reading header geometry, format and color mode
/// - Reading EXIF tags and filesystem timestamps

pub mod sampler;
pub mod metadata;

pub use metadata::{collect_metadata, extract_tags, ExifTags, ImageMetadata};
