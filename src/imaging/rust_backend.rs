//! Pure Rust image backend built on the `image` crate.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Decode (JPEG, PNG, GIF) | `image::ImageReader` with content sniffing |
//! | Resize | `DynamicImage::resize_exact` with `Lanczos3` filter |
//! | Encode → JPEG | `image::codecs::jpeg::JpegEncoder` |
//!
//! The format is guessed from the file contents first and the extension
//! second, so a mislabelled file still decodes.

use super::backend::{BackendError, Dimensions, ImageBackend, RenderedPreview};
use super::calculations::preview_dimensions;
use super::params::{PreviewParams, Quality};
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, ImageReader};
use std::path::Path;

/// Backend using the `image` crate's pure Rust codecs.
pub struct RustBackend;

impl RustBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustBackend {
    fn default() -> Self {
        Self::new()
    }
}

/// Load and decode an image from disk.
fn load_image(path: &Path) -> Result<DynamicImage, BackendError> {
    ImageReader::open(path)
        .map_err(BackendError::Io)?
        .with_guessed_format()
        .map_err(BackendError::Io)?
        .decode()
        .map_err(|e| {
            BackendError::ProcessingFailed(format!("Failed to decode {}: {}", path.display(), e))
        })
}

/// Encode as baseline JPEG. Alpha is dropped; JPEG has no alpha channel.
fn encode_jpeg(img: &DynamicImage, quality: Quality) -> Result<Vec<u8>, BackendError> {
    let mut buffer = Vec::new();
    let encoder = JpegEncoder::new_with_quality(&mut buffer, quality.value());
    DynamicImage::ImageRgb8(img.to_rgb8())
        .write_with_encoder(encoder)
        .map_err(|e| BackendError::ProcessingFailed(format!("JPEG encode failed: {}", e)))?;
    Ok(buffer)
}

impl ImageBackend for RustBackend {
    fn preview(&self, params: &PreviewParams) -> Result<RenderedPreview, BackendError> {
        let img = load_image(&params.source)?;
        let source = Dimensions {
            width: img.width(),
            height: img.height(),
        };
        if source.width == 0 || source.height == 0 {
            return Err(BackendError::ProcessingFailed(format!(
                "Empty image: {}",
                params.source.display()
            )));
        }

        let (width, height) = preview_dimensions(source, params.width);
        let small = img.resize_exact(width, height, FilterType::Lanczos3);
        let jpeg = encode_jpeg(&small, params.quality)?;
        Ok(RenderedPreview { source, jpeg })
    }
}
