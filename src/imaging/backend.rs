//! Image backend trait and shared types.
//!
//! The [`ImageBackend`] trait is the single seam between the thumbnail cache
//! and pixel work. The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend); tests swap in a mock
//! that records every call, which is how compute-once caching is asserted.

use super::params::PreviewParams;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Processing failed: {0}")]
    ProcessingFailed(String),
}

/// Pixel dimensions of a decoded source image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

/// Output of a preview render: the source size and the encoded preview.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedPreview {
    pub source: Dimensions,
    /// JPEG bytes of the downscaled preview.
    pub jpeg: Vec<u8>,
}

/// Trait for image backends.
///
/// Backends are shared across threads by the thumbnail cache and by rayon
/// workers, hence `Send + Sync`.
pub trait ImageBackend: Send + Sync {
    /// Decode the source image and render a small JPEG preview of it.
    fn preview(&self, params: &PreviewParams) -> Result<RenderedPreview, BackendError>;
}
