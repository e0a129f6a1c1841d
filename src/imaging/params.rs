//! Parameter types for image operations.
//!
//! These structs describe *what* to render, not *how*. They are the interface
//! between the thumbnail cache (which decides what to render) and the
//! [`backend`](super::backend) (which does the pixel work).

use std::path::PathBuf;

/// Quality setting for lossy JPEG encoding (1-100).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quality(u8);

impl Quality {
    pub fn new(value: u8) -> Self {
        Self(value.clamp(1, 100))
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self(75)
    }
}

/// A preview render: decode `source`, shrink to `width` px wide keeping the
/// aspect ratio, encode as JPEG at `quality`.
#[derive(Debug, Clone, PartialEq)]
pub struct PreviewParams {
    pub source: PathBuf,
    pub width: u32,
    pub quality: Quality,
}

impl PreviewParams {
    pub fn new(source: impl Into<PathBuf>, width: u32, quality: Quality) -> Self {
        Self {
            source: source.into(),
            width,
            quality,
        }
    }
}
