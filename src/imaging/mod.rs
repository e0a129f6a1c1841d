//! Image processing: pure Rust, no system libraries.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Decode** | `image::ImageReader` (JPEG, PNG, GIF) |
//! | **Preview** | Lanczos3 `resize_exact` → JPEG |
//! | **Display size** | [`scaled_height`] |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for dimension math (unit testable)
//! - **Parameters**: Data structures describing image operations
//! - **Backend**: [`ImageBackend`] trait + [`RustBackend`]

pub mod backend;
mod calculations;
mod params;
pub mod rust_backend;

pub use backend::{BackendError, Dimensions, ImageBackend, RenderedPreview};
pub use calculations::{JPEG_MAX_DIMENSION, preview_dimensions, scaled_height};
pub use params::{PreviewParams, Quality};
pub use rust_backend::RustBackend;
