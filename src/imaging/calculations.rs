//! Pure calculation functions for display and preview dimensions.
//!
//! All functions here are pure and testable without any I/O or images.

use super::backend::Dimensions;

/// Height of a `box_width`-wide display box that keeps the source aspect ratio.
///
/// `round(height / width * box_width)`, never below 1. A zero-width source
/// (which no decoder produces) falls back to a square box.
///
/// ```
/// # use contest_gal::imaging::{Dimensions, scaled_height};
/// // 4:3 landscape in a 330px box → 248px tall
/// assert_eq!(scaled_height(Dimensions { width: 800, height: 600 }, 330), 248);
/// ```
pub fn scaled_height(source: Dimensions, box_width: u32) -> u32 {
    if source.width == 0 {
        return box_width;
    }
    let ratio = source.height as f64 / source.width as f64;
    ((ratio * box_width as f64).round() as u32).max(1)
}

/// Largest side a baseline JPEG can carry (16-bit header fields).
pub const JPEG_MAX_DIMENSION: u32 = u16::MAX as u32;

/// Dimensions of a preview `preview_width` px wide with the source aspect ratio.
///
/// Both sides are capped at [`JPEG_MAX_DIMENSION`]; an extreme strip gets a
/// squashed preview rather than none.
pub fn preview_dimensions(source: Dimensions, preview_width: u32) -> (u32, u32) {
    (
        preview_width.min(JPEG_MAX_DIMENSION),
        scaled_height(source, preview_width).min(JPEG_MAX_DIMENSION),
    )
}
