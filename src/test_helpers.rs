//! Shared test utilities for the contest-gal test suite.
//!
//! Provides fixture builders (period folders, lock files, synthetic images,
//! controlled modification times) and lookup helpers over aggregation output.
//!
//! # Usage
//!
//! ```rust,ignore
//! use crate::test_helpers::*;
//!
//! let tmp = TempDir::new().unwrap();
//! let dir = make_period(tmp.path(), 12);
//! write_png(&dir.join("alice.png"), 40, 30);
//! set_locks(&dir, true, false);
//!
//! let periods = Aggregator::new(ContestConfig::default())
//!     .aggregate_all(tmp.path())
//!     .unwrap();
//! assert_eq!(entry_names(find_period(&periods, 12)), vec!["alice.png"]);
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use image::{ImageFormat, Rgb, RgbImage, Rgba, RgbaImage};

use crate::naming::period_folder_name;
use crate::phase::{UPLOAD_LOCK, VOTE_LOCK};
use crate::types::Period;

// =========================================================================
// Fixture setup
// =========================================================================

/// Create `<base>/CW_<id>` and return its path.
pub fn make_period(base: &Path, id: u32) -> PathBuf {
    make_period_named(base, &period_folder_name("CW", id))
}

/// Create a folder with an arbitrary name under `base`.
pub fn make_period_named(base: &Path, name: &str) -> PathBuf {
    let dir = base.join(name);
    fs::create_dir_all(&dir).unwrap();
    dir
}

/// Create an empty file.
pub fn touch(path: &Path) {
    fs::write(path, b"").unwrap();
}

/// Set a file's modification time to `secs` after the Unix epoch.
pub fn set_modified(path: &Path, secs: u64) {
    fs::File::options()
        .write(true)
        .open(path)
        .unwrap()
        .set_modified(SystemTime::UNIX_EPOCH + Duration::from_secs(secs))
        .unwrap();
}

/// Create or remove the two lock markers of a period folder.
pub fn set_locks(period_dir: &Path, upload: bool, vote: bool) {
    for (name, present) in [(UPLOAD_LOCK, upload), (VOTE_LOCK, vote)] {
        let path = period_dir.join(format!("{name}.lock"));
        if present {
            touch(&path);
        } else if path.exists() {
            fs::remove_file(&path).unwrap();
        }
    }
}

// =========================================================================
// Synthetic images
// =========================================================================

fn gradient(width: u32, height: u32) -> RgbImage {
    RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x * 255 / width.max(1)) as u8, (y * 255 / height.max(1)) as u8, 128])
    })
}

pub fn write_jpeg(path: &Path, width: u32, height: u32) {
    gradient(width, height)
        .save_with_format(path, ImageFormat::Jpeg)
        .unwrap();
}

pub fn write_png(path: &Path, width: u32, height: u32) {
    RgbaImage::from_fn(width, height, |x, _| Rgba([200, 100, (x % 256) as u8, 180]))
        .save_with_format(path, ImageFormat::Png)
        .unwrap();
}

pub fn write_gif(path: &Path, width: u32, height: u32) {
    RgbaImage::from_pixel(width, height, Rgba([10, 200, 30, 255]))
        .save_with_format(path, ImageFormat::Gif)
        .unwrap();
}

// =========================================================================
// Output lookups: panic with a clear message on miss
// =========================================================================

/// Find a period by id. Panics if not found.
pub fn find_period(periods: &[Period], id: u32) -> &Period {
    periods.iter().find(|p| p.id == id).unwrap_or_else(|| {
        let ids: Vec<u32> = periods.iter().map(|p| p.id).collect();
        panic!("period {id} not found. Available: {ids:?}")
    })
}

/// Entry file names of a period, in listing order.
pub fn entry_names(period: &Period) -> Vec<&str> {
    period.entries.iter().map(|e| e.file_name.as_str()).collect()
}
