//! In-memory thumbnail cache.
//!
//! Decoding a full-size submission just to learn its aspect ratio and render
//! a 20px preview is by far the most expensive step of an aggregation, and
//! listings are rebuilt on every request. This module memoizes the result per
//! image so each file is decoded at most once per cache lifetime.
//!
//! # Contract
//!
//! - Entries are keyed by absolute file path.
//! - An entry, once computed, is never recomputed or invalidated: editing or
//!   deleting the file does not change what the cache returns. Build a new
//!   [`ThumbnailCache`] to start over.
//! - A file that cannot be decoded is cached as a placeholder (square box,
//!   empty preview) together with the failure reason.
//!
//! # Concurrency
//!
//! The map holds one [`OnceLock`] cell per path. The map mutex is taken only
//! long enough to fetch or insert that cell; the decode runs inside
//! [`OnceLock::get_or_init`] with the mutex released. Two requests racing for
//! the same new path therefore decode once (the loser waits on the cell),
//! while different paths decode in parallel.

use crate::config::ThumbnailsConfig;
use crate::imaging::{ImageBackend, PreviewParams, Quality, RustBackend, scaled_height};
use crate::types::{DisplaySize, ThumbnailMetadata};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD_NO_PAD;
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, OnceLock, PoisonError};

/// Sizes used when computing thumbnails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThumbnailSettings {
    pub box_width: u32,
    pub preview_width: u32,
    pub preview_quality: Quality,
}

impl ThumbnailSettings {
    pub fn from_config(config: &ThumbnailsConfig) -> Self {
        Self {
            box_width: config.box_width,
            preview_width: config.preview_width,
            preview_quality: Quality::new(config.preview_quality),
        }
    }
}

impl Default for ThumbnailSettings {
    fn default() -> Self {
        Self::from_config(&ThumbnailsConfig::default())
    }
}

/// Cached result for one image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Thumbnail {
    pub metadata: ThumbnailMetadata,
    /// Set when `metadata` is a placeholder because the image could not be decoded.
    pub failure: Option<String>,
}

impl Thumbnail {
    pub fn is_placeholder(&self) -> bool {
        self.failure.is_some()
    }
}

/// Summary of cache activity since construction.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    /// Lookups that ran the backend.
    pub misses: u64,
    /// Misses that ended in a placeholder.
    pub degraded: u64,
}

impl CacheStats {
    pub fn total(&self) -> u64 {
        self.hits + self.misses
    }
}

impl fmt::Display for CacheStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.hits > 0 {
            write!(
                f,
                "{} cached, {} computed ({} total)",
                self.hits,
                self.misses,
                self.total()
            )?;
        } else {
            write!(f, "{} computed", self.misses)?;
        }
        if self.degraded > 0 {
            write!(f, ", {} placeholder", self.degraded)?;
        }
        Ok(())
    }
}

/// Process-lifetime memo of per-image display metadata.
pub struct ThumbnailCache<B = RustBackend> {
    backend: B,
    settings: ThumbnailSettings,
    entries: Mutex<HashMap<PathBuf, Arc<OnceLock<Thumbnail>>>>,
    hits: AtomicU64,
    misses: AtomicU64,
    degraded: AtomicU64,
}

impl ThumbnailCache<RustBackend> {
    pub fn new(settings: ThumbnailSettings) -> Self {
        Self::with_backend(RustBackend::new(), settings)
    }
}

impl<B: ImageBackend> ThumbnailCache<B> {
    pub fn with_backend(backend: B, settings: ThumbnailSettings) -> Self {
        Self {
            backend,
            settings,
            entries: Mutex::new(HashMap::new()),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            degraded: AtomicU64::new(0),
        }
    }

    pub fn settings(&self) -> ThumbnailSettings {
        self.settings
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Display metadata for `path`, computed on first request only.
    pub fn get(&self, path: &Path) -> Thumbnail {
        let key = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
        let cell = {
            let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
            Arc::clone(entries.entry(key).or_default())
        };

        let mut computed = false;
        let thumbnail = cell.get_or_init(|| {
            computed = true;
            self.compute(path)
        });
        if computed {
            self.misses.fetch_add(1, Ordering::Relaxed);
        } else {
            self.hits.fetch_add(1, Ordering::Relaxed);
        }
        thumbnail.clone()
    }

    /// Number of cached paths (including any still being computed).
    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            degraded: self.degraded.load(Ordering::Relaxed),
        }
    }

    fn compute(&self, path: &Path) -> Thumbnail {
        tracing::debug!(path = %path.display(), "computing thumbnail");
        let params = PreviewParams::new(
            path,
            self.settings.preview_width,
            self.settings.preview_quality,
        );
        match self.backend.preview(&params) {
            Ok(rendered) => Thumbnail {
                metadata: ThumbnailMetadata {
                    size: DisplaySize {
                        width: self.settings.box_width,
                        height: scaled_height(rendered.source, self.settings.box_width),
                    },
                    preview: STANDARD_NO_PAD.encode(&rendered.jpeg),
                },
                failure: None,
            },
            Err(e) => {
                self.degraded.fetch_add(1, Ordering::Relaxed);
                tracing::warn!(path = %path.display(), error = %e, "using placeholder thumbnail");
                Thumbnail {
                    metadata: ThumbnailMetadata::placeholder(self.settings.box_width),
                    failure: Some(e.to_string()),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imaging::Dimensions;
    use crate::imaging::backend::tests::{MockBackend, RecordedOp};
    use std::time::Duration;

    fn cache_with(backend: MockBackend) -> ThumbnailCache<MockBackend> {
        ThumbnailCache::with_backend(backend, ThumbnailSettings::default())
    }

    #[test]
    fn computes_scaled_size_and_preview() {
        let cache = cache_with(MockBackend::new().with_image("/p/a.png", 800, 600));

        let thumb = cache.get(Path::new("/p/a.png"));
        assert!(!thumb.is_placeholder());
        assert_eq!(
            thumb.metadata.size,
            DisplaySize {
                width: 330,
                height: 248
            }
        );
        let expected = MockBackend::fake_jpeg(Dimensions {
            width: 800,
            height: 600,
        });
        assert_eq!(thumb.metadata.preview, STANDARD_NO_PAD.encode(expected));
    }

    #[test]
    fn passes_preview_settings_to_backend() {
        let settings = ThumbnailSettings {
            box_width: 200,
            preview_width: 12,
            preview_quality: Quality::new(60),
        };
        let cache = ThumbnailCache::with_backend(
            MockBackend::new().with_image("/p/a.png", 100, 100),
            settings,
        );

        let thumb = cache.get(Path::new("/p/a.png"));
        assert_eq!(thumb.metadata.size.width, 200);
        assert_eq!(
            cache.backend().get_operations(),
            vec![RecordedOp::Preview {
                source: "/p/a.png".into(),
                width: 12,
                quality: 60
            }]
        );
    }

    #[test]
    fn second_lookup_is_a_hit_without_backend_work() {
        let cache = cache_with(MockBackend::new().with_image("/p/a.png", 640, 480));

        let first = cache.get(Path::new("/p/a.png"));
        let second = cache.get(Path::new("/p/a.png"));

        assert_eq!(first, second);
        assert_eq!(cache.backend().preview_count(), 1);
        assert_eq!(
            cache.stats(),
            CacheStats {
                hits: 1,
                misses: 1,
                degraded: 0
            }
        );
    }

    #[test]
    fn decode_failure_yields_cached_placeholder() {
        let cache = cache_with(MockBackend::new());

        let thumb = cache.get(Path::new("/p/broken.png"));
        assert!(thumb.is_placeholder());
        assert_eq!(thumb.metadata, ThumbnailMetadata::placeholder(330));
        assert!(thumb.failure.as_deref().unwrap().contains("broken.png"));

        let again = cache.get(Path::new("/p/broken.png"));
        assert_eq!(again, thumb);
        assert_eq!(cache.backend().preview_count(), 1);
        assert_eq!(cache.stats().degraded, 1);
    }

    #[test]
    fn distinct_paths_are_distinct_entries() {
        let cache = cache_with(
            MockBackend::new()
                .with_image("/p/a.png", 100, 100)
                .with_image("/p/b.png", 100, 200),
        );

        let a = cache.get(Path::new("/p/a.png"));
        let b = cache.get(Path::new("/p/b.png"));
        assert_ne!(a, b);
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.backend().preview_count(), 2);
    }

    #[test]
    fn relative_and_absolute_paths_share_an_entry() {
        let cwd = std::env::current_dir().unwrap();
        let absolute = cwd.join("rel.png");
        let cache = cache_with(MockBackend::new().with_image(&absolute, 10, 10));

        cache.get(&absolute);
        cache.get(Path::new("rel.png"));
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.backend().preview_count(), 1);
    }

    #[test]
    fn concurrent_first_requests_compute_once() {
        let cache = Arc::new(cache_with(
            MockBackend::new()
                .with_image("/p/slow.png", 300, 100)
                .with_delay(Duration::from_millis(50)),
        ));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let cache = Arc::clone(&cache);
                std::thread::spawn(move || cache.get(Path::new("/p/slow.png")))
            })
            .collect();
        let results: Vec<Thumbnail> = handles.into_iter().map(|h| h.join().unwrap()).collect();

        assert_eq!(cache.backend().preview_count(), 1);
        assert!(results.windows(2).all(|w| w[0] == w[1]));
        let stats = cache.stats();
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.hits, 7);
    }

    #[test]
    fn concurrent_distinct_paths_each_compute_once() {
        let mut backend = MockBackend::new().with_delay(Duration::from_millis(5));
        for i in 0..16 {
            backend = backend.with_image(format!("/p/{i}.png"), 100 + i, 100);
        }
        let cache = Arc::new(cache_with(backend));

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let cache = Arc::clone(&cache);
                std::thread::spawn(move || {
                    for i in 0..16 {
                        cache.get(Path::new(&format!("/p/{i}.png")));
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }

        assert_eq!(cache.backend().preview_count(), 16);
        assert_eq!(cache.len(), 16);
    }

    #[test]
    fn stats_display_with_hits() {
        let s = CacheStats {
            hits: 5,
            misses: 2,
            degraded: 0,
        };
        assert_eq!(s.to_string(), "5 cached, 2 computed (7 total)");
    }

    #[test]
    fn stats_display_no_hits_with_placeholders() {
        let s = CacheStats {
            hits: 0,
            misses: 3,
            degraded: 1,
        };
        assert_eq!(s.to_string(), "3 computed, 1 placeholder");
    }

    #[test]
    fn empty_cache() {
        let cache = cache_with(MockBackend::new());
        assert!(cache.is_empty());
        assert_eq!(cache.stats().to_string(), "0 computed");
    }

    #[test]
    fn very_tall_strip_keeps_real_size() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("strip.png");
        image::GrayImage::from_pixel(10, 40_000, image::Luma([200]))
            .save_with_format(&path, image::ImageFormat::Png)
            .unwrap();

        let cache = ThumbnailCache::new(ThumbnailSettings::default());
        let thumb = cache.get(&path);
        assert!(!thumb.is_placeholder(), "{:?}", thumb.failure);
        assert_eq!(
            thumb.metadata.size,
            DisplaySize {
                width: 330,
                height: 1_320_000
            }
        );
        assert!(!thumb.metadata.preview.is_empty());
        assert_eq!(cache.stats().degraded, 0);
    }
}
