//! Period aggregation: folders in, display-ready listings out.
//!
//! An [`Aggregator`] composes the other modules:
//!
//! ```text
//! discover_periods ──► list_entries ──► ThumbnailCache::get (rayon, per entry)
//!                  ├─► resolve_phase
//!                  ├─► find_template
//!                  └─► read_ballots (closed periods only)
//! ```
//!
//! Every call recomputes the listing from disk; only thumbnails are cached,
//! in the aggregator's shared [`ThumbnailCache`]. The aggregator is
//! `Send + Sync`, so one instance can serve concurrent requests.
//!
//! Failure policy: a directory that cannot be listed fails the whole call. A
//! corrupt image degrades to a placeholder thumbnail; an unparseable ballot
//! file leaves its period without results and records the reason in
//! [`Period::ballot_error`]. Neither stops the rest of the listing.

use crate::ballot::{DEFAULT_DELIMITER, read_ballots};
use crate::config::ContestConfig;
use crate::imaging::{ImageBackend, RustBackend};
use crate::naming::{creator_key, parse_period_name, period_link};
use crate::phase::resolve_phase;
use crate::scan::{PeriodFolder, ScanError, discover_periods, find_template, list_entries};
use crate::thumbnail::{ThumbnailCache, ThumbnailSettings};
use crate::types::{Entry, Period};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AggregateError {
    #[error(transparent)]
    Scan(#[from] ScanError),
    #[error("Not a period folder: {}", .0.display())]
    InvalidPeriodName(PathBuf),
}

/// Builds period listings from a base directory.
pub struct Aggregator<B = RustBackend> {
    config: ContestConfig,
    thumbnails: Arc<ThumbnailCache<B>>,
}

impl Aggregator<RustBackend> {
    /// Aggregator with a fresh thumbnail cache sized from `config`.
    pub fn new(config: ContestConfig) -> Self {
        let settings = ThumbnailSettings::from_config(&config.thumbnails);
        Self {
            thumbnails: Arc::new(ThumbnailCache::new(settings)),
            config,
        }
    }
}

impl<B: ImageBackend> Aggregator<B> {
    /// Aggregator over an existing (possibly shared) thumbnail cache.
    pub fn with_cache(config: ContestConfig, thumbnails: Arc<ThumbnailCache<B>>) -> Self {
        Self { config, thumbnails }
    }

    pub fn config(&self) -> &ContestConfig {
        &self.config
    }

    pub fn thumbnails(&self) -> &Arc<ThumbnailCache<B>> {
        &self.thumbnails
    }

    /// Every period under `base_dir`, newest id first, with results attached
    /// to closed periods.
    pub fn aggregate_all(&self, base_dir: &Path) -> Result<Vec<Period>, AggregateError> {
        let discovery = discover_periods(base_dir, &self.config.periods.prefix)?;

        let mut periods = Vec::with_capacity(discovery.periods.len());
        for folder in &discovery.periods {
            let mut period = self.build_period(folder)?;
            if period.phase.shows_results() {
                self.attach_results(&mut period, folder);
            }
            periods.push(period);
        }
        periods.sort_by(|a, b| b.id.cmp(&a.id));
        Ok(periods)
    }

    /// A single period folder, without ballot handling.
    ///
    /// The folder name must parse as a period (`CW_12`); its existence is the
    /// caller's concern.
    pub fn aggregate_one(&self, period_dir: &Path) -> Result<Period, AggregateError> {
        let invalid = || AggregateError::InvalidPeriodName(period_dir.to_path_buf());
        let name = period_dir
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(invalid)?;
        let id = parse_period_name(name, &self.config.periods.prefix).ok_or_else(invalid)?;

        let folder = PeriodFolder {
            id,
            name: name.to_string(),
            path: period_dir.to_path_buf(),
        };
        Ok(self.build_period(&folder)?)
    }

    /// The period `<base_dir>/<prefix>_<id>`, or `None` if there is no such
    /// folder (or `id` is not a period id at all).
    pub fn aggregate_period(
        &self,
        base_dir: &Path,
        id: &str,
    ) -> Result<Option<Period>, AggregateError> {
        let prefix = &self.config.periods.prefix;
        let name = format!("{prefix}_{id}");
        if parse_period_name(&name, prefix).is_none() {
            return Ok(None);
        }
        let period_dir = base_dir.join(&name);
        if !period_dir.is_dir() {
            return Ok(None);
        }
        self.aggregate_one(&period_dir).map(Some)
    }

    /// All periods, each narrowed to the entries of one creator.
    ///
    /// Periods without a matching entry stay in the list with no entries.
    /// This is not a voting view: `can_vote` is cleared and no results are
    /// attached. Returns `None` if the creator has no entry anywhere.
    pub fn aggregate_by_creator(
        &self,
        base_dir: &Path,
        key: &str,
    ) -> Result<Option<Vec<Period>>, AggregateError> {
        let mut periods = self.aggregate_all(base_dir)?;

        let mut matched = false;
        for period in &mut periods {
            period.entries.retain(|e| creator_key(&e.file_name) == key);
            matched |= !period.entries.is_empty();
            period.can_vote = false;
            period.results = None;
            period.ballot_error = None;
        }
        Ok(matched.then_some(periods))
    }

    fn link(&self, folder: &PeriodFolder, file_name: &str) -> String {
        period_link(&self.config.periods.link_prefix, &folder.name, file_name)
    }

    fn build_period(&self, folder: &PeriodFolder) -> Result<Period, ScanError> {
        let files = list_entries(&folder.path)?;

        let entries: Vec<Entry> = files
            .par_iter()
            .map(|file| {
                let thumbnail = self.thumbnails.get(&folder.path.join(&file.file_name));
                Entry {
                    link: self.link(folder, &file.file_name),
                    file_name: file.file_name.clone(),
                    modified: file.modified,
                    thumbnail: thumbnail.metadata,
                    decode_error: thumbnail.failure,
                }
            })
            .collect();

        let phase = resolve_phase(&folder.path);
        tracing::debug!(period = folder.id, %phase, entries = entries.len(), "built period");
        Ok(Period {
            id: folder.id,
            entries,
            phase,
            can_vote: phase.can_vote(),
            results: None,
            template: find_template(&folder.path).map(|t| self.link(folder, &t)),
            ballot_error: None,
        })
    }

    fn attach_results(&self, period: &mut Period, folder: &PeriodFolder) {
        let ballots = &self.config.ballots;
        let delimiter = ballots.delimiter_char().unwrap_or(DEFAULT_DELIMITER);
        match read_ballots(&folder.path, &ballots.file, delimiter) {
            Ok(mut results) => {
                for result in &mut results {
                    result.link = self.link(folder, &result.file_name);
                }
                period.results = Some(results);
            }
            Err(e) => {
                tracing::warn!(
                    folder = %folder.name,
                    error = %e,
                    "ballot file unusable, results withheld"
                );
                period.ballot_error = Some(e.to_string());
            }
        }
    }
}
