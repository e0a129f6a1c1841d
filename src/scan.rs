//! Filesystem scanning for period folders and their entries.
//!
//! ## Directory Structure
//!
//! ```text
//! contest/                         # Base directory
//! ├── config.toml                  # Settings (optional)
//! ├── CW_11/                       # Period 11
//! │   ├── alice_01.jpg             # Entry
//! │   ├── bob.png
//! │   ├── template.html            # Override template (passed through)
//! │   ├── upload.lock              # Submissions closed
//! │   ├── vote.lock                # Voting closed
//! │   └── votes.txt                # Ballots
//! ├── CW_12/
//! │   └── carol.gif
//! └── CW_draft/                    # Malformed: skipped with a warning
//! ```
//!
//! Only files directly inside a period folder are entries; subdirectories are
//! never descended into. Entry extensions are matched exactly (`photo.JPG` is
//! not an entry).

use crate::naming::{has_period_prefix, parse_period_name};
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use thiserror::Error;

/// File extensions accepted as entries.
pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "gif", "png"];

/// Files starting with this are override templates, never entries.
pub const TEMPLATE_PREFIX: &str = "template.";

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Cannot list {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// An entry file as found on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScannedFile {
    pub file_name: String,
    pub modified: SystemTime,
}

/// A period folder found under the base directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeriodFolder {
    pub id: u32,
    /// Folder name as it appears on disk (`CW_07`).
    pub name: String,
    pub path: PathBuf,
}

/// A folder that looked like a period but was not used.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedFolder {
    pub name: String,
    pub reason: String,
}

/// Result of [`discover_periods`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Discovery {
    /// Sorted by folder name.
    pub periods: Vec<PeriodFolder>,
    pub skipped: Vec<SkippedFolder>,
}

fn list_dir(path: &Path) -> Result<fs::ReadDir, ScanError> {
    fs::read_dir(path).map_err(|source| ScanError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn is_entry_name(name: &str) -> bool {
    if name.starts_with(TEMPLATE_PREFIX) {
        return false;
    }
    name.rsplit_once('.')
        .is_some_and(|(_, ext)| IMAGE_EXTENSIONS.contains(&ext))
}

/// List entry files of one period folder, most recently modified first.
///
/// Equal modification times fall back to file name order. Symlinks are
/// followed; entries that vanish or cannot be stat'ed mid-scan are skipped.
pub fn list_entries(period_dir: &Path) -> Result<Vec<ScannedFile>, ScanError> {
    let mut files = Vec::new();
    for dir_entry in list_dir(period_dir)? {
        let dir_entry = match dir_entry {
            Ok(e) => e,
            Err(e) => {
                tracing::debug!(dir = %period_dir.display(), error = %e, "skipping unreadable entry");
                continue;
            }
        };
        let Ok(file_name) = dir_entry.file_name().into_string() else {
            continue;
        };
        if !is_entry_name(&file_name) {
            continue;
        }
        let metadata = match fs::metadata(dir_entry.path()) {
            Ok(m) => m,
            Err(e) => {
                tracing::debug!(file = %file_name, error = %e, "skipping entry without metadata");
                continue;
            }
        };
        if metadata.is_dir() {
            continue;
        }
        files.push(ScannedFile {
            file_name,
            modified: metadata.modified().unwrap_or(SystemTime::UNIX_EPOCH),
        });
    }

    files.sort_by(|a, b| {
        b.modified
            .cmp(&a.modified)
            .then_with(|| a.file_name.cmp(&b.file_name))
    });
    Ok(files)
}

/// File name of the period's override template, if it ships one.
///
/// With several `template.*` files the lexicographically first wins. An
/// unreadable folder simply has no template.
pub fn find_template(period_dir: &Path) -> Option<String> {
    fs::read_dir(period_dir)
        .ok()?
        .filter_map(Result::ok)
        .filter(|e| e.path().is_file())
        .filter_map(|e| e.file_name().into_string().ok())
        .filter(|name| name.starts_with(TEMPLATE_PREFIX))
        .min()
}

/// Find the period folders directly under `base_dir`.
///
/// Directories without the `<prefix>_` head are not periods and are ignored
/// silently. Directories with the head but no integer id, or whose id is
/// already taken by a lexicographically earlier folder (`CW_07` vs `CW_7`),
/// are skipped with a warning.
pub fn discover_periods(base_dir: &Path, prefix: &str) -> Result<Discovery, ScanError> {
    let mut names: Vec<(String, PathBuf)> = Vec::new();
    for dir_entry in list_dir(base_dir)? {
        let Ok(dir_entry) = dir_entry else { continue };
        let path = dir_entry.path();
        if !path.is_dir() {
            continue;
        }
        if let Ok(name) = dir_entry.file_name().into_string()
            && has_period_prefix(&name, prefix)
        {
            names.push((name, path));
        }
    }
    names.sort();

    let mut discovery = Discovery::default();
    let mut claimed: BTreeMap<u32, String> = BTreeMap::new();
    for (name, path) in names {
        let Some(id) = parse_period_name(&name, prefix) else {
            tracing::warn!(folder = %name, "skipping period folder without a numeric id");
            discovery.skipped.push(SkippedFolder {
                name,
                reason: "no numeric period id".to_string(),
            });
            continue;
        };
        if let Some(owner) = claimed.get(&id) {
            tracing::warn!(folder = %name, id, owner = %owner, "skipping duplicate period id");
            discovery.skipped.push(SkippedFolder {
                reason: format!("period {id} already provided by {owner}"),
                name,
            });
            continue;
        }
        claimed.insert(id, name.clone());
        discovery.periods.push(PeriodFolder { id, name, path });
    }
    Ok(discovery)
}
