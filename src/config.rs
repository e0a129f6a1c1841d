//! Contest configuration.
//!
//! Handles loading, validating, and merging the optional `config.toml` found
//! in the base directory. Stock defaults are the base layer; the file only
//! needs the keys it wants to override.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [periods]
//! prefix = "CW"           # Period folders are named <prefix>_<id>
//! link_prefix = "mm"      # First segment of every display link
//!
//! [thumbnails]
//! box_width = 330         # Display width; height follows the aspect ratio
//! preview_width = 20      # Width of the embedded low-resolution preview
//! preview_quality = 75    # JPEG quality of the preview (1-100)
//!
//! [ballots]
//! file = "votes.txt"      # Ballot file inside each period folder
//! delimiter = ":"         # Field separator of a ballot line
//! slot_factor = 1.15      # slots = floor(sqrt(entries) * slot_factor)
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Contest configuration loaded from `config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ContestConfig {
    /// Period folder naming and display links.
    pub periods: PeriodsConfig,
    /// Display size and preview generation.
    pub thumbnails: ThumbnailsConfig,
    /// Ballot file location and parsing.
    pub ballots: BallotsConfig,
}

impl ContestConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.periods.prefix.is_empty() {
            return Err(ConfigError::Validation(
                "periods.prefix must not be empty".into(),
            ));
        }
        if self.thumbnails.box_width == 0 {
            return Err(ConfigError::Validation(
                "thumbnails.box_width must be non-zero".into(),
            ));
        }
        if self.thumbnails.preview_width == 0 {
            return Err(ConfigError::Validation(
                "thumbnails.preview_width must be non-zero".into(),
            ));
        }
        if !(1..=100).contains(&self.thumbnails.preview_quality) {
            return Err(ConfigError::Validation(
                "thumbnails.preview_quality must be 1-100".into(),
            ));
        }
        if self.ballots.delimiter_char().is_none() {
            return Err(ConfigError::Validation(
                "ballots.delimiter must be a single character other than '\"' or a newline".into(),
            ));
        }
        if !(self.ballots.slot_factor.is_finite() && self.ballots.slot_factor > 0.0) {
            return Err(ConfigError::Validation(
                "ballots.slot_factor must be a positive number".into(),
            ));
        }
        Ok(())
    }
}

/// Period folder naming.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PeriodsConfig {
    /// Folder prefix; a period folder is named `<prefix>_<id>`.
    pub prefix: String,
    /// Leading segment of entry and result links (where a file server mounts the base directory).
    pub link_prefix: String,
}

impl Default for PeriodsConfig {
    fn default() -> Self {
        Self {
            prefix: "CW".to_string(),
            link_prefix: "mm".to_string(),
        }
    }
}

/// Thumbnail display and preview settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ThumbnailsConfig {
    pub box_width: u32,
    pub preview_width: u32,
    pub preview_quality: u8,
}

impl Default for ThumbnailsConfig {
    fn default() -> Self {
        Self {
            box_width: 330,
            preview_width: 20,
            preview_quality: 75,
        }
    }
}

/// Ballot file settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BallotsConfig {
    pub file: String,
    pub delimiter: String,
    pub slot_factor: f64,
}

impl BallotsConfig {
    /// The delimiter as a single char, or `None` if it is unusable.
    pub fn delimiter_char(&self) -> Option<char> {
        let mut chars = self.delimiter.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) if c != '"' && c != '\n' && c != '\r' => Some(c),
            _ => None,
        }
    }
}

impl Default for BallotsConfig {
    fn default() -> Self {
        Self {
            file: "votes.txt".to_string(),
            delimiter: ":".to_string(),
            slot_factor: crate::slots::SLOT_FACTOR,
        }
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    toml::Value::try_from(ContestConfig::default())
        .map_err(|e| ConfigError::Validation(format!("default config must serialize: {e}")))
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load `config.toml` from a directory as a raw TOML value.
///
/// Returns `Ok(None)` if no `config.toml` exists in the directory.
pub fn load_raw_config(dir: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = dir.join("config.toml");
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Load config from `config.toml` in the given base directory.
///
/// Merges user values on top of stock defaults, rejects unknown keys,
/// and validates the result.
pub fn load_config(base_dir: &Path) -> Result<ContestConfig, ConfigError> {
    let merged = match load_raw_config(base_dir)? {
        Some(overlay) => merge_toml(stock_defaults_value()?, overlay),
        None => stock_defaults_value()?,
    };
    let config: ContestConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Returns a fully-commented stock `config.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Contest Gallery Configuration
# =============================
# Place this file in the base directory next to the period folders.
# All settings are optional. Values shown below are the defaults.
# Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Periods
# ---------------------------------------------------------------------------
[periods]
# Period folders are named <prefix>_<id>, e.g. CW_12.
prefix = "CW"

# Leading segment of entry and result links.
link_prefix = "mm"

# ---------------------------------------------------------------------------
# Thumbnails
# ---------------------------------------------------------------------------
[thumbnails]
# Display width in pixels; the height keeps the source aspect ratio.
box_width = 330

# Width of the blurred placeholder preview embedded in listings.
preview_width = 20

# JPEG quality of the preview (1 = worst, 100 = best).
preview_quality = 75

# ---------------------------------------------------------------------------
# Ballots
# ---------------------------------------------------------------------------
[ballots]
# Ballot file inside each period folder.
file = "votes.txt"

# Field separator: voter<delimiter>choice<delimiter>choice...
delimiter = ":"

# Number of ranked slots shown = floor(sqrt(entries) * slot_factor).
slot_factor = 1.15
"##
}
