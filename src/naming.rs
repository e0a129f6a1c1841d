//! Centralized name handling for period folders, links and creators.
//!
//! Period folders follow the `<PREFIX>_<id>` convention (`CW_12`). Entry file
//! names double as creator tags: everything before the first dot, stripped of
//! surrounding digits and underscores, identifies who submitted the image.
//!
//! - `CW_12` → period 12
//! - `alice_03.png` → creator `alice`
//! - `_Bob99.v2.jpg` → creator `bob`

/// Parse a period folder name like `CW_12` into its identifier.
///
/// Returns `None` when the name does not start with `<prefix>_` or the rest is
/// not a non-negative integer. Leading zeros are accepted (`CW_07` → 7).
pub fn parse_period_name(name: &str, prefix: &str) -> Option<u32> {
    let id = name.strip_prefix(prefix)?.strip_prefix('_')?;
    if id.is_empty() || !id.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    id.parse().ok()
}

/// Whether a folder name claims to be a period folder (has the `<prefix>_` head).
pub fn has_period_prefix(name: &str, prefix: &str) -> bool {
    name.strip_prefix(prefix)
        .is_some_and(|rest| rest.starts_with('_'))
}

/// Folder name for a period id.
pub fn period_folder_name(prefix: &str, id: u32) -> String {
    format!("{prefix}_{id}")
}

/// Display link for a file inside a period folder: `<link_prefix>/<folder>/<file>`.
///
/// Links always use `/`, independent of the host path separator.
pub fn period_link(link_prefix: &str, folder: &str, file_name: &str) -> String {
    if link_prefix.is_empty() {
        format!("{folder}/{file_name}")
    } else {
        format!("{link_prefix}/{folder}/{file_name}")
    }
}

/// Derive the creator key from an entry file name.
///
/// Takes the part before the first `.`, trims leading and trailing ASCII
/// digits and underscores, and lowercases what is left.
pub fn creator_key(file_name: &str) -> String {
    let stem = file_name.split('.').next().unwrap_or_default();
    stem.trim_matches(|c: char| c == '_' || c.is_ascii_digit())
        .to_lowercase()
}
