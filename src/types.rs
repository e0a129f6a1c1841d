//! Shared types returned by the aggregation entry points.
//!
//! These are plain data: every listing is recomputed per call and serialized
//! as-is by the CLI (or any other collaborator that renders them).

use crate::phase::Phase;
use serde::Serialize;
use std::time::SystemTime;

/// Display size of a thumbnail box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DisplaySize {
    pub width: u32,
    pub height: u32,
}

/// Display metadata for one image.
///
/// `preview` is a base64 (no padding) JPEG, empty for placeholders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ThumbnailMetadata {
    pub size: DisplaySize,
    pub preview: String,
}

impl ThumbnailMetadata {
    /// Square box with no preview, used when an image cannot be decoded.
    pub fn placeholder(box_width: u32) -> Self {
        Self {
            size: DisplaySize {
                width: box_width,
                height: box_width,
            },
            preview: String::new(),
        }
    }
}

/// One submitted image within a period.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Entry {
    pub file_name: String,
    /// Display link, e.g. `mm/CW_12/alice.png`.
    pub link: String,
    pub modified: SystemTime,
    pub thumbnail: ThumbnailMetadata,
    /// Why the thumbnail is a placeholder, if it is one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub decode_error: Option<String>,
}

/// A choice with its tallied votes.
///
/// `rank` is 1-based competition rank: equal counts share a rank and the
/// next distinct count skips ahead (1, 1, 3).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RankedResult {
    pub file_name: String,
    pub votes: u32,
    pub rank: u32,
    /// Display link; empty until attached to a period.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub link: String,
}

/// One aggregation unit with its own submission/voting/results lifecycle.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Period {
    pub id: u32,
    /// Most recently modified first.
    pub entries: Vec<Entry>,
    pub phase: Phase,
    pub can_vote: bool,
    /// Present only for closed periods whose ballots parsed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub results: Option<Vec<RankedResult>>,
    /// Link to an override template (`template.*`) shipped with the period.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template: Option<String>,
    /// Ballot failure of a closed period; `results` is absent when set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ballot_error: Option<String>,
}

impl Period {
    /// Rank positions a voting form should offer, for the configured
    /// `ballots.slot_factor`.
    pub fn vote_slots(&self, factor: f64) -> std::ops::Range<usize> {
        0..crate::slots::slot_count_with_factor(self.entries.len(), factor)
    }
}
