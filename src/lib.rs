//! # Contest Gal
//!
//! Aggregates periodic (weekly) photo contests straight from the filesystem.
//! Each period is a folder of submitted images; two lock marker files move it
//! from submissions to voting to results, and a plain ballot file holds the
//! votes.
//!
//! # Architecture
//!
//! ```text
//! base/CW_<id>/*  ──►  scan  ──►  thumbnail (cached)  ──►  Period
//!                       │           phase (lock files)       │
//!                       │           ballot (closed only)     │
//!                       └──────────── aggregate ─────────────┘
//! ```
//!
//! Listings are recomputed on every call; only per-image thumbnails survive
//! between calls, in a [`thumbnail::ThumbnailCache`] shared by all callers.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`aggregate`] | Entry points: all periods, one period, one creator |
//! | [`scan`] | Period folder discovery and entry listing |
//! | [`thumbnail`] | Compute-once cache of display size + inline preview |
//! | [`imaging`] | Pure-Rust decode/resize/encode behind the `ImageBackend` trait |
//! | [`phase`] | Lock files → Submitting / VotingOpen / Closed |
//! | [`ballot`] | Ballot file parsing and ranked tally |
//! | [`slots`] | How many ranked vote slots a period offers |
//! | [`naming`] | Period folder names, links, creator keys |
//! | [`config`] | `config.toml` loading, merging and validation |
//! | [`types`] | Serializable listing types (`Period`, `Entry`, ...) |
//! | [`output`] | Text rendering of listings for the CLI |
//!
//! # Design Decisions
//!
//! ## Filesystem As Database
//!
//! There is no state besides the directory tree. Closing submissions is
//! `touch CW_12/upload.lock`; closing the vote is `touch CW_12/vote.lock`. A
//! vote lock without an upload lock is ignored, so a period can never show
//! results before it has been voted on.
//!
//! ## Thumbnails Never Invalidate
//!
//! A submitted image is not expected to change. The cache keys by absolute
//! path and keeps every result for its whole lifetime, including placeholders
//! for images that failed to decode. Concurrent first requests for one image
//! decode it once.
//!
//! ## Degrade, Don't Abort
//!
//! A corrupt image becomes a square placeholder; an unparseable ballot file
//! leaves its period without results. Both carry the reason in the listing.
//! Only a directory that cannot be listed fails a call.

pub mod aggregate;
pub mod ballot;
pub mod config;
pub mod imaging;
pub mod naming;
pub mod output;
pub mod phase;
pub mod scan;
pub mod slots;
pub mod thumbnail;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
