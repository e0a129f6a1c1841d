//! How many ranked vote slots to surface for a period.
//!
//! Larger periods get more slots, but sub-linearly:
//! `slot_count(n) = floor(sqrt(n) * 1.15)`.
//!
//! | entries | slots |
//! |---|---|
//! | 0 | 0 |
//! | 1 | 1 |
//! | 4 | 2 |
//! | 10 | 3 |
//! | 25 | 5 |

use std::ops::Range;

/// Default growth factor applied to `sqrt(n)`.
pub const SLOT_FACTOR: f64 = 1.15;

/// Number of ranked slots for a period with `entries` images.
pub fn slot_count(entries: usize) -> usize {
    slot_count_with_factor(entries, SLOT_FACTOR)
}

/// [`slot_count`] with an explicit factor (`ballots.slot_factor` in config).
pub fn slot_count_with_factor(entries: usize, factor: f64) -> usize {
    ((entries as f64).sqrt() * factor).floor() as usize
}

/// Rank positions `0..slot_count(entries)`.
///
/// A `Range` can be cloned and iterated again, so templates may walk it
/// more than once.
pub fn slot_positions(entries: usize) -> Range<usize> {
    0..slot_count(entries)
}
