//! CLI output formatting for period listings.
//!
//! # Information-First Display
//!
//! Each period leads with its identity (prefix-free id, phase, entry count);
//! entries follow as positional lines with links and thumbnail status as
//! indented context. The same layout serves the all-periods, single-period
//! and creator views.
//!
//! # Output Format
//!
//! ```text
//! Period 12 (voting open, 2 entries)
//!     001 alice_01.png
//!         Link: mm/CW_12/alice_01.png
//!         Thumbnail: 330x248
//!     002 broken.png
//!         Link: mm/CW_12/broken.png
//!         Thumbnail: placeholder (Processing failed: ...)
//!     Vote slots: 1
//! Period 11 (closed, 3 entries)
//!     ...
//!     Results
//!         1. img1.jpg (2 votes)
//!         2. img2.jpg (1 vote)
//!
//! 2 periods, 5 entries
//! ```
//!
//! # Architecture
//!
//! `format_*` functions return `Vec<String>` for testability; `print_*`
//! wrappers write to stdout. Format functions are pure: no I/O, no side
//! effects.

use crate::types::{Entry, Period, RankedResult};

// ============================================================================
// Shared display helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn plural(n: usize, one: &str, many: &str) -> String {
    if n == 1 {
        format!("{n} {one}")
    } else {
        format!("{n} {many}")
    }
}

/// Period header: id, phase and entry count.
///
/// ```text
/// Period 12 (voting open, 5 entries)
/// ```
fn period_header(period: &Period) -> String {
    format!(
        "Period {} ({}, {})",
        period.id,
        period.phase,
        plural(period.entries.len(), "entry", "entries")
    )
}

fn entry_lines(index: usize, entry: &Entry) -> Vec<String> {
    let mut lines = vec![format!(
        "{}{} {}",
        indent(1),
        format_index(index),
        entry.file_name
    )];
    lines.push(format!("{}Link: {}", indent(2), entry.link));
    let thumbnail = match &entry.decode_error {
        Some(reason) => format!("placeholder ({reason})"),
        None => format!(
            "{}x{}",
            entry.thumbnail.size.width, entry.thumbnail.size.height
        ),
    };
    lines.push(format!("{}Thumbnail: {}", indent(2), thumbnail));
    lines
}

fn result_line(result: &RankedResult) -> String {
    format!(
        "{}{}. {} ({})",
        indent(2),
        result.rank,
        result.file_name,
        plural(result.votes as usize, "vote", "votes")
    )
}

// ============================================================================
// Listings
// ============================================================================

/// Format one period with its entries, voting state and results.
///
/// `slot_factor` sizes the vote slot count shown for periods open for voting.
pub fn format_period(period: &Period, slot_factor: f64) -> Vec<String> {
    let mut lines = vec![period_header(period)];

    for (i, entry) in period.entries.iter().enumerate() {
        lines.extend(entry_lines(i + 1, entry));
    }
    if let Some(template) = &period.template {
        lines.push(format!("{}Template: {}", indent(1), template));
    }
    if period.can_vote {
        lines.push(format!(
            "{}Vote slots: {}",
            indent(1),
            period.vote_slots(slot_factor).len()
        ));
    }
    if let Some(results) = &period.results {
        if results.is_empty() {
            lines.push(format!("{}Results: no votes", indent(1)));
        } else {
            lines.push(format!("{}Results", indent(1)));
            lines.extend(results.iter().map(result_line));
        }
    }
    if let Some(error) = &period.ballot_error {
        lines.push(format!("{}Ballots: {}", indent(1), error));
    }
    lines
}

/// Format a full listing followed by a summary line.
pub fn format_listing(periods: &[Period], slot_factor: f64) -> Vec<String> {
    let mut lines: Vec<String> = periods
        .iter()
        .flat_map(|p| format_period(p, slot_factor))
        .collect();

    let entries: usize = periods.iter().map(|p| p.entries.len()).sum();
    lines.push(String::new());
    lines.push(format!(
        "{}, {}",
        plural(periods.len(), "period", "periods"),
        plural(entries, "entry", "entries")
    ));
    lines
}

pub fn print_listing(periods: &[Period], slot_factor: f64) {
    for line in format_listing(periods, slot_factor) {
        println!("{}", line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::phase::Phase;
    use crate::types::{DisplaySize, ThumbnailMetadata};
    use std::time::SystemTime;

    fn entry(name: &str, height: u32) -> Entry {
        Entry {
            file_name: name.to_string(),
            link: format!("mm/CW_12/{name}"),
            modified: SystemTime::UNIX_EPOCH,
            thumbnail: ThumbnailMetadata {
                size: DisplaySize { width: 330, height },
                preview: "abc".into(),
            },
            decode_error: None,
        }
    }

    fn period(id: u32, phase: Phase, entries: Vec<Entry>) -> Period {
        Period {
            id,
            entries,
            phase,
            can_vote: phase.can_vote(),
            results: None,
            template: None,
            ballot_error: None,
        }
    }

    #[test]
    fn index_is_zero_padded() {
        assert_eq!(format_index(1), "001");
        assert_eq!(format_index(42), "042");
        assert_eq!(format_index(1234), "1234");
    }

    #[test]
    fn header_pluralizes_entries() {
        let one = period(3, Phase::Submitting, vec![entry("a.png", 330)]);
        assert_eq!(period_header(&one), "Period 3 (submitting, 1 entry)");
        let none = period(4, Phase::Closed, vec![]);
        assert_eq!(period_header(&none), "Period 4 (closed, 0 entries)");
    }

    #[test]
    fn voting_period_shows_entries_and_slots() {
        let p = period(
            12,
            Phase::VotingOpen,
            vec![entry("alice_01.png", 248), entry("bob.png", 330)],
        );

        let lines = format_period(&p, 1.15);
        assert_eq!(
            lines,
            vec![
                "Period 12 (voting open, 2 entries)",
                "    001 alice_01.png",
                "        Link: mm/CW_12/alice_01.png",
                "        Thumbnail: 330x248",
                "    002 bob.png",
                "        Link: mm/CW_12/bob.png",
                "        Thumbnail: 330x330",
                "    Vote slots: 1",
            ]
        );
    }

    #[test]
    fn vote_slots_use_configured_factor() {
        let entries = (0..4).map(|i| entry(&format!("e{i}.png"), 330)).collect();
        let p = period(2, Phase::VotingOpen, entries);

        assert!(format_period(&p, 1.15).contains(&"    Vote slots: 2".to_string()));
        assert!(format_period(&p, 2.0).contains(&"    Vote slots: 4".to_string()));
    }

    #[test]
    fn placeholder_shows_reason() {
        let mut broken = entry("broken.png", 330);
        broken.decode_error = Some("Processing failed: empty".into());
        let p = period(1, Phase::Submitting, vec![broken]);

        let lines = format_period(&p, 1.15);
        assert!(lines.contains(&"        Thumbnail: placeholder (Processing failed: empty)".to_string()));
    }

    #[test]
    fn closed_period_shows_results() {
        let mut p = period(11, Phase::Closed, vec![]);
        p.results = Some(vec![
            RankedResult {
                file_name: "img1.jpg".into(),
                votes: 2,
                rank: 1,
                link: "mm/CW_11/img1.jpg".into(),
            },
            RankedResult {
                file_name: "img2.jpg".into(),
                votes: 1,
                rank: 2,
                link: "mm/CW_11/img2.jpg".into(),
            },
        ]);

        let lines = format_period(&p, 1.15);
        assert_eq!(
            &lines[1..],
            &[
                "    Results",
                "        1. img1.jpg (2 votes)",
                "        2. img2.jpg (1 vote)",
            ]
        );
    }

    #[test]
    fn closed_period_without_votes() {
        let mut p = period(11, Phase::Closed, vec![]);
        p.results = Some(vec![]);
        assert_eq!(format_period(&p, 1.15)[1], "    Results: no votes");
    }

    #[test]
    fn ballot_error_and_template_lines() {
        let mut p = period(5, Phase::Closed, vec![]);
        p.template = Some("mm/CW_5/template.html".into());
        p.ballot_error = Some("Ballot parse error on line 2: unterminated quoted field".into());

        let lines = format_period(&p, 1.15);
        assert_eq!(lines[1], "    Template: mm/CW_5/template.html");
        assert_eq!(
            lines[2],
            "    Ballots: Ballot parse error on line 2: unterminated quoted field"
        );
    }

    #[test]
    fn listing_ends_with_summary() {
        let periods = vec![
            period(2, Phase::Submitting, vec![entry("a.png", 330), entry("b.png", 330)]),
            period(1, Phase::Closed, vec![entry("c.png", 330)]),
        ];

        let lines = format_listing(&periods, 1.15);
        assert_eq!(lines.last().unwrap(), "2 periods, 3 entries");
        assert_eq!(lines[lines.len() - 2], "");
        assert_eq!(lines[0], "Period 2 (submitting, 2 entries)");
    }

    #[test]
    fn empty_listing() {
        assert_eq!(format_listing(&[], 1.15), vec!["", "0 periods, 0 entries"]);
    }
}
