//! Ballot parsing and vote tallying.
//!
//! A closed period may carry a ballot file (`votes.txt` by default) with one
//! ballot per line:
//!
//! ```text
//! alice:img1.jpg:img2.jpg
//! bob:img1.jpg
//! ```
//!
//! The first field names the voter and is never interpreted: the same voter
//! may appear on several lines, and a ballot may name the same choice more
//! than once. Every choice occurrence counts as one vote.
//!
//! ## Field syntax
//!
//! Lines are delimiter-separated values. A field may be wrapped in double
//! quotes to contain the delimiter or a line break; `""` inside a quoted field
//! is a literal quote. Blank lines are skipped, `\r\n` endings are accepted.
//! A quote inside an unquoted field, an unterminated quoted field, or text
//! right after a closing quote makes the whole file unparseable.
//!
//! ## Ranking
//!
//! Choices are ordered by vote count descending, then by identifier ascending
//! so that ties come out the same on every run. Ranks are competition ranks:
//! tied choices share a rank and the next count skips ahead (`1, 1, 3`).

use crate::types::RankedResult;
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::Path;
use thiserror::Error;

/// Field separator used when the configuration does not name a usable one.
pub const DEFAULT_DELIMITER: char = ':';

#[derive(Error, Debug)]
pub enum BallotError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("Ballot parse error on line {line}: {reason}")]
    Parse { line: usize, reason: String },
    #[error("Unusable ballot delimiter {0:?}")]
    InvalidDelimiter(char),
}

/// One line of a ballot file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ballot {
    pub voter: String,
    pub choices: Vec<String>,
}

/// Parse ballot content and rank the choices.
pub fn parse_ballots(content: &str, delimiter: char) -> Result<Vec<RankedResult>, BallotError> {
    let ballots = parse_ballot_lines(content, delimiter)?;
    Ok(tally(&ballots))
}

/// Read `<period_dir>/<file_name>` and rank its ballots.
///
/// A missing file is an empty ranking, not an error.
pub fn read_ballots(
    period_dir: &Path,
    file_name: &str,
    delimiter: char,
) -> Result<Vec<RankedResult>, BallotError> {
    let bytes = match fs::read(period_dir.join(file_name)) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(e.into()),
    };
    let content = String::from_utf8(bytes).map_err(|e| {
        let valid = &e.as_bytes()[..e.utf8_error().valid_up_to()];
        BallotError::Parse {
            line: valid.iter().filter(|&&b| b == b'\n').count() + 1,
            reason: "invalid UTF-8".to_string(),
        }
    })?;
    parse_ballots(&content, delimiter)
}

/// Split ballot content into voter + choices records.
///
/// Empty choice fields (e.g. from a trailing delimiter) are dropped: they
/// cannot name an entry.
pub fn parse_ballot_lines(content: &str, delimiter: char) -> Result<Vec<Ballot>, BallotError> {
    Ok(parse_records(content, delimiter)?
        .into_iter()
        .map(|mut fields| {
            let voter = fields.remove(0);
            fields.retain(|choice| !choice.is_empty());
            Ballot {
                voter,
                choices: fields,
            }
        })
        .collect())
}

/// Count votes per choice and rank them.
pub fn tally(ballots: &[Ballot]) -> Vec<RankedResult> {
    let mut counts: HashMap<&str, u32> = HashMap::new();
    for ballot in ballots {
        for choice in &ballot.choices {
            *counts.entry(choice.as_str()).or_insert(0) += 1;
        }
    }

    let mut sorted: Vec<(&str, u32)> = counts.into_iter().collect();
    sorted.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));

    let mut results = Vec::with_capacity(sorted.len());
    let mut rank = 0;
    let mut previous = None;
    for (position, (file_name, votes)) in sorted.into_iter().enumerate() {
        if previous != Some(votes) {
            rank = position as u32 + 1;
            previous = Some(votes);
        }
        results.push(RankedResult {
            file_name: file_name.to_string(),
            votes,
            rank,
            link: String::new(),
        });
    }
    results
}

fn parse_error(line: usize, reason: &str) -> BallotError {
    BallotError::Parse {
        line,
        reason: reason.to_string(),
    }
}

/// Delimiter-separated records; every returned record has at least one field.
fn parse_records(content: &str, delimiter: char) -> Result<Vec<Vec<String>>, BallotError> {
    if matches!(delimiter, '"' | '\n' | '\r') {
        return Err(BallotError::InvalidDelimiter(delimiter));
    }

    let normalized = content.replace("\r\n", "\n");
    // A file cut off after the `\r` of its final CRLF.
    let normalized = normalized.strip_suffix('\r').unwrap_or(&normalized);
    let mut chars = normalized.chars().peekable();
    let mut records = Vec::new();
    let mut line = 1;

    while let Some(&next) = chars.peek() {
        if next == '\n' {
            chars.next();
            line += 1;
            continue;
        }

        let mut record = Vec::new();
        loop {
            let mut field = String::new();
            if chars.peek() == Some(&'"') {
                chars.next();
                let opened_on = line;
                loop {
                    match chars.next() {
                        None => return Err(parse_error(opened_on, "unterminated quoted field")),
                        Some('"') => match chars.peek() {
                            Some('"') => {
                                chars.next();
                                field.push('"');
                            }
                            Some(&c) if c == delimiter || c == '\n' => break,
                            None => break,
                            Some(_) => {
                                return Err(parse_error(line, "text after closing quote"));
                            }
                        },
                        Some('\n') => {
                            line += 1;
                            field.push('\n');
                        }
                        Some(c) => field.push(c),
                    }
                }
            } else {
                while let Some(&c) = chars.peek() {
                    if c == delimiter || c == '\n' {
                        break;
                    }
                    if c == '"' {
                        return Err(parse_error(line, "bare quote in unquoted field"));
                    }
                    field.push(c);
                    chars.next();
                }
            }
            record.push(field);

            match chars.next() {
                Some(c) if c == delimiter => {}
                Some(_) => {
                    line += 1;
                    break;
                }
                None => break,
            }
        }
        records.push(record);
    }

    Ok(records)
}
