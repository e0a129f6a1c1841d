//! Period workflow phase, derived from lock marker files.
//!
//! Two zero-content marker files in a period folder drive the workflow:
//!
//! | `upload.lock` | `vote.lock` | Phase |
//! |---|---|---|
//! | absent | absent | Submitting |
//! | present | absent | VotingOpen |
//! | present | present | Closed |
//! | absent | present | Submitting (vote lock without upload lock is ignored) |
//!
//! Only the existence of a marker matters, never its contents.

use serde::Serialize;
use std::fmt;
use std::path::Path;

/// Marker name that ends the submission window.
pub const UPLOAD_LOCK: &str = "upload";
/// Marker name that ends voting.
pub const VOTE_LOCK: &str = "vote";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Submitting,
    VotingOpen,
    Closed,
}

/// The two lock markers of a period folder.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LockFlags {
    pub upload: bool,
    pub vote: bool,
}

impl LockFlags {
    pub fn read(period_dir: &Path) -> Self {
        Self {
            upload: check_lock(UPLOAD_LOCK, period_dir),
            vote: check_lock(VOTE_LOCK, period_dir),
        }
    }
}

impl Phase {
    pub fn from_locks(flags: LockFlags) -> Self {
        match (flags.upload, flags.vote) {
            (true, true) => Phase::Closed,
            (true, false) => Phase::VotingOpen,
            (false, _) => Phase::Submitting,
        }
    }

    /// Whether ballots may be cast.
    pub fn can_vote(self) -> bool {
        self == Phase::VotingOpen
    }

    /// Whether ranked results are published.
    pub fn shows_results(self) -> bool {
        self == Phase::Closed
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Phase::Submitting => "submitting",
            Phase::VotingOpen => "voting open",
            Phase::Closed => "closed",
        })
    }
}

/// True iff `<name>.lock` exists in `period_dir`.
pub fn check_lock(name: &str, period_dir: &Path) -> bool {
    period_dir.join(format!("{name}.lock")).exists()
}

/// Read both markers and derive the phase.
pub fn resolve_phase(period_dir: &Path) -> Phase {
    Phase::from_locks(LockFlags::read(period_dir))
}

/// Free-function form of [`Phase::can_vote`].
pub fn can_vote(phase: Phase) -> bool {
    phase.can_vote()
}
