//! Concluded job outcomes.
//!
//! The orchestrator never surfaces errors to its caller: every run ends in
//! exactly one [`JobOutcome`], which the batch driver aggregates.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

/// Why a single attempt did not produce a complete download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttemptFailure {
    /// The client ran past the attempt timeout and was killed.
    TimedOut(Duration),
    /// The client exited unsuccessfully (`None` when killed by a signal).
    NonZeroExit(Option<i32>),
    /// The client exited zero but left partial-transfer markers behind.
    Incomplete { count: usize },
    /// The client could not be started at all.
    Launch(String),
}

impl fmt::Display for AttemptFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TimedOut(limit) => write!(f, "timed out after {}s", limit.as_secs()),
            Self::NonZeroExit(Some(code)) => write!(f, "client exited with code {code}"),
            Self::NonZeroExit(None) => f.write_str("client terminated by signal"),
            Self::Incomplete { count } => write!(f, "{count} incomplete file(s) left behind"),
            Self::Launch(reason) => write!(f, "failed to launch client: {reason}"),
        }
    }
}

/// The concluded result of one download job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobOutcome {
    /// Staged content was moved into `final_dir`.
    Completed {
        final_dir: PathBuf,
        files: usize,
        bytes: u64,
        attempts: u32,
    },
    /// Another job holds the lock marker for this model.
    SkippedLocked { lock_path: PathBuf },
    /// Not enough free space at the staging location.
    InsufficientSpace { available: u64, required: u64 },
    /// Every attempt in the budget failed.
    Exhausted {
        attempts: u32,
        last_failure: AttemptFailure,
        hub_url: String,
    },
    /// Setup or relocation failed; not retried.
    Failed { reason: String },
    /// The operator interrupted the run.
    Interrupted { attempts: u32 },
}

impl JobOutcome {
    /// Whether the model ended up in its final directory.
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Completed { .. })
    }

    /// Whether the job was interrupted by the operator.
    pub const fn is_interrupted(&self) -> bool {
        matches!(self, Self::Interrupted { .. })
    }

    /// Short label for summaries.
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Completed { .. } => "completed",
            Self::SkippedLocked { .. } => "skipped (locked)",
            Self::InsufficientSpace { .. } => "insufficient disk space",
            Self::Exhausted { .. } => "failed (retries exhausted)",
            Self::Failed { .. } => "failed",
            Self::Interrupted { .. } => "interrupted",
        }
    }
}
