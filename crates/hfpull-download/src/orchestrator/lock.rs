//! Per-model lock marker.
//!
//! A zero-byte `.download.lock` inside the final directory marks a job in
//! progress. The marker is advisory: it is created with an exclusive open so
//! two jobs cannot both acquire it, but a crash leaves a stale marker that
//! must be deleted by hand.

use std::fs::OpenOptions;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

/// File name of the lock marker inside the final directory.
pub const LOCK_FILE_NAME: &str = ".download.lock";

/// Result of trying to take the lock.
#[derive(Debug)]
pub enum LockAttempt {
    /// This job now owns the marker.
    Acquired(LockMarker),
    /// The marker already exists.
    Held(PathBuf),
}

/// An owned lock marker, removed on drop.
#[derive(Debug)]
pub struct LockMarker {
    path: PathBuf,
}

impl LockMarker {
    /// Create the marker in `final_dir` unless it already exists.
    pub fn acquire(final_dir: &Path) -> io::Result<LockAttempt> {
        let path = final_dir.join(LOCK_FILE_NAME);
        match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(_) => {
                debug!(path = %path.display(), "Acquired download lock");
                Ok(LockAttempt::Acquired(Self { path }))
            }
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => Ok(LockAttempt::Held(path)),
            Err(e) => Err(e),
        }
    }
}

impl Drop for LockMarker {
    fn drop(&mut self) {
        match std::fs::remove_file(&self.path) {
            Ok(()) => debug!(path = %self.path.display(), "Released download lock"),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => {
                warn!(
                    path = %self.path.display(),
                    error = %e,
                    "Failed to remove lock file; delete it manually"
                );
            }
        }
    }
}
