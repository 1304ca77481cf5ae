//! System probe ports for disk space and optional accelerator detection.
//!
//! These ports abstract active system probing (process execution, mount
//! table queries) from the orchestrator. Implementations live in
//! `hfpull-download::probe`.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur while querying free space.
#[derive(Debug, Error)]
pub enum DiskProbeError {
    /// The path could not be resolved on disk.
    #[error("Cannot resolve {path}: {reason}")]
    Resolve { path: PathBuf, reason: String },

    /// No mounted filesystem contains the path.
    #[error("No mounted disk contains {0}")]
    NoMatchingDisk(PathBuf),
}

/// Port for querying available bytes on the filesystem holding a path.
pub trait DiskSpaceProbe: Send + Sync {
    /// Bytes available to the current user at `path`.
    fn available_bytes(&self, path: &Path) -> Result<u64, DiskProbeError>;
}

/// Port answering whether the optional transfer accelerator is installed.
#[async_trait]
pub trait AcceleratorProbe: Send + Sync {
    /// `true` when the accelerator package can be imported by the client.
    async fn is_available(&self) -> bool;
}
