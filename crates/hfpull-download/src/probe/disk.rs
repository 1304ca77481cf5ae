//! Free-space probe backed by the mount table.

use std::path::Path;

use hfpull_core::{DiskProbeError, DiskSpaceProbe};
use sysinfo::Disks;

/// Answers free-space queries with `sysinfo`.
///
/// The disk whose mount point is the longest prefix of the canonicalized
/// path is the one that holds it.
#[derive(Debug, Default, Clone, Copy)]
pub struct SysinfoDiskProbe;

impl SysinfoDiskProbe {
    pub const fn new() -> Self {
        Self
    }
}

impl DiskSpaceProbe for SysinfoDiskProbe {
    fn available_bytes(&self, path: &Path) -> Result<u64, DiskProbeError> {
        let resolved = path
            .canonicalize()
            .map_err(|e| DiskProbeError::Resolve {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;

        let disks = Disks::new_with_refreshed_list();
        let mounts = disks
            .list()
            .iter()
            .map(|disk| (disk.mount_point(), disk.available_space()));
        select_mount(&resolved, mounts).ok_or(DiskProbeError::NoMatchingDisk(resolved))
    }
}

/// Available bytes of the deepest mount containing `path`.
fn select_mount<'a>(path: &Path, mounts: impl Iterator<Item = (&'a Path, u64)>) -> Option<u64> {
    mounts
        .filter(|(mount, _)| path.starts_with(mount))
        .max_by_key(|(mount, _)| mount.components().count())
        .map(|(_, available)| available)
}
