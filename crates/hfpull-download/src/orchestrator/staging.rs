//! Staging area for one download job.
//!
//! The client writes into a private directory under `output_dir/__tmp`.
//! Only once an attempt is judged complete is the staged content moved
//! into the model's final directory. The staging directory is deleted when
//! the [`StagingArea`] is dropped, on every exit path.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::Utc;
use hfpull_core::ModelId;
use tempfile::TempDir;
use thiserror::Error;
use tracing::{debug, warn};

/// Suffix the download client gives to partially transferred files.
pub const INCOMPLETE_SUFFIX: &str = ".incomplete";

/// Random characters appended to staging names.
const STAGING_RAND_LEN: usize = 6;

/// Prefix of the directory holding replaced entries during relocation.
const BACKUP_PREFIX: &str = ".replaced-";

/// Errors raised while preparing or publishing staged content.
#[derive(Debug, Error)]
pub enum StagingError {
    #[error("Failed to create directory {path}: {reason}")]
    CreateDir { path: PathBuf, reason: String },

    #[error("Failed to scan staging directory {path}: {reason}")]
    Scan { path: PathBuf, reason: String },

    #[error("Failed to move {from} into {to}: {reason}")]
    Relocate {
        from: PathBuf,
        to: PathBuf,
        reason: String,
    },
}

/// Totals of the content about to be published.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ContentStats {
    pub files: usize,
    pub bytes: u64,
}

/// A job-owned staging directory.
#[derive(Debug)]
pub struct StagingArea {
    dir: Option<TempDir>,
    path: PathBuf,
}

impl StagingArea {
    /// Create `output_dir/<temp_root>/<sanitized>_<unix_ts>_<rand>`.
    pub fn create(
        output_dir: &Path,
        temp_root: &str,
        model_id: &ModelId,
    ) -> Result<Self, StagingError> {
        let root = output_dir.join(temp_root);
        fs::create_dir_all(&root).map_err(|e| StagingError::CreateDir {
            path: root.clone(),
            reason: e.to_string(),
        })?;

        let prefix = format!("{}_{}_", model_id.sanitized(), Utc::now().timestamp());
        let dir = tempfile::Builder::new()
            .prefix(&prefix)
            .rand_bytes(STAGING_RAND_LEN)
            .tempdir_in(&root)
            .map_err(|e| StagingError::CreateDir {
                path: root.join(&prefix),
                reason: e.to_string(),
            })?;

        let path = dir.path().to_path_buf();
        debug!(path = %path.display(), "Created staging directory");
        Ok(Self {
            dir: Some(dir),
            path,
        })
    }

    /// Path the client downloads into.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All partial-transfer markers anywhere under the staging directory.
    pub fn find_incomplete(&self) -> Result<Vec<PathBuf>, StagingError> {
        let mut found = Vec::new();
        walk_files(&self.path, &mut |path, _| {
            if path
                .file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.ends_with(INCOMPLETE_SUFFIX))
            {
                found.push(path.to_path_buf());
            }
        })
        .map_err(|e| self.scan_error(&e))?;
        found.sort();
        Ok(found)
    }

    /// Delete partial-transfer markers, logging (not failing on) each error.
    ///
    /// Returns how many were actually removed.
    pub fn purge(&self, files: &[PathBuf]) -> usize {
        let mut removed = 0;
        for file in files {
            match fs::remove_file(file) {
                Ok(()) => removed += 1,
                Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                Err(e) => {
                    warn!(path = %file.display(), error = %e, "Failed to delete incomplete file");
                }
            }
        }
        removed
    }

    /// Count files and bytes currently staged.
    pub fn content_stats(&self) -> Result<ContentStats, StagingError> {
        let mut stats = ContentStats::default();
        walk_files(&self.path, &mut |_, meta| {
            stats.files += 1;
            stats.bytes += meta.len();
        })
        .map_err(|e| self.scan_error(&e))?;
        Ok(stats)
    }

    /// Move every top-level staged entry into `final_dir`.
    ///
    /// Existing files are replaced; existing directories are merged. The
    /// move is all-or-nothing: on the first failure every entry already
    /// moved goes back into staging and every replaced entry is restored.
    pub fn relocate_into(&self, final_dir: &Path) -> Result<(), StagingError> {
        self.relocate_using(final_dir, |from, to| fs::rename(from, to))
    }

    fn relocate_using(&self, final_dir: &Path, rename: Rename) -> Result<(), StagingError> {
        let entries = fs::read_dir(&self.path)
            .and_then(|entries| entries.collect::<io::Result<Vec<_>>>())
            .map_err(|e| self.scan_error(&e))?;

        // Replaced entries are parked here until the move is complete.
        let backups = tempfile::Builder::new()
            .prefix(BACKUP_PREFIX)
            .tempdir_in(&self.path)
            .map_err(|e| StagingError::CreateDir {
                path: self.path.join(BACKUP_PREFIX),
                reason: e.to_string(),
            })?;

        let mut relocation = Relocation::new(backups.path(), rename);
        for entry in entries {
            let from = entry.path();
            let to = final_dir.join(entry.file_name());
            if let Err(e) = relocation.move_entry(&from, &to) {
                relocation.roll_back();
                return Err(StagingError::Relocate {
                    from,
                    to,
                    reason: e.to_string(),
                });
            }
            debug!(from = %from.display(), to = %to.display(), "Moved staged entry");
        }
        Ok(())
    }

    fn scan_error(&self, err: &io::Error) -> StagingError {
        StagingError::Scan {
            path: self.path.clone(),
            reason: err.to_string(),
        }
    }
}

impl Drop for StagingArea {
    fn drop(&mut self) {
        let Some(dir) = self.dir.take() else {
            return;
        };
        match dir.close() {
            Ok(()) => debug!(path = %self.path.display(), "Removed staging directory"),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => {
                warn!(
                    path = %self.path.display(),
                    error = %e,
                    "Failed to remove staging directory"
                );
            }
        }
    }
}

/// Visit every regular file below `dir` without following symlinks.
fn walk_files(dir: &Path, visit: &mut dyn FnMut(&Path, &fs::Metadata)) -> io::Result<()> {
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        let meta = fs::symlink_metadata(&path)?;
        if meta.is_dir() {
            walk_files(&path, visit)?;
        } else {
            visit(&path, &meta);
        }
    }
    Ok(())
}

type Rename = fn(&Path, &Path) -> io::Result<()>;

/// One filesystem change made while relocating, in the order applied.
#[derive(Debug)]
enum Applied {
    /// A staged entry was renamed into place.
    Placed { from: PathBuf, to: PathBuf },
    /// An existing final entry was parked in the backup directory.
    Replaced { original: PathBuf, backup: PathBuf },
    /// A staged directory was merged and then removed.
    Emptied(PathBuf),
}

/// Journaled move of staged content into the final directory.
struct Relocation<'a> {
    backup_dir: &'a Path,
    rename: Rename,
    journal: Vec<Applied>,
}

impl<'a> Relocation<'a> {
    fn new(backup_dir: &'a Path, rename: Rename) -> Self {
        Self {
            backup_dir,
            rename,
            journal: Vec::new(),
        }
    }

    fn move_entry(&mut self, from: &Path, to: &Path) -> io::Result<()> {
        let from_is_dir = fs::symlink_metadata(from)?.is_dir();

        match fs::symlink_metadata(to) {
            Ok(existing) if existing.is_dir() && from_is_dir => {
                let children = fs::read_dir(from)?.collect::<io::Result<Vec<_>>>()?;
                for child in children {
                    self.move_entry(&child.path(), &to.join(child.file_name()))?;
                }
                fs::remove_dir(from)?;
                self.journal.push(Applied::Emptied(from.to_path_buf()));
                Ok(())
            }
            Ok(_) => {
                let backup = self.backup_dir.join(self.journal.len().to_string());
                (self.rename)(to, &backup)?;
                self.journal.push(Applied::Replaced {
                    original: to.to_path_buf(),
                    backup,
                });
                self.place(from, to)
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => self.place(from, to),
            Err(e) => Err(e),
        }
    }

    fn place(&mut self, from: &Path, to: &Path) -> io::Result<()> {
        (self.rename)(from, to)?;
        self.journal.push(Applied::Placed {
            from: from.to_path_buf(),
            to: to.to_path_buf(),
        });
        Ok(())
    }

    /// Undo every applied change, newest first, logging what cannot be undone.
    fn roll_back(self) {
        let mut failed = 0_usize;
        for step in self.journal.into_iter().rev() {
            let (result, path) = match step {
                Applied::Placed { from, to } => (fs::rename(&to, &from), to),
                Applied::Replaced { original, backup } => {
                    (fs::rename(&backup, &original), original)
                }
                Applied::Emptied(dir) => (fs::create_dir(&dir), dir),
            };
            if let Err(e) = result {
                failed += 1;
                warn!(path = %path.display(), error = %e, "Failed to roll back relocation step");
            }
        }
        if failed == 0 {
            debug!("Rolled back partial relocation");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn model() -> ModelId {
        ModelId::parse("org/model").unwrap()
    }

    fn write(path: &Path, content: &str) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    #[test]
    fn create_names_directory_after_model() {
        let out = tempdir().unwrap();
        let staging = StagingArea::create(out.path(), "__tmp", &model()).unwrap();

        assert!(staging.path().starts_with(out.path().join("__tmp")));
        let name = staging.path().file_name().unwrap().to_string_lossy();
        assert!(name.starts_with("org-model_"), "unexpected name {name}");
        assert!(staging.path().is_dir());
    }

    #[test]
    fn two_jobs_get_distinct_directories() {
        let out = tempdir().unwrap();
        let first = StagingArea::create(out.path(), "__tmp", &model()).unwrap();
        let second = StagingArea::create(out.path(), "__tmp", &model()).unwrap();
        assert_ne!(first.path(), second.path());
    }

    #[test]
    fn drop_removes_directory_and_contents() {
        let out = tempdir().unwrap();
        let staging = StagingArea::create(out.path(), "__tmp", &model()).unwrap();
        let path = staging.path().to_path_buf();
        write(&path.join("nested/file.bin"), "x");

        drop(staging);
        assert!(!path.exists());
    }

    #[test]
    fn find_incomplete_searches_recursively() {
        let out = tempdir().unwrap();
        let staging = StagingArea::create(out.path(), "__tmp", &model()).unwrap();
        write(&staging.path().join("config.json"), "{}");
        write(
            &staging
                .path()
                .join(".cache/huggingface/download/model.safetensors.incomplete"),
            "",
        );
        write(&staging.path().join("a.incomplete"), "");

        let found = staging.find_incomplete().unwrap();
        assert_eq!(found.len(), 2);

        assert_eq!(staging.purge(&found), 2);
        assert!(staging.find_incomplete().unwrap().is_empty());
        assert!(staging.path().join("config.json").exists());
    }

    #[test]
    fn content_stats_counts_nested_files() {
        let out = tempdir().unwrap();
        let staging = StagingArea::create(out.path(), "__tmp", &model()).unwrap();
        write(&staging.path().join("a.txt"), "12345");
        write(&staging.path().join("sub/b.txt"), "123");

        let stats = staging.content_stats().unwrap();
        assert_eq!(stats, ContentStats { files: 2, bytes: 8 });
    }

    #[test]
    fn relocate_merges_and_replaces() {
        let out = tempdir().unwrap();
        let final_dir = out.path().join("org-model");
        write(&final_dir.join("config.json"), "old");
        write(&final_dir.join("sub/keep.txt"), "keep");

        let staging = StagingArea::create(out.path(), "__tmp", &model()).unwrap();
        write(&staging.path().join("config.json"), "new");
        write(&staging.path().join("sub/added.txt"), "added");

        staging.relocate_into(&final_dir).unwrap();

        assert_eq!(
            fs::read_to_string(final_dir.join("config.json")).unwrap(),
            "new"
        );
        assert_eq!(
            fs::read_to_string(final_dir.join("sub/keep.txt")).unwrap(),
            "keep"
        );
        assert_eq!(
            fs::read_to_string(final_dir.join("sub/added.txt")).unwrap(),
            "added"
        );
        assert_eq!(fs::read_dir(staging.path()).unwrap().count(), 0);
    }

    fn fail_on_blocked(from: &Path, to: &Path) -> io::Result<()> {
        if to.ends_with("zz/x.bin") {
            return Err(io::ErrorKind::PermissionDenied.into());
        }
        fs::rename(from, to)
    }

    #[test]
    fn failed_relocation_restores_both_sides() {
        let out = tempdir().unwrap();
        let final_dir = out.path().join("org-model");
        write(&final_dir.join("mm.txt"), "old");
        write(&final_dir.join("zz/keep.bin"), "keep");

        let staging = StagingArea::create(out.path(), "__tmp", &model()).unwrap();
        write(&staging.path().join("aa.txt"), "new a");
        write(&staging.path().join("mm.txt"), "new m");
        write(&staging.path().join("zz/x.bin"), "x");
        let staged_before = sorted_files(staging.path());

        let err = staging
            .relocate_using(&final_dir, fail_on_blocked)
            .unwrap_err();
        assert!(matches!(err, StagingError::Relocate { .. }));

        assert_eq!(
            sorted_files(&final_dir),
            [PathBuf::from("mm.txt"), PathBuf::from("zz/keep.bin")]
        );
        let kept = fs::read_to_string(final_dir.join("mm.txt")).unwrap();
        assert_eq!(kept, "old");
        assert_eq!(sorted_files(staging.path()), staged_before);
        assert_eq!(
            fs::read_to_string(staging.path().join("mm.txt")).unwrap(),
            "new m"
        );
    }

    fn sorted_files(root: &Path) -> Vec<PathBuf> {
        let mut files = Vec::new();
        walk_files(root, &mut |path, _| {
            files.push(path.strip_prefix(root).unwrap().to_path_buf());
        })
        .unwrap();
        files.sort();
        files
    }
}
