//! Download job description.
//!
//! A job is created per model at dispatch time and discarded once the
//! orchestrator has concluded it. It is intentionally free of any
//! dependency on clap, prompts, or the settings store.

use std::path::PathBuf;

use super::model_id::ModelId;

/// Retry budget used when the caller does not override it.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Request to download one model (or one file of it) into `output_dir`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadJob {
    /// Hub repository to download.
    pub model_id: ModelId,
    /// Root directory; the model lands in `output_dir/<sanitized id>`.
    pub output_dir: PathBuf,
    /// Proxy URL exported to the client as `HTTP(S)_PROXY`.
    pub proxy: Option<String>,
    /// Only download this file from the repository.
    pub file: Option<String>,
    /// Total number of client invocations allowed.
    pub max_attempts: u32,
}

impl DownloadJob {
    /// Create a job with no proxy, no file filter and the default budget.
    pub fn new(model_id: ModelId, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            model_id,
            output_dir: output_dir.into(),
            proxy: None,
            file: None,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }

    /// Set the proxy. Blank strings are treated as "no proxy".
    #[must_use]
    pub fn with_proxy(mut self, proxy: Option<String>) -> Self {
        self.proxy = proxy.filter(|p| !p.trim().is_empty());
        self
    }

    /// Restrict the download to a single file. Blank strings are ignored.
    #[must_use]
    pub fn with_file(mut self, file: Option<String>) -> Self {
        self.file = file.filter(|f| !f.trim().is_empty());
        self
    }

    /// Set the retry budget. A budget of zero still runs one attempt.
    #[must_use]
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    /// Directory that receives the model on success.
    pub fn final_dir(&self) -> PathBuf {
        self.model_id.final_dir(&self.output_dir)
    }
}
