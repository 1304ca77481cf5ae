//! Download orchestrator.
//!
//! Wraps one external client run per attempt with:
//! 1. A private staging directory under `output_dir/__tmp`
//! 2. A free-space preflight check
//! 3. A per-model lock marker
//! 4. Bounded retries with a fixed backoff
//! 5. Publication of staged content only after a complete attempt
//!
//! Every run concludes with a [`JobOutcome`]; failures never propagate
//! to the caller as errors. Cleanup is done by RAII guards so it also
//! happens on interruption.

mod lock;
mod staging;

use std::fs;
use std::sync::Arc;
use std::time::Duration;

use hfpull_core::{
    AcceleratorProbe, AttemptFailure, ClientInvocation, ClientOutcome, DiskSpaceProbe,
    DownloadClientPort, DownloadJob, JobOutcome, ModelId,
};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

pub use lock::{LOCK_FILE_NAME, LockAttempt, LockMarker};
pub use staging::{ContentStats, INCOMPLETE_SUFFIX, StagingArea, StagingError};

/// Minimum free space required at the staging location (5 GiB).
pub const DEFAULT_MIN_FREE_BYTES: u64 = 5 * 1024 * 1024 * 1024;

/// Maximum duration of a single client invocation.
pub const DEFAULT_ATTEMPT_TIMEOUT: Duration = Duration::from_secs(30 * 60);

/// Fixed wait between attempts.
pub const DEFAULT_RETRY_BACKOFF: Duration = Duration::from_secs(5);

/// Name of the hidden staging root inside the output directory.
pub const DEFAULT_TEMP_ROOT: &str = "__tmp";

const BYTES_PER_MIB: f64 = 1024.0 * 1024.0;

/// Tunables for the orchestrator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrchestratorConfig {
    /// Abort when less than this many bytes are free.
    pub min_free_bytes: u64,
    /// Kill the client after this long.
    pub attempt_timeout: Duration,
    /// Wait between attempts.
    pub retry_backoff: Duration,
    /// Staging root directory name under the output directory.
    pub temp_root: String,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            min_free_bytes: DEFAULT_MIN_FREE_BYTES,
            attempt_timeout: DEFAULT_ATTEMPT_TIMEOUT,
            retry_backoff: DEFAULT_RETRY_BACKOFF,
            temp_root: DEFAULT_TEMP_ROOT.to_string(),
        }
    }
}

/// Ports the orchestrator depends on.
pub struct OrchestratorDeps {
    pub client: Arc<dyn DownloadClientPort>,
    pub disk: Arc<dyn DiskSpaceProbe>,
    pub accelerator: Arc<dyn AcceleratorProbe>,
}

/// Runs download jobs one at a time.
pub struct DownloadOrchestrator {
    client: Arc<dyn DownloadClientPort>,
    disk: Arc<dyn DiskSpaceProbe>,
    accelerator: Arc<dyn AcceleratorProbe>,
    config: OrchestratorConfig,
}

impl DownloadOrchestrator {
    /// Build an orchestrator with the default configuration.
    pub fn new(deps: OrchestratorDeps) -> Self {
        Self::with_config(deps, OrchestratorConfig::default())
    }

    /// Build an orchestrator with explicit tunables.
    pub fn with_config(deps: OrchestratorDeps, config: OrchestratorConfig) -> Self {
        Self {
            client: deps.client,
            disk: deps.disk,
            accelerator: deps.accelerator,
            config,
        }
    }

    /// Run one job to a concluded outcome.
    ///
    /// The staging directory and the lock marker (if this job created it)
    /// are gone by the time this returns, whatever the outcome.
    pub async fn run(&self, job: &DownloadJob, cancel: &CancellationToken) -> JobOutcome {
        let model = &job.model_id;
        let final_dir = job.final_dir();
        info!(
            model = %model,
            output_dir = %job.output_dir.display(),
            file = job.file.as_deref().unwrap_or("<all>"),
            "Starting download job"
        );

        // Declared first so it is dropped last, after the lock.
        let staging = match StagingArea::create(&job.output_dir, &self.config.temp_root, model) {
            Ok(staging) => staging,
            Err(e) => return setup_failed(model, &e),
        };
        if let Err(e) = fs::create_dir_all(&final_dir) {
            return setup_failed(
                model,
                &format!("Failed to create {}: {e}", final_dir.display()),
            );
        }

        if let Some(outcome) = self.check_free_space(model, &staging) {
            return outcome;
        }

        let _lock = match LockMarker::acquire(&final_dir) {
            Ok(LockAttempt::Acquired(lock)) => lock,
            Ok(LockAttempt::Held(lock_path)) => {
                warn!(
                    model = %model,
                    lock = %lock_path.display(),
                    "Another download of this model is in progress, skipping"
                );
                return JobOutcome::SkippedLocked { lock_path };
            }
            Err(e) => {
                return setup_failed(model, &format!("Failed to create lock file: {e}"));
            }
        };

        let accelerated = self.accelerator.is_available().await;
        if accelerated {
            info!("hf_transfer is available, enabling accelerated download");
        } else {
            warn!("hf_transfer not found, using the default download method");
            warn!("For faster downloads, consider running 'pip install hf_transfer'");
        }
        if let Some(proxy) = job.proxy.as_deref() {
            info!(proxy, "Using proxy");
        }

        let invocation = ClientInvocation {
            model_id: model.clone(),
            file: job.file.clone(),
            destination: staging.path().to_path_buf(),
            proxy: job.proxy.clone(),
            accelerated,
            timeout: self.config.attempt_timeout,
        };

        self.attempt_loop(job, &invocation, &staging, cancel).await
    }

    async fn attempt_loop(
        &self,
        job: &DownloadJob,
        invocation: &ClientInvocation,
        staging: &StagingArea,
        cancel: &CancellationToken,
    ) -> JobOutcome {
        let model = &job.model_id;
        let max_attempts = job.max_attempts.max(1);
        let mut attempt: u32 = 1;

        loop {
            if cancel.is_cancelled() {
                return interrupted(model, attempt - 1);
            }

            info!(model = %model, attempt, max_attempts, "Download attempt");

            let failure = match self.client.invoke(invocation, cancel).await {
                Ok(ClientOutcome::Success) => match conclude(job, staging, attempt) {
                    Ok(outcome) => return outcome,
                    Err(failure) => failure,
                },
                Ok(ClientOutcome::NonZeroExit(code)) => AttemptFailure::NonZeroExit(code),
                Ok(ClientOutcome::TimedOut) => {
                    AttemptFailure::TimedOut(self.config.attempt_timeout)
                }
                Ok(ClientOutcome::Interrupted) => return interrupted(model, attempt),
                Err(e) => AttemptFailure::Launch(e.to_string()),
            };

            warn!(
                model = %model,
                attempt,
                max_attempts,
                reason = %failure,
                "Download attempt failed"
            );

            if attempt >= max_attempts {
                let hub_url = model.hub_url();
                error!(
                    model = %model,
                    attempts = attempt,
                    reason = %failure,
                    "Download failed after all attempts, check {hub_url} manually"
                );
                return JobOutcome::Exhausted {
                    attempts: attempt,
                    last_failure: failure,
                    hub_url,
                };
            }

            info!(
                model = %model,
                delay_secs = self.config.retry_backoff.as_secs(),
                "Retrying after backoff"
            );
            tokio::select! {
                () = tokio::time::sleep(self.config.retry_backoff) => {}
                () = cancel.cancelled() => return interrupted(model, attempt),
            }
            attempt += 1;
        }
    }

    fn check_free_space(&self, model: &ModelId, staging: &StagingArea) -> Option<JobOutcome> {
        let required = self.config.min_free_bytes;
        match self.disk.available_bytes(staging.path()) {
            Ok(available) if available < required => {
                error!(
                    model = %model,
                    available,
                    required,
                    path = %staging.path().display(),
                    "Insufficient disk space"
                );
                Some(JobOutcome::InsufficientSpace {
                    available,
                    required,
                })
            }
            Ok(available) => {
                debug!(available, required, "Disk space check passed");
                None
            }
            Err(e) => {
                warn!(error = %e, "Could not determine free disk space, continuing");
                None
            }
        }
    }
}

/// Verify a zero-exit attempt and publish it.
///
/// `Err` means the attempt must be retried; `Ok` concludes the job.
fn conclude(
    job: &DownloadJob,
    staging: &StagingArea,
    attempt: u32,
) -> Result<JobOutcome, AttemptFailure> {
    let model = &job.model_id;

    let incomplete = match staging.find_incomplete() {
        Ok(files) => files,
        Err(e) => return Ok(setup_failed(model, &e)),
    };
    if let Some(example) = incomplete.first() {
        warn!(
            model = %model,
            count = incomplete.len(),
            example = %example.display(),
            "Some files were not fully downloaded"
        );
        staging.purge(&incomplete);
        return Err(AttemptFailure::Incomplete {
            count: incomplete.len(),
        });
    }

    let stats = match staging.content_stats() {
        Ok(stats) => stats,
        Err(e) => return Ok(setup_failed(model, &e)),
    };

    let final_dir = job.final_dir();
    if let Err(e) = staging.relocate_into(&final_dir) {
        return Ok(setup_failed(model, &e));
    }

    #[allow(clippy::cast_precision_loss)]
    let size_mib = stats.bytes as f64 / BYTES_PER_MIB;
    info!(
        model = %model,
        files = stats.files,
        size_mib = %format!("{size_mib:.2}"),
        path = %final_dir.display(),
        attempt,
        "Download complete"
    );

    Ok(JobOutcome::Completed {
        final_dir,
        files: stats.files,
        bytes: stats.bytes,
        attempts: attempt,
    })
}

fn setup_failed(model: &ModelId, reason: &dyn std::fmt::Display) -> JobOutcome {
    let reason = reason.to_string();
    error!(model = %model, reason = %reason, "Download job failed");
    JobOutcome::Failed { reason }
}

fn interrupted(model: &ModelId, attempts: u32) -> JobOutcome {
    warn!(model = %model, attempts, "Download interrupted");
    JobOutcome::Interrupted { attempts }
}
