//! Sequential batch driver.
//!
//! Jobs run one after another through a single orchestrator. A terminal
//! failure for one model is recorded and the batch moves on; an
//! interruption ends the batch once the current job has cleaned up.

use hfpull_core::{DownloadJob, JobOutcome, ModelId};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::orchestrator::DownloadOrchestrator;

/// Ordered results of a batch run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchReport {
    entries: Vec<(ModelId, JobOutcome)>,
}

impl BatchReport {
    pub fn entries(&self) -> &[(ModelId, JobOutcome)] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn completed(&self) -> usize {
        self.count(JobOutcome::is_success)
    }

    pub fn skipped(&self) -> usize {
        self.count(|o| matches!(o, JobOutcome::SkippedLocked { .. }))
    }

    /// Jobs that ended without content and were not skipped or interrupted.
    pub fn failed(&self) -> usize {
        self.count(|o| {
            !o.is_success()
                && !o.is_interrupted()
                && !matches!(o, JobOutcome::SkippedLocked { .. })
        })
    }

    pub fn was_interrupted(&self) -> bool {
        self.entries.iter().any(|(_, o)| o.is_interrupted())
    }

    fn count(&self, pred: impl Fn(&JobOutcome) -> bool) -> usize {
        self.entries.iter().filter(|(_, o)| pred(o)).count()
    }

    fn push(&mut self, model: ModelId, outcome: JobOutcome) {
        self.entries.push((model, outcome));
    }
}

/// Run `jobs` in order.
///
/// Jobs not started because of an interruption are absent from the report.
pub async fn run_batch(
    orchestrator: &DownloadOrchestrator,
    jobs: &[DownloadJob],
    cancel: &CancellationToken,
) -> BatchReport {
    let mut report = BatchReport::default();
    let total = jobs.len();

    for (index, job) in jobs.iter().enumerate() {
        if cancel.is_cancelled() {
            warn!(remaining = total - index, "Batch interrupted before next model");
            break;
        }

        info!(model = %job.model_id, position = index + 1, total, "Processing model");
        let outcome = orchestrator.run(job, cancel).await;
        let stop = outcome.is_interrupted();
        report.push(job.model_id.clone(), outcome);

        if stop {
            warn!(remaining = total - index - 1, "Batch interrupted");
            break;
        }
    }

    info!(
        completed = report.completed(),
        skipped = report.skipped(),
        failed = report.failed(),
        total,
        "Batch finished"
    );
    report
}
