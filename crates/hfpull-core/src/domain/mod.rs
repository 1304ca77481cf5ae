//! Domain types shared by the orchestrator and its adapters.

mod job;
mod model_id;
mod outcome;

pub use job::{DEFAULT_MAX_ATTEMPTS, DownloadJob};
pub use model_id::{DEFAULT_HUB_ENDPOINT, ModelId, ModelIdError, sanitize_model_name};
pub use outcome::{AttemptFailure, JobOutcome};
