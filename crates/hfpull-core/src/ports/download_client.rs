//! Download client port.
//!
//! The external client (`huggingface-cli`) performs the actual transfer.
//! Adapters translate its process lifecycle into a typed [`ClientOutcome`]
//! so the orchestrator branches on structure, never on output text.

use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use tokio_util::sync::CancellationToken;

use crate::domain::ModelId;

/// One invocation of the external download client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientInvocation {
    /// Repository to fetch.
    pub model_id: ModelId,
    /// Optional single file inside the repository.
    pub file: Option<String>,
    /// Directory the client writes into (the job's staging directory).
    pub destination: PathBuf,
    /// Proxy exported to the client environment.
    pub proxy: Option<String>,
    /// Enable the accelerated transfer backend.
    pub accelerated: bool,
    /// Kill the client once this much time has passed.
    pub timeout: Duration,
}

/// How a client invocation ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientOutcome {
    /// Exit status zero. Completeness is still checked by the caller.
    Success,
    /// Non-zero exit; `None` when the process was terminated by a signal.
    NonZeroExit(Option<i32>),
    /// The timeout elapsed and the client was killed.
    TimedOut,
    /// The cancellation token fired and the client was killed.
    Interrupted,
}

/// Errors raised when the client could not be run at all.
#[derive(Debug, Error)]
pub enum DownloadClientError {
    #[error("Download client not found (tried: {0})")]
    NotFound(String),

    #[error("Failed to spawn download client: {0}")]
    Spawn(String),

    #[error("Failed waiting for download client: {0}")]
    Wait(String),
}

/// Port for running the external download client.
#[async_trait]
pub trait DownloadClientPort: Send + Sync {
    /// Run the client once and report how it ended.
    ///
    /// Implementations must kill the child process on timeout and on
    /// cancellation before returning.
    async fn invoke(
        &self,
        invocation: &ClientInvocation,
        cancel: &CancellationToken,
    ) -> Result<ClientOutcome, DownloadClientError>;
}
