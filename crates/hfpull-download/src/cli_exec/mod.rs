//! Subprocess adapter for the hub download client.
//!
//! [`HfCliClient`] implements [`DownloadClientPort`] by spawning
//! `huggingface-cli download` with inherited stdio, so the client's own
//! progress output reaches the terminal. The child is killed on timeout or
//! cancellation, and `kill_on_drop` covers a dropped future.

mod command;

use async_trait::async_trait;
use hfpull_core::{ClientInvocation, ClientOutcome, DownloadClientError, DownloadClientPort};
use tokio::process::Command;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

pub use command::{
    ACCELERATOR_ENV, CLIENT_BINARY, CLIENT_MODULE, ClientProgram, PROXY_ENV_VARS, client_args,
    client_env,
};
pub(crate) use command::find_python;

/// Runs the external client as a child process.
#[derive(Debug, Clone)]
pub struct HfCliClient {
    program: ClientProgram,
}

impl HfCliClient {
    /// Locate the client on this machine.
    pub fn discover() -> Result<Self, DownloadClientError> {
        let program = ClientProgram::resolve()?;
        debug!(program = ?program, "Resolved download client");
        Ok(Self { program })
    }

    /// Use an explicit program.
    pub const fn with_program(program: ClientProgram) -> Self {
        Self { program }
    }

    pub const fn program(&self) -> &ClientProgram {
        &self.program
    }
}

enum WaitResult {
    Exited(std::io::Result<std::process::ExitStatus>),
    TimedOut,
    Cancelled,
}

#[async_trait]
impl DownloadClientPort for HfCliClient {
    async fn invoke(
        &self,
        invocation: &ClientInvocation,
        cancel: &CancellationToken,
    ) -> Result<ClientOutcome, DownloadClientError> {
        let mut cmd = Command::new(self.program.program());
        cmd.args(self.program.prefix_args())
            .args(client_args(invocation))
            .envs(client_env(invocation))
            .kill_on_drop(true);

        info!("Starting download with huggingface-cli, progress is shown below");
        debug!(
            program = %self.program.program().display(),
            args = ?client_args(invocation),
            destination = %invocation.destination.display(),
            "Spawning download client"
        );
        let mut child = cmd
            .spawn()
            .map_err(|e| DownloadClientError::Spawn(e.to_string()))?;

        let result = tokio::select! {
            status = child.wait() => WaitResult::Exited(status),
            () = tokio::time::sleep(invocation.timeout) => WaitResult::TimedOut,
            () = cancel.cancelled() => WaitResult::Cancelled,
        };

        match result {
            WaitResult::Exited(status) => {
                let status = status.map_err(|e| DownloadClientError::Wait(e.to_string()))?;
                if status.success() {
                    Ok(ClientOutcome::Success)
                } else {
                    Ok(ClientOutcome::NonZeroExit(status.code()))
                }
            }
            WaitResult::TimedOut => {
                warn!(
                    timeout_secs = invocation.timeout.as_secs(),
                    "Download client timed out, terminating"
                );
                if let Err(e) = child.kill().await {
                    warn!(error = %e, "Failed to kill download client");
                }
                Ok(ClientOutcome::TimedOut)
            }
            WaitResult::Cancelled => {
                if let Err(e) = child.kill().await {
                    warn!(error = %e, "Failed to kill download client");
                }
                Ok(ClientOutcome::Interrupted)
            }
        }
    }
}
