//! # hfpull-download
//!
//! Download orchestration around the external hub client.
//!
//! - `orchestrator` - staging, lock marker, free-space check, retry loop
//! - `cli_exec` - `huggingface-cli` subprocess adapter
//! - `probe` - disk space and accelerator probes
//! - `batch` - sequential multi-model driver

pub mod batch;
pub mod cli_exec;
pub mod orchestrator;
pub mod probe;

pub use batch::{BatchReport, run_batch};
pub use cli_exec::{ClientProgram, HfCliClient};
pub use orchestrator::{
    DEFAULT_ATTEMPT_TIMEOUT, DEFAULT_MIN_FREE_BYTES, DEFAULT_RETRY_BACKOFF, DEFAULT_TEMP_ROOT,
    DownloadOrchestrator, INCOMPLETE_SUFFIX, LOCK_FILE_NAME, OrchestratorConfig,
    OrchestratorDeps,
};
pub use probe::{PythonPackageProbe, SysinfoDiskProbe};
