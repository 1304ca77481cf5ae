//! Shared fakes for orchestrator and batch tests.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use hfpull_core::{
    AcceleratorProbe, ClientInvocation, ClientOutcome, DiskProbeError, DiskSpaceProbe,
    DownloadClientError, DownloadClientPort,
};
use hfpull_download::{DownloadOrchestrator, OrchestratorConfig, OrchestratorDeps};
use mockall::mock;
use tokio_util::sync::CancellationToken;

pub const GIB: u64 = 1024 * 1024 * 1024;

// ── Download client fake ───────────────────────────────────────────

/// What the fake client does on one call.
#[derive(Debug, Clone)]
pub enum Step {
    /// Write these files into the destination and exit zero.
    Complete(Vec<(&'static str, &'static str)>),
    /// Write a payload plus a partial-transfer marker and exit zero.
    Incomplete,
    /// Exit with this code without writing anything.
    Exit(i32),
    /// Report a timeout.
    TimedOut,
    /// Fail to launch.
    Launch,
    /// Cancel the token and report an interrupted client.
    Interrupt,
    /// Cancel the token, then exit non-zero so the orchestrator is in backoff.
    ExitAndCancel(i32),
}

/// Scripted download client. The last step repeats once the script runs out.
pub struct FakeClient {
    steps: Vec<Step>,
    calls: AtomicU32,
    invocations: Mutex<Vec<ClientInvocation>>,
}

impl FakeClient {
    pub fn new(steps: Vec<Step>) -> Arc<Self> {
        assert!(!steps.is_empty(), "script needs at least one step");
        Arc::new(Self {
            steps,
            calls: AtomicU32::new(0),
            invocations: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn invocations(&self) -> Vec<ClientInvocation> {
        self.invocations.lock().unwrap().clone()
    }
}

fn write_file(path: &Path, content: &str) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

#[async_trait]
impl DownloadClientPort for FakeClient {
    async fn invoke(
        &self,
        invocation: &ClientInvocation,
        cancel: &CancellationToken,
    ) -> Result<ClientOutcome, DownloadClientError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) as usize;
        self.invocations.lock().unwrap().push(invocation.clone());
        let step = self.steps[call.min(self.steps.len() - 1)].clone();
        let dest = &invocation.destination;

        match step {
            Step::Complete(files) => {
                for (name, content) in files {
                    write_file(&dest.join(name), content);
                }
                Ok(ClientOutcome::Success)
            }
            Step::Incomplete => {
                write_file(&dest.join("config.json"), "{}");
                write_file(
                    &dest.join(".cache/huggingface/download/model.safetensors.incomplete"),
                    "partial",
                );
                Ok(ClientOutcome::Success)
            }
            Step::Exit(code) => Ok(ClientOutcome::NonZeroExit(Some(code))),
            Step::TimedOut => Ok(ClientOutcome::TimedOut),
            Step::Launch => Err(DownloadClientError::Spawn("No such file or directory".into())),
            Step::Interrupt => {
                cancel.cancel();
                Ok(ClientOutcome::Interrupted)
            }
            Step::ExitAndCancel(code) => {
                cancel.cancel();
                Ok(ClientOutcome::NonZeroExit(Some(code)))
            }
        }
    }
}

// ── Probes ─────────────────────────────────────────────────────────

mock! {
    pub Disk {}

    impl DiskSpaceProbe for Disk {
        fn available_bytes(&self, path: &Path) -> Result<u64, DiskProbeError>;
    }
}

/// Disk probe reporting a fixed amount of free space.
pub fn disk_with(available: u64) -> MockDisk {
    let mut disk = MockDisk::new();
    disk.expect_available_bytes()
        .returning(move |_| Ok(available));
    disk
}

/// Accelerator probe with a fixed answer.
pub struct FixedAccelerator(pub bool);

#[async_trait]
impl AcceleratorProbe for FixedAccelerator {
    async fn is_available(&self) -> bool {
        self.0
    }
}

// ── Builders ───────────────────────────────────────────────────────

/// Short waits so retry tests stay fast.
pub fn fast_config() -> OrchestratorConfig {
    OrchestratorConfig {
        attempt_timeout: Duration::from_secs(5),
        retry_backoff: Duration::from_millis(10),
        ..OrchestratorConfig::default()
    }
}

pub fn orchestrator(client: Arc<FakeClient>, disk: MockDisk) -> DownloadOrchestrator {
    DownloadOrchestrator::with_config(
        OrchestratorDeps {
            client,
            disk: Arc::new(disk),
            accelerator: Arc::new(FixedAccelerator(false)),
        },
        fast_config(),
    )
}

/// Sorted relative paths of every file under `dir`.
pub fn list_files(dir: &Path) -> Vec<PathBuf> {
    fn walk(root: &Path, dir: &Path, out: &mut Vec<PathBuf>) {
        let Ok(entries) = fs::read_dir(dir) else {
            return;
        };
        for entry in entries {
            let path = entry.unwrap().path();
            if path.is_dir() {
                walk(root, &path, out);
            } else {
                out.push(path.strip_prefix(root).unwrap().to_path_buf());
            }
        }
    }
    let mut out = Vec::new();
    walk(dir, dir, &mut out);
    out.sort();
    out
}

/// Whether the staging root under `output_dir` holds no job directories.
pub fn staging_is_clean(output_dir: &Path) -> bool {
    let root = output_dir.join("__tmp");
    fs::read_dir(&root).map_or(true, |mut entries| entries.next().is_none())
}
