//! Detection of the optional `hf_transfer` accelerator package.

use std::path::PathBuf;

use async_trait::async_trait;
use hfpull_core::AcceleratorProbe;
use tokio::process::Command;
use tokio::sync::OnceCell;
use tracing::debug;

use crate::cli_exec::{ClientProgram, find_python};

/// Python package that provides accelerated transfers.
pub const ACCELERATOR_PACKAGE: &str = "hf_transfer";

/// Checks whether a Python package can be imported.
///
/// Without an explicit interpreter the first Python on `PATH` is asked.
/// The answer is computed once per probe and cached.
#[derive(Debug)]
pub struct PythonPackageProbe {
    package: String,
    interpreter: Option<PathBuf>,
    cached: OnceCell<bool>,
}

impl PythonPackageProbe {
    pub fn new(package: impl Into<String>) -> Self {
        Self {
            package: package.into(),
            interpreter: None,
            cached: OnceCell::new(),
        }
    }

    /// Probe for [`ACCELERATOR_PACKAGE`].
    pub fn accelerator() -> Self {
        Self::new(ACCELERATOR_PACKAGE)
    }

    /// Check for [`ACCELERATOR_PACKAGE`] in the environment the client runs in.
    pub fn accelerator_for(program: &ClientProgram) -> Self {
        let check = Self::accelerator();
        match program.interpreter() {
            Some(python) => check.with_interpreter(python),
            None => check,
        }
    }

    /// Ask this interpreter instead of searching `PATH`.
    #[must_use]
    pub fn with_interpreter(mut self, python: impl Into<PathBuf>) -> Self {
        self.interpreter = Some(python.into());
        self
    }

    async fn import_succeeds(&self) -> bool {
        let Some(python) = self.interpreter.clone().or_else(find_python) else {
            debug!("No Python interpreter found, accelerator unavailable");
            return false;
        };
        let status = Command::new(&python)
            .arg("-c")
            .arg(find_spec_script(&self.package))
            .stdout(std::process::Stdio::null())
            .stderr(std::process::Stdio::null())
            .kill_on_drop(true)
            .status()
            .await;
        match status {
            Ok(status) => status.success(),
            Err(e) => {
                debug!(python = %python.display(), error = %e, "Python import probe failed");
                false
            }
        }
    }
}

/// Exits 0 when `package` is importable, without importing it.
fn find_spec_script(package: &str) -> String {
    format!(
        "import importlib.util, sys; sys.exit(0 if importlib.util.find_spec('{package}') else 1)"
    )
}

#[async_trait]
impl AcceleratorProbe for PythonPackageProbe {
    async fn is_available(&self) -> bool {
        *self
            .cached
            .get_or_init(|| async { self.import_succeeds().await })
            .await
    }
}
