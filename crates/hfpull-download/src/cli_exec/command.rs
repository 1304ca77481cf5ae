//! Command-line construction for the external download client.
//!
//! Everything here is pure so the exact argument vector and environment
//! can be asserted without spawning anything.

use std::ffi::OsString;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use hfpull_core::{ClientInvocation, DownloadClientError};

/// Executable name of the hub download client.
pub const CLIENT_BINARY: &str = "huggingface-cli";

/// Python module providing the same entry point when the script is not on `PATH`.
pub const CLIENT_MODULE: &str = "huggingface_hub.commands.huggingface_cli";

/// Environment variable enabling the accelerated transfer backend.
pub const ACCELERATOR_ENV: &str = "HF_HUB_ENABLE_HF_TRANSFER";

/// Proxy variables exported when a proxy is configured.
pub const PROXY_ENV_VARS: [&str; 4] = ["HTTP_PROXY", "HTTPS_PROXY", "http_proxy", "https_proxy"];

#[cfg(target_os = "windows")]
const PYTHON_CANDIDATES: &[&str] = &["python"];

#[cfg(not(target_os = "windows"))]
const PYTHON_CANDIDATES: &[&str] = &["python3", "python"];

/// Bytes read from the client script when looking for its `#!` line.
const SHEBANG_READ_LIMIT: u64 = 512;

/// How the client is launched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientProgram {
    /// The `huggingface-cli` script found on `PATH`.
    Cli(PathBuf),
    /// `python -m huggingface_hub.commands.huggingface_cli`.
    PythonModule(PathBuf),
}

impl ClientProgram {
    /// Locate the client, preferring the standalone script.
    pub fn resolve() -> Result<Self, DownloadClientError> {
        if let Ok(path) = which::which(CLIENT_BINARY) {
            return Ok(Self::Cli(path));
        }
        find_python().map(Self::PythonModule).ok_or_else(|| {
            DownloadClientError::NotFound(format!(
                "{CLIENT_BINARY}, {}",
                PYTHON_CANDIDATES.join(", ")
            ))
        })
    }

    /// Executable to spawn.
    pub fn program(&self) -> &PathBuf {
        match self {
            Self::Cli(path) | Self::PythonModule(path) => path,
        }
    }

    /// Arguments placed before the client's own arguments.
    pub fn prefix_args(&self) -> Vec<OsString> {
        match self {
            Self::Cli(_) => Vec::new(),
            Self::PythonModule(_) => vec!["-m".into(), CLIENT_MODULE.into()],
        }
    }

    /// Python interpreter the client runs under, when it can be determined.
    ///
    /// The module form names it directly; the script form is read from the
    /// script's `#!` line, which pip writes as an absolute interpreter path.
    pub fn interpreter(&self) -> Option<PathBuf> {
        match self {
            Self::PythonModule(python) => Some(python.clone()),
            Self::Cli(script) => shebang_interpreter(script),
        }
    }
}

fn shebang_interpreter(script: &Path) -> Option<PathBuf> {
    let mut head = Vec::new();
    File::open(script)
        .ok()?
        .take(SHEBANG_READ_LIMIT)
        .read_to_end(&mut head)
        .ok()?;
    let line = head.strip_prefix(b"#!")?.split(|b| *b == b'\n').next()?;
    let interpreter = std::str::from_utf8(line).ok()?.split_whitespace().next()?;
    let name = Path::new(interpreter).file_name()?.to_str()?;
    if !name.starts_with("python") {
        return None;
    }
    Some(PathBuf::from(interpreter))
}

/// First Python interpreter found on `PATH`.
pub(crate) fn find_python() -> Option<PathBuf> {
    PYTHON_CANDIDATES
        .iter()
        .find_map(|candidate| which::which(candidate).ok())
}

/// Client arguments for one invocation.
///
/// Resumable transfer is always requested and files are materialized as real
/// copies rather than cache symlinks, so the staging directory is
/// self-contained.
pub fn client_args(invocation: &ClientInvocation) -> Vec<OsString> {
    let mut args: Vec<OsString> = vec!["download".into(), invocation.model_id.as_str().into()];
    if let Some(file) = invocation.file.as_deref() {
        args.push(file.into());
    }
    args.push("--local-dir".into());
    args.push(invocation.destination.clone().into_os_string());
    args.push("--local-dir-use-symlinks".into());
    args.push("False".into());
    args.push("--resume-download".into());
    args
}

/// Environment overrides for one invocation.
pub fn client_env(invocation: &ClientInvocation) -> Vec<(&'static str, String)> {
    let mut env = Vec::new();
    if invocation.accelerated {
        env.push((ACCELERATOR_ENV, "1".to_string()));
    }
    if let Some(proxy) = invocation.proxy.as_deref() {
        env.extend(PROXY_ENV_VARS.iter().map(|var| (*var, proxy.to_string())));
    }
    env
}
