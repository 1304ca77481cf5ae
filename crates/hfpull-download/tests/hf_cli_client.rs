//! Integration tests for the `huggingface-cli` subprocess adapter.
//!
//! Small shell scripts stand in for the client so exit codes, timeouts,
//! cancellation and the exact argument vector are checked against a real
//! child process.

#![cfg(unix)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use hfpull_core::{
    ClientInvocation, ClientOutcome, DownloadClientError, DownloadClientPort, ModelId,
};
use hfpull_download::cli_exec::{ACCELERATOR_ENV, CLIENT_MODULE, client_args};
use hfpull_download::{ClientProgram, HfCliClient};
use tempfile::tempdir;
use tokio_util::sync::CancellationToken;

/// Write an executable `/bin/sh` script named `name` into `dir`.
fn script(dir: &Path, name: &str, body: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    path
}

/// Script that records its arguments and environment, then exits with `code`.
fn recording_script(dir: &Path, name: &str, code: i32) -> PathBuf {
    let body = format!(
        "printf '%s\\n' \"$@\" > '{args}'\nenv > '{env}'\nexit {code}",
        args = dir.join("args.txt").display(),
        env = dir.join("env.txt").display(),
    );
    script(dir, name, &body)
}

fn invocation(dir: &Path) -> ClientInvocation {
    ClientInvocation {
        model_id: ModelId::parse("BAAI/bge-m3").unwrap(),
        file: Some("config.json".to_string()),
        destination: dir.join("staging"),
        proxy: None,
        accelerated: false,
        timeout: Duration::from_secs(30),
    }
}

fn recorded_lines(path: &Path) -> Vec<String> {
    fs::read_to_string(path)
        .unwrap()
        .lines()
        .map(str::to_string)
        .collect()
}

fn client(program: ClientProgram) -> HfCliClient {
    HfCliClient::with_program(program)
}

// ── Exit status ────────────────────────────────────────────────────

#[tokio::test]
async fn zero_exit_is_success() {
    let dir = tempdir().unwrap();
    let program = script(dir.path(), "huggingface-cli", "exit 0");

    let outcome = client(ClientProgram::Cli(program))
        .invoke(&invocation(dir.path()), &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(outcome, ClientOutcome::Success);
}

#[tokio::test]
async fn non_zero_exit_keeps_code() {
    let dir = tempdir().unwrap();
    let program = script(dir.path(), "huggingface-cli", "exit 3");

    let outcome = client(ClientProgram::Cli(program))
        .invoke(&invocation(dir.path()), &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(outcome, ClientOutcome::NonZeroExit(Some(3)));
}

#[tokio::test]
async fn missing_program_is_spawn_error() {
    let dir = tempdir().unwrap();
    let program = ClientProgram::Cli(dir.path().join("no-such-client"));

    let result = client(program)
        .invoke(&invocation(dir.path()), &CancellationToken::new())
        .await;

    assert!(
        matches!(result, Err(DownloadClientError::Spawn(_))),
        "got {result:?}"
    );
}

// ── Arguments and environment ──────────────────────────────────────

#[tokio::test]
async fn child_receives_arguments_and_environment() {
    let dir = tempdir().unwrap();
    let program = recording_script(dir.path(), "huggingface-cli", 0);
    let mut inv = invocation(dir.path());
    inv.accelerated = true;
    inv.proxy = Some("http://127.0.0.1:7890".to_string());

    let outcome = client(ClientProgram::Cli(program))
        .invoke(&inv, &CancellationToken::new())
        .await
        .unwrap();
    assert_eq!(outcome, ClientOutcome::Success);

    let expected: Vec<String> = client_args(&inv)
        .iter()
        .map(|a| a.to_string_lossy().into_owned())
        .collect();
    assert_eq!(recorded_lines(&dir.path().join("args.txt")), expected);

    let env = recorded_lines(&dir.path().join("env.txt"));
    assert!(env.contains(&format!("{ACCELERATOR_ENV}=1")));
    assert!(env.contains(&"HTTPS_PROXY=http://127.0.0.1:7890".to_string()));
    assert!(env.contains(&"http_proxy=http://127.0.0.1:7890".to_string()));
}

#[tokio::test]
async fn python_module_form_prefixes_module_arguments() {
    let dir = tempdir().unwrap();
    let python = recording_script(dir.path(), "python3", 0);
    let inv = invocation(dir.path());

    client(ClientProgram::PythonModule(python))
        .invoke(&inv, &CancellationToken::new())
        .await
        .unwrap();

    let args = recorded_lines(&dir.path().join("args.txt"));
    assert_eq!(args[..2], ["-m", CLIENT_MODULE]);
    assert_eq!(args[2..4], ["download", "BAAI/bge-m3"]);
}

// ── Timeout and cancellation ───────────────────────────────────────

#[tokio::test]
async fn slow_client_is_killed_on_timeout() {
    let dir = tempdir().unwrap();
    let program = script(dir.path(), "huggingface-cli", "exec sleep 30");
    let mut inv = invocation(dir.path());
    inv.timeout = Duration::from_millis(200);

    let started = Instant::now();
    let outcome = client(ClientProgram::Cli(program))
        .invoke(&inv, &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(outcome, ClientOutcome::TimedOut);
    assert!(started.elapsed() < Duration::from_secs(10));
}

#[tokio::test]
async fn cancellation_kills_running_client() {
    let dir = tempdir().unwrap();
    let program = script(dir.path(), "huggingface-cli", "exec sleep 30");
    let inv = invocation(dir.path());
    let adapter = client(ClientProgram::Cli(program));
    let cancel = CancellationToken::new();

    let started = Instant::now();
    let (outcome, ()) = tokio::join!(adapter.invoke(&inv, &cancel), async {
        tokio::time::sleep(Duration::from_millis(200)).await;
        cancel.cancel();
    });

    assert_eq!(outcome.unwrap(), ClientOutcome::Interrupted);
    assert!(started.elapsed() < Duration::from_secs(10));
}
