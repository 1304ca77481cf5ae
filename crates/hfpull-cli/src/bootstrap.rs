//! CLI bootstrap - the composition root.
//!
//! This module is the ONLY place where concrete adapters are wired
//! together for the CLI:
//! - Settings store (INI file)
//! - Accelerator and disk probes
//! - The `huggingface-cli` client and the orchestrator around it
//!
//! The client is located lazily so `config` commands work on machines
//! without it. The accelerator check runs in the client's own Python
//! environment once the client is known.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use hfpull_core::{AcceleratorProbe, IniSettingsStore, SettingsStore, config_file_path};
use hfpull_download::{
    DownloadOrchestrator, HfCliClient, OrchestratorConfig, OrchestratorDeps, PythonPackageProbe,
    SysinfoDiskProbe,
};
use tracing::debug;

use crate::error::CliError;

/// Bootstrap configuration for the CLI.
#[derive(Debug, Clone)]
pub struct CliConfig {
    /// Settings file location.
    pub settings_path: PathBuf,
    /// Orchestrator tunables.
    pub orchestrator: OrchestratorConfig,
}

impl CliConfig {
    /// Config with the default settings location and limits.
    pub fn with_defaults() -> Self {
        Self {
            settings_path: config_file_path(),
            orchestrator: OrchestratorConfig::default(),
        }
    }
}

/// Composed dependencies for CLI handlers.
pub struct CliContext {
    /// Location of the settings file.
    pub settings_path: PathBuf,
    /// Persisted user settings.
    pub settings: Arc<dyn SettingsStore>,
    orchestrator_config: OrchestratorConfig,
}

/// Everything a download run needs once the client has been located.
pub struct DownloadStack {
    pub orchestrator: DownloadOrchestrator,
    /// Accelerator probe, shared with the orchestrator so it runs once.
    pub accelerator: Arc<dyn AcceleratorProbe>,
}

impl CliContext {
    /// Locate the download client and build an orchestrator around it.
    pub fn download_stack(&self) -> Result<DownloadStack> {
        let client = HfCliClient::discover().map_err(|e| {
            CliError::Process(format!(
                "{e}. Install it with 'pip install -U \"huggingface_hub[cli]\"'"
            ))
        })?;
        debug!(program = ?client.program(), "Using download client");
        Ok(self.stack_for(client))
    }

    fn stack_for(&self, client: HfCliClient) -> DownloadStack {
        let accelerator: Arc<dyn AcceleratorProbe> =
            Arc::new(PythonPackageProbe::accelerator_for(client.program()));

        let orchestrator = DownloadOrchestrator::with_config(
            OrchestratorDeps {
                client: Arc::new(client),
                disk: Arc::new(SysinfoDiskProbe::new()),
                accelerator: Arc::clone(&accelerator),
            },
            self.orchestrator_config.clone(),
        );
        DownloadStack {
            orchestrator,
            accelerator,
        }
    }
}

/// Build the CLI context.
pub fn bootstrap(config: CliConfig) -> CliContext {
    debug!(settings = %config.settings_path.display(), "Bootstrapping CLI");
    CliContext {
        settings: Arc::new(IniSettingsStore::new(config.settings_path.clone())),
        settings_path: config.settings_path,
        orchestrator_config: config.orchestrator,
    }
}
