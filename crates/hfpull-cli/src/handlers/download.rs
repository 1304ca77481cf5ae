//! Download handler: resolves run inputs, then drives the batch.
//!
//! Input precedence for the output directory and proxy is command-line
//! flag, then remembered setting, then interactive prompt. When no model
//! is named on the command line every input is prompted for.

use std::io::{self, BufRead};
use std::path::PathBuf;

use anyhow::Result;
use hfpull_core::{DownloadJob, ModelId, UserSettings, load_model_list};
use hfpull_download::run_batch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::bootstrap::CliContext;
use crate::commands::DownloadArgs;
use crate::error::CliError;
use crate::presentation::{RunSummary, print_batch_report, print_run_summary};
use crate::utils::input::{read_prompt, read_prompt_with_default};

/// Fully resolved inputs for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunInputs {
    pub models: Vec<ModelId>,
    pub output_dir: PathBuf,
    pub proxy: Option<String>,
    pub file: Option<String>,
    pub max_attempts: u32,
}

impl RunInputs {
    /// One job per model, in order.
    pub fn jobs(&self) -> Vec<DownloadJob> {
        self.models
            .iter()
            .map(|model| {
                DownloadJob::new(model.clone(), &self.output_dir)
                    .with_proxy(self.proxy.clone())
                    .with_file(self.file.clone())
                    .with_max_attempts(self.max_attempts)
            })
            .collect()
    }
}

/// Resolve run inputs from flags, remembered settings and `input`.
///
/// Returns `Ok(None)` when the operator left a required answer empty; the
/// reason has already been printed.
pub fn resolve_inputs<R: BufRead>(
    args: &DownloadArgs,
    settings: &UserSettings,
    input: &mut R,
) -> Result<Option<RunInputs>> {
    let interactive = !args.has_models();

    let models = if let Some(raw) = args.model.as_deref() {
        vec![ModelId::parse(raw).map_err(CliError::from)?]
    } else if let Some(list) = args.model_list.as_deref() {
        load_model_list(list).map_err(CliError::from)?
    } else {
        let answer = read_prompt(input, "Enter the model name (e.g. BAAI/bge-m3)")?;
        if answer.is_empty() {
            println!("Model name cannot be empty.");
            return Ok(None);
        }
        vec![ModelId::parse(&answer).map_err(CliError::from)?]
    };

    let output_dir = match non_blank(args.output_dir.as_deref()) {
        Some(dir) => dir.to_string(),
        None => match settings.output_dir() {
            Some(dir) if !interactive => dir.to_string(),
            default => read_prompt_with_default(input, "Enter the output directory", default)?,
        },
    };
    if output_dir.is_empty() {
        println!("Output directory cannot be empty.");
        return Ok(None);
    }

    let proxy = match non_blank(args.proxy.as_deref()) {
        Some(proxy) => Some(proxy.to_string()),
        None if interactive => {
            let answer = read_prompt_with_default(
                input,
                "Enter proxy (leave empty for none)",
                settings.proxy(),
            )?;
            non_blank(Some(&answer)).map(str::to_string)
        }
        None => settings.proxy().map(str::to_string),
    };

    let file = match non_blank(args.file.as_deref()) {
        Some(file) => Some(file.to_string()),
        None if interactive => {
            let answer = read_prompt(
                input,
                "Enter a file to download (leave empty for all files)",
            )?;
            non_blank(Some(&answer)).map(str::to_string)
        }
        None => None,
    };

    Ok(Some(RunInputs {
        models,
        output_dir: PathBuf::from(output_dir),
        proxy,
        file,
        max_attempts: args.retries.max(1),
    }))
}

/// Execute a download run.
pub async fn execute(ctx: &CliContext, args: &DownloadArgs) -> Result<()> {
    let mut settings = ctx.settings.load().unwrap_or_else(|e| {
        warn!(error = %e, "Could not read settings, continuing without them");
        UserSettings::default()
    });

    let Some(inputs) = resolve_inputs(args, &settings, &mut io::stdin().lock())? else {
        return Ok(());
    };

    settings.remember(
        Some(inputs.output_dir.to_string_lossy().as_ref()),
        inputs.proxy.as_deref(),
    );
    if let Err(e) = ctx.settings.save(&settings) {
        warn!(error = %e, "Could not save settings");
    }

    let stack = ctx.download_stack()?;
    let accelerated = stack.accelerator.is_available().await;
    print_run_summary(&RunSummary {
        models: &inputs.models,
        output_dir: &inputs.output_dir,
        file: inputs.file.as_deref(),
        proxy: inputs.proxy.as_deref(),
        accelerated,
        max_attempts: inputs.max_attempts,
    });

    let cancel = CancellationToken::new();
    let listener = spawn_interrupt_listener(cancel.clone());
    let report = run_batch(&stack.orchestrator, &inputs.jobs(), &cancel).await;
    listener.abort();

    print_batch_report(&report);
    if report.was_interrupted() {
        return Err(CliError::Interrupted.into());
    }
    Ok(())
}

/// Cancel `token` on the first Ctrl-C.
fn spawn_interrupt_listener(token: CancellationToken) -> JoinHandle<()> {
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("Interrupt received, stopping after cleanup");
                token.cancel();
            }
            Err(e) => warn!(error = %e, "Could not listen for Ctrl-C"),
        }
    })
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
