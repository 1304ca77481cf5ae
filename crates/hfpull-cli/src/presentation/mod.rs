//! Shared CLI presentation utilities.
//!
//! Formatting lives in pure `format_*` functions so it can be tested;
//! the `print_*` wrappers write to stdout.

use std::path::Path;

use hfpull_core::{JobOutcome, ModelId};
use hfpull_download::BatchReport;

const SEPARATOR_WIDTH: usize = 60;

/// Inputs shown before a run starts.
#[derive(Debug, Clone)]
pub struct RunSummary<'a> {
    pub models: &'a [ModelId],
    pub output_dir: &'a Path,
    pub file: Option<&'a str>,
    pub proxy: Option<&'a str>,
    pub accelerated: bool,
    pub max_attempts: u32,
}

/// Human-readable byte size (binary units).
#[allow(clippy::cast_precision_loss)]
pub fn format_bytes(bytes: u64) -> String {
    const UNITS: [&str; 5] = ["B", "KiB", "MiB", "GiB", "TiB"];
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{bytes} B")
    } else {
        format!("{value:.2} {}", UNITS[unit])
    }
}

/// Lines of the pre-run configuration summary.
pub fn format_run_summary(summary: &RunSummary<'_>) -> Vec<String> {
    let models = match summary.models {
        [single] => single.to_string(),
        many => format!("{} models", many.len()),
    };
    vec![
        "Download configuration:".to_string(),
        format!("  Model(s):        {models}"),
        format!("  Output dir:      {}", summary.output_dir.display()),
        format!("  File:            {}", summary.file.unwrap_or("all files")),
        format!(
            "  hf_transfer:     {}",
            if summary.accelerated {
                "enabled"
            } else {
                "not installed"
            }
        ),
        format!("  Proxy:           {}", summary.proxy.unwrap_or("none")),
        format!("  Attempts/model:  {}", summary.max_attempts),
        format!(
            "  Models are saved in {}/<model name>",
            summary.output_dir.display()
        ),
    ]
}

/// One-line description of a job outcome.
pub fn format_outcome(model: &ModelId, outcome: &JobOutcome) -> String {
    match outcome {
        JobOutcome::Completed {
            final_dir,
            files,
            bytes,
            attempts,
        } => format!(
            "✓ {model}: {files} file(s), {} saved to {} (attempt {attempts})",
            format_bytes(*bytes),
            final_dir.display()
        ),
        JobOutcome::SkippedLocked { lock_path } => format!(
            "- {model}: another download is in progress; delete {} if it is stale",
            lock_path.display()
        ),
        JobOutcome::InsufficientSpace {
            available,
            required,
        } => format!(
            "✗ {model}: insufficient disk space ({} available, {} required)",
            format_bytes(*available),
            format_bytes(*required)
        ),
        JobOutcome::Exhausted {
            attempts,
            last_failure,
            hub_url,
        } => format!(
            "✗ {model}: failed after {attempts} attempt(s) ({last_failure}); check {hub_url}"
        ),
        JobOutcome::Failed { reason } => format!("✗ {model}: {reason}"),
        JobOutcome::Interrupted { .. } => format!("! {model}: interrupted"),
    }
}

/// Closing counts line for a batch.
pub fn format_batch_totals(report: &BatchReport) -> String {
    format!(
        "{} completed, {} skipped, {} failed",
        report.completed(),
        report.skipped(),
        report.failed()
    )
}

/// Print a horizontal separator line.
pub fn print_separator() {
    println!("{}", "-".repeat(SEPARATOR_WIDTH));
}

pub fn print_run_summary(summary: &RunSummary<'_>) {
    print_separator();
    for line in format_run_summary(summary) {
        println!("{line}");
    }
    print_separator();
}

pub fn print_batch_report(report: &BatchReport) {
    println!();
    print_separator();
    for (model, outcome) in report.entries() {
        println!("{}", format_outcome(model, outcome));
    }
    print_separator();
    println!("{}", format_batch_totals(report));
}
