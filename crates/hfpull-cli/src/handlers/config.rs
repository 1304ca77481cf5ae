//! Config command handler.

use anyhow::Result;
use hfpull_core::UserSettings;

use crate::bootstrap::CliContext;
use crate::config_commands::ConfigCommand;
use crate::error::CliError;
use crate::utils::input::prompt_confirmation;

/// Execute the config command.
pub fn execute(ctx: &CliContext, command: ConfigCommand) -> Result<()> {
    match command {
        ConfigCommand::Show => show(ctx),
        ConfigCommand::Set { output_dir, proxy } => set(ctx, output_dir, proxy),
        ConfigCommand::Reset { force } => reset(ctx, force),
    }
}

fn show(ctx: &CliContext) -> Result<()> {
    let settings = ctx.settings.load().map_err(CliError::from)?;
    println!("Settings file: {}", ctx.settings_path.display());
    println!(
        "  output_dir: {}",
        settings.output_dir().unwrap_or("(not set)")
    );
    println!("  proxy:      {}", settings.proxy().unwrap_or("(not set)"));
    Ok(())
}

fn set(ctx: &CliContext, output_dir: Option<String>, proxy: Option<String>) -> Result<()> {
    if output_dir.is_none() && proxy.is_none() {
        println!("Nothing to change. Use --output-dir and/or --proxy.");
        return Ok(());
    }

    let mut settings = ctx.settings.load().map_err(CliError::from)?;
    settings.remember(output_dir.as_deref(), proxy.as_deref());
    ctx.settings.save(&settings).map_err(CliError::from)?;

    println!("✓ Settings saved to {}", ctx.settings_path.display());
    show(ctx)
}

fn reset(ctx: &CliContext, force: bool) -> Result<()> {
    if !force && !prompt_confirmation("Forget the remembered output directory and proxy?")? {
        println!("Reset cancelled.");
        return Ok(());
    }

    ctx.settings
        .save(&UserSettings::default())
        .map_err(CliError::from)?;
    println!("✓ Settings reset.");
    Ok(())
}
