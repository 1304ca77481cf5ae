//! CLI entry point - the composition root.

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use hfpull_cli::{Cli, CliConfig, CliError, Commands, bootstrap, handlers};

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if verbose { "debug" } else { "info" }));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let ctx = bootstrap(CliConfig::with_defaults());

    match cli.command {
        Some(Commands::Config { command }) => handlers::config::execute(&ctx, command),
        None => handlers::download::execute(&ctx, &cli.download).await,
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    // Load environment variables before anything reads them
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let code = match err.downcast_ref::<CliError>() {
                Some(CliError::Cancelled) => {
                    println!("{err}");
                    0
                }
                Some(cli_err) => {
                    eprintln!("Error: {cli_err}");
                    cli_err.exit_code()
                }
                None => {
                    eprintln!("Error: {err:#}");
                    1
                }
            };
            ExitCode::from(u8::try_from(code).unwrap_or(1))
        }
    }
}
