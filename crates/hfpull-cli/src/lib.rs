//! # hfpull-cli
//!
//! Command-line front end: argument parsing, interactive prompts, settings
//! persistence and terminal output around the download orchestrator.

#![deny(unused_crate_dependencies)]

#[cfg(test)]
use tempfile as _;

// Used by the binary only
use dotenvy as _;
use tracing_subscriber as _;

pub mod bootstrap;
pub mod commands;
pub mod config_commands;
pub mod error;
pub mod handlers;
pub mod parser;
pub mod presentation;
pub mod utils;

// Re-export primary types for convenient access
pub use bootstrap::{CliConfig, CliContext, bootstrap};
pub use commands::{Commands, DownloadArgs};
pub use config_commands::ConfigCommand;
pub use error::CliError;
pub use parser::Cli;
