//! Subcommands and download arguments.

use std::path::PathBuf;

use clap::{Args, Subcommand};
use hfpull_core::DEFAULT_MAX_ATTEMPTS;

use crate::config_commands::ConfigCommand;

/// Available subcommands. Downloading is the default action and has none.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// View or change the remembered output directory and proxy
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

/// Options describing a download run.
#[derive(Args, Debug, Clone, Default)]
pub struct DownloadArgs {
    /// Model to download, e.g. BAAI/bge-m3
    #[arg(short = 'm', long = "model", value_name = "ID")]
    pub model: Option<String>,

    /// File listing models to download (one per line, or a JSON array)
    #[arg(
        short = 'l',
        long = "model-list",
        value_name = "PATH",
        conflicts_with = "model"
    )]
    pub model_list: Option<PathBuf>,

    /// Root directory for downloaded models
    #[arg(
        short = 'o',
        long = "output-dir",
        visible_alias = "output_dir",
        value_name = "DIR"
    )]
    pub output_dir: Option<String>,

    /// Proxy URL passed to the download client
    #[arg(short = 'p', long = "proxy", value_name = "URL")]
    pub proxy: Option<String>,

    /// Download only this file from the repository
    #[arg(short = 'f', long = "file", value_name = "NAME")]
    pub file: Option<String>,

    /// Attempts per model before giving up
    #[arg(
        short = 'r',
        long = "retries",
        value_name = "N",
        default_value_t = DEFAULT_MAX_ATTEMPTS,
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    pub retries: u32,
}

impl DownloadArgs {
    /// Whether models were named on the command line.
    pub const fn has_models(&self) -> bool {
        self.model.is_some() || self.model_list.is_some()
    }
}
