//! Configuration management subcommands.

use clap::Subcommand;

/// Settings file commands.
#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Show the remembered settings and where they are stored
    Show,
    /// Update remembered settings
    Set {
        /// Default output directory
        #[arg(long = "output-dir", visible_alias = "output_dir")]
        output_dir: Option<String>,
        /// Default proxy URL
        #[arg(long)]
        proxy: Option<String>,
    },
    /// Forget the remembered output directory and proxy
    Reset {
        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },
}
