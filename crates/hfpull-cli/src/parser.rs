//! Main CLI parser and top-level argument handling.

use clap::Parser;

use crate::commands::{Commands, DownloadArgs};

/// Download models from the Hugging Face Hub through `huggingface-cli`,
/// with staging, locking and retries.
///
/// Without a subcommand the top-level options describe a download. When
/// neither `--model` nor `--model-list` is given, the tool asks for its
/// inputs interactively.
#[derive(Parser, Debug)]
#[command(name = "hfpull")]
#[command(about = "Reliable Hugging Face model downloads")]
#[command(version)]
pub struct Cli {
    #[command(flatten)]
    pub download: DownloadArgs,

    /// Enable verbose/debug output
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config_commands::ConfigCommand;
    use clap::CommandFactory;
    use std::path::PathBuf;

    #[test]
    fn test_cli_parser_builds() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_download_flags() {
        let cli = Cli::parse_from([
            "hfpull",
            "-m",
            "BAAI/bge-m3",
            "--output_dir",
            "/data/models",
            "-p",
            "http://127.0.0.1:7890",
            "-f",
            "config.json",
            "-r",
            "5",
        ]);
        assert!(cli.command.is_none());
        assert_eq!(cli.download.model.as_deref(), Some("BAAI/bge-m3"));
        assert_eq!(cli.download.output_dir.as_deref(), Some("/data/models"));
        assert_eq!(cli.download.proxy.as_deref(), Some("http://127.0.0.1:7890"));
        assert_eq!(cli.download.file.as_deref(), Some("config.json"));
        assert_eq!(cli.download.retries, 5);
    }

    #[test]
    fn test_defaults() {
        let cli = Cli::parse_from(["hfpull"]);
        assert!(!cli.verbose);
        assert!(cli.download.model.is_none());
        assert!(cli.download.model_list.is_none());
        assert_eq!(cli.download.retries, hfpull_core::DEFAULT_MAX_ATTEMPTS);
    }

    #[test]
    fn test_model_list_conflicts_with_model() {
        let result = Cli::try_parse_from(["hfpull", "-m", "a/b", "-l", "models.txt"]);
        assert!(result.is_err());

        let cli = Cli::parse_from([
            "hfpull",
            "--model-list",
            "models.txt",
            "--output-dir",
            "out",
        ]);
        assert_eq!(cli.download.model_list, Some(PathBuf::from("models.txt")));
    }

    #[test]
    fn test_zero_retries_rejected() {
        assert!(Cli::try_parse_from(["hfpull", "-m", "a/b", "-r", "0"]).is_err());
    }

    #[test]
    fn test_config_subcommand() {
        let cli = Cli::parse_from(["hfpull", "-v", "config", "set", "--proxy", "http://p:1"]);
        assert!(cli.verbose);
        match cli.command {
            Some(Commands::Config {
                command: ConfigCommand::Set { output_dir, proxy },
            }) => {
                assert!(output_dir.is_none());
                assert_eq!(proxy.as_deref(), Some("http://p:1"));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
