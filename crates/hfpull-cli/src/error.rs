//! CLI-specific error types and exit-code mapping.

use hfpull_core::{ModelIdError, ModelListError, SettingsError};
use thiserror::Error;

/// CLI-specific error type.
#[derive(Debug, Error)]
pub enum CliError {
    /// Standard input closed while prompting.
    #[error("Operation cancelled.")]
    Cancelled,

    /// Ctrl-C stopped the run.
    #[error("Download interrupted by user.")]
    Interrupted,

    /// Invalid user-supplied value.
    #[error("Invalid arguments: {0}")]
    Arguments(String),

    /// IO error (file not found, permission denied, etc.).
    #[error("IO error: {0}")]
    Io(String),

    /// Settings file error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Download client missing or unusable.
    #[error("Process error: {0}")]
    Process(String),
}

impl CliError {
    /// Map error to appropriate exit code.
    ///
    /// Exit codes follow Unix conventions:
    /// - 0: Success (and a cancelled prompt)
    /// - 1: General error
    /// - 2: Misuse of shell command (invalid arguments)
    /// - 64-78: Reserved for specific error categories (see sysexits.h)
    /// - 130: Terminated by Ctrl-C
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Cancelled => 0,
            Self::Interrupted => 130,
            Self::Arguments(_) => 2,
            Self::Io(_) => 74,      // EX_IOERR
            Self::Config(_) => 78,  // EX_CONFIG
            Self::Process(_) => 71, // EX_OSERR
        }
    }
}

impl From<ModelIdError> for CliError {
    fn from(err: ModelIdError) -> Self {
        Self::Arguments(err.to_string())
    }
}

impl From<ModelListError> for CliError {
    fn from(err: ModelListError) -> Self {
        match err {
            ModelListError::Read { .. } => Self::Io(err.to_string()),
            _ => Self::Arguments(err.to_string()),
        }
    }
}

impl From<SettingsError> for CliError {
    fn from(err: SettingsError) -> Self {
        Self::Config(err.to_string())
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_exit_codes() {
        assert_eq!(CliError::Cancelled.exit_code(), 0);
        assert_eq!(CliError::Interrupted.exit_code(), 130);
        assert_eq!(CliError::Arguments(String::new()).exit_code(), 2);
        assert_eq!(CliError::Config(String::new()).exit_code(), 78);
    }

    #[test]
    fn test_model_list_read_maps_to_io() {
        let err: CliError = ModelListError::Read {
            path: PathBuf::from("models.txt"),
            reason: "missing".to_string(),
        }
        .into();
        assert!(matches!(err, CliError::Io(_)));

        let err: CliError = ModelListError::Empty.into();
        assert!(matches!(err, CliError::Arguments(_)));
    }

    #[test]
    fn test_cancelled_message() {
        assert_eq!(CliError::Cancelled.to_string(), "Operation cancelled.");
    }
}
