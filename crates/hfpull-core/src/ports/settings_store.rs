//! Settings store trait definition.
//!
//! This port defines the interface for persisting user settings between
//! runs. It is loaded once before a run and saved once after inputs are
//! resolved; the orchestrator never touches it.

use std::path::PathBuf;

use thiserror::Error;

use crate::settings::UserSettings;

/// Errors raised by settings persistence.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Failed to read settings from {path}: {reason}")]
    Read { path: PathBuf, reason: String },

    #[error("Failed to write settings to {path}: {reason}")]
    Write { path: PathBuf, reason: String },
}

/// Store for user settings persistence.
///
/// # Design Rules
///
/// - Returns default (empty) settings when nothing is stored yet
/// - Saving must not discard unrelated content of the backing file
pub trait SettingsStore: Send + Sync {
    /// Load user settings.
    fn load(&self) -> Result<UserSettings, SettingsError>;

    /// Save user settings.
    fn save(&self, settings: &UserSettings) -> Result<(), SettingsError>;
}
