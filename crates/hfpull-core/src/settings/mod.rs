//! User settings domain type and its INI-backed store.
//!
//! Settings remember the last-used output directory and proxy so repeat
//! runs need fewer flags. They are pure data; persistence is behind the
//! [`SettingsStore`](crate::ports::SettingsStore) port.

mod ini;

pub use ini::{
    CONFIG_FILE_NAME, CONFIG_PATH_ENV, CONFIG_SECTION, IniSettingsStore, config_file_path,
};

/// Persisted user settings.
///
/// All fields are optional; an empty store yields `UserSettings::default()`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserSettings {
    /// Last-used output root directory.
    pub output_dir: Option<String>,

    /// Last-used proxy URL.
    pub proxy: Option<String>,
}

impl UserSettings {
    /// Record the values used for a run.
    ///
    /// Blank or missing values never erase what is already stored, so a run
    /// without `--proxy` keeps the remembered proxy.
    pub fn remember(&mut self, output_dir: Option<&str>, proxy: Option<&str>) {
        if let Some(dir) = non_blank(output_dir) {
            self.output_dir = Some(dir.to_string());
        }
        if let Some(proxy) = non_blank(proxy) {
            self.proxy = Some(proxy.to_string());
        }
    }

    /// Effective output directory (trimmed, non-blank).
    pub fn output_dir(&self) -> Option<&str> {
        non_blank(self.output_dir.as_deref())
    }

    /// Effective proxy (trimmed, non-blank).
    pub fn proxy(&self) -> Option<&str> {
        non_blank(self.proxy.as_deref())
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
