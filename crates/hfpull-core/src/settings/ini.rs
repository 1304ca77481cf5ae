//! INI settings file.
//!
//! Format:
//! ```text
//! [UserSettings]
//! output_dir = /data/models
//! proxy = http://127.0.0.1:7890
//! ```
//!
//! Only the managed keys of the `[UserSettings]` section are rewritten on
//! save; every other line of the file is kept as-is.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::UserSettings;
use crate::ports::{SettingsError, SettingsStore};

/// Settings file name, relative to the working directory.
pub const CONFIG_FILE_NAME: &str = "config.ini";

/// Section holding the managed keys.
pub const CONFIG_SECTION: &str = "UserSettings";

/// Environment variable overriding the settings file location.
pub const CONFIG_PATH_ENV: &str = "HFPULL_CONFIG";

const KEY_OUTPUT_DIR: &str = "output_dir";
const KEY_PROXY: &str = "proxy";
const MANAGED_KEYS: [&str; 2] = [KEY_OUTPUT_DIR, KEY_PROXY];

/// Location of the settings file.
///
/// Resolution order:
/// 1. `HFPULL_CONFIG` environment variable
/// 2. `config.ini` in the current working directory
pub fn config_file_path() -> PathBuf {
    std::env::var_os(CONFIG_PATH_ENV)
        .filter(|v| !v.is_empty())
        .map_or_else(|| PathBuf::from(CONFIG_FILE_NAME), PathBuf::from)
}

/// [`SettingsStore`] backed by an INI file.
#[derive(Debug, Clone)]
pub struct IniSettingsStore {
    path: PathBuf,
}

impl IniSettingsStore {
    /// Store reading and writing `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at [`config_file_path`].
    pub fn at_default_location() -> Self {
        Self::new(config_file_path())
    }

    /// Backing file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_existing(&self) -> Result<String, SettingsError> {
        match fs::read_to_string(&self.path) {
            Ok(content) => Ok(content),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(String::new()),
            Err(e) => Err(SettingsError::Read {
                path: self.path.clone(),
                reason: e.to_string(),
            }),
        }
    }
}

impl SettingsStore for IniSettingsStore {
    fn load(&self) -> Result<UserSettings, SettingsError> {
        let content = self.read_existing()?;
        let settings = parse_settings(&content);
        debug!(path = %self.path.display(), ?settings, "Loaded settings");
        Ok(settings)
    }

    fn save(&self, settings: &UserSettings) -> Result<(), SettingsError> {
        let existing = self.read_existing()?;
        let rendered = render_settings(&existing, settings);

        let write_err = |e: io::Error| SettingsError::Write {
            path: self.path.clone(),
            reason: e.to_string(),
        };

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(write_err)?;
        }
        fs::write(&self.path, rendered).map_err(write_err)?;

        debug!(path = %self.path.display(), "Saved settings");
        Ok(())
    }
}

/// Extract the managed keys from INI text.
fn parse_settings(content: &str) -> UserSettings {
    let mut settings = UserSettings::default();
    let mut in_section = false;

    for line in content.lines() {
        if let Some(name) = section_header(line) {
            in_section = name == CONFIG_SECTION;
            continue;
        }
        if !in_section {
            continue;
        }
        let Some((key, value)) = split_entry(line) else {
            continue;
        };
        if value.is_empty() {
            continue;
        }
        match key.as_str() {
            KEY_OUTPUT_DIR => settings.output_dir = Some(value.to_string()),
            KEY_PROXY => settings.proxy = Some(value.to_string()),
            _ => {}
        }
    }

    settings
}

/// Rewrite `existing` so its `[UserSettings]` section holds `settings`.
fn render_settings(existing: &str, settings: &UserSettings) -> String {
    let mut output: Vec<String> = Vec::new();
    let mut in_section = false;
    let mut section_written = false;

    for line in existing.lines() {
        if let Some(name) = section_header(line) {
            in_section = name == CONFIG_SECTION;
            output.push(line.to_string());
            if in_section && !section_written {
                push_managed(&mut output, settings);
                section_written = true;
            }
            continue;
        }

        let is_managed = in_section
            && split_entry(line).is_some_and(|(key, _)| MANAGED_KEYS.contains(&key.as_str()));
        if !is_managed {
            output.push(line.to_string());
        }
    }

    if !section_written {
        if output.last().is_some_and(|l| !l.trim().is_empty()) {
            output.push(String::new());
        }
        output.push(format!("[{CONFIG_SECTION}]"));
        push_managed(&mut output, settings);
    }

    let mut rendered = output.join("\n");
    rendered.push('\n');
    rendered
}

fn push_managed(output: &mut Vec<String>, settings: &UserSettings) {
    if let Some(dir) = settings.output_dir() {
        output.push(format!("{KEY_OUTPUT_DIR} = {dir}"));
    }
    if let Some(proxy) = settings.proxy() {
        output.push(format!("{KEY_PROXY} = {proxy}"));
    }
}

fn section_header(line: &str) -> Option<&str> {
    line.trim()
        .strip_prefix('[')?
        .strip_suffix(']')
        .map(str::trim)
}

/// Split `key = value` (or `key: value`) on the first delimiter.
fn split_entry(line: &str) -> Option<(String, &str)> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with(';') {
        return None;
    }
    let idx = trimmed.find(['=', ':'])?;
    let key = trimmed[..idx].trim().to_ascii_lowercase();
    let value = trimmed[idx + 1..].trim();
    Some((key, value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn parse_reads_managed_keys_only_from_section() {
        let content = "\
[Other]
output_dir = /wrong

[UserSettings]
output_dir = /data/models
proxy = http://127.0.0.1:7890
";
        let settings = parse_settings(content);
        assert_eq!(settings.output_dir.as_deref(), Some("/data/models"));
        assert_eq!(settings.proxy.as_deref(), Some("http://127.0.0.1:7890"));
    }

    #[test]
    fn parse_accepts_colon_delimiter_and_comments() {
        let content = "[UserSettings]\n# comment\nOutput_Dir: /m\n; proxy = ignored\n";
        let settings = parse_settings(content);
        assert_eq!(settings.output_dir.as_deref(), Some("/m"));
        assert!(settings.proxy.is_none());
    }

    #[test]
    fn render_appends_section_to_unrelated_content() {
        let settings = UserSettings {
            output_dir: Some("/m".to_string()),
            proxy: None,
        };
        let rendered = render_settings("[Other]\nkey = value", &settings);
        assert_eq!(
            rendered,
            "[Other]\nkey = value\n\n[UserSettings]\noutput_dir = /m\n"
        );
    }

    #[test]
    fn render_replaces_managed_keys_and_keeps_others() {
        let existing = "[UserSettings]\nproxy = old\ntheme = dark\noutput_dir = /old\n";
        let settings = UserSettings {
            output_dir: Some("/new".to_string()),
            proxy: Some("http://p:1".to_string()),
        };
        let rendered = render_settings(existing, &settings);
        assert_eq!(
            rendered,
            "[UserSettings]\noutput_dir = /new\nproxy = http://p:1\ntheme = dark\n"
        );
        assert_eq!(parse_settings(&rendered), settings);
    }

    #[test]
    fn store_load_missing_file_is_default() {
        let temp = tempdir().unwrap();
        let store = IniSettingsStore::new(temp.path().join("config.ini"));
        assert_eq!(store.load().unwrap(), UserSettings::default());
    }

    #[test]
    fn store_save_then_load() {
        let temp = tempdir().unwrap();
        let store = IniSettingsStore::new(temp.path().join("nested").join("config.ini"));
        let settings = UserSettings {
            output_dir: Some("/data/models".to_string()),
            proxy: Some("http://127.0.0.1:7890".to_string()),
        };

        store.save(&settings).unwrap();
        assert_eq!(store.load().unwrap(), settings);

        let on_disk = fs::read_to_string(store.path()).unwrap();
        assert!(on_disk.starts_with("[UserSettings]\n"));
    }
}
