//! # hfpull-core
//!
//! Domain types and port definitions for hfpull.
//!
//! - `domain` - model identifiers, download jobs, job outcomes
//! - `ports` - traits for the download client, system probes, settings store
//! - `settings` - user settings and the INI store
//! - `model_list` - batch model-list parsing
//!
//! Nothing in this crate spawns processes or probes the system.

pub mod domain;
pub mod model_list;
pub mod ports;
pub mod settings;

// Re-export commonly used types for convenience
pub use domain::{
    AttemptFailure, DEFAULT_HUB_ENDPOINT, DEFAULT_MAX_ATTEMPTS, DownloadJob, JobOutcome, ModelId,
    ModelIdError, sanitize_model_name,
};
pub use model_list::{ModelListError, load_model_list, parse_model_list};
pub use ports::{
    AcceleratorProbe, ClientInvocation, ClientOutcome, DiskProbeError, DiskSpaceProbe,
    DownloadClientError, DownloadClientPort, SettingsError, SettingsStore,
};
pub use settings::{
    CONFIG_FILE_NAME, CONFIG_PATH_ENV, CONFIG_SECTION, IniSettingsStore, UserSettings,
    config_file_path,
};
