//! Port definitions (trait abstractions) for external systems.
//!
//! Ports define the interfaces that the core domain expects from infrastructure.
//! They contain no implementation details and use only domain types.
//!
//! # Design Rules
//!
//! - No process spawning or mount-table probing in core
//! - Subprocess results are typed enums, never parsed text
//! - Traits are minimal so tests can substitute fakes

pub mod download_client;
pub mod settings_store;
pub mod system_probe;

pub use download_client::{
    ClientInvocation, ClientOutcome, DownloadClientError, DownloadClientPort,
};
pub use settings_store::{SettingsError, SettingsStore};
pub use system_probe::{AcceleratorProbe, DiskProbeError, DiskSpaceProbe};
