//! System probe adapters.

mod disk;
mod python;

pub use disk::SysinfoDiskProbe;
pub use python::{ACCELERATOR_PACKAGE, PythonPackageProbe};
