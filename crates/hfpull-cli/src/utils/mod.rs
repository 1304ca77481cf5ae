//! Utility helpers for the CLI.

pub mod input;
