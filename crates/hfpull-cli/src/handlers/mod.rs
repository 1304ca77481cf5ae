//! Command handlers.
//!
//! Handlers follow the canonical pattern:
//! - Signature: `pub async fn execute(ctx: &CliContext, ...) -> Result<()>`
//! - Thin wrappers that:
//!   1. Resolve CLI input (flags, settings, prompts)
//!   2. Call the orchestrator or settings store
//!   3. Format output for the terminal

pub mod config;
pub mod download;
