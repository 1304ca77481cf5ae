//! Hub model identifiers.

use std::fmt;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Characters that cannot appear in a directory name derived from a model id.
const PATH_SEPARATORS: [char; 3] = ['/', '\\', ':'];

/// Replacement used for [`PATH_SEPARATORS`] when sanitizing.
const SEPARATOR_REPLACEMENT: &str = "-";

/// Default hub base URL used for manual follow-up links.
pub const DEFAULT_HUB_ENDPOINT: &str = "https://huggingface.co";

/// Errors produced while validating a model identifier.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ModelIdError {
    #[error("Model identifier cannot be empty")]
    Empty,

    #[error("Model identifier '{0}' contains whitespace")]
    Whitespace(String),

    #[error("Model identifier '{0}' does not map to a usable directory name")]
    ReservedName(String),
}

/// A validated hub repository identifier such as `"BAAI/bge-m3"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ModelId(String);

impl ModelId {
    /// Parse and validate a model identifier.
    ///
    /// Surrounding whitespace is trimmed. The identifier must be non-empty,
    /// contain no inner whitespace, and its sanitized form must not be `.`
    /// or `..` (which would escape the output directory).
    pub fn parse(raw: &str) -> Result<Self, ModelIdError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ModelIdError::Empty);
        }
        if trimmed.chars().any(char::is_whitespace) {
            return Err(ModelIdError::Whitespace(trimmed.to_string()));
        }
        let sanitized = sanitize_model_name(trimmed);
        if sanitized == "." || sanitized == ".." {
            return Err(ModelIdError::ReservedName(trimmed.to_string()));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// The identifier exactly as the hub knows it.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Filesystem-safe form of the identifier.
    pub fn sanitized(&self) -> String {
        sanitize_model_name(&self.0)
    }

    /// Final directory for this model under `output_root`.
    pub fn final_dir(&self, output_root: &Path) -> PathBuf {
        output_root.join(self.sanitized())
    }

    /// Hub page for manual inspection.
    ///
    /// Honours `HF_ENDPOINT` the same way the download client does.
    pub fn hub_url(&self) -> String {
        let endpoint = std::env::var("HF_ENDPOINT")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_HUB_ENDPOINT.to_string());
        format!("{}/{}", endpoint.trim_end_matches('/'), self.0)
    }
}

impl fmt::Display for ModelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for ModelId {
    type Err = ModelIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Sanitize a model name for use as a directory name.
///
/// Path separators (and the drive separator `:`) become `-`, so
/// `"org/model"` is stored under `org-model`.
pub fn sanitize_model_name(name: &str) -> String {
    name.replace(PATH_SEPARATORS, SEPARATOR_REPLACEMENT)
}
