//! Model-list source for batch runs.
//!
//! Two forms are accepted:
//! - line-delimited text, one model per line, with blank lines and `#`
//!   comments ignored;
//! - a JSON array of strings.
//!
//! Duplicates are dropped, keeping the first occurrence's position.

use std::fs;
use std::path::{Path, PathBuf};

use indexmap::IndexSet;
use thiserror::Error;

use crate::domain::{ModelId, ModelIdError};

/// Errors raised while loading a model list.
#[derive(Debug, Error)]
pub enum ModelListError {
    #[error("Failed to read model list {path}: {reason}")]
    Read { path: PathBuf, reason: String },

    #[error("Invalid JSON model list: {0}")]
    Json(String),

    #[error("Invalid model on line {line}: {source}")]
    InvalidEntry {
        line: usize,
        #[source]
        source: ModelIdError,
    },

    #[error("Model list contains no models")]
    Empty,
}

/// Read and parse a model list file.
pub fn load_model_list(path: &Path) -> Result<Vec<ModelId>, ModelListError> {
    let content = fs::read_to_string(path).map_err(|e| ModelListError::Read {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    parse_model_list(&content)
}

/// Parse model-list text in either supported form.
pub fn parse_model_list(content: &str) -> Result<Vec<ModelId>, ModelListError> {
    let entries: Vec<(usize, String)> = if content.trim_start().starts_with('[') {
        let raw: Vec<String> =
            serde_json::from_str(content).map_err(|e| ModelListError::Json(e.to_string()))?;
        raw.into_iter()
            .enumerate()
            .map(|(i, s)| (i + 1, s))
            .filter(|(_, s)| !s.trim().is_empty())
            .collect()
    } else {
        content
            .lines()
            .enumerate()
            .map(|(i, line)| (i + 1, strip_comment(line).trim().to_string()))
            .filter(|(_, s)| !s.is_empty())
            .collect()
    };

    let mut models = IndexSet::new();
    for (line, entry) in entries {
        let id = ModelId::parse(&entry)
            .map_err(|source| ModelListError::InvalidEntry { line, source })?;
        models.insert(id);
    }

    if models.is_empty() {
        return Err(ModelListError::Empty);
    }
    Ok(models.into_iter().collect())
}

fn strip_comment(line: &str) -> &str {
    line.split_once('#').map_or(line, |(before, _)| before)
}
