//! Error types for baseline-core.

use std::path::PathBuf;

use thiserror::Error;

/// A requested configuration that falls outside the allowed value domain.
///
/// Always raised before any network or process call is made.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A field value is not a member of its enumerated domain.
    #[error("invalid {field} '{value}'; expected one of: {expected}")]
    UnknownValue {
        field: &'static str,
        value: String,
        expected: String,
    },

    /// Every field is valid on its own but the combination is not offered.
    #[error("invalid {field}: {reason}")]
    Combination { field: &'static str, reason: String },
}

/// All errors that can arise from state store operations.
#[derive(Debug, Error)]
pub enum StateError {
    /// Underlying I/O failure, with the path that was being touched.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The state file exists but is not a valid record mapping.
    #[error("failed to parse state file at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// JSON serialization error (save path).
    #[error("state serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> StateError {
    StateError::Io {
        path: path.into(),
        source,
    }
}
