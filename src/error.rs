use std::path::PathBuf;

use thiserror::Error;

/// Failure raised by every check in this crate. The message is the whole
/// diagnostic; there are no codes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct EnsureError {
    message: String,
}

impl EnsureError {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub(crate) fn too_many_arguments(expected: usize, actual: usize) -> Self {
        Self::new(format!(
            "Function called with too many arguments: expected {expected} but got {actual}"
        ))
    }

    pub(crate) fn type_mismatch(name: &str, expected: &str, actual: &str) -> Self {
        Self::new(format!("{name} must be {expected}, but it was {actual}"))
    }
}

/// Problems reading signatures or argument documents. Kept apart from
/// `EnsureError` so callers can tell bad input files from failed checks.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("at JSON path {json_path} → {message}")]
    Decode { json_path: String, message: String },

    #[error("JSON pointer {pointer} selects nothing")]
    PointerMiss { pointer: String },

    #[error("invalid glob pattern `{pattern}`: {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },

    #[error(transparent)]
    Glob(#[from] glob::GlobError),

    #[error("glob pattern matched no files: {0}")]
    NoMatches(String),
}
