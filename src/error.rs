//! Error types for the snippet store, the merge engine and the CLI boundary.

use crate::store::{Bucket, DocumentName};
use std::path::PathBuf;
use thiserror::Error;

/// Storage-related errors
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Document '{name}' not found in {bucket}")]
    NotFound { bucket: Bucket, name: DocumentName },

    #[error("Invalid JSON in {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid document name: {0:?}")]
    InvalidName(String),

    #[error("Source file not found: {}", .0.display())]
    SourceNotFound(PathBuf),

    #[error("Document '{0}' is still active; disable it before removing")]
    StillActive(DocumentName),

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl StoreError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        StoreError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Errors raised by a combine run.
#[derive(Debug, Error)]
pub enum CombineError {
    /// Reading an active document failed; nothing was written.
    #[error("Failed to read active document '{name}'")]
    Document {
        name: DocumentName,
        #[source]
        source: StoreError,
    },

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Errors surfaced at the CLI boundary.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Combine(#[from] CombineError),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("No combined configuration exists yet at {}. Run `mcpmerge combine` first.", .0.display())]
    NoCombined(PathBuf),

    #[error("Failed to render output: {0}")]
    Render(String),
}

impl From<config::ConfigError> for ApiError {
    fn from(err: config::ConfigError) -> Self {
        ApiError::ConfigError(err.to_string())
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Render(err.to_string())
    }
}
