//! Error types for CLI operations.

use std::path::PathBuf;

use thiserror::Error;
use timebase::TimestampParseError;

/// CLI-specific error types
#[derive(Error, Debug)]
pub enum CliError {
    /// Configuration file not found
    #[error("Configuration file not found: {path}")]
    ConfigNotFound { path: PathBuf },

    /// Sample file could not be read
    #[error("Failed to read samples for modality '{modality}' from {path}: {source}")]
    SampleRead {
        modality: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Sample file has a malformed line
    #[error("Malformed samples for modality '{modality}' in {path}: {source}")]
    SampleParse {
        modality: String,
        path: PathBuf,
        #[source]
        source: TimestampParseError,
    },

    /// Alignment task panicked or was cancelled
    #[error("Alignment task for modality '{modality}' failed: {message}")]
    Task { modality: String, message: String },
}

impl CliError {
    pub fn config_not_found(path: impl Into<PathBuf>) -> Self {
        Self::ConfigNotFound { path: path.into() }
    }

    pub fn task(modality: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Task {
            modality: modality.into(),
            message: message.into(),
        }
    }
}
