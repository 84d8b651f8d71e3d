use std::path::PathBuf;

use thiserror::Error;

/// Convenience result type for generation operations.
pub type GenerationResult<T> = Result<T, GenerationError>;

/// Fatal error type returned by configuration and generation functions.
///
/// These are the conditions that stop a run before (or instead of) producing
/// output. Recoverable data-quality problems are not errors; they are reported
/// as [`crate::diagnostics::Diagnostic`]s and processing continues.
#[derive(Debug, Error)]
pub enum GenerationError {
    /// Underlying I/O error (e.g. permission denied, disk full).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV reading error.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// A required settings key is absent (or present with an empty value).
    #[error("settings do not contain the required parameter '{key}'")]
    MissingSetting { key: &'static str },

    /// A settings value failed validation.
    #[error("settings parameter '{key}' is invalid: {reason} (value='{value}')")]
    InvalidSetting {
        key: &'static str,
        value: String,
        reason: String,
    },

    /// The configured input file does not exist.
    #[error("input file '{}' does not exist", path.display())]
    InputNotFound { path: PathBuf },
}
