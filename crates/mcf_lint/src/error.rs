//! Error types for the schema linter.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for lint operations.
pub type LintResult<T> = Result<T, LintError>;

/// Errors that can occur while linting schemas.
#[derive(Error, Debug)]
pub enum LintError {
    #[error("schema lint failed: {rule} at {location}: {message}")]
    SchemaLintFailed {
        rule: String,
        location: String,
        message: String,
    },

    #[error("invalid schema file {path}: {message}")]
    InvalidSchemaFile { path: PathBuf, message: String },

    #[error("invalid file pattern: {0}")]
    InvalidPattern(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
