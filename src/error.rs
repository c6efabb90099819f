//! Error types for the cell magics.
//!
//! Uses thiserror for derive macros. Engine and YAML errors are wrapped
//! unchanged so callers can still inspect line numbers and kinds.

use crate::exit_codes;
use thiserror::Error;

/// Main error type for magic command handling.
#[derive(Error, Debug)]
pub enum MagicError {
    /// The command line could not be parsed (unknown or conflicting flags).
    #[error("{0}")]
    Usage(String),

    /// The arguments parsed but describe an invalid request.
    #[error("Validation failed: {0}")]
    Validation(String),

    /// A template name was missing or malformed.
    #[error("Invalid template name: {0}")]
    Name(String),

    /// The template engine failed to compile or render.
    #[error("Template error: {0}")]
    Template(#[from] minijinja::Error),

    /// The YAML body could not be deserialized.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Session configuration could not be loaded or is invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A cell script is malformed.
    #[error("Notebook error: {0}")]
    Notebook(String),

    /// A file could not be read or written.
    #[error("{0}")]
    Io(String),
}

impl MagicError {
    /// Returns the CLI exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            MagicError::Usage(_) => exit_codes::USER_ERROR,
            MagicError::Validation(_) | MagicError::Name(_) => exit_codes::VALIDATION_FAILURE,
            MagicError::Template(_) => exit_codes::TEMPLATE_FAILURE,
            MagicError::Yaml(_) => exit_codes::YAML_FAILURE,
            MagicError::Config(_) | MagicError::Notebook(_) | MagicError::Io(_) => {
                exit_codes::USER_ERROR
            }
        }
    }
}

/// Result type alias for magic operations.
pub type Result<T> = std::result::Result<T, MagicError>;
