//! Error types for schema loading, store updates and submission.

use std::path::PathBuf;
use thiserror::Error;

use crate::schema::FieldErrors;

#[derive(Error, Debug)]
pub enum SchemaError {
    #[error("Schema file not found: {0}")]
    FileNotFound(PathBuf),
    #[error("Failed to read schema file: {0}")]
    ReadError(#[from] std::io::Error),
    #[error("Schema file is empty")]
    EmptyFile,
    #[error("Failed to parse schema: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid pattern `{pattern}`: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
    #[error("Field `{0}` is declared more than once")]
    DuplicateField(String),
    #[error("Field `{field}` references unknown field `{other}`")]
    UnknownReference { field: String, other: String },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormError {
    #[error("Field `{0}` is not part of this form")]
    UnknownField(String),
}

/// Why a submit attempt did not resolve with the handler's result.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SubmitError {
    #[error("A submission is already in flight")]
    Busy,
    #[error("Form has {} invalid field(s)", .0.len())]
    ValidationFailed(FieldErrors),
    #[error("{0}")]
    Handler(String),
    #[error("Submission cancelled")]
    Cancelled,
}

impl SubmitError {
    /// Returns `true` when the handler was never invoked for this attempt.
    pub fn is_rejected_before_handler(&self) -> bool {
        matches!(self, SubmitError::Busy | SubmitError::ValidationFailed(_))
    }
}
