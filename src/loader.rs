//! Schema file loading
//!
//! Reads form schemas declared as JSON data.

use std::path::{Path, PathBuf};

use crate::error::SchemaError;
use crate::schema::FormSchema;

/// Returns the schema file path.
///
/// Priority:
/// 1. Environment variable `FORM_SCHEMA_PATH`
/// 2. Default path `./assets/form-schema.json`
pub fn get_schema_path() -> PathBuf {
    std::env::var("FORM_SCHEMA_PATH")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("./assets/form-schema.json"))
}

/// Loads a form schema from the path returned by [`get_schema_path`].
///
/// # Errors
///
/// Returns error if:
/// - File does not exist
/// - File cannot be read
/// - File is empty
/// - File is not a valid schema (bad JSON, bad pattern, duplicate field,
///   unknown cross-field reference)
pub fn load_schema() -> Result<FormSchema, SchemaError> {
    let path = get_schema_path();
    load_schema_from_path(&path)
}

/// Loads a form schema from a specific file path.
///
/// ```json
/// {"fields": [
///   {"field": "phone", "validators": [
///     {"rule": "nullable"},
///     {"rule": "pattern", "pattern": "^[0-9]{10,15}$", "message": "Phone number must be 10-15 digits"}
///   ]}
/// ]}
/// ```
pub fn load_schema_from_path<P: AsRef<Path>>(path: P) -> Result<FormSchema, SchemaError> {
    let path = path.as_ref();

    if !path.exists() {
        #[cfg(feature = "tracing")]
        tracing::error!("Schema load FAILED: FileNotFound {:?}", path);
        return Err(SchemaError::FileNotFound(path.to_path_buf()));
    }

    let content = std::fs::read_to_string(path)?;

    if content.trim().is_empty() {
        #[cfg(feature = "tracing")]
        tracing::error!("Schema load FAILED: Empty file {:?}", path);
        return Err(SchemaError::EmptyFile);
    }

    let schema: FormSchema = serde_json::from_str(&content)?;

    #[cfg(feature = "tracing")]
    tracing::info!("Schema loaded: {} fields from {:?}", schema.rules().len(), path);

    Ok(schema)
}
