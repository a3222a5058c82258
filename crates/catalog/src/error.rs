//! Error types for the catalog crate.
//!
//! Every store operation returns [`Result`], so callers can tell a missing
//! record apart from a broken snapshot file.

use thiserror::Error;

/// Errors that can occur while reading, mutating or persisting the store
#[derive(Error, Debug)]
pub enum CatalogError {
    /// Referenced entity doesn't exist (e.g. watchlist toggle for an unknown user)
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// Another account already uses this email address
    #[error("Email already exists: {0}")]
    EmailTaken(String),

    /// A data field had an invalid value
    #[error("Invalid value for {field}: {value}")]
    InvalidValue { field: String, value: String },

    /// Snapshot contents failed an integrity check
    #[error("Validation failed: {0}")]
    Validation(String),

    /// I/O error occurred while reading or writing the snapshot
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Snapshot was not valid JSON or didn't match the record layout
    #[error("Malformed snapshot: {0}")]
    Json(#[from] serde_json::Error),
}

impl CatalogError {
    pub fn not_found(entity: &str, id: impl Into<String>) -> Self {
        CatalogError::NotFound {
            entity: entity.to_string(),
            id: id.into(),
        }
    }
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, CatalogError>;
