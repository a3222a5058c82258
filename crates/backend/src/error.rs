//! Error types for the backend facade.

use catalog::CatalogError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    /// No account matches the supplied email
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// The acting user may not perform this operation
    #[error("User {0} is not allowed to do that")]
    Forbidden(String),

    /// Request data failed validation before reaching the store
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error(transparent)]
    Store(#[from] CatalogError),

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, BackendError>;
