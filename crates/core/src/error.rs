// Central Error Type for the Application

use thiserror::Error;

/// Application-level error type
///
/// Handlers return this; the RPC layer maps each variant onto a wire
/// error code.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Domain error: {0}")]
    Domain(#[from] crate::domain::DomainError),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Store error: {0}")]
    Store(String),
}

/// Result type alias using AppError
pub type Result<T> = std::result::Result<T, AppError>;
