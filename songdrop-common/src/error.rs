//! Common error types for Songdrop

use thiserror::Error;

/// Common result type for Songdrop operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error taxonomy shared by the queue manager and the HTTP layer.
///
/// Validation, duplicate-reference, not-found, invalid-order and conflict
/// errors are caller mistakes and carry enough detail to correct the input.
/// Database errors are transient storage failures; the core never retries
/// them internally.
#[derive(Error, Debug)]
pub enum Error {
    /// Missing or malformed required field on submission
    #[error("Validation error: {0}")]
    Validation(String),

    /// Payment reference already tied to an existing request
    #[error("Duplicate payment reference: {0}")]
    DuplicateReference(String),

    /// Requested record not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Malformed reorder payload
    #[error("Invalid order payload: {0}")]
    InvalidOrder(String),

    /// Attempted transition between conflicting terminal states
    #[error("Conflicting status transition: {0}")]
    Conflict(String),

    /// Database operation error (wraps sqlx::Error)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}
