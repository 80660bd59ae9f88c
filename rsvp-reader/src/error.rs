//! Error types for rsvp-reader
//!
//! Defines module-specific error types using thiserror for clear error propagation.

use thiserror::Error;
use uuid::Uuid;

/// Main error type for rsvp-reader
#[derive(Error, Debug)]
pub enum Error {
    /// Errors bubbled up from the shared library (database, clipboard, config)
    #[error(transparent)]
    Common(#[from] rsvp_common::Error),

    /// No document with this id in the session
    #[error("Document not found: {0}")]
    DocumentNotFound(Uuid),

    /// Speed outside the speed menu
    #[error("Invalid speed: {0}")]
    InvalidSpeed(u32),

    /// HTTP server errors
    #[error("HTTP server error: {0}")]
    Http(String),
}

/// Convenience Result type using rsvp-reader Error
pub type Result<T> = std::result::Result<T, Error>;
