//! # Store Error Types
//!
//! Error types for remote store operations.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  reqwest::Error / HTTP status                                           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  StoreError (this module) ← Adds categorization                         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SaleError::Store (gridpos-sales) ← Aborts the operation in flight      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ApiError (apps/server) ← Serialized as a 5xx response                  │
//! │                                                                         │
//! │  Store failures are never retried; rows appended before the failure     │
//! │  remain in the log.                                                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

/// Remote store operation errors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The remote call did not complete within the client timeout.
    #[error("store request timed out: {0}")]
    Timeout(String),

    /// Connection-level failure talking to the store.
    #[error("store transport error: {0}")]
    Transport(String),

    /// The store answered with a non-success HTTP status.
    #[error("store rejected request ({status}): {message}")]
    Api { status: u16, message: String },

    /// The store's response body could not be decoded.
    #[error("could not decode store response: {0}")]
    Decode(String),

    /// Authentication with the store failed (key load, assertion
    /// signing, or token exchange).
    #[error("store authentication failed: {0}")]
    Auth(String),

    /// The options bundle could not be read or parsed.
    #[error("options error: {0}")]
    Options(String),
}

impl StoreError {
    /// Creates a Decode error.
    pub fn decode(message: impl Into<String>) -> Self {
        StoreError::Decode(message.into())
    }

    /// Creates an Auth error.
    pub fn auth(message: impl Into<String>) -> Self {
        StoreError::Auth(message.into())
    }
}

/// Convert reqwest errors to StoreError.
///
/// ## Error Mapping
/// ```text
/// timeout            → StoreError::Timeout
/// decode             → StoreError::Decode
/// everything else    → StoreError::Transport
/// ```
impl From<reqwest::Error> for StoreError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            StoreError::Timeout(err.to_string())
        } else if err.is_decode() {
            StoreError::Decode(err.to_string())
        } else {
            StoreError::Transport(err.to_string())
        }
    }
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
