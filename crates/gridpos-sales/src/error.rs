//! # Sale Error Types
//!
//! Errors produced by the sale pipeline. The HTTP layer maps these onto
//! status codes; nothing in this crate decides presentation.

use thiserror::Error;

use gridpos_core::ValidationError;
use gridpos_store::StoreError;

/// Sale pipeline errors.
#[derive(Debug, Error)]
pub enum SaleError {
    /// The request failed validation before any store access.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// No product matched the supplied key(s).
    #[error("product not found: {0}")]
    ProductNotFound(String),

    /// A store read or the sale-log append failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Result type for sale operations.
pub type SaleResult<T> = Result<T, SaleError>;
