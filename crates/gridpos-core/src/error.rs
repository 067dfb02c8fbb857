//! # Validation Errors
//!
//! Input validation failures raised before any store access is attempted.
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Errors are enum variants, never String
//! 3. Each variant maps to a client-error response in the API layer

use thiserror::Error;

/// Request validation errors.
///
/// These are raised by the sale processor before it touches the store;
/// the API layer surfaces them as 400 responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A sale line carried neither identifying key.
    #[error("product_id or short_id required")]
    MissingProductKey,

    /// A checkout arrived with no items.
    #[error("checkout requires at least one item")]
    EmptyCheckout,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(
            ValidationError::MissingProductKey.to_string(),
            "product_id or short_id required"
        );
        assert_eq!(
            ValidationError::EmptyCheckout.to_string(),
            "checkout requires at least one item"
        );
    }
}
