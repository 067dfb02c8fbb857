//! # API Error Envelope
//!
//! Maps pipeline errors onto HTTP responses.
//!
//! ## Status Mapping
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  ValidationError            → 400  VALIDATION_FAILED                    │
//! │  SaleError::ProductNotFound → 404  PRODUCT_NOT_FOUND                    │
//! │  StoreError::Timeout        → 502  STORE_UNAVAILABLE                    │
//! │  StoreError::Transport      → 502  STORE_UNAVAILABLE                    │
//! │  StoreError::Api            → 502  STORE_REJECTED                       │
//! │  StoreError::Decode         → 502  STORE_DECODE_FAILED                  │
//! │  StoreError::Auth           → 500  STORE_AUTH_FAILED                    │
//! │  StoreError::Options        → 500  OPTIONS_INVALID                      │
//! │                                                                         │
//! │  Body: { "code": "...", "message": "..." }                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use serde_json::json;

use gridpos_sales::SaleError;
use gridpos_store::StoreError;

/// An error ready to serialize as an HTTP response.
#[derive(Debug, Serialize)]
pub struct ApiError {
    #[serde(skip)]
    status: StatusCode,
    pub code: &'static str,
    pub message: String,
}

impl ApiError {
    fn new(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            code,
            message: message.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = json!({ "code": self.code, "message": self.message });
        (self.status, Json(body)).into_response()
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        let message = err.to_string();
        match err {
            StoreError::Timeout(_) | StoreError::Transport(_) => {
                ApiError::new(StatusCode::BAD_GATEWAY, "STORE_UNAVAILABLE", message)
            }
            StoreError::Api { .. } => {
                ApiError::new(StatusCode::BAD_GATEWAY, "STORE_REJECTED", message)
            }
            StoreError::Decode(_) => {
                ApiError::new(StatusCode::BAD_GATEWAY, "STORE_DECODE_FAILED", message)
            }
            StoreError::Auth(_) => ApiError::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                "STORE_AUTH_FAILED",
                message,
            ),
            StoreError::Options(_) => ApiError::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                "OPTIONS_INVALID",
                message,
            ),
        }
    }
}

impl From<SaleError> for ApiError {
    fn from(err: SaleError) -> Self {
        match err {
            SaleError::Validation(e) => {
                ApiError::new(StatusCode::BAD_REQUEST, "VALIDATION_FAILED", e.to_string())
            }
            SaleError::ProductNotFound(key) => ApiError::new(
                StatusCode::NOT_FOUND,
                "PRODUCT_NOT_FOUND",
                format!("product not found: {key}"),
            ),
            SaleError::Store(e) => e.into(),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
