//! # Route Handlers
//!
//! Thin translations between HTTP and the sale processor. All domain
//! decisions live below this layer; handlers deserialize, delegate, and
//! serialize.

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use gridpos_core::Record;
use gridpos_sales::{CheckoutOutcome, CheckoutRequest, SaleOutcome, SaleRequest};

use crate::error::ApiError;
use crate::state::AppState;

/// Builds the application router.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/pos/users", get(list_users))
        .route("/pos/customers", get(list_customers))
        .route("/pos/stock", get(list_stock))
        .route("/pos/sale", post(record_sale))
        .route("/pos/checkout", post(checkout))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

// =============================================================================
// Handlers
// =============================================================================

async fn health(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    Json(json!({ "status": "ok", "port": state.port() }))
}

async fn list_users(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Record>>, ApiError> {
    let processor = state.processor().await?;
    Ok(Json(processor.list_users().await?))
}

async fn list_customers(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Record>>, ApiError> {
    let processor = state.processor().await?;
    Ok(Json(processor.list_customers().await?))
}

#[derive(Debug, Deserialize)]
struct StockQuery {
    reseller_id: Option<String>,
    user_id: Option<String>,
}

async fn list_stock(
    State(state): State<Arc<AppState>>,
    Query(query): Query<StockQuery>,
) -> Result<Json<Vec<Record>>, ApiError> {
    let processor = state.processor().await?;
    let rows = processor
        .list_stock(query.reseller_id.as_deref(), query.user_id.as_deref())
        .await?;
    Ok(Json(rows))
}

async fn record_sale(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SaleRequest>,
) -> Result<Json<SaleOutcome>, ApiError> {
    let processor = state.processor().await?;
    Ok(Json(processor.record_sale(request).await?))
}

async fn checkout(
    State(state): State<Arc<AppState>>,
    Json(request): Json<CheckoutRequest>,
) -> Result<Json<CheckoutOutcome>, ApiError> {
    let processor = state.processor().await?;
    Ok(Json(processor.checkout(request).await?))
}
