//! # GridPOS Server
//!
//! Entry point: wires diagnostics, state, and the router, then serves.

mod error;
mod routes;
mod state;

use std::sync::Arc;

use tracing::info;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use gridpos_store::Options;

use crate::state::AppState;

const DEFAULT_PORT: u16 = 8091;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gridpos_server=debug,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let options_path = Options::path_from_env();
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(DEFAULT_PORT);

    let state = Arc::new(AppState::new(options_path.clone(), port));
    let app = routes::router(state);

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port)).await?;
    info!(port, options = %options_path.display(), "GridPOS server listening");
    axum::serve(listener, app).await?;
    Ok(())
}
