//! # Event Notification
//!
//! Fire-and-forget notifications to an external event bus after a sale
//! lands in the log.
//!
//! ## Delivery Contract
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  POST {bus_url}/api/events/{event}                                      │
//! │  Authorization: Bearer {token}          (when configured)               │
//! │  Body: the sale payload as JSON                                         │
//! │                                                                         │
//! │  • 5 second timeout                                                     │
//! │  • No retries                                                           │
//! │  • Failures are logged by the caller and never fail the sale            │
//! │  • No bus configured ⇒ NullEventSink, publishing is a no-op             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use gridpos_store::{StoreError, StoreResult};

/// Timeout for one notification attempt.
const NOTIFY_TIMEOUT: Duration = Duration::from_secs(5);

/// Destination for post-sale events.
#[async_trait]
pub trait EventSink: Send + Sync {
    /// Publishes one event. Callers treat failure as advisory.
    async fn publish(&self, event: &str, payload: Value) -> StoreResult<()>;
}

// =============================================================================
// HTTP Sink
// =============================================================================

/// Event sink posting to an HTTP event bus.
pub struct HttpEventSink {
    http: reqwest::Client,
    bus_url: String,
    token: Option<String>,
}

impl HttpEventSink {
    /// Creates a sink for the given bus. The token is attached as a
    /// bearer credential when present.
    pub fn new(bus_url: impl Into<String>, token: Option<String>) -> StoreResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(NOTIFY_TIMEOUT)
            .build()
            .map_err(StoreError::from)?;
        Ok(Self {
            http,
            bus_url: bus_url.into().trim_end_matches('/').to_string(),
            token,
        })
    }
}

#[async_trait]
impl EventSink for HttpEventSink {
    async fn publish(&self, event: &str, payload: Value) -> StoreResult<()> {
        let url = format!("{}/api/events/{}", self.bus_url, event);
        let mut request = self.http.post(&url).json(&payload);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(StoreError::Api {
                status: status.as_u16(),
                message: format!("event bus rejected {event}"),
            });
        }
        debug!(event, "Published bus event");
        Ok(())
    }
}

// =============================================================================
// Null Sink
// =============================================================================

/// Sink used when no event bus is configured.
#[derive(Debug, Default)]
pub struct NullEventSink;

#[async_trait]
impl EventSink for NullEventSink {
    async fn publish(&self, _event: &str, _payload: Value) -> StoreResult<()> {
        Ok(())
    }
}
