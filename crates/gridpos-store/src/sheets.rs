//! # Sheets Store
//!
//! `TabularStore` implementation over a Sheets-style values HTTP API.
//!
//! ## Request Map
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  read_tab    GET  {base}/v4/spreadsheets/{id}/values/{tab}              │
//! │  append_row  POST {base}/v4/spreadsheets/{id}/values/{tab}!A:Z:append   │
//! │                   ?valueInputOption=RAW                                 │
//! │  update_row  PUT  {base}/v4/spreadsheets/{id}/values/{tab}!A{n}:{c}{n}  │
//! │                   ?valueInputOption=RAW                                 │
//! │                                                                         │
//! │  Every request carries a bearer token from StoreAuth.                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Cells arrive from the wire as arbitrary JSON values; this module
//! coerces them to strings at the boundary so everything above it deals
//! in strings only. `valueInputOption=RAW` on writes keeps the store
//! from re-interpreting what we send.

use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;

use crate::auth::StoreAuth;
use crate::error::{StoreError, StoreResult};
use crate::tabular::TabularStore;

/// Default base URL of the values API.
pub const DEFAULT_BASE_URL: &str = "https://sheets.googleapis.com";

/// Per-request timeout for store calls.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Longest error-body excerpt carried into a [`StoreError::Api`].
const BODY_PREVIEW_LIMIT: usize = 200;

// =============================================================================
// Wire Types
// =============================================================================

#[derive(Debug, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<Value>>,
}

// =============================================================================
// Sheets Store
// =============================================================================

/// HTTP-backed tabular store.
pub struct SheetsStore {
    http: reqwest::Client,
    auth: Arc<StoreAuth>,
    base_url: String,
    sheet_id: String,
}

impl SheetsStore {
    /// Creates a store against the default API endpoint.
    pub fn new(auth: Arc<StoreAuth>, sheet_id: impl Into<String>) -> StoreResult<Self> {
        Self::with_base_url(auth, sheet_id, DEFAULT_BASE_URL)
    }

    /// Creates a store against a custom endpoint (test servers, proxies).
    pub fn with_base_url(
        auth: Arc<StoreAuth>,
        sheet_id: impl Into<String>,
        base_url: impl Into<String>,
    ) -> StoreResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(StoreError::from)?;
        Ok(Self {
            http,
            auth,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            sheet_id: sheet_id.into(),
        })
    }

    fn values_url(&self, range: &str) -> String {
        format!(
            "{}/v4/spreadsheets/{}/values/{}",
            self.base_url, self.sheet_id, range
        )
    }

    /// Turns a non-success response into a `StoreError::Api` carrying a
    /// short excerpt of the body.
    async fn check_status(response: reqwest::Response) -> StoreResult<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        let preview: String = body.chars().take(BODY_PREVIEW_LIMIT).collect();
        Err(StoreError::Api {
            status: status.as_u16(),
            message: preview,
        })
    }
}

#[async_trait::async_trait]
impl TabularStore for SheetsStore {
    async fn read_tab(&self, tab: &str) -> StoreResult<Vec<Vec<String>>> {
        let token = self.auth.bearer_token().await?;
        let response = self
            .http
            .get(self.values_url(tab))
            .bearer_auth(token)
            .send()
            .await?;
        let response = Self::check_status(response).await?;
        let range: ValueRange = response
            .json()
            .await
            .map_err(|e| StoreError::decode(format!("invalid values response: {e}")))?;

        let rows: Vec<Vec<String>> = range
            .values
            .into_iter()
            .map(|row| row.into_iter().map(cell_to_string).collect())
            .collect();
        debug!(tab, rows = rows.len(), "Read tab from store");
        Ok(rows)
    }

    async fn append_row(&self, tab: &str, row: Vec<String>) -> StoreResult<()> {
        let token = self.auth.bearer_token().await?;
        let url = format!("{}:append", self.values_url(&format!("{tab}!A:Z")));
        let response = self
            .http
            .post(url)
            .query(&[("valueInputOption", "RAW")])
            .bearer_auth(token)
            .json(&json!({ "values": [row] }))
            .send()
            .await?;
        Self::check_status(response).await?;
        debug!(tab, "Appended row to store");
        Ok(())
    }

    async fn update_row(&self, tab: &str, row_idx: usize, row: Vec<String>) -> StoreResult<()> {
        let token = self.auth.bearer_token().await?;
        let range = row_range(tab, row_idx, row.len());
        let response = self
            .http
            .put(self.values_url(&range))
            .query(&[("valueInputOption", "RAW")])
            .bearer_auth(token)
            .json(&json!({ "values": [row] }))
            .send()
            .await?;
        Self::check_status(response).await?;
        debug!(tab, row_idx, "Updated row in store");
        Ok(())
    }
}

// =============================================================================
// Cell and Range Helpers
// =============================================================================

/// Coerces one wire cell to the string form the rest of the system uses.
/// Numbers keep their JSON rendering, null becomes the empty string.
fn cell_to_string(value: Value) -> String {
    match value {
        Value::String(s) => s,
        Value::Null => String::new(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        other => other.to_string(),
    }
}

/// A1-style column letter for a 1-based column index (1 → A, 27 → AA).
fn column_letter(mut col: usize) -> String {
    let mut letters = Vec::new();
    while col > 0 {
        let rem = (col - 1) % 26;
        letters.push(b'A' + rem as u8);
        col = (col - 1) / 26;
    }
    letters.reverse();
    String::from_utf8(letters).unwrap_or_default()
}

/// A1 range covering one full row of `width` cells at a 1-based sheet
/// position, e.g. `row_range("Stock", 3, 4)` → `"Stock!A3:D3"`.
fn row_range(tab: &str, row_idx: usize, width: usize) -> String {
    let last_col = column_letter(width.max(1));
    format!("{tab}!A{row_idx}:{last_col}{row_idx}")
}

// =============================================================================
// Unit Tests
// =============================================================================
