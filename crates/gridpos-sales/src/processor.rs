//! # Sale Processor
//!
//! The operations the HTTP surface exposes: catalog listings, single-sale
//! recording, and multi-line checkout.
//!
//! ## Write Semantics
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  The Sales tab is the ledger. Appending a sale row is the commit        │
//! │  point of every operation; stock decrements and bus events happen       │
//! │  after it and can only be lost, never block it.                         │
//! │                                                                         │
//! │  Checkout appends one row per line. A product lookup failure aborts     │
//! │  the loop and surfaces as an error, but rows already appended STAY      │
//! │  in the ledger. There are no transactions to roll back; the ledger      │
//! │  records what actually happened at the till.                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::json;
use tracing::{info, warn};

use gridpos_core::parse::num_or;
use gridpos_core::{
    find_product, find_user, map_rows, resolve_price, PriceQuote, Record, ValidationError,
};
use gridpos_store::{tabs, TabularStore};

use crate::error::{SaleError, SaleResult};
use crate::notify::EventSink;
use crate::stock;

/// Default customer for walk-in sales.
const DEFAULT_CUSTOMER: &str = "C-000";

/// Default payment method.
const DEFAULT_PAYMENT: &str = "cash";

/// Default bus event name.
const DEFAULT_EVENT: &str = "pos_sale";

// =============================================================================
// Requests
// =============================================================================

/// A single-sale request.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SaleRequest {
    pub user_id: String,
    pub reseller_id: String,
    pub product_id: Option<String>,
    pub short_id: Option<String>,
    #[serde(deserialize_with = "qty_or_one")]
    pub qty: i64,
    pub customer_id: String,
    pub payment_method: String,
}

impl Default for SaleRequest {
    fn default() -> Self {
        Self {
            user_id: String::new(),
            reseller_id: String::new(),
            product_id: None,
            short_id: None,
            qty: 1,
            customer_id: DEFAULT_CUSTOMER.to_string(),
            payment_method: DEFAULT_PAYMENT.to_string(),
        }
    }
}

/// One line of a checkout.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CheckoutItem {
    pub product_id: Option<String>,
    pub short_id: Option<String>,
    #[serde(deserialize_with = "qty_or_one")]
    pub qty: i64,
}

impl Default for CheckoutItem {
    fn default() -> Self {
        Self {
            product_id: None,
            short_id: None,
            qty: 1,
        }
    }
}

/// A multi-line checkout request.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CheckoutRequest {
    pub user_id: String,
    pub reseller_id: String,
    pub customer_id: String,
    pub payment_method: String,
    pub items: Vec<CheckoutItem>,
}

impl Default for CheckoutRequest {
    fn default() -> Self {
        Self {
            user_id: String::new(),
            reseller_id: String::new(),
            customer_id: DEFAULT_CUSTOMER.to_string(),
            payment_method: DEFAULT_PAYMENT.to_string(),
            items: Vec::new(),
        }
    }
}

// =============================================================================
// Outcomes
// =============================================================================

/// Result of one recorded sale.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleOutcome {
    pub product_id: String,
    pub qty: i64,
    pub price: f64,
    pub commission_pct: f64,
    pub total: f64,
    pub customer_id: String,
    pub payment_method: String,
}

/// Result of a checkout.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutOutcome {
    pub grand_total: f64,
    pub lines_written: usize,
    pub customer_id: String,
    pub payment_method: String,
}

// =============================================================================
// Processor
// =============================================================================

/// Sale pipeline over a tabular store and an event sink.
pub struct SaleProcessor<S: TabularStore> {
    store: S,
    sink: Arc<dyn EventSink>,
    event: String,
}

impl<S: TabularStore> SaleProcessor<S> {
    pub fn new(store: S, sink: Arc<dyn EventSink>) -> Self {
        Self::with_event(store, sink, DEFAULT_EVENT)
    }

    /// Creates a processor firing a custom bus event name.
    pub fn with_event(store: S, sink: Arc<dyn EventSink>, event: impl Into<String>) -> Self {
        Self {
            store,
            sink,
            event: event.into(),
        }
    }

    // -------------------------------------------------------------------------
    // Listings
    // -------------------------------------------------------------------------

    /// All user records.
    pub async fn list_users(&self) -> SaleResult<Vec<Record>> {
        Ok(map_rows(&self.store.read_tab(tabs::USERS).await?))
    }

    /// All customer records.
    pub async fn list_customers(&self) -> SaleResult<Vec<Record>> {
        Ok(map_rows(&self.store.read_tab(tabs::CUSTOMERS).await?))
    }

    /// Stock records, optionally filtered to one reseller.
    ///
    /// When `user_id` names a known user, that user's reseller association
    /// replaces an explicitly supplied `reseller_id` entirely - a user
    /// with no association sees the whole tab. With no filter at all, the
    /// whole tab is returned.
    pub async fn list_stock(
        &self,
        reseller_id: Option<&str>,
        user_id: Option<&str>,
    ) -> SaleResult<Vec<Record>> {
        let mut effective = reseller_id.unwrap_or("").to_string();

        if let Some(user_id) = user_id.filter(|u| !u.is_empty()) {
            let users = map_rows(&self.store.read_tab(tabs::USERS).await?);
            if let Some(user) = find_user(&users, user_id) {
                effective = user.get("reseller_id").to_string();
            }
        }

        let rows = map_rows(&self.store.read_tab(tabs::STOCK).await?);
        if effective.is_empty() {
            return Ok(rows);
        }
        Ok(rows
            .into_iter()
            .filter(|r| r.get("reseller_id") == effective)
            .collect())
    }

    // -------------------------------------------------------------------------
    // Sale Recording
    // -------------------------------------------------------------------------

    /// Records one sale: validates, prices, appends the ledger row, then
    /// runs the best-effort follow-ups.
    pub async fn record_sale(&self, request: SaleRequest) -> SaleResult<SaleOutcome> {
        require_product_key(request.product_id.as_deref(), request.short_id.as_deref())?;

        let person_entity_id = self.person_for(&request.user_id).await?;
        let products = map_rows(&self.store.read_tab(tabs::PRODUCTS).await?);
        let product = find_product(
            &products,
            request.product_id.as_deref(),
            request.short_id.as_deref(),
        )
        .ok_or_else(|| {
            SaleError::ProductNotFound(describe_key(
                request.product_id.as_deref(),
                request.short_id.as_deref(),
            ))
        })?;

        let pricing = map_rows(&self.store.read_tab(tabs::RESELLER_PRICING).await?);
        let line = price_line(&pricing, &request.reseller_id, product, request.qty);

        self.append_sale(&person_entity_id, &request, &line).await?;
        self.settle_stock(&line, &request.reseller_id).await?;

        info!(
            product_id = %line.product_id,
            qty = line.qty,
            total = line.total,
            "Sale recorded"
        );

        self.fire_event(json!({
            "user_id": request.user_id,
            "person_entity_id": person_entity_id,
            "customer_id": request.customer_id,
            "product_id": line.product_id,
            "qty": line.qty,
            "price": line.quote.price,
            "total": line.total,
            "payment_method": request.payment_method,
        }))
        .await;

        Ok(SaleOutcome {
            product_id: line.product_id,
            qty: line.qty,
            price: line.quote.price,
            commission_pct: line.quote.commission_pct,
            total: line.total,
            customer_id: request.customer_id,
            payment_method: request.payment_method,
        })
    }

    /// Records a multi-line checkout.
    ///
    /// Lines are processed in order; a product lookup failure aborts the
    /// remainder but leaves already-written lines in the ledger. A line
    /// with no product key fails that same way - resolution with no key
    /// matches nothing.
    pub async fn checkout(&self, request: CheckoutRequest) -> SaleResult<CheckoutOutcome> {
        if request.items.is_empty() {
            return Err(ValidationError::EmptyCheckout.into());
        }

        let person_entity_id = self.person_for(&request.user_id).await?;
        let products = map_rows(&self.store.read_tab(tabs::PRODUCTS).await?);
        let pricing = map_rows(&self.store.read_tab(tabs::RESELLER_PRICING).await?);

        let line_request = SaleRequest {
            user_id: request.user_id.clone(),
            reseller_id: request.reseller_id.clone(),
            customer_id: request.customer_id.clone(),
            payment_method: request.payment_method.clone(),
            ..SaleRequest::default()
        };

        let mut grand_total = 0.0;
        let mut lines_written = 0;

        for item in &request.items {
            let product = find_product(
                &products,
                item.product_id.as_deref(),
                item.short_id.as_deref(),
            )
            .ok_or_else(|| {
                SaleError::ProductNotFound(describe_key(
                    item.product_id.as_deref(),
                    item.short_id.as_deref(),
                ))
            })?;

            let line = price_line(&pricing, &request.reseller_id, product, item.qty);
            self.append_sale(&person_entity_id, &line_request, &line)
                .await?;
            self.settle_stock(&line, &request.reseller_id).await?;

            grand_total += line.total;
            lines_written += 1;
        }

        info!(lines_written, grand_total, "Checkout recorded");

        self.fire_event(json!({
            "user_id": request.user_id,
            "person_entity_id": person_entity_id,
            "customer_id": request.customer_id,
            "lines": lines_written,
            "total": grand_total,
            "payment_method": request.payment_method,
        }))
        .await;

        Ok(CheckoutOutcome {
            grand_total,
            lines_written,
            customer_id: request.customer_id,
            payment_method: request.payment_method,
        })
    }

    // -------------------------------------------------------------------------
    // Internals
    // -------------------------------------------------------------------------

    /// Resolves the notification identity for a user, or `""` for an
    /// anonymous or unknown user.
    async fn person_for(&self, user_id: &str) -> SaleResult<String> {
        if user_id.is_empty() {
            return Ok(String::new());
        }
        let users = map_rows(&self.store.read_tab(tabs::USERS).await?);
        Ok(find_user(&users, user_id)
            .map(|u| u.get("person_entity_id").to_string())
            .unwrap_or_default())
    }

    /// Appends one priced line to the sale ledger.
    async fn append_sale(
        &self,
        person_entity_id: &str,
        request: &SaleRequest,
        line: &PricedLine,
    ) -> SaleResult<()> {
        let row = vec![
            Utc::now().to_rfc3339(),
            request.user_id.clone(),
            person_entity_id.to_string(),
            request.customer_id.clone(),
            line.product_id.clone(),
            line.short_id.clone(),
            line.qty.to_string(),
            line.quote.price.to_string(),
            line.quote.commission_pct.to_string(),
            line.total.to_string(),
            request.payment_method.clone(),
        ];
        self.store.append_row(tabs::SALES, row).await?;
        Ok(())
    }

    /// Stock decrement after the ledger write. Skips (no reseller,
    /// missing columns, no matching row) pass silently; a store failure
    /// propagates, with the sale row already committed.
    async fn settle_stock(&self, line: &PricedLine, reseller_id: &str) -> SaleResult<()> {
        stock::decrement(&self.store, &line.product_id, reseller_id, line.qty).await?;
        Ok(())
    }

    /// Best-effort bus notification; failures are logged, never surfaced.
    async fn fire_event(&self, payload: serde_json::Value) {
        if let Err(err) = self.sink.publish(&self.event, payload).await {
            warn!(event = %self.event, error = %err, "Bus notification failed");
        }
    }
}

// =============================================================================
// Line Pricing
// =============================================================================

/// One priced sale line, ready to append.
struct PricedLine {
    product_id: String,
    short_id: String,
    qty: i64,
    quote: PriceQuote,
    total: f64,
}

/// Prices one product line against the reseller pricing tab.
fn price_line(pricing: &[Record], reseller_id: &str, product: &Record, qty: i64) -> PricedLine {
    let product_id = product.get("product_id").to_string();
    let today = Utc::now().date_naive();
    let reseller_row = resolve_price(pricing, reseller_id, &product_id, today);
    let quote = PriceQuote::for_product(reseller_row, product);
    PricedLine {
        short_id: product.get("short_id").to_string(),
        total: quote.price * qty as f64,
        product_id,
        qty,
        quote,
    }
}

/// Quantities share the cell parsing contract: numbers pass through,
/// numeric strings parse, anything else falls back to 1.
fn qty_or_one<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    let qty = match value {
        serde_json::Value::Number(n) => n
            .as_i64()
            .unwrap_or_else(|| n.as_f64().unwrap_or(1.0) as i64),
        serde_json::Value::String(s) => num_or(&s, 1.0) as i64,
        _ => 1,
    };
    Ok(qty)
}

/// Ensures at least one product key is present and non-blank.
fn require_product_key(product_id: Option<&str>, short_id: Option<&str>) -> SaleResult<()> {
    let has_key = |key: Option<&str>| key.is_some_and(|k| !k.trim().is_empty());
    if has_key(product_id) || has_key(short_id) {
        Ok(())
    } else {
        Err(ValidationError::MissingProductKey.into())
    }
}

/// Human-readable form of the failed lookup key for error messages.
fn describe_key(product_id: Option<&str>, short_id: Option<&str>) -> String {
    match (product_id, short_id) {
        (Some(p), Some(s)) => format!("{p}/{s}"),
        (Some(p), None) => p.to_string(),
        (None, Some(s)) => s.to_string(),
        (None, None) => "<none>".to_string(),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
