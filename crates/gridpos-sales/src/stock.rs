//! # Stock Decrement
//!
//! Best-effort stock adjustment after a sale line lands in the log.
//!
//! ## Adjustment Rules
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  1. Re-read the Stock tab (never a cached copy)                         │
//! │  2. Locate product_id / reseller_id / reseller_qty header columns;      │
//! │     any column missing ⇒ skip the whole adjustment, no error            │
//! │  3. No reseller on the sale ⇒ skip (anonymous/walk-in sales do not      │
//! │     draw from reseller stock)                                           │
//! │  4. First row matching (product_id, reseller_id) wins                   │
//! │  5. new qty = current qty (non-numeric ⇒ 0) − sold qty                  │
//! │  6. Overwrite that row in place, addressed by sheet position            │
//! │                                                                         │
//! │  Negative results are written verbatim; oversell shows up in the tab    │
//! │  as a negative balance for a human to reconcile. Concurrent sales can   │
//! │  lose one decrement (read-modify-write with no lock); the sale log      │
//! │  stays correct regardless, so stock is advisory by design of the tab.   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use tracing::{debug, warn};

use gridpos_core::parse::num_or_zero;
use gridpos_store::{tabs, StoreResult, TabularStore};

/// Decrements reseller stock for one sold product.
///
/// Returns `true` when a row was updated, `false` when the adjustment
/// was skipped (no reseller, missing columns, or no matching row).
/// Store failures propagate; the caller decides whether they matter.
pub async fn decrement<S: TabularStore + ?Sized>(
    store: &S,
    product_id: &str,
    reseller_id: &str,
    qty: i64,
) -> StoreResult<bool> {
    if reseller_id.is_empty() {
        debug!(product_id, "No reseller on sale, skipping stock decrement");
        return Ok(false);
    }

    let rows = store.read_tab(tabs::STOCK).await?;
    let Some((header, data)) = rows.split_first() else {
        return Ok(false);
    };

    let col = |name: &str| header.iter().position(|h| h == name);
    let (Some(product_col), Some(reseller_col), Some(qty_col)) = (
        col("product_id"),
        col("reseller_id"),
        col("reseller_qty"),
    ) else {
        warn!("Stock tab missing expected columns, skipping decrement");
        return Ok(false);
    };

    for (i, row) in data.iter().enumerate() {
        let cell = |idx: usize| row.get(idx).map(String::as_str).unwrap_or("");
        if cell(product_col) != product_id || cell(reseller_col) != reseller_id {
            continue;
        }

        let current = num_or_zero(cell(qty_col));
        let updated = current - qty as f64;

        // Pad to header width so the qty column exists even when the
        // stored row was short.
        let mut new_row: Vec<String> = (0..header.len()).map(|c| cell(c).to_string()).collect();
        new_row[qty_col] = updated.to_string();

        // Sheet positions are 1-based and the header is row 1.
        let position = i + 2;
        store.update_row(tabs::STOCK, position, new_row).await?;
        debug!(
            product_id,
            reseller_id,
            previous = current,
            updated,
            "Decremented reseller stock"
        );
        return Ok(true);
    }

    debug!(product_id, reseller_id, "No stock row matched, nothing to decrement");
    Ok(false)
}

// =============================================================================
// Unit Tests
// =============================================================================
