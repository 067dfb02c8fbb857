//! # Pricing Resolver
//!
//! Selects the reseller price row that applies to a product on a given
//! date, and computes the final price/commission quote with its
//! fallbacks.
//!
//! ## Window Selection
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  ResellerPricing rows for (R1, P1), resolving at 2024-07-01:            │
//! │                                                                         │
//! │  [2024-01-01 ── 2024-12-31]  price 40   ── contains date                │
//! │  [2024-06-01 ── 2024-12-31]  price 35   ── contains date, LATER start   │
//! │  [2025-01-01 ── ..........]  price 30   ── does not contain date        │
//! │                                                                         │
//! │  Winner: price 35. The most recently started window takes priority;     │
//! │  overlapping windows are tolerated, not rejected.                       │
//! │                                                                         │
//! │  Empty/unparseable valid_from  ⇒ 1970-01-01 (always valid from start)   │
//! │  Empty/unparseable valid_to    ⇒ 9999-12-31 (always valid until end)    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::NaiveDate;

use crate::parse::{date_or, num_or, window_ceiling, window_floor};
use crate::record::Record;

// =============================================================================
// Resolution
// =============================================================================

/// Resolves the reseller price row applicable on `on_date`.
///
/// Among rows matching `(reseller_id, product_id)` whose validity window
/// contains `on_date`, the row with the latest `valid_from` wins; when two
/// windows start on the same day the later-scanned row wins. Returns
/// `None` when no window contains the date.
pub fn resolve_price<'a>(
    rows: &'a [Record],
    reseller_id: &str,
    product_id: &str,
    on_date: NaiveDate,
) -> Option<&'a Record> {
    let mut best: Option<(NaiveDate, &Record)> = None;

    for row in rows {
        if row.get("reseller_id") != reseller_id || row.get("product_id") != product_id {
            continue;
        }

        let from = date_or(row.get("valid_from"), window_floor());
        let to = date_or(row.get("valid_to"), window_ceiling());
        if from > on_date || on_date > to {
            continue;
        }

        match best {
            Some((best_from, _)) if from < best_from => {}
            _ => best = Some((from, row)),
        }
    }

    best.map(|(_, row)| row)
}

// =============================================================================
// Quote
// =============================================================================

/// The price and commission applied to one sale line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceQuote {
    pub price: f64,
    pub commission_pct: f64,
}

impl PriceQuote {
    /// Computes the quote for a product given an optional resolved
    /// reseller price row.
    ///
    /// Fallback chain for the price:
    /// 1. the reseller row's `price`, when present and numeric;
    /// 2. the product's `base_price`, when numeric;
    /// 3. zero.
    ///
    /// Commission falls back to zero whenever the reseller row is absent
    /// or its `commission_pct` is empty or non-numeric.
    pub fn for_product(reseller_price: Option<&Record>, product: &Record) -> Self {
        let reseller_cell = reseller_price.map(|r| r.get("price").trim()).unwrap_or("");
        let price = if reseller_cell.is_empty() {
            num_or(product.get("base_price"), 0.0)
        } else {
            reseller_cell
                .parse::<f64>()
                .unwrap_or_else(|_| num_or(product.get("base_price"), 0.0))
        };

        let commission_pct = reseller_price
            .map(|r| num_or(r.get("commission_pct"), 0.0))
            .unwrap_or(0.0);

        PriceQuote {
            price,
            commission_pct,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn price_row(reseller: &str, product: &str, from: &str, to: &str, price: &str) -> Record {
        Record::from_pairs([
            ("reseller_id", reseller),
            ("product_id", product),
            ("valid_from", from),
            ("valid_to", to),
            ("price", price),
            ("commission_pct", "5"),
        ])
    }

    #[test]
    fn test_resolve_filters_on_reseller_and_product() {
        let rows = vec![
            price_row("R1", "P1", "", "", "40"),
            price_row("R2", "P1", "", "", "10"),
            price_row("R1", "P2", "", "", "20"),
        ];
        let best = resolve_price(&rows, "R1", "P1", date(2024, 7, 1)).unwrap();
        assert_eq!(best.get("price"), "40");
        assert!(resolve_price(&rows, "R9", "P1", date(2024, 7, 1)).is_none());
    }

    #[test]
    fn test_resolve_rejects_windows_not_containing_date() {
        let rows = vec![price_row("R1", "P1", "2025-01-01", "2025-12-31", "30")];
        assert!(resolve_price(&rows, "R1", "P1", date(2024, 7, 1)).is_none());
    }

    #[test]
    fn test_resolve_window_bounds_are_inclusive() {
        let rows = vec![price_row("R1", "P1", "2024-06-01", "2024-06-30", "35")];
        assert!(resolve_price(&rows, "R1", "P1", date(2024, 6, 1)).is_some());
        assert!(resolve_price(&rows, "R1", "P1", date(2024, 6, 30)).is_some());
        assert!(resolve_price(&rows, "R1", "P1", date(2024, 5, 31)).is_none());
        assert!(resolve_price(&rows, "R1", "P1", date(2024, 7, 1)).is_none());
    }

    #[test]
    fn test_overlapping_windows_latest_start_wins() {
        let rows = vec![
            price_row("R1", "P1", "2024-01-01", "2024-12-31", "40"),
            price_row("R1", "P1", "2024-06-01", "2024-12-31", "35"),
        ];
        let best = resolve_price(&rows, "R1", "P1", date(2024, 7, 1)).unwrap();
        assert_eq!(best.get("price"), "35");

        // Order independent: the later-starting window wins either way.
        let reversed: Vec<Record> = rows.into_iter().rev().collect();
        let best = resolve_price(&reversed, "R1", "P1", date(2024, 7, 1)).unwrap();
        assert_eq!(best.get("price"), "35");
    }

    #[test]
    fn test_equal_starts_later_row_wins() {
        let rows = vec![
            price_row("R1", "P1", "2024-06-01", "", "35"),
            price_row("R1", "P1", "2024-06-01", "", "33"),
        ];
        let best = resolve_price(&rows, "R1", "P1", date(2024, 7, 1)).unwrap();
        assert_eq!(best.get("price"), "33");
    }

    #[test]
    fn test_blank_dates_mean_always_valid() {
        let rows = vec![price_row("R1", "P1", "", "", "40")];
        assert!(resolve_price(&rows, "R1", "P1", date(1999, 1, 1)).is_some());
        assert!(resolve_price(&rows, "R1", "P1", date(2999, 1, 1)).is_some());
    }

    #[test]
    fn test_garbage_dates_fall_back_to_open_window() {
        // Unparseable bounds behave like blanks rather than failing.
        let rows = vec![price_row("R1", "P1", "soon", "later", "40")];
        assert!(resolve_price(&rows, "R1", "P1", date(2024, 7, 1)).is_some());
    }

    #[test]
    fn test_quote_uses_reseller_price_and_commission() {
        let product = Record::from_pairs([("product_id", "P1"), ("base_price", "50")]);
        let rp = price_row("R1", "P1", "", "", "40");
        let quote = PriceQuote::for_product(Some(&rp), &product);
        assert_eq!(quote.price, 40.0);
        assert_eq!(quote.commission_pct, 5.0);
    }

    #[test]
    fn test_quote_falls_back_to_base_price() {
        let product = Record::from_pairs([("product_id", "P1"), ("base_price", "50")]);

        // No reseller row at all.
        let quote = PriceQuote::for_product(None, &product);
        assert_eq!(quote.price, 50.0);
        assert_eq!(quote.commission_pct, 0.0);

        // Reseller row with an empty price cell.
        let rp = price_row("R1", "P1", "", "", "");
        let quote = PriceQuote::for_product(Some(&rp), &product);
        assert_eq!(quote.price, 50.0);

        // Reseller row with a non-numeric price cell.
        let rp = price_row("R1", "P1", "", "", "call us");
        let quote = PriceQuote::for_product(Some(&rp), &product);
        assert_eq!(quote.price, 50.0);
    }

    #[test]
    fn test_quote_bottoms_out_at_zero() {
        // Neither the reseller price nor the base price is usable.
        let product = Record::from_pairs([("product_id", "P1"), ("base_price", "TBD")]);
        let quote = PriceQuote::for_product(None, &product);
        assert_eq!(quote.price, 0.0);
        assert_eq!(quote.commission_pct, 0.0);
    }

    #[test]
    fn test_quote_commission_garbage_is_zero() {
        let product = Record::from_pairs([("base_price", "50")]);
        let mut rp = price_row("R1", "P1", "", "", "40");
        rp = Record::from_pairs([
            ("reseller_id", "R1"),
            ("product_id", "P1"),
            ("price", rp.get("price")),
            ("commission_pct", "five"),
        ]);
        let quote = PriceQuote::for_product(Some(&rp), &product);
        assert_eq!(quote.price, 40.0);
        assert_eq!(quote.commission_pct, 0.0);
    }
}
