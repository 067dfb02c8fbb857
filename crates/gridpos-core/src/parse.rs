//! # Parse-or-Default Combinators
//!
//! Every numeric and date parse in GridPOS goes through this module, so
//! every call site shares one fallback contract instead of ad hoc rescue
//! logic.
//!
//! ## The Contract
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Cell values arrive as strings from the tabular store.                  │
//! │                                                                         │
//! │  "12.5"   ──► 12.5                                                      │
//! │  ""       ──► the supplied default                                      │
//! │  "oops"   ──► the supplied default (never an error, never a panic)      │
//! │                                                                         │
//! │  A malformed price, commission, quantity or validity date must not      │
//! │  fail the request that touched it.                                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::NaiveDate;

/// Floor for `valid_from`: an empty or unparseable value means
/// "valid since forever".
pub fn window_floor() -> NaiveDate {
    NaiveDate::from_ymd_opt(1970, 1, 1).expect("1970-01-01 is a valid date")
}

/// Ceiling for `valid_to`: an empty or unparseable value means
/// "valid until forever".
pub fn window_ceiling() -> NaiveDate {
    NaiveDate::from_ymd_opt(9999, 12, 31).expect("9999-12-31 is a valid date")
}

/// Parses a numeric cell, falling back to `default` when the cell is
/// empty or non-numeric.
pub fn num_or(raw: &str, default: f64) -> f64 {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return default;
    }
    trimmed.parse::<f64>().unwrap_or(default)
}

/// Parses a numeric cell, falling back to zero.
///
/// Used for stock quantities, where an empty cell means "no stock
/// recorded yet".
pub fn num_or_zero(raw: &str) -> f64 {
    num_or(raw, 0.0)
}

/// Parses an ISO `YYYY-MM-DD` date cell, falling back to `default` when
/// the cell is empty or unparseable.
pub fn date_or(raw: &str, default: NaiveDate) -> NaiveDate {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return default;
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d").unwrap_or(default)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_num_or_parses_valid_numbers() {
        assert_eq!(num_or("12.5", 0.0), 12.5);
        assert_eq!(num_or("0", 99.0), 0.0);
        assert_eq!(num_or("-3", 0.0), -3.0);
        assert_eq!(num_or(" 7.25 ", 0.0), 7.25);
    }

    #[test]
    fn test_num_or_falls_back_on_empty_or_garbage() {
        assert_eq!(num_or("", 42.0), 42.0);
        assert_eq!(num_or("   ", 42.0), 42.0);
        assert_eq!(num_or("abc", 42.0), 42.0);
        assert_eq!(num_or("12,5", 42.0), 42.0);
    }

    #[test]
    fn test_num_or_zero() {
        assert_eq!(num_or_zero(""), 0.0);
        assert_eq!(num_or_zero("n/a"), 0.0);
        assert_eq!(num_or_zero("5"), 5.0);
    }

    #[test]
    fn test_date_or_parses_iso_dates() {
        let fallback = window_floor();
        assert_eq!(
            date_or("2024-06-01", fallback),
            NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
        );
    }

    #[test]
    fn test_date_or_falls_back_on_empty_or_garbage() {
        let fallback = window_ceiling();
        assert_eq!(date_or("", fallback), fallback);
        assert_eq!(date_or("not-a-date", fallback), fallback);
        assert_eq!(date_or("2024-13-40", fallback), fallback);
        assert_eq!(date_or("06/01/2024", fallback), fallback);
    }

    #[test]
    fn test_window_bounds_order() {
        assert!(window_floor() < window_ceiling());
    }
}
