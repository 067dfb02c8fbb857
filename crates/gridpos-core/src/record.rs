//! # Record Mapper
//!
//! Converts the raw header+rows shape returned by the tabular store into
//! field-named records, and provides the catalog lookups built on top.
//!
//! ## Mapping Rules
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Tab contents                         Records                           │
//! │                                                                         │
//! │  ["product_id", "name", "price"]                                        │
//! │  ["P1",         "Jam",  "45"]    ──► { product_id: "P1",                │
//! │  ["P2",         "Tea"]                 name: "Jam", price: "45" }       │
//! │                                      { product_id: "P2",                │
//! │                                        name: "Tea", price: "" }         │
//! │                                                                         │
//! │  • First row is the header (field names, assumed unique)                │
//! │  • Missing trailing cells map to the empty string                       │
//! │  • Cells beyond the header width are ignored                            │
//! │  • No type coercion: values stay strings until a consumer parses them   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::BTreeMap;

use serde::Serialize;

// =============================================================================
// Record
// =============================================================================

/// A field-named row from a tab.
///
/// Values are always strings; absent fields read as the empty string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Record(BTreeMap<String, String>);

impl Record {
    /// Returns the value of `field`, or `""` when the field is absent.
    pub fn get(&self, field: &str) -> &str {
        self.0.get(field).map(String::as_str).unwrap_or("")
    }

    /// True when the record carries no fields at all.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Builds a record from field/value pairs. Mostly useful in tests.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Record(
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

// =============================================================================
// Row Mapping
// =============================================================================

/// Maps raw tab rows into records.
///
/// The first row is the header; every following row maps positionally to
/// the header names. Produces an empty vector for empty or header-only
/// input.
pub fn map_rows(rows: &[Vec<String>]) -> Vec<Record> {
    let Some((header, data)) = rows.split_first() else {
        return Vec::new();
    };

    data.iter()
        .map(|row| {
            Record(
                header
                    .iter()
                    .enumerate()
                    .map(|(i, field)| {
                        let value = row.get(i).cloned().unwrap_or_default();
                        (field.clone(), value)
                    })
                    .collect(),
            )
        })
        .collect()
}

// =============================================================================
// Catalog Lookups
// =============================================================================

/// Finds the first user record whose `user_id` matches exactly.
///
/// Returns `None` when `user_id` is empty - an anonymous sale carries no
/// user and must not match a blank `user_id` cell.
pub fn find_user<'a>(users: &'a [Record], user_id: &str) -> Option<&'a Record> {
    if user_id.is_empty() {
        return None;
    }
    users.iter().find(|u| u.get("user_id") == user_id)
}

/// Finds a product by primary `product_id` or alternate `short_id`.
///
/// One scan over the tab: a row matches when its `product_id` equals the
/// supplied product id, or its `short_id` equals the supplied short id,
/// with the `product_id` comparison made first within a row.
///
/// Precedence between the two keys is **scan order**, not key priority:
/// when both keys are supplied and match different rows, the earlier row
/// wins. This is the documented lookup policy.
pub fn find_product<'a>(
    products: &'a [Record],
    product_id: Option<&str>,
    short_id: Option<&str>,
) -> Option<&'a Record> {
    let product_id = product_id.filter(|id| !id.is_empty());
    let short_id = short_id.filter(|id| !id.is_empty());

    products.iter().find(|p| {
        if let Some(id) = product_id {
            if p.get("product_id") == id {
                return true;
            }
        }
        if let Some(id) = short_id {
            if p.get("short_id") == id {
                return true;
            }
        }
        false
    })
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn rows(raw: &[&[&str]]) -> Vec<Vec<String>> {
        raw.iter()
            .map(|r| r.iter().map(|c| c.to_string()).collect())
            .collect()
    }

    #[test]
    fn test_map_rows_positional_mapping() {
        let mapped = map_rows(&rows(&[
            &["product_id", "name", "price"],
            &["P1", "Jam", "45"],
        ]));
        assert_eq!(mapped.len(), 1);
        assert_eq!(mapped[0].get("product_id"), "P1");
        assert_eq!(mapped[0].get("name"), "Jam");
        assert_eq!(mapped[0].get("price"), "45");
    }

    #[test]
    fn test_map_rows_missing_trailing_cells_read_empty() {
        let mapped = map_rows(&rows(&[&["a", "b", "c"], &["1"]]));
        assert_eq!(mapped[0].get("a"), "1");
        assert_eq!(mapped[0].get("b"), "");
        assert_eq!(mapped[0].get("c"), "");
    }

    #[test]
    fn test_map_rows_extra_cells_ignored() {
        let mapped = map_rows(&rows(&[&["a"], &["1", "stray"]]));
        assert_eq!(mapped[0].get("a"), "1");
        assert_eq!(mapped[0].get("stray"), "");
    }

    #[test]
    fn test_map_rows_empty_and_header_only() {
        assert!(map_rows(&[]).is_empty());
        assert!(map_rows(&rows(&[&["a", "b"]])).is_empty());
    }

    #[test]
    fn test_find_user_exact_match() {
        let users = vec![
            Record::from_pairs([("user_id", "U1"), ("person_entity_id", "person.alice")]),
            Record::from_pairs([("user_id", "U2"), ("person_entity_id", "person.bob")]),
        ];
        let found = find_user(&users, "U2").expect("U2 exists");
        assert_eq!(found.get("person_entity_id"), "person.bob");
        assert!(find_user(&users, "U9").is_none());
    }

    #[test]
    fn test_find_user_empty_id_never_matches() {
        // A blank user_id cell must not be matched by an anonymous request.
        let users = vec![Record::from_pairs([("user_id", ""), ("name", "ghost")])];
        assert!(find_user(&users, "").is_none());
    }

    #[test]
    fn test_find_product_by_either_key() {
        let products = vec![
            Record::from_pairs([("product_id", "P1"), ("short_id", "S1")]),
            Record::from_pairs([("product_id", "P2"), ("short_id", "S2")]),
        ];
        assert_eq!(
            find_product(&products, Some("P2"), None).unwrap().get("short_id"),
            "S2"
        );
        assert_eq!(
            find_product(&products, None, Some("S1")).unwrap().get("product_id"),
            "P1"
        );
        assert!(find_product(&products, Some("P9"), Some("S9")).is_none());
        assert!(find_product(&products, None, None).is_none());
    }

    #[test]
    fn test_find_product_precedence_is_scan_order() {
        // Both keys supplied, matching different rows: the earlier row wins,
        // even when it only matches the short_id.
        let products = vec![
            Record::from_pairs([("product_id", "P-other"), ("short_id", "S9")]),
            Record::from_pairs([("product_id", "P1"), ("short_id", "S-other")]),
        ];
        let found = find_product(&products, Some("P1"), Some("S9")).unwrap();
        assert_eq!(found.get("product_id"), "P-other");
    }

    #[test]
    fn test_find_product_empty_keys_do_not_match_blank_cells() {
        let products = vec![Record::from_pairs([("product_id", ""), ("short_id", "")])];
        assert!(find_product(&products, Some(""), Some("")).is_none());
    }
}
