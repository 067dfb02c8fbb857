//! # TabularStore Trait
//!
//! The single seam between GridPOS and its backing store.
//!
//! Rows are ordered sequences of string cells; the first row of every tab
//! is the header. The trait exposes exactly what the system needs and
//! nothing more: no transactions, no partial reads, no row deletion (the
//! sale log is append-only by construction).

use async_trait::async_trait;

use crate::error::StoreResult;

/// Names of the tabs GridPOS consumes.
pub mod tabs {
    pub const USERS: &str = "Users";
    pub const CUSTOMERS: &str = "Customers";
    pub const PRODUCTS: &str = "Products";
    pub const RESELLER_PRICING: &str = "ResellerPricing";
    pub const STOCK: &str = "Stock";
    pub const SALES: &str = "Sales";
}

/// A named-tab, row/column tabular store.
#[async_trait]
pub trait TabularStore: Send + Sync {
    /// Reads all rows of a tab, header row first. An empty or missing tab
    /// yields an empty vector.
    async fn read_tab(&self, tab: &str) -> StoreResult<Vec<Vec<String>>>;

    /// Appends one row at the bottom of a tab.
    async fn append_row(&self, tab: &str, row: Vec<String>) -> StoreResult<()>;

    /// Overwrites one row, addressed by its 1-based sheet position
    /// (the header is row 1, the first data row is row 2).
    async fn update_row(&self, tab: &str, row_idx: usize, row: Vec<String>) -> StoreResult<()>;
}
