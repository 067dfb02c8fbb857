//! # gridpos-store: Tabular Store Adapter
//!
//! Everything GridPOS knows about the backing store lives here. The rest
//! of the system sees one seam - the [`TabularStore`] trait - with three
//! operations: read a whole tab, append a row, update a row in place.
//!
//! ## Store Model
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  A "tab" is a named table of ordered string cells.                      │
//! │                                                                         │
//! │  Row 1   │ product_id │ reseller_id │ reseller_qty │   ← header         │
//! │  Row 2   │ P1         │ R1          │ 10           │   ← data           │
//! │  Row 3   │ P2         │ R1          │              │                    │
//! │                                                                         │
//! │  read_tab("Stock")        → all rows, header first                      │
//! │  append_row("Sales", ..)  → one new row at the bottom                   │
//! │  update_row("Stock", 3,)  → overwrite row 3 (1-based sheet position)    │
//! │                                                                         │
//! │  The store offers NO transactions and NO locks. Callers own the         │
//! │  read-modify-write consequences.                                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`tabular`] - The `TabularStore` trait and tab name constants
//! - [`sheets`] - HTTP implementation against a Sheets-style values API
//! - [`auth`] - Service-account OAuth token manager (cached, refreshed)
//! - [`memory`] - In-memory implementation for tests and local dev
//! - [`config`] - The options bundle (sheet id, key path, event bus)
//! - [`error`] - Store error types

pub mod auth;
pub mod config;
pub mod error;
pub mod memory;
pub mod sheets;
pub mod tabular;

pub use auth::{ServiceAccountKey, StoreAuth};
pub use config::Options;
pub use error::{StoreError, StoreResult};
pub use memory::MemoryStore;
pub use sheets::SheetsStore;
pub use tabular::{tabs, TabularStore};
