//! # gridpos-sales: Sale Processing
//!
//! The orchestration layer between pure domain logic (gridpos-core) and
//! the tabular store (gridpos-store).
//!
//! ## Sale Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Recording One Sale                              │
//! │                                                                         │
//! │  SaleRequest                                                            │
//! │      │                                                                  │
//! │      ▼                                                                  │
//! │  1. Validate (product key present)          ── 400 on failure           │
//! │  2. Look up user (optional, for notify)                                 │
//! │  3. Look up product                         ── 404 when absent          │
//! │  4. Resolve price (reseller window → base)                              │
//! │  5. total = price × qty                                                 │
//! │  6. Append row to the Sales log             ── the commit point         │
//! │  7. Decrement stock                         ── skips tolerated; a       │
//! │                                                store failure surfaces   │
//! │  8. Fire bus event                          ── best effort, logged      │
//! │      │                                                                  │
//! │      ▼                                                                  │
//! │  SaleOutcome                                                            │
//! │                                                                         │
//! │  Step 8 can never fail the request. Step 6 is the commit point; there   │
//! │  is no rollback once it lands, even when step 7 errors afterwards.      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`processor`] - `SaleProcessor`: sale, checkout, and listing operations
//! - [`stock`] - Best-effort stock decrement against the Stock tab
//! - [`notify`] - `EventSink` trait plus HTTP and null implementations
//! - [`error`] - `SaleError`

pub mod error;
pub mod notify;
pub mod processor;
pub mod stock;

pub use error::{SaleError, SaleResult};
pub use notify::{EventSink, HttpEventSink, NullEventSink};
pub use processor::{
    CheckoutItem, CheckoutOutcome, CheckoutRequest, SaleOutcome, SaleProcessor, SaleRequest,
};
