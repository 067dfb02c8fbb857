//! # gridpos-core: Pure Business Logic for GridPOS
//!
//! This crate is the **heart** of GridPOS. It contains all sale semantics
//! as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         GridPOS Architecture                            │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     apps/server (Axum)                          │   │
//! │  │     /pos/sale, /pos/checkout, /pos/stock, /pos/users, ...       │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                gridpos-sales (Sale Processor)                   │   │
//! │  │     resolve → price → append sale → adjust stock → notify       │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ gridpos-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐   │   │
//! │  │   │  record   │  │  pricing  │  │   parse   │  │   error   │   │   │
//! │  │   │  mapper   │  │  windows  │  │  or-else  │  │  variants │   │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘   │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO STORE • NO NETWORK • PURE FUNCTIONS               │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │              gridpos-store (Tabular Store Adapter)              │   │
//! │  │        read_tab / append_row / update_row over HTTP             │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`record`] - Header+row mapping and catalog lookups
//! - [`pricing`] - Time-bounded reseller price resolution
//! - [`parse`] - Parse-or-default combinators (one fallback contract)
//! - [`error`] - Validation error types
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: Every function is deterministic - same input = same output
//! 2. **No I/O**: Store, network, file system access is FORBIDDEN here
//! 3. **Strings until parsed**: Cell values stay strings; consumers parse
//!    through the shared combinators in [`parse`], never ad hoc
//! 4. **Silent fallbacks**: A malformed price or date never fails a sale;
//!    it resolves to a documented default

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod parse;
pub mod pricing;
pub mod record;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::ValidationError;
pub use pricing::{resolve_price, PriceQuote};
pub use record::{find_product, find_user, map_rows, Record};
