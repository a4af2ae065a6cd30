//! # papyrus-core: Pure Business Logic for Papyrus POS
//!
//! This crate is the **heart** of Papyrus POS. It contains all business logic
//! as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Papyrus POS Architecture                          │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 papyrus-pos (Service Layer)                     │   │
//! │  │    PosSession: catalog ──► cart ──► checkout ──► reports        │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ papyrus-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │  ┌─────────┐ ┌─────────┐ ┌─────────┐ ┌─────────┐ ┌─────────┐  │   │
//! │  │  │  types  │ │  money  │ │  cart   │ │ search  │ │ report  │  │   │
//! │  │  │ Article │ │  Money  │ │  Cart   │ │ filter  │ │ profit  │  │   │
//! │  │  │ Invoice │ │ TaxCalc │ │CartLine │ │ paging  │ │valuation│  │   │
//! │  │  └─────────┘ └─────────┘ └─────────┘ └─────────┘ └─────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 papyrus-db (Database Layer)                     │   │
//! │  │             SQLite queries, migrations, repositories            │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Article, Invoice, Customer, etc.)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`cart`] - The invoice cart engine with stock-bound line operations
//! - [`sequence`] - Sequential business identifiers (PRO-NNNN, FAC-NNNNNNN)
//! - [`search`] - Catalog filtering and pagination
//! - [`report`] - Profit and inventory-valuation aggregation
//! - [`error`] - Domain error types
//! - [`validation`] - Business rule validation
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: Every function is deterministic - same input = same output
//! 2. **No I/O**: Database, network, file system access is FORBIDDEN here
//! 3. **Integer Money**: All monetary values are in minor units (i64), no floats
//! 4. **Explicit Errors**: All errors are typed, never strings or panics
//!
//! ## Example Usage
//!
//! ```rust
//! use papyrus_core::money::Money;
//! use papyrus_core::types::TaxRate;
//!
//! // Create money from minor units (never from floats!)
//! let subtotal = Money::from_cents(1000);
//!
//! // Calculate 19% VAT with integer math
//! let rate = TaxRate::from_bps(papyrus_core::VAT_RATE_BPS);
//! let tax = subtotal.calculate_tax(rate);
//!
//! assert_eq!(tax.cents(), 190);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod error;
pub mod money;
pub mod report;
pub mod search;
pub mod sequence;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use papyrus_core::Money` instead of
// `use papyrus_core::money::Money`

pub use cart::{Cart, CartLine, DraftLine, InvoiceDraft};
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use search::Page;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Colombian VAT rate in basis points (19%).
///
/// ## Why a constant?
/// The shop charges a single statutory rate; which invoices carry it is
/// decided per customer (see [`types::CustomerType::tax_rate`]).
pub const VAT_RATE_BPS: u32 = 1900;

/// Articles shown per catalog page.
///
/// ## Business Reason
/// The sales floor screen fits 8 article cards; search results and the
/// stock list page at the same size.
pub const PAGE_SIZE: usize = 8;

/// Maximum quantity of a single line in a cart, restock, or withdrawal.
///
/// ## Business Reason
/// Prevents accidental over-entry (e.g., typing 1000 instead of 10).
pub const MAX_LINE_QUANTITY: i64 = 999;

/// On-hand unit count at or below which an article is flagged for reorder.
pub const LOW_STOCK_THRESHOLD: i64 = 2;
