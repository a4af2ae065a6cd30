//! # papyrus-pos: Service Layer for Papyrus POS
//!
//! Wires the pure cart engine to the persistence layer behind a
//! single-register session API.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Papyrus POS Architecture                          │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │               ★ papyrus-pos (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐   ┌───────────────┐   ┌───────────────┐   │   │
//! │  │   │  PosSession   │   │    Reports    │   │ ServiceError  │   │   │
//! │  │   │  cart + db    │   │  balance/     │   │  code +       │   │   │
//! │  │   │  checkout     │   │  profit       │   │  message      │   │   │
//! │  │   └───────┬───────┘   └───────┬───────┘   └───────────────┘   │   │
//! │  └───────────┼───────────────────┼──────────────────────────────┘   │
//! │              │                   │                                   │
//! │     ┌────────▼────────┐  ┌───────▼────────┐                         │
//! │     │  papyrus-core   │  │   papyrus-db   │                         │
//! │     │  pure logic     │  │   SQLite/sqlx  │                         │
//! │     └─────────────────┘  └────────────────┘                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`session`] - `PosSession`: cart operations, search, checkout
//! - [`reports`] - `Reports`: profit and valuation assembly
//! - [`error`] - `ServiceError` envelope with machine-readable codes
//!
//! ## Example
//!
//! ```rust,ignore
//! use papyrus_db::{Database, DbConfig};
//! use papyrus_pos::PosSession;
//!
//! let db = Database::new(DbConfig::new("./papyrus.db")).await?;
//! let session = PosSession::new(db);
//! session.refresh_catalog().await?;
//!
//! session.scan_barcode("7700000000001").await?;
//! session.set_customer(customer).await;
//! let invoice = session.checkout().await?;
//! println!("{}", invoice.number); // FAC-0000001
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod reports;
pub mod session;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{ErrorCode, ServiceError, ServiceResult};
pub use reports::{BalanceSummary, Reports};
pub use session::{CartView, PosSession};
