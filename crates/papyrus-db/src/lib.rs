//! # papyrus-db: Database Layer for Papyrus POS
//!
//! This crate provides database access for the Papyrus POS system.
//! It uses SQLite for local storage with sqlx for async operations.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Papyrus POS Data Flow                             │
//! │                                                                         │
//! │  PosSession (papyrus-pos)                                              │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    papyrus-db (THIS CRATE)                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repositories │    │  Migrations  │  │   │
//! │  │   │   (pool.rs)   │    │ (article.rs)  │    │  (embedded)  │  │   │
//! │  │   │               │    │               │    │              │  │   │
//! │  │   │ SqlitePool    │    │ ArticleRepo   │    │ 001_init.sql │  │   │
//! │  │   │ Connection    │◄───│ InventoryRepo │    │ ...          │  │   │
//! │  │   │ Management    │    │ InvoiceRepo   │    │              │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     SQLite Database                             │   │
//! │  │                     ./data/papyrus.db                           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Repository implementations (article, inventory, invoice)
//!
//! ## Usage
//!
//! ```rust,ignore
//! use papyrus_db::{Database, DbConfig};
//!
//! // Create database with default config
//! let config = DbConfig::new("path/to/papyrus.db");
//! let db = Database::new(config).await?;
//!
//! // Use repositories
//! let catalog = db.inventory().list_stocked().await?;
//! let invoice = db.invoices().create(&draft).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};

// Repository re-exports for convenience
pub use repository::article::{ArticleRepository, ArticleUpdate, NewArticle};
pub use repository::inventory::InventoryRepository;
pub use repository::invoice::InvoiceRepository;
