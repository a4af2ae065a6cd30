//! # Repository Module
//!
//! Database repository implementations for Papyrus POS.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern Explained                         │
//! │                                                                         │
//! │  The Repository pattern abstracts database access behind a clean API.  │
//! │                                                                         │
//! │  Service Layer (papyrus-pos)                                           │
//! │       │                                                                 │
//! │       │  db.invoices().create(&draft)                                  │
//! │       │  ↓                                                              │
//! │       ▼                                                                 │
//! │  InvoiceRepository                                                     │
//! │  ├── create(&self, draft)                                              │
//! │  ├── get_by_number(&self, number)                                      │
//! │  └── lines_between(&self, from, to)                                    │
//! │       │                                                                 │
//! │       │  SQL Query                                                      │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! │                                                                         │
//! │  Benefits:                                                              │
//! │  • Clean separation of concerns                                        │
//! │  • SQL is isolated in one place                                        │
//! │  • Transactional invariants live next to the queries they guard        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`article::ArticleRepository`] - Catalog CRUD and code assignment
//! - [`inventory::InventoryRepository`] - Stock counts, restocks, withdrawals
//! - [`invoice::InvoiceRepository`] - Atomic invoice creation and history

pub mod article;
pub mod inventory;
pub mod invoice;
