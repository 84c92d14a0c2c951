//! # balanza-db: Database Layer for Balanza
//!
//! This crate provides database access for the Balanza bookkeeping
//! system. It uses SQLite for storage with sqlx for async operations.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Balanza Data Flow                                │
//! │                                                                         │
//! │  Caller (with a verified Identity: user_id + tenant_id + role)         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     balanza-db (THIS CRATE)                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐   ┌────────────────┐   ┌───────────────┐   │   │
//! │  │   │   Database    │   │  Repositories  │   │  Settlement   │   │   │
//! │  │   │   (pool.rs)   │   │ (tenant-scoped │   │  Engine       │   │   │
//! │  │   │               │   │  CRUD/queries) │   │ (transactions)│   │   │
//! │  │   │ SqlitePool    │◄──│ ProductRepo    │◄──│ create_sale   │   │   │
//! │  │   │ Migrations    │   │ DebtRepo ...   │   │ update_debt.. │   │   │
//! │  │   └───────────────┘   └────────────────┘   └───────────────┘   │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │                      SQLite Database (WAL)                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types with stable classification
//! - [`repository`] - Tenant-scoped repository implementations
//! - [`engine`] - The settlement engine: multi-row transactions for
//!   sales, debts, and the balance snapshot
//!
//! ## Usage
//!
//! ```rust,ignore
//! use balanza_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::from_env()).await?;
//!
//! // Tenant-scoped reads
//! let products = db.products().list(&tenant_id).await?;
//!
//! // Settlement operations (atomic)
//! let receipt = db.settlement().create_sale(&tenant_id, &user_id, input).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod engine;
pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use engine::{DebtPatch, NewDebt, NewSale, SaleReceipt, SettlementEngine};
pub use error::{DbError, DbResult, ErrorKind};
pub use pool::{Database, DbConfig};

// Repository re-exports for convenience
pub use repository::debt::{DebtFilter, DebtList, DebtRepository};
pub use repository::expense::ExpenseRepository;
pub use repository::product::ProductRepository;
pub use repository::sale::SaleRepository;
pub use repository::tenant::TenantRepository;
pub use repository::user::UserRepository;
