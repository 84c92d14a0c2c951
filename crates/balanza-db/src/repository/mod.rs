//! # Repository Modules
//!
//! Tenant-scoped database access, one repository per aggregate.
//!
//! ## Conventions
//! - Every query on a business table filters by `tenant_id`; a row owned
//!   by another tenant is indistinguishable from a missing row.
//! - Reads return `DbResult<Option<T>>`; the caller decides whether a
//!   miss is an error.
//! - Writes that target one row check `rows_affected` and return
//!   `DbError::NotFound` on zero.
//! - Multi-row invariants (sale ↔ stock ↔ debt) do NOT live here; they
//!   belong to [`crate::engine::SettlementEngine`].

pub mod debt;
pub mod expense;
pub mod product;
pub mod sale;
pub mod tenant;
pub mod user;

/// Generates a new entity ID (UUID v4).
pub(crate) fn generate_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
