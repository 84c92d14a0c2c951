//! # Debt Repository
//!
//! Reads and the soft delete for customer debts.
//!
//! Writes that move money (creating a debt, recording a payment) live in
//! [`crate::engine::SettlementEngine`] so paid/pending/status always
//! change together under a transaction.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use balanza_core::{Debt, DebtStatus};

/// Listing filter, mirroring the three views a bookkeeper works with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DebtFilter {
    /// Debts still owed: pendiente, parcial, vencida.
    #[default]
    Activas,
    /// Fully paid debts.
    Pagadas,
    /// Everything, soft-deleted included (full history).
    Todas,
}

/// A filtered debt listing with its display totals.
#[derive(Debug, Clone)]
pub struct DebtList {
    pub debts: Vec<Debt>,
    /// Σ pending over the listed debts (where still positive).
    pub total_pending_cents: i64,
    /// Σ paid over the listed debts that are fully paid.
    pub total_paid_cents: i64,
}

/// Repository for debt database operations.
#[derive(Debug, Clone)]
pub struct DebtRepository {
    pool: SqlitePool,
}

impl DebtRepository {
    /// Creates a new DebtRepository.
    pub fn new(pool: SqlitePool) -> Self {
        DebtRepository { pool }
    }

    /// Gets a debt by ID, scoped to the tenant.
    pub async fn get_by_id(&self, tenant_id: &str, id: &str) -> DbResult<Option<Debt>> {
        let debt = sqlx::query_as::<_, Debt>(
            r#"
            SELECT id, tenant_id, sale_id, customer_name, customer_email,
                   total_cents, paid_cents, pending_cents, status,
                   due_date, description, created_at, updated_at
            FROM debts
            WHERE id = ?1 AND tenant_id = ?2
            "#,
        )
        .bind(id)
        .bind(tenant_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(debt)
    }

    /// Gets the debt originating from a sale, if any.
    pub async fn get_by_sale(&self, tenant_id: &str, sale_id: &str) -> DbResult<Option<Debt>> {
        let debt = sqlx::query_as::<_, Debt>(
            r#"
            SELECT id, tenant_id, sale_id, customer_name, customer_email,
                   total_cents, paid_cents, pending_cents, status,
                   due_date, description, created_at, updated_at
            FROM debts
            WHERE sale_id = ?1 AND tenant_id = ?2
            "#,
        )
        .bind(sale_id)
        .bind(tenant_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(debt)
    }

    /// Lists debts under a filter, with the listing totals.
    ///
    /// The totals describe the FILTERED set: outstanding money for
    /// `Activas`, collected money for `Pagadas`. They are display
    /// context, not the balance aggregation (see
    /// `SettlementEngine::compute_balance` for that).
    pub async fn list(&self, tenant_id: &str, filter: DebtFilter) -> DbResult<DebtList> {
        let base = r#"
            SELECT id, tenant_id, sale_id, customer_name, customer_email,
                   total_cents, paid_cents, pending_cents, status,
                   due_date, description, created_at, updated_at
            FROM debts
            WHERE tenant_id = ?1
        "#;

        let debts = match filter {
            DebtFilter::Activas => {
                sqlx::query_as::<_, Debt>(&format!(
                    "{base} AND status IN ('pendiente', 'parcial', 'vencida') ORDER BY created_at DESC"
                ))
                .bind(tenant_id)
                .fetch_all(&self.pool)
                .await?
            }
            DebtFilter::Pagadas => {
                sqlx::query_as::<_, Debt>(&format!(
                    "{base} AND status = 'pagada' ORDER BY created_at DESC"
                ))
                .bind(tenant_id)
                .fetch_all(&self.pool)
                .await?
            }
            DebtFilter::Todas => {
                sqlx::query_as::<_, Debt>(&format!("{base} ORDER BY created_at DESC"))
                    .bind(tenant_id)
                    .fetch_all(&self.pool)
                    .await?
            }
        };

        let total_pending_cents = debts
            .iter()
            .filter(|d| d.pending_cents > 0)
            .map(|d| d.pending_cents)
            .sum();
        let total_paid_cents = debts
            .iter()
            .filter(|d| d.status == DebtStatus::Pagada)
            .map(|d| d.paid_cents)
            .sum();

        debug!(
            tenant_id = %tenant_id,
            count = debts.len(),
            ?filter,
            "Listed debts"
        );

        Ok(DebtList {
            debts,
            total_pending_cents,
            total_paid_cents,
        })
    }

    /// Soft-deletes a debt by marking it `eliminada`.
    ///
    /// The row stays for history; it drops out of active listings and
    /// the balance aggregation.
    pub async fn soft_delete(&self, tenant_id: &str, id: &str) -> DbResult<()> {
        debug!(id = %id, "Soft-deleting debt");

        let now = Utc::now();

        let result = sqlx::query(
            "UPDATE debts SET status = 'eliminada', updated_at = ?3 WHERE id = ?1 AND tenant_id = ?2",
        )
        .bind(id)
        .bind(tenant_id)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Debt", id));
        }

        Ok(())
    }
}
