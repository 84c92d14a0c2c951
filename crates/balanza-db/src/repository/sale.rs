//! # Sale Repository
//!
//! Read and field-update access to sales and their lines.
//!
//! ## Sale Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Sale Lifecycle                                    │
//! │                                                                         │
//! │  1. CREATE (SettlementEngine::create_sale)                             │
//! │     └── sale + line + stock decrement [+ debt] in one transaction      │
//! │                                                                         │
//! │  2. FIELD UPDATES (this repository)                                    │
//! │     └── customer info, payment kind, status - never the lines          │
//! │                                                                         │
//! │  3. REVERSAL (SettlementEngine::delete_sale)                           │
//! │     └── stock restored, linked debt removed, sale + lines deleted      │
//! │                                                                         │
//! │  A correction is a reversal plus a fresh sale; lines are immutable.    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use balanza_core::{PaymentKind, Sale, SaleLine, SaleStatus};

/// Field updates applied to an existing sale. `None` leaves a field as is.
#[derive(Debug, Clone, Default)]
pub struct SaleUpdate {
    pub customer_name: Option<String>,
    pub customer_email: Option<String>,
    pub customer_phone: Option<String>,
    pub payment_kind: Option<PaymentKind>,
    pub status: Option<SaleStatus>,
    pub notes: Option<String>,
}

/// Repository for sale database operations.
#[derive(Debug, Clone)]
pub struct SaleRepository {
    pool: SqlitePool,
}

impl SaleRepository {
    /// Creates a new SaleRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SaleRepository { pool }
    }

    /// Gets a sale by ID, scoped to the tenant.
    pub async fn get_by_id(&self, tenant_id: &str, id: &str) -> DbResult<Option<Sale>> {
        let sale = sqlx::query_as::<_, Sale>(
            r#"
            SELECT id, tenant_id, user_id, customer_name, customer_email, customer_phone,
                   subtotal_cents, total_cents, payment_kind, status, notes,
                   created_at, updated_at
            FROM sales
            WHERE id = ?1 AND tenant_id = ?2
            "#,
        )
        .bind(id)
        .bind(tenant_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(sale)
    }

    /// Lists the tenant's sales, newest first.
    pub async fn list(&self, tenant_id: &str) -> DbResult<Vec<Sale>> {
        let sales = sqlx::query_as::<_, Sale>(
            r#"
            SELECT id, tenant_id, user_id, customer_name, customer_email, customer_phone,
                   subtotal_cents, total_cents, payment_kind, status, notes,
                   created_at, updated_at
            FROM sales
            WHERE tenant_id = ?1
            ORDER BY created_at DESC
            "#,
        )
        .bind(tenant_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(sales)
    }

    /// Gets all lines for a sale.
    pub async fn lines(&self, sale_id: &str) -> DbResult<Vec<SaleLine>> {
        let lines = sqlx::query_as::<_, SaleLine>(
            r#"
            SELECT id, sale_id, product_id, quantity, unit_price_cents, subtotal_cents
            FROM sale_lines
            WHERE sale_id = ?1
            "#,
        )
        .bind(sale_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(lines)
    }

    /// Gets a sale together with its lines.
    pub async fn get_detail(
        &self,
        tenant_id: &str,
        id: &str,
    ) -> DbResult<Option<(Sale, Vec<SaleLine>)>> {
        let Some(sale) = self.get_by_id(tenant_id, id).await? else {
            return Ok(None);
        };
        let lines = self.lines(&sale.id).await?;
        Ok(Some((sale, lines)))
    }

    /// Updates a sale's mutable fields (customer info, payment kind,
    /// status, notes). Totals and lines are frozen; corrections go
    /// through the settlement engine's reversal.
    pub async fn update_details(
        &self,
        tenant_id: &str,
        id: &str,
        update: SaleUpdate,
    ) -> DbResult<Sale> {
        let Some(mut sale) = self.get_by_id(tenant_id, id).await? else {
            return Err(DbError::not_found("Sale", id));
        };

        if let Some(name) = update.customer_name {
            sale.customer_name = name;
        }
        if let Some(email) = update.customer_email {
            sale.customer_email = Some(email);
        }
        if let Some(phone) = update.customer_phone {
            sale.customer_phone = Some(phone);
        }
        if let Some(kind) = update.payment_kind {
            sale.payment_kind = kind;
        }
        if let Some(status) = update.status {
            sale.status = status;
        }
        if let Some(notes) = update.notes {
            sale.notes = Some(notes);
        }
        sale.updated_at = Utc::now();

        debug!(id = %id, "Updating sale details");

        let result = sqlx::query(
            r#"
            UPDATE sales SET
                customer_name = ?3,
                customer_email = ?4,
                customer_phone = ?5,
                payment_kind = ?6,
                status = ?7,
                notes = ?8,
                updated_at = ?9
            WHERE id = ?1 AND tenant_id = ?2
            "#,
        )
        .bind(&sale.id)
        .bind(tenant_id)
        .bind(&sale.customer_name)
        .bind(&sale.customer_email)
        .bind(&sale.customer_phone)
        .bind(sale.payment_kind)
        .bind(sale.status)
        .bind(&sale.notes)
        .bind(sale.updated_at)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Sale", id));
        }

        Ok(sale)
    }
}
