//! # Expense Repository
//!
//! Plain tenant-scoped CRUD. Expenses participate in settlement only
//! through the balance aggregation, so there is no engine involvement.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use crate::repository::generate_id;
use balanza_core::validation::{validate_name, validate_positive_amount};
use balanza_core::Expense;

/// Input for creating an expense.
#[derive(Debug, Clone, Default)]
pub struct NewExpense {
    pub description: String,
    pub category: Option<String>,
    pub amount_cents: i64,
    pub receipt_ref: Option<String>,
    /// When the expense was incurred; defaults to now.
    pub incurred_at: Option<DateTime<Utc>>,
}

/// Repository for expense database operations.
#[derive(Debug, Clone)]
pub struct ExpenseRepository {
    pool: SqlitePool,
}

impl ExpenseRepository {
    /// Creates a new ExpenseRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ExpenseRepository { pool }
    }

    /// Records an expense.
    ///
    /// ## Errors
    /// - `DbError::Domain` - empty description or non-positive amount
    pub async fn create(
        &self,
        tenant_id: &str,
        user_id: &str,
        input: NewExpense,
    ) -> DbResult<Expense> {
        validate_name("description", &input.description)?;
        validate_positive_amount("amount", input.amount_cents)?;

        let now = Utc::now();
        let expense = Expense {
            id: generate_id(),
            tenant_id: tenant_id.to_string(),
            user_id: user_id.to_string(),
            description: input.description.trim().to_string(),
            category: input.category,
            amount_cents: input.amount_cents,
            receipt_ref: input.receipt_ref,
            incurred_at: input.incurred_at.unwrap_or(now),
            created_at: now,
            updated_at: now,
        };

        debug!(tenant_id = %tenant_id, amount = %expense.amount_cents, "Inserting expense");

        sqlx::query(
            r#"
            INSERT INTO expenses (
                id, tenant_id, user_id, description, category, amount_cents,
                receipt_ref, incurred_at, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            "#,
        )
        .bind(&expense.id)
        .bind(&expense.tenant_id)
        .bind(&expense.user_id)
        .bind(&expense.description)
        .bind(&expense.category)
        .bind(expense.amount_cents)
        .bind(&expense.receipt_ref)
        .bind(expense.incurred_at)
        .bind(expense.created_at)
        .bind(expense.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(expense)
    }

    /// Gets an expense by ID, scoped to the tenant.
    pub async fn get_by_id(&self, tenant_id: &str, id: &str) -> DbResult<Option<Expense>> {
        let expense = sqlx::query_as::<_, Expense>(
            r#"
            SELECT id, tenant_id, user_id, description, category, amount_cents,
                   receipt_ref, incurred_at, created_at, updated_at
            FROM expenses
            WHERE id = ?1 AND tenant_id = ?2
            "#,
        )
        .bind(id)
        .bind(tenant_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(expense)
    }

    /// Lists the tenant's expenses, newest first.
    pub async fn list(&self, tenant_id: &str) -> DbResult<Vec<Expense>> {
        let expenses = sqlx::query_as::<_, Expense>(
            r#"
            SELECT id, tenant_id, user_id, description, category, amount_cents,
                   receipt_ref, incurred_at, created_at, updated_at
            FROM expenses
            WHERE tenant_id = ?1
            ORDER BY incurred_at DESC
            "#,
        )
        .bind(tenant_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(expenses)
    }

    /// Updates an existing expense.
    pub async fn update(&self, expense: &Expense) -> DbResult<()> {
        validate_name("description", &expense.description)?;
        validate_positive_amount("amount", expense.amount_cents)?;

        debug!(id = %expense.id, "Updating expense");

        let now = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE expenses SET
                description = ?3,
                category = ?4,
                amount_cents = ?5,
                receipt_ref = ?6,
                incurred_at = ?7,
                updated_at = ?8
            WHERE id = ?1 AND tenant_id = ?2
            "#,
        )
        .bind(&expense.id)
        .bind(&expense.tenant_id)
        .bind(&expense.description)
        .bind(&expense.category)
        .bind(expense.amount_cents)
        .bind(&expense.receipt_ref)
        .bind(expense.incurred_at)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Expense", &expense.id));
        }

        Ok(())
    }

    /// Hard-deletes an expense.
    pub async fn delete(&self, tenant_id: &str, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deleting expense");

        let result = sqlx::query("DELETE FROM expenses WHERE id = ?1 AND tenant_id = ?2")
            .bind(id)
            .bind(tenant_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Expense", id));
        }

        Ok(())
    }
}
