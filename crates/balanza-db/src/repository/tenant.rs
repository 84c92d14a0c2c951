//! # Tenant Repository
//!
//! Tenants own every other row. Creation is part of registration;
//! deletion cascades explicitly through all owned tables in one
//! transaction, child tables first.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use crate::repository::generate_id;
use balanza_core::validation::validate_name;
use balanza_core::Tenant;

/// Input for creating a tenant.
#[derive(Debug, Clone, Default)]
pub struct NewTenant {
    pub name: String,
    pub tax_id: String,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
}

/// Repository for tenant database operations.
#[derive(Debug, Clone)]
pub struct TenantRepository {
    pool: SqlitePool,
}

impl TenantRepository {
    /// Creates a new TenantRepository.
    pub fn new(pool: SqlitePool) -> Self {
        TenantRepository { pool }
    }

    /// Creates a tenant.
    ///
    /// ## Errors
    /// - `DbError::UniqueViolation` - name or tax id already taken
    pub async fn create(&self, input: NewTenant) -> DbResult<Tenant> {
        validate_name("name", &input.name)?;

        let now = Utc::now();
        let tenant = Tenant {
            id: generate_id(),
            name: input.name.trim().to_string(),
            tax_id: input.tax_id.trim().to_string(),
            address: input.address,
            phone: input.phone,
            email: input.email,
            created_at: now,
            updated_at: now,
        };

        debug!(name = %tenant.name, "Inserting tenant");

        sqlx::query(
            r#"
            INSERT INTO tenants (id, name, tax_id, address, phone, email, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
        )
        .bind(&tenant.id)
        .bind(&tenant.name)
        .bind(&tenant.tax_id)
        .bind(&tenant.address)
        .bind(&tenant.phone)
        .bind(&tenant.email)
        .bind(tenant.created_at)
        .bind(tenant.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(tenant)
    }

    /// Gets a tenant by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Tenant>> {
        let tenant = sqlx::query_as::<_, Tenant>(
            r#"
            SELECT id, name, tax_id, address, phone, email, created_at, updated_at
            FROM tenants
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(tenant)
    }

    /// Deletes a tenant and everything it owns, in one transaction.
    ///
    /// ## Deletion Order
    /// Child tables first so foreign keys hold at every step:
    /// sale_lines → debts → sales → expenses → products → users → tenant.
    pub async fn delete_cascade(&self, id: &str) -> DbResult<()> {
        info!(tenant_id = %id, "Cascade-deleting tenant");

        let mut tx = self.pool.begin().await?;

        let exists: Option<String> = sqlx::query_scalar("SELECT id FROM tenants WHERE id = ?1")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;
        if exists.is_none() {
            return Err(DbError::not_found("Tenant", id));
        }

        sqlx::query(
            "DELETE FROM sale_lines WHERE sale_id IN (SELECT id FROM sales WHERE tenant_id = ?1)",
        )
        .bind(id)
        .execute(&mut *tx)
        .await?;

        sqlx::query("DELETE FROM debts WHERE tenant_id = ?1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        sqlx::query("DELETE FROM sales WHERE tenant_id = ?1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        sqlx::query("DELETE FROM expenses WHERE tenant_id = ?1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        sqlx::query("DELETE FROM products WHERE tenant_id = ?1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        sqlx::query("DELETE FROM users WHERE tenant_id = ?1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        sqlx::query("DELETE FROM tenants WHERE id = ?1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        info!(tenant_id = %id, "Tenant deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use crate::repository::product::NewProduct;
    use crate::repository::user::NewUser;
    use balanza_core::Role;

    #[tokio::test]
    async fn test_cascade_delete_leaves_no_orphans() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        let tenant = db
            .tenants()
            .create(NewTenant {
                name: "Tienda".to_string(),
                tax_id: "900123456-7".to_string(),
                ..Default::default()
            })
            .await
            .unwrap();

        let user = db
            .users()
            .create(
                &tenant.id,
                NewUser {
                    username: "maria".to_string(),
                    email: "maria@tienda.co".to_string(),
                    password_hash: "hash".to_string(),
                    role: Role::Admin,
                },
            )
            .await
            .unwrap();

        let product = db
            .products()
            .create(
                &tenant.id,
                NewProduct {
                    sku: "MOUSE-01".to_string(),
                    name: "Mouse".to_string(),
                    unit_cost_cents: 1500,
                    sale_price_cents: 3000,
                    quantity_on_hand: 50,
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        // One credit sale so every table has rows
        db.settlement()
            .create_sale(
                &tenant.id,
                &user.id,
                crate::engine::NewSale {
                    product_id: product.id.clone(),
                    quantity: 2,
                    customer_name: "Cliente".to_string(),
                    customer_email: None,
                    customer_phone: None,
                    payment_kind: balanza_core::PaymentKind::Credito,
                    notes: None,
                },
            )
            .await
            .unwrap();

        db.tenants().delete_cascade(&tenant.id).await.unwrap();

        for table in ["tenants", "users", "products", "sales", "sale_lines", "debts"] {
            let count: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {table}"))
                .fetch_one(db.pool())
                .await
                .unwrap();
            assert_eq!(count, 0, "{table} should be empty after cascade");
        }
    }

    #[tokio::test]
    async fn test_duplicate_tenant_name_is_conflict() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        let input = NewTenant {
            name: "Tienda".to_string(),
            tax_id: "900123456-7".to_string(),
            ..Default::default()
        };
        db.tenants().create(input.clone()).await.unwrap();

        let err = db
            .tenants()
            .create(NewTenant {
                tax_id: "800999000-1".to_string(),
                ..input
            })
            .await
            .unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::Conflict);
    }
}
