//! # Product Repository
//!
//! Database operations for a tenant's inventory.
//!
//! ## Key Operations
//! - Tenant-scoped CRUD
//! - Low-stock listing (quantity at or below the product's minimum)
//! - Manual stock adjustments (restocking, corrections)
//!
//! Stock deductions for sales do NOT happen here: they are part of the
//! settlement transaction in [`crate::engine::SettlementEngine`], where
//! the decrement and the sale insert commit or roll back together.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use crate::repository::generate_id;
use balanza_core::validation::{
    validate_name, validate_price_cents, validate_sku, validate_stock_level,
};
use balanza_core::{Product, DEFAULT_MIN_QUANTITY};

/// Input for creating a product.
#[derive(Debug, Clone, Default)]
pub struct NewProduct {
    pub sku: String,
    pub name: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub unit_cost_cents: i64,
    pub sale_price_cents: i64,
    pub quantity_on_hand: i64,
    /// Low-stock threshold; defaults to [`DEFAULT_MIN_QUANTITY`] when None.
    pub min_quantity: Option<i64>,
}

/// Repository for product database operations.
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Creates a product for the tenant.
    ///
    /// ## Errors
    /// - `DbError::Domain` - invalid sku/name/prices/stock
    /// - `DbError::UniqueViolation` - SKU already exists (any tenant)
    pub async fn create(&self, tenant_id: &str, input: NewProduct) -> DbResult<Product> {
        validate_sku(&input.sku)?;
        validate_name("name", &input.name)?;
        validate_price_cents(input.unit_cost_cents)?;
        validate_price_cents(input.sale_price_cents)?;
        validate_stock_level(input.quantity_on_hand)?;

        let now = Utc::now();
        let product = Product {
            id: generate_id(),
            tenant_id: tenant_id.to_string(),
            sku: input.sku.trim().to_string(),
            name: input.name.trim().to_string(),
            description: input.description,
            category: input.category,
            unit_cost_cents: input.unit_cost_cents,
            sale_price_cents: input.sale_price_cents,
            quantity_on_hand: input.quantity_on_hand,
            min_quantity: input.min_quantity.unwrap_or(DEFAULT_MIN_QUANTITY),
            created_at: now,
            updated_at: now,
        };

        debug!(sku = %product.sku, tenant_id = %tenant_id, "Inserting product");

        sqlx::query(
            r#"
            INSERT INTO products (
                id, tenant_id, sku, name, description, category,
                unit_cost_cents, sale_price_cents, quantity_on_hand, min_quantity,
                created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)
            "#,
        )
        .bind(&product.id)
        .bind(&product.tenant_id)
        .bind(&product.sku)
        .bind(&product.name)
        .bind(&product.description)
        .bind(&product.category)
        .bind(product.unit_cost_cents)
        .bind(product.sale_price_cents)
        .bind(product.quantity_on_hand)
        .bind(product.min_quantity)
        .bind(product.created_at)
        .bind(product.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(product)
    }

    /// Gets a product by ID, scoped to the tenant.
    pub async fn get_by_id(&self, tenant_id: &str, id: &str) -> DbResult<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, tenant_id, sku, name, description, category,
                   unit_cost_cents, sale_price_cents, quantity_on_hand, min_quantity,
                   created_at, updated_at
            FROM products
            WHERE id = ?1 AND tenant_id = ?2
            "#,
        )
        .bind(id)
        .bind(tenant_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    /// Gets a product by its SKU, scoped to the tenant.
    pub async fn get_by_sku(&self, tenant_id: &str, sku: &str) -> DbResult<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, tenant_id, sku, name, description, category,
                   unit_cost_cents, sale_price_cents, quantity_on_hand, min_quantity,
                   created_at, updated_at
            FROM products
            WHERE sku = ?1 AND tenant_id = ?2
            "#,
        )
        .bind(sku)
        .bind(tenant_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    /// Lists all of a tenant's products, sorted by name.
    pub async fn list(&self, tenant_id: &str) -> DbResult<Vec<Product>> {
        let products = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, tenant_id, sku, name, description, category,
                   unit_cost_cents, sale_price_cents, quantity_on_hand, min_quantity,
                   created_at, updated_at
            FROM products
            WHERE tenant_id = ?1
            ORDER BY name
            "#,
        )
        .bind(tenant_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(products)
    }

    /// Lists products at or below their minimum stock threshold.
    pub async fn list_low_stock(&self, tenant_id: &str) -> DbResult<Vec<Product>> {
        let products = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, tenant_id, sku, name, description, category,
                   unit_cost_cents, sale_price_cents, quantity_on_hand, min_quantity,
                   created_at, updated_at
            FROM products
            WHERE tenant_id = ?1 AND quantity_on_hand <= min_quantity
            ORDER BY quantity_on_hand
            "#,
        )
        .bind(tenant_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(products)
    }

    /// Updates an existing product (all mutable fields).
    ///
    /// ## Errors
    /// - `DbError::NotFound` - product doesn't exist for this tenant
    /// - `DbError::Domain` - invalid field values
    pub async fn update(&self, product: &Product) -> DbResult<()> {
        validate_name("name", &product.name)?;
        validate_price_cents(product.unit_cost_cents)?;
        validate_price_cents(product.sale_price_cents)?;
        validate_stock_level(product.quantity_on_hand)?;

        debug!(id = %product.id, "Updating product");

        let now = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE products SET
                name = ?3,
                description = ?4,
                category = ?5,
                unit_cost_cents = ?6,
                sale_price_cents = ?7,
                quantity_on_hand = ?8,
                min_quantity = ?9,
                updated_at = ?10
            WHERE id = ?1 AND tenant_id = ?2
            "#,
        )
        .bind(&product.id)
        .bind(&product.tenant_id)
        .bind(&product.name)
        .bind(&product.description)
        .bind(&product.category)
        .bind(product.unit_cost_cents)
        .bind(product.sale_price_cents)
        .bind(product.quantity_on_hand)
        .bind(product.min_quantity)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", &product.id));
        }

        Ok(())
    }

    /// Adjusts stock by a delta (positive for restocking, negative for
    /// corrections). Refuses adjustments that would take stock negative.
    pub async fn adjust_stock(&self, tenant_id: &str, id: &str, delta: i64) -> DbResult<()> {
        debug!(id = %id, delta = %delta, "Adjusting stock");

        let now = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE products
            SET quantity_on_hand = quantity_on_hand + ?3,
                updated_at = ?4
            WHERE id = ?1 AND tenant_id = ?2 AND quantity_on_hand + ?3 >= 0
            "#,
        )
        .bind(id)
        .bind(tenant_id)
        .bind(delta)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            // Distinguish a missing product from a rejected adjustment
            return match self.get_by_id(tenant_id, id).await? {
                None => Err(DbError::not_found("Product", id)),
                Some(_) => Err(balanza_core::ValidationError::OutOfRange {
                    field: "quantity_on_hand".to_string(),
                    min: 0,
                    max: i64::MAX,
                }
                .into()),
            };
        }

        Ok(())
    }

    /// Hard-deletes a product.
    ///
    /// Fails with a foreign-key violation if sale lines reference it;
    /// historical sales keep their products.
    pub async fn delete(&self, tenant_id: &str, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deleting product");

        let result = sqlx::query("DELETE FROM products WHERE id = ?1 AND tenant_id = ?2")
            .bind(id)
            .bind(tenant_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        Ok(())
    }

    /// Counts the tenant's products (for diagnostics).
    pub async fn count(&self, tenant_id: &str) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products WHERE tenant_id = ?1")
            .bind(tenant_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}
