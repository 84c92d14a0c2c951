//! # Settlement Engine
//!
//! The transactional half of the settlement model. Every operation here
//! runs inside ONE database transaction: on any failure the transaction
//! rolls back and no partial state (stock decremented but sale missing,
//! paid updated but status stale) is ever observable.
//!
//! ## Sale Settlement
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                 create_sale (one transaction)                           │
//! │                                                                         │
//! │  1. Load product (tenant-scoped)            ── NotFound if missing     │
//! │  2. Conditional stock decrement:                                       │
//! │       UPDATE products                                                   │
//! │       SET quantity_on_hand = quantity_on_hand - q                      │
//! │       WHERE id = ? AND quantity_on_hand >= q                           │
//! │     0 rows ──► InsufficientStock (reports what is available)           │
//! │  3. Insert sale (subtotal = total = price × q)                         │
//! │  4. Insert line (unit price frozen)                                    │
//! │  5. credito? insert debt (total owed, nothing paid, pendiente)         │
//! │  6. COMMIT                                                              │
//! │                                                                         │
//! │  The conditional decrement is what makes concurrent sales safe:        │
//! │  two checkouts racing for the last units cannot both pass step 2.      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! delete_sale is the exact inverse; update_debt keeps paid/pending/
//! status moving together; compute_balance reads its sums from a single
//! snapshot.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use crate::repository::generate_id;
use balanza_core::settlement::{
    apply_payment, assemble_balance, credit_debt_description, line_subtotal, realized_margin,
    settle_debt_update,
};
use balanza_core::validation::{validate_name, validate_positive_amount, validate_quantity};
use balanza_core::{
    BalanceReport, CoreError, Debt, DebtStatus, Money, PaymentKind, Product, Sale, SaleLine,
    SaleStatus,
};

// =============================================================================
// Inputs & Outputs
// =============================================================================

/// Input for creating a sale.
#[derive(Debug, Clone)]
pub struct NewSale {
    pub product_id: String,
    pub quantity: i64,
    pub customer_name: String,
    pub customer_email: Option<String>,
    pub customer_phone: Option<String>,
    pub payment_kind: PaymentKind,
    pub notes: Option<String>,
}

/// A completed sale plus its display-only margin.
#[derive(Debug, Clone)]
pub struct SaleReceipt {
    pub sale: Sale,
    pub line: SaleLine,
    /// Realized margin `(sale price − unit cost) × quantity`.
    /// Informational; never persisted.
    pub margin: Money,
    /// The debt created alongside a credit sale, if any.
    pub debt: Option<Debt>,
}

/// Input for creating a manual debt (no originating sale).
#[derive(Debug, Clone, Default)]
pub struct NewDebt {
    pub customer_name: String,
    pub customer_email: Option<String>,
    pub total_cents: i64,
    /// Amount already paid at creation time. Defaults to zero.
    pub paid_cents: Option<i64>,
    pub due_date: Option<DateTime<Utc>>,
    pub description: Option<String>,
}

/// A debt update: any combination of customer fields, a payment, and a
/// manual status. `None` leaves a field as is.
///
/// When `paid_cents` and `status` are both present the payment-derived
/// status wins; see [`balanza_core::settlement::settle_debt_update`].
#[derive(Debug, Clone, Default)]
pub struct DebtPatch {
    pub customer_name: Option<String>,
    pub customer_email: Option<String>,
    /// New CUMULATIVE paid amount (not an increment).
    pub paid_cents: Option<i64>,
    pub status: Option<DebtStatus>,
    pub due_date: Option<DateTime<Utc>>,
    pub description: Option<String>,
}

// =============================================================================
// Engine
// =============================================================================

/// Executes the settlement operations atomically.
///
/// Callers pass the tenant id from a verified identity; nothing here
/// trusts a tenant id that arrived over the wire.
#[derive(Debug, Clone)]
pub struct SettlementEngine {
    pool: SqlitePool,
}

impl SettlementEngine {
    /// Creates a new SettlementEngine.
    pub fn new(pool: SqlitePool) -> Self {
        SettlementEngine { pool }
    }

    // -------------------------------------------------------------------------
    // Sales
    // -------------------------------------------------------------------------

    /// Creates a sale: stock check + decrement, sale + line insert, and
    /// (for credit sales) the linked debt, all in one transaction.
    ///
    /// ## Errors
    /// - `DbError::NotFound` - product absent or another tenant's
    /// - `DbError::Domain(InsufficientStock)` - not enough stock; the
    ///   message reports the available quantity
    /// - `DbError::Domain(Validation)` - bad quantity or customer name
    pub async fn create_sale(
        &self,
        tenant_id: &str,
        user_id: &str,
        input: NewSale,
    ) -> DbResult<SaleReceipt> {
        validate_quantity(input.quantity)?;
        validate_name("customer_name", &input.customer_name)?;

        let mut tx = self.pool.begin().await?;

        let product = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, tenant_id, sku, name, description, category,
                   unit_cost_cents, sale_price_cents, quantity_on_hand, min_quantity,
                   created_at, updated_at
            FROM products
            WHERE id = ?1 AND tenant_id = ?2
            "#,
        )
        .bind(&input.product_id)
        .bind(tenant_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| DbError::not_found("Product", &input.product_id))?;

        let now = Utc::now();

        // The guard: only decrement if enough stock remains. A concurrent
        // sale that got there first makes this affect zero rows.
        let decremented = sqlx::query(
            r#"
            UPDATE products
            SET quantity_on_hand = quantity_on_hand - ?3,
                updated_at = ?4
            WHERE id = ?1 AND tenant_id = ?2 AND quantity_on_hand >= ?3
            "#,
        )
        .bind(&product.id)
        .bind(tenant_id)
        .bind(input.quantity)
        .bind(now)
        .execute(&mut *tx)
        .await?;

        if decremented.rows_affected() == 0 {
            return Err(DbError::Domain(CoreError::InsufficientStock {
                sku: product.sku,
                available: product.quantity_on_hand,
                requested: input.quantity,
            }));
        }

        let subtotal = line_subtotal(product.sale_price(), input.quantity);
        let margin = realized_margin(product.sale_price(), product.unit_cost(), input.quantity);

        let sale = Sale {
            id: generate_id(),
            tenant_id: tenant_id.to_string(),
            user_id: user_id.to_string(),
            customer_name: input.customer_name.trim().to_string(),
            customer_email: input.customer_email.clone(),
            customer_phone: input.customer_phone,
            subtotal_cents: subtotal.cents(),
            total_cents: subtotal.cents(),
            payment_kind: input.payment_kind,
            status: SaleStatus::Completada,
            notes: input.notes,
            created_at: now,
            updated_at: now,
        };

        sqlx::query(
            r#"
            INSERT INTO sales (
                id, tenant_id, user_id, customer_name, customer_email, customer_phone,
                subtotal_cents, total_cents, payment_kind, status, notes,
                created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)
            "#,
        )
        .bind(&sale.id)
        .bind(&sale.tenant_id)
        .bind(&sale.user_id)
        .bind(&sale.customer_name)
        .bind(&sale.customer_email)
        .bind(&sale.customer_phone)
        .bind(sale.subtotal_cents)
        .bind(sale.total_cents)
        .bind(sale.payment_kind)
        .bind(sale.status)
        .bind(&sale.notes)
        .bind(sale.created_at)
        .bind(sale.updated_at)
        .execute(&mut *tx)
        .await?;

        let line = SaleLine {
            id: generate_id(),
            sale_id: sale.id.clone(),
            product_id: product.id.clone(),
            quantity: input.quantity,
            unit_price_cents: product.sale_price_cents, // frozen
            subtotal_cents: subtotal.cents(),
        };

        sqlx::query(
            r#"
            INSERT INTO sale_lines (id, sale_id, product_id, quantity, unit_price_cents, subtotal_cents)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
        )
        .bind(&line.id)
        .bind(&line.sale_id)
        .bind(&line.product_id)
        .bind(line.quantity)
        .bind(line.unit_price_cents)
        .bind(line.subtotal_cents)
        .execute(&mut *tx)
        .await?;

        // Credit sales owe the full amount from the start.
        let debt = if input.payment_kind == PaymentKind::Credito {
            let debt = Debt {
                id: generate_id(),
                tenant_id: tenant_id.to_string(),
                sale_id: Some(sale.id.clone()),
                customer_name: sale.customer_name.clone(),
                customer_email: input.customer_email,
                total_cents: subtotal.cents(),
                paid_cents: 0,
                pending_cents: subtotal.cents(),
                status: DebtStatus::Pendiente,
                due_date: None,
                description: Some(credit_debt_description(input.quantity, &product.name)),
                created_at: now,
                updated_at: now,
            };

            self.insert_debt(&mut tx, &debt).await?;
            Some(debt)
        } else {
            None
        };

        tx.commit().await?;

        info!(
            sale_id = %sale.id,
            tenant_id = %tenant_id,
            total = %sale.total_cents,
            kind = ?sale.payment_kind,
            "Sale created"
        );

        Ok(SaleReceipt {
            sale,
            line,
            margin,
            debt,
        })
    }

    /// Deletes a sale, restoring stock and removing any linked debt.
    ///
    /// The exact inverse of [`Self::create_sale`]: afterwards the product
    /// and debt tables look as if the sale never happened. Payments
    /// already recorded against the deleted debt are lost with it.
    pub async fn delete_sale(&self, tenant_id: &str, sale_id: &str) -> DbResult<()> {
        let mut tx = self.pool.begin().await?;

        let sale_exists: Option<String> =
            sqlx::query_scalar("SELECT id FROM sales WHERE id = ?1 AND tenant_id = ?2")
                .bind(sale_id)
                .bind(tenant_id)
                .fetch_optional(&mut *tx)
                .await?;
        if sale_exists.is_none() {
            return Err(DbError::not_found("Sale", sale_id));
        }

        let lines = sqlx::query_as::<_, SaleLine>(
            r#"
            SELECT id, sale_id, product_id, quantity, unit_price_cents, subtotal_cents
            FROM sale_lines
            WHERE sale_id = ?1
            "#,
        )
        .bind(sale_id)
        .fetch_all(&mut *tx)
        .await?;

        let now = Utc::now();

        // Give every line's quantity back to its product.
        for line in &lines {
            sqlx::query(
                r#"
                UPDATE products
                SET quantity_on_hand = quantity_on_hand + ?2,
                    updated_at = ?3
                WHERE id = ?1
                "#,
            )
            .bind(&line.product_id)
            .bind(line.quantity)
            .bind(now)
            .execute(&mut *tx)
            .await?;
        }

        sqlx::query("DELETE FROM debts WHERE sale_id = ?1 AND tenant_id = ?2")
            .bind(sale_id)
            .bind(tenant_id)
            .execute(&mut *tx)
            .await?;

        sqlx::query("DELETE FROM sale_lines WHERE sale_id = ?1")
            .bind(sale_id)
            .execute(&mut *tx)
            .await?;

        sqlx::query("DELETE FROM sales WHERE id = ?1")
            .bind(sale_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        info!(sale_id = %sale_id, tenant_id = %tenant_id, "Sale deleted, stock restored");
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Debts
    // -------------------------------------------------------------------------

    /// Creates a manual debt (one not originating from a sale).
    ///
    /// The initial status is derived from (paid, total) exactly like a
    /// payment would derive it.
    pub async fn create_debt(&self, tenant_id: &str, input: NewDebt) -> DbResult<Debt> {
        validate_name("customer_name", &input.customer_name)?;
        validate_positive_amount("total", input.total_cents)?;

        let total = Money::from_cents(input.total_cents);
        let initial_paid = Money::from_cents(input.paid_cents.unwrap_or(0));
        let terms = apply_payment(total, Money::zero(), initial_paid).map_err(DbError::Domain)?;

        let now = Utc::now();
        let debt = Debt {
            id: generate_id(),
            tenant_id: tenant_id.to_string(),
            sale_id: None,
            customer_name: input.customer_name.trim().to_string(),
            customer_email: input.customer_email,
            total_cents: total.cents(),
            paid_cents: terms.paid.cents(),
            pending_cents: terms.pending.cents(),
            status: terms.status,
            due_date: input.due_date,
            description: input.description,
            created_at: now,
            updated_at: now,
        };

        let mut tx = self.pool.begin().await?;
        self.insert_debt(&mut tx, &debt).await?;
        tx.commit().await?;

        info!(debt_id = %debt.id, tenant_id = %tenant_id, status = ?debt.status, "Debt created");
        Ok(debt)
    }

    /// Applies a debt update: customer fields, a payment, a manual
    /// status, due date, description.
    ///
    /// A payment recomputes pending and status atomically with the paid
    /// amount; a manual status only sticks when no payment accompanies
    /// it. Over- and under-range payments are rejected before anything
    /// is written.
    pub async fn update_debt(
        &self,
        tenant_id: &str,
        debt_id: &str,
        patch: DebtPatch,
    ) -> DbResult<Debt> {
        let mut tx = self.pool.begin().await?;

        let mut debt = sqlx::query_as::<_, Debt>(
            r#"
            SELECT id, tenant_id, sale_id, customer_name, customer_email,
                   total_cents, paid_cents, pending_cents, status,
                   due_date, description, created_at, updated_at
            FROM debts
            WHERE id = ?1 AND tenant_id = ?2
            "#,
        )
        .bind(debt_id)
        .bind(tenant_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| DbError::not_found("Debt", debt_id))?;

        let terms = settle_debt_update(
            debt.total(),
            debt.paid(),
            debt.status,
            patch.paid_cents.map(Money::from_cents),
            patch.status,
        )
        .map_err(DbError::Domain)?;

        debt.paid_cents = terms.paid.cents();
        debt.pending_cents = terms.pending.cents();
        debt.status = terms.status;

        if let Some(name) = patch.customer_name {
            validate_name("customer_name", &name)?;
            debt.customer_name = name;
        }
        if let Some(email) = patch.customer_email {
            debt.customer_email = Some(email);
        }
        if let Some(due) = patch.due_date {
            debt.due_date = Some(due);
        }
        if let Some(desc) = patch.description {
            debt.description = Some(desc);
        }
        debt.updated_at = Utc::now();

        debug!(
            debt_id = %debt.id,
            paid = %debt.paid_cents,
            pending = %debt.pending_cents,
            status = ?debt.status,
            "Updating debt"
        );

        sqlx::query(
            r#"
            UPDATE debts SET
                customer_name = ?3,
                customer_email = ?4,
                paid_cents = ?5,
                pending_cents = ?6,
                status = ?7,
                due_date = ?8,
                description = ?9,
                updated_at = ?10
            WHERE id = ?1 AND tenant_id = ?2
            "#,
        )
        .bind(&debt.id)
        .bind(tenant_id)
        .bind(&debt.customer_name)
        .bind(&debt.customer_email)
        .bind(debt.paid_cents)
        .bind(debt.pending_cents)
        .bind(debt.status)
        .bind(debt.due_date)
        .bind(&debt.description)
        .bind(debt.updated_at)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(debt)
    }

    async fn insert_debt(
        &self,
        tx: &mut sqlx::Transaction<'_, sqlx::Sqlite>,
        debt: &Debt,
    ) -> DbResult<()> {
        sqlx::query(
            r#"
            INSERT INTO debts (
                id, tenant_id, sale_id, customer_name, customer_email,
                total_cents, paid_cents, pending_cents, status,
                due_date, description, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)
            "#,
        )
        .bind(&debt.id)
        .bind(&debt.tenant_id)
        .bind(&debt.sale_id)
        .bind(&debt.customer_name)
        .bind(&debt.customer_email)
        .bind(debt.total_cents)
        .bind(debt.paid_cents)
        .bind(debt.pending_cents)
        .bind(debt.status)
        .bind(debt.due_date)
        .bind(&debt.description)
        .bind(debt.created_at)
        .bind(debt.updated_at)
        .execute(&mut **tx)
        .await?;

        Ok(())
    }

    // -------------------------------------------------------------------------
    // Balance
    // -------------------------------------------------------------------------

    /// Computes the tenant's financial balance from one consistent
    /// snapshot (all sums read inside a single transaction).
    ///
    /// Income counts ALL sales regardless of status, and the pending-debt
    /// sum covers pendiente and vencida only (parcial excluded); both
    /// kept as observed and pinned by tests.
    pub async fn compute_balance(&self, tenant_id: &str) -> DbResult<BalanceReport> {
        let mut tx = self.pool.begin().await?;

        let (income, sale_count): (i64, i64) = sqlx::query_as(
            "SELECT COALESCE(SUM(total_cents), 0), COUNT(*) FROM sales WHERE tenant_id = ?1",
        )
        .bind(tenant_id)
        .fetch_one(&mut *tx)
        .await?;

        let (expense, expense_count): (i64, i64) = sqlx::query_as(
            "SELECT COALESCE(SUM(amount_cents), 0), COUNT(*) FROM expenses WHERE tenant_id = ?1",
        )
        .bind(tenant_id)
        .fetch_one(&mut *tx)
        .await?;

        let (pending_debt, pending_debt_count): (i64, i64) = sqlx::query_as(
            r#"
            SELECT COALESCE(SUM(pending_cents), 0), COUNT(*)
            FROM debts
            WHERE tenant_id = ?1 AND status IN ('pendiente', 'vencida')
            "#,
        )
        .bind(tenant_id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        let report = assemble_balance(
            Money::from_cents(income),
            Money::from_cents(expense),
            Money::from_cents(pending_debt),
            sale_count,
            expense_count,
            pending_debt_count,
        );

        debug!(tenant_id = %tenant_id, net = %report.net_balance_cents, "Balance computed");
        Ok(report)
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::pool::{Database, DbConfig};
    use crate::repository::product::NewProduct;
    use crate::repository::tenant::NewTenant;
    use crate::repository::user::NewUser;
    use balanza_core::Role;

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    /// Creates a tenant and a user, returning their ids.
    async fn setup_tenant(db: &Database) -> (String, String) {
        let tenant = db
            .tenants()
            .create(NewTenant {
                name: "Tienda La Esquina".to_string(),
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
                    password_hash: "argon2-hash-placeholder".to_string(),
                    role: Role::Admin,
                },
            )
            .await
            .unwrap();

        (tenant.id, user.id)
    }

    /// Mouse: cost $15.00, price $30.00, 50 on hand.
    async fn seed_mouse(db: &Database, tenant_id: &str) -> Product {
        db.products()
            .create(
                tenant_id,
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
            .unwrap()
    }

    fn mouse_sale(product_id: &str, quantity: i64, kind: PaymentKind) -> NewSale {
        NewSale {
            product_id: product_id.to_string(),
            quantity,
            customer_name: "Cliente A".to_string(),
            customer_email: None,
            customer_phone: None,
            payment_kind: kind,
            notes: None,
        }
    }

    #[tokio::test]
    async fn test_cash_sale_settles_stock_and_margin() {
        let db = test_db().await;
        let (tenant_id, user_id) = setup_tenant(&db).await;
        let product = seed_mouse(&db, &tenant_id).await;

        let receipt = db
            .settlement()
            .create_sale(
                &tenant_id,
                &user_id,
                mouse_sale(&product.id, 10, PaymentKind::Contado),
            )
            .await
            .unwrap();

        assert_eq!(receipt.sale.total_cents, 30000);
        assert_eq!(receipt.sale.subtotal_cents, 30000);
        assert_eq!(receipt.margin.cents(), 15000);
        assert_eq!(receipt.line.unit_price_cents, 3000);
        assert!(receipt.debt.is_none());

        let product = db
            .products()
            .get_by_id(&tenant_id, &product.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(product.quantity_on_hand, 40);

        // No debt anywhere for a cash sale
        let debt = db
            .debts()
            .get_by_sale(&tenant_id, &receipt.sale.id)
            .await
            .unwrap();
        assert!(debt.is_none());
    }

    #[tokio::test]
    async fn test_credit_sale_creates_linked_debt() {
        let db = test_db().await;
        let (tenant_id, user_id) = setup_tenant(&db).await;
        let product = seed_mouse(&db, &tenant_id).await;

        let receipt = db
            .settlement()
            .create_sale(
                &tenant_id,
                &user_id,
                mouse_sale(&product.id, 10, PaymentKind::Credito),
            )
            .await
            .unwrap();

        let debt = receipt.debt.expect("credit sale must create a debt");
        assert_eq!(debt.total_cents, 30000);
        assert_eq!(debt.paid_cents, 0);
        assert_eq!(debt.pending_cents, 30000);
        assert_eq!(debt.status, DebtStatus::Pendiente);
        assert_eq!(debt.sale_id.as_deref(), Some(receipt.sale.id.as_str()));
        assert_eq!(debt.description.as_deref(), Some("Venta de 10 x Mouse"));

        // And it is persisted, not just returned
        let stored = db
            .debts()
            .get_by_sale(&tenant_id, &receipt.sale.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.pending_cents, 30000);
    }

    #[tokio::test]
    async fn test_insufficient_stock_rolls_back_everything() {
        let db = test_db().await;
        let (tenant_id, user_id) = setup_tenant(&db).await;
        let product = seed_mouse(&db, &tenant_id).await;

        let err = db
            .settlement()
            .create_sale(
                &tenant_id,
                &user_id,
                mouse_sale(&product.id, 51, PaymentKind::Contado),
            )
            .await
            .unwrap_err();

        match &err {
            DbError::Domain(CoreError::InsufficientStock {
                available,
                requested,
                ..
            }) => {
                assert_eq!(*available, 50);
                assert_eq!(*requested, 51);
            }
            other => panic!("expected InsufficientStock, got {other:?}"),
        }
        assert_eq!(err.kind(), ErrorKind::InvalidInput);

        // Stock untouched, no sale rows
        let product = db
            .products()
            .get_by_id(&tenant_id, &product.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(product.quantity_on_hand, 50);
        assert!(db.sales().list(&tenant_id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_rejects_non_positive_quantity() {
        let db = test_db().await;
        let (tenant_id, user_id) = setup_tenant(&db).await;
        let product = seed_mouse(&db, &tenant_id).await;

        let err = db
            .settlement()
            .create_sale(
                &tenant_id,
                &user_id,
                mouse_sale(&product.id, 0, PaymentKind::Contado),
            )
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::InvalidInput);
    }

    #[tokio::test]
    async fn test_unknown_product_is_not_found() {
        let db = test_db().await;
        let (tenant_id, user_id) = setup_tenant(&db).await;

        let err = db
            .settlement()
            .create_sale(
                &tenant_id,
                &user_id,
                mouse_sale("no-such-product", 1, PaymentKind::Contado),
            )
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_delete_sale_is_exact_inverse() {
        let db = test_db().await;
        let (tenant_id, user_id) = setup_tenant(&db).await;
        let product = seed_mouse(&db, &tenant_id).await;

        let receipt = db
            .settlement()
            .create_sale(
                &tenant_id,
                &user_id,
                mouse_sale(&product.id, 10, PaymentKind::Credito),
            )
            .await
            .unwrap();

        db.settlement()
            .delete_sale(&tenant_id, &receipt.sale.id)
            .await
            .unwrap();

        // Stock restored to the pre-sale value exactly
        let product = db
            .products()
            .get_by_id(&tenant_id, &product.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(product.quantity_on_hand, 50);

        // Sale, lines, and debt are gone
        assert!(db
            .sales()
            .get_by_id(&tenant_id, &receipt.sale.id)
            .await
            .unwrap()
            .is_none());
        assert!(db.sales().lines(&receipt.sale.id).await.unwrap().is_empty());
        assert!(db
            .debts()
            .get_by_sale(&tenant_id, &receipt.sale.id)
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_delete_missing_sale_is_not_found() {
        let db = test_db().await;
        let (tenant_id, _) = setup_tenant(&db).await;

        let err = db
            .settlement()
            .delete_sale(&tenant_id, "no-such-sale")
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_payment_lifecycle_on_debt() {
        let db = test_db().await;
        let (tenant_id, _) = setup_tenant(&db).await;

        let debt = db
            .settlement()
            .create_debt(
                &tenant_id,
                NewDebt {
                    customer_name: "Cliente B".to_string(),
                    total_cents: 30000,
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(debt.status, DebtStatus::Pendiente);

        // Partial payment
        let partial = db
            .settlement()
            .update_debt(
                &tenant_id,
                &debt.id,
                DebtPatch {
                    paid_cents: Some(12000),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(partial.paid_cents, 12000);
        assert_eq!(partial.pending_cents, 18000);
        assert_eq!(partial.status, DebtStatus::Parcial);

        // Same payment again: idempotent
        let repeat = db
            .settlement()
            .update_debt(
                &tenant_id,
                &debt.id,
                DebtPatch {
                    paid_cents: Some(12000),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(repeat.paid_cents, partial.paid_cents);
        assert_eq!(repeat.pending_cents, partial.pending_cents);
        assert_eq!(repeat.status, partial.status);

        // Full payment
        let full = db
            .settlement()
            .update_debt(
                &tenant_id,
                &debt.id,
                DebtPatch {
                    paid_cents: Some(30000),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(full.pending_cents, 0);
        assert_eq!(full.status, DebtStatus::Pagada);

        // Back to zero
        let reset = db
            .settlement()
            .update_debt(
                &tenant_id,
                &debt.id,
                DebtPatch {
                    paid_cents: Some(0),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(reset.pending_cents, 30000);
        assert_eq!(reset.status, DebtStatus::Pendiente);
    }

    #[tokio::test]
    async fn test_over_payment_leaves_debt_untouched() {
        let db = test_db().await;
        let (tenant_id, _) = setup_tenant(&db).await;

        let debt = db
            .settlement()
            .create_debt(
                &tenant_id,
                NewDebt {
                    customer_name: "Cliente B".to_string(),
                    total_cents: 30000,
                    paid_cents: Some(20000),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(debt.status, DebtStatus::Parcial);

        let err = db
            .settlement()
            .update_debt(
                &tenant_id,
                &debt.id,
                DebtPatch {
                    paid_cents: Some(30001),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);

        let stored = db.debts().get_by_id(&tenant_id, &debt.id).await.unwrap().unwrap();
        assert_eq!(stored.paid_cents, 20000);
        assert_eq!(stored.pending_cents, 10000);
        assert_eq!(stored.status, DebtStatus::Parcial);
    }

    #[tokio::test]
    async fn test_manual_status_rules() {
        let db = test_db().await;
        let (tenant_id, _) = setup_tenant(&db).await;

        let debt = db
            .settlement()
            .create_debt(
                &tenant_id,
                NewDebt {
                    customer_name: "Cliente C".to_string(),
                    total_cents: 10000,
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        // Without a payment, a manual status is honored verbatim
        let marked = db
            .settlement()
            .update_debt(
                &tenant_id,
                &debt.id,
                DebtPatch {
                    status: Some(DebtStatus::Vencida),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(marked.status, DebtStatus::Vencida);

        // With a payment in the same patch, the derived status wins
        let paid = db
            .settlement()
            .update_debt(
                &tenant_id,
                &debt.id,
                DebtPatch {
                    paid_cents: Some(10000),
                    status: Some(DebtStatus::Vencida),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(paid.status, DebtStatus::Pagada);
        assert_eq!(paid.pending_cents, 0);
    }

    #[tokio::test]
    async fn test_balance_scenario() {
        let db = test_db().await;
        let (tenant_id, user_id) = setup_tenant(&db).await;
        let product = seed_mouse(&db, &tenant_id).await;

        // One credit sale of 10 mice: income 30000, pending debt 30000
        db.settlement()
            .create_sale(
                &tenant_id,
                &user_id,
                mouse_sale(&product.id, 10, PaymentKind::Credito),
            )
            .await
            .unwrap();

        let report = db.settlement().compute_balance(&tenant_id).await.unwrap();
        assert_eq!(report.total_income_cents, 30000);
        assert_eq!(report.total_expense_cents, 0);
        assert_eq!(report.pending_debt_cents, 30000);
        assert_eq!(report.net_balance_cents, 30000);
        assert_eq!(report.available_cash_flow_cents, 0);
        assert_eq!(report.sale_count, 1);
        assert_eq!(report.expense_count, 0);
        assert_eq!(report.pending_debt_count, 1);
    }

    #[tokio::test]
    async fn test_balance_excludes_partial_debts_from_pending() {
        let db = test_db().await;
        let (tenant_id, user_id) = setup_tenant(&db).await;
        let product = seed_mouse(&db, &tenant_id).await;

        let receipt = db
            .settlement()
            .create_sale(
                &tenant_id,
                &user_id,
                mouse_sale(&product.id, 10, PaymentKind::Credito),
            )
            .await
            .unwrap();

        // A partial payment moves the debt out of the pending sum entirely
        db.settlement()
            .update_debt(
                &tenant_id,
                &receipt.debt.unwrap().id,
                DebtPatch {
                    paid_cents: Some(10000),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let report = db.settlement().compute_balance(&tenant_id).await.unwrap();
        assert_eq!(report.pending_debt_cents, 0);
        assert_eq!(report.pending_debt_count, 0);
        // Income still counts the full sale
        assert_eq!(report.total_income_cents, 30000);
    }

    #[tokio::test]
    async fn test_balance_with_expenses() {
        let db = test_db().await;
        let (tenant_id, user_id) = setup_tenant(&db).await;
        let product = seed_mouse(&db, &tenant_id).await;

        db.settlement()
            .create_sale(
                &tenant_id,
                &user_id,
                mouse_sale(&product.id, 10, PaymentKind::Contado),
            )
            .await
            .unwrap();

        db.expenses()
            .create(
                &tenant_id,
                &user_id,
                crate::repository::expense::NewExpense {
                    description: "Arriendo local".to_string(),
                    category: Some("servicios".to_string()),
                    amount_cents: 12000,
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let report = db.settlement().compute_balance(&tenant_id).await.unwrap();
        assert_eq!(report.total_income_cents, 30000);
        assert_eq!(report.total_expense_cents, 12000);
        assert_eq!(report.net_balance_cents, 18000);
        assert_eq!(report.available_cash_flow_cents, 18000);
    }

    #[tokio::test]
    async fn test_cross_tenant_access_is_not_found() {
        let db = test_db().await;
        let (tenant_a, user_a) = setup_tenant(&db).await;
        let product = seed_mouse(&db, &tenant_a).await;

        let tenant_b = db
            .tenants()
            .create(NewTenant {
                name: "Otra Tienda".to_string(),
                tax_id: "800999111-2".to_string(),
                ..Default::default()
            })
            .await
            .unwrap();

        // Tenant B cannot sell tenant A's product
        let err = db
            .settlement()
            .create_sale(
                &tenant_b.id,
                &user_a,
                mouse_sale(&product.id, 1, PaymentKind::Contado),
            )
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);

        // Nor see it
        assert!(db
            .products()
            .get_by_id(&tenant_b.id, &product.id)
            .await
            .unwrap()
            .is_none());
    }

    /// N concurrent sales cannot oversell: with 5 on hand and four
    /// checkouts of 2 each, exactly two succeed and stock ends at 1.
    #[tokio::test(flavor = "multi_thread")]
    async fn test_concurrent_sales_cannot_oversell() {
        let db = test_db().await;
        let (tenant_id, user_id) = setup_tenant(&db).await;

        let product = db
            .products()
            .create(
                &tenant_id,
                NewProduct {
                    sku: "CABLE-01".to_string(),
                    name: "Cable USB".to_string(),
                    unit_cost_cents: 500,
                    sale_price_cents: 1000,
                    quantity_on_hand: 5,
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let mut handles = Vec::new();
        for _ in 0..4 {
            let engine = db.settlement();
            let tenant_id = tenant_id.clone();
            let user_id = user_id.clone();
            let product_id = product.id.clone();
            handles.push(tokio::spawn(async move {
                engine
                    .create_sale(
                        &tenant_id,
                        &user_id,
                        NewSale {
                            product_id,
                            quantity: 2,
                            customer_name: "Cliente X".to_string(),
                            customer_email: None,
                            customer_phone: None,
                            payment_kind: PaymentKind::Contado,
                            notes: None,
                        },
                    )
                    .await
            }));
        }

        let mut successes = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => successes += 1,
                Err(err) => assert_eq!(err.kind(), ErrorKind::InvalidInput),
            }
        }

        assert_eq!(successes, 2);

        let product = db
            .products()
            .get_by_id(&tenant_id, &product.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(product.quantity_on_hand, 1);
        assert_eq!(db.sales().list(&tenant_id).await.unwrap().len(), 2);
    }
}
