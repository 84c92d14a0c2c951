//! # Domain Types
//!
//! Core domain types used throughout Balanza.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │      Sale       │   │      Debt       │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (UUID)      │   │  id (UUID)      │   │  id (UUID)      │       │
//! │  │  sku (business) │   │  payment_kind   │   │  sale_id (FK?)  │       │
//! │  │  sale_price     │   │  total_cents    │   │  pending_cents  │       │
//! │  │  qty_on_hand    │   │  lines          │   │  status         │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │   PaymentKind   │   │   SaleStatus    │   │   DebtStatus    │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  Contado        │   │  Completada     │   │  Pendiente      │       │
//! │  │  Credito        │   │  Pendiente      │   │  Parcial        │       │
//! │  │  Transferencia  │   │  Cancelada      │   │  Pagada/...     │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Dual-Key Identity Pattern
//! Every entity has:
//! - `id`: UUID v4 - immutable, used for database relations
//! - Business ID where one exists: (sku, username, tax id) - human-readable
//!
//! ## Tenancy
//! Every row carries `tenant_id`. Repositories and the settlement engine
//! filter on it in every query; a lookup for another tenant's row behaves
//! exactly like a missing row.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::money::Money;

// =============================================================================
// Payment Kind
// =============================================================================

/// How a sale was paid.
///
/// `Credito` is the interesting one: it creates a [`Debt`] for the
/// outstanding amount in the same transaction as the sale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "lowercase")]
pub enum PaymentKind {
    /// Paid in full at the counter.
    Contado,
    /// Sold on credit; generates a debt.
    Credito,
    /// Paid by bank transfer.
    Transferencia,
}

impl Default for PaymentKind {
    fn default() -> Self {
        PaymentKind::Contado
    }
}

// =============================================================================
// Sale Status
// =============================================================================

/// The status of a sale transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "lowercase")]
pub enum SaleStatus {
    /// Sale has been recorded and stock deducted.
    Completada,
    /// Awaiting something (delivery, confirmation).
    Pendiente,
    /// Sale was cancelled.
    Cancelada,
}

impl Default for SaleStatus {
    fn default() -> Self {
        SaleStatus::Completada
    }
}

// =============================================================================
// Debt Status
// =============================================================================

/// Repayment progress of a customer debt.
///
/// The first three variants are DERIVED from (paid, total) by
/// [`crate::settlement::derive_debt_status`] and must never be set by
/// hand when a payment is being recorded. `Vencida` is a manual/reporting
/// state; `Eliminada` is the soft-delete marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "lowercase")]
pub enum DebtStatus {
    /// Nothing paid yet.
    Pendiente,
    /// Partially paid.
    Parcial,
    /// Paid in full.
    Pagada,
    /// Past its due date.
    Vencida,
    /// Soft-deleted; kept for history, excluded from active listings.
    Eliminada,
}

impl DebtStatus {
    /// Whether the debt still represents money owed.
    ///
    /// Used by listing filters ("activas") and by nothing else; the
    /// balance aggregation has its own, narrower set (pendiente and
    /// vencida only).
    pub const fn is_open(&self) -> bool {
        matches!(
            self,
            DebtStatus::Pendiente | DebtStatus::Parcial | DebtStatus::Vencida
        )
    }
}

impl Default for DebtStatus {
    fn default() -> Self {
        DebtStatus::Pendiente
    }
}

// =============================================================================
// User Role
// =============================================================================

/// Access role of a user inside their tenant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Contador,
    Gerente,
    Usuario,
}

impl Role {
    /// The wire value of this role.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Contador => "contador",
            Role::Gerente => "gerente",
            Role::Usuario => "usuario",
        }
    }
}

impl Default for Role {
    fn default() -> Self {
        Role::Usuario
    }
}

// =============================================================================
// Tenant
// =============================================================================

/// A tenant: an independent business account that owns all other rows.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Tenant {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Business name. Unique across the system.
    pub name: String,

    /// Tax identifier (NIT). Unique across the system.
    pub tax_id: String,

    pub address: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// =============================================================================
// User
// =============================================================================

/// A user account, always attached to exactly one tenant.
///
/// Every authenticated action is scoped to `tenant_id`; callers never
/// supply a tenant id of their own.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct User {
    pub id: String,
    pub tenant_id: String,

    /// Login name. Unique across all tenants.
    pub username: String,

    /// Contact email. Unique across all tenants.
    pub email: String,

    /// Argon2 hash of the password. Never the password itself.
    #[serde(skip_serializing)]
    pub password_hash: String,

    pub role: Role,

    /// Inactive users cannot log in.
    pub active: bool,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// =============================================================================
// Product
// =============================================================================

/// A product in a tenant's inventory.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Product {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Tenant this product belongs to.
    pub tenant_id: String,

    /// Stock Keeping Unit - business identifier, unique across all tenants.
    pub sku: String,

    /// Display name.
    pub name: String,

    pub description: Option<String>,
    pub category: Option<String>,

    /// Acquisition cost per unit, in cents.
    pub unit_cost_cents: i64,

    /// Sale price per unit, in cents.
    pub sale_price_cents: i64,

    /// Current stock level. Never negative at rest.
    pub quantity_on_hand: i64,

    /// Threshold for the low-stock report.
    pub min_quantity: i64,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Returns the sale price as a Money type.
    #[inline]
    pub fn sale_price(&self) -> Money {
        Money::from_cents(self.sale_price_cents)
    }

    /// Returns the unit cost as a Money type.
    #[inline]
    pub fn unit_cost(&self) -> Money {
        Money::from_cents(self.unit_cost_cents)
    }

    /// Margin earned per unit sold at list price.
    #[inline]
    pub fn unit_margin(&self) -> Money {
        self.sale_price() - self.unit_cost()
    }

    /// Whether the product is at or below its minimum stock threshold.
    pub fn is_low_stock(&self) -> bool {
        self.quantity_on_hand <= self.min_quantity
    }
}

// =============================================================================
// Sale
// =============================================================================

/// A recorded sale.
///
/// Immutable once stock has been deducted, except for customer/status
/// field updates and the explicit full reversal (delete, which restores
/// stock and removes the linked debt).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Sale {
    pub id: String,
    pub tenant_id: String,

    /// User who recorded the sale.
    pub user_id: String,

    pub customer_name: String,
    pub customer_email: Option<String>,
    pub customer_phone: Option<String>,

    /// Sum of line subtotals, in cents.
    pub subtotal_cents: i64,

    /// Amount charged, in cents. Equal to subtotal (no tax tracked).
    pub total_cents: i64,

    pub payment_kind: PaymentKind,
    pub status: SaleStatus,

    pub notes: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Sale {
    /// Returns the total as Money.
    #[inline]
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents)
    }

    /// Whether this sale generates a debt when created.
    #[inline]
    pub fn is_credit(&self) -> bool {
        self.payment_kind == PaymentKind::Credito
    }
}

// =============================================================================
// Sale Line
// =============================================================================

/// A line item in a sale.
/// Uses snapshot pattern to freeze the unit price at time of sale.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct SaleLine {
    pub id: String,
    pub sale_id: String,
    pub product_id: String,

    /// Quantity sold.
    pub quantity: i64,

    /// Unit price in cents at time of sale (frozen).
    pub unit_price_cents: i64,

    /// Line subtotal (unit_price × quantity).
    pub subtotal_cents: i64,
}

impl SaleLine {
    /// Returns the unit price as Money.
    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_cents(self.unit_price_cents)
    }

    /// Returns the line subtotal as Money.
    #[inline]
    pub fn subtotal(&self) -> Money {
        Money::from_cents(self.subtotal_cents)
    }
}

// =============================================================================
// Expense
// =============================================================================

/// A business expense (salaries, services, maintenance, ...).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Expense {
    pub id: String,
    pub tenant_id: String,
    pub user_id: String,

    pub description: String,
    pub category: Option<String>,

    /// Amount in cents. Always positive.
    pub amount_cents: i64,

    /// Invoice or receipt reference number.
    pub receipt_ref: Option<String>,

    /// When the expense was incurred (not when it was recorded).
    pub incurred_at: DateTime<Utc>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Expense {
    /// Returns the amount as Money.
    #[inline]
    pub fn amount(&self) -> Money {
        Money::from_cents(self.amount_cents)
    }
}

// =============================================================================
// Debt
// =============================================================================

/// A customer debt, either created manually or by a credit sale.
///
/// The three monetary fields move together: `pending = max(0, total -
/// paid)` and `status` is derived from (paid, total). The settlement
/// engine enforces this; nothing else writes these columns.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Debt {
    pub id: String,
    pub tenant_id: String,

    /// The credit sale this debt came from, if any.
    pub sale_id: Option<String>,

    pub customer_name: String,
    pub customer_email: Option<String>,

    /// Full amount owed, in cents.
    pub total_cents: i64,

    /// Amount received so far, in cents.
    pub paid_cents: i64,

    /// Amount outstanding, in cents. Clamped at zero.
    pub pending_cents: i64,

    pub status: DebtStatus,

    pub due_date: Option<DateTime<Utc>>,
    pub description: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Debt {
    /// Returns the total as Money.
    #[inline]
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents)
    }

    /// Returns the paid amount as Money.
    #[inline]
    pub fn paid(&self) -> Money {
        Money::from_cents(self.paid_cents)
    }

    /// Returns the pending amount as Money.
    #[inline]
    pub fn pending(&self) -> Money {
        Money::from_cents(self.pending_cents)
    }

    /// Days until the due date, negative when overdue. None without one.
    pub fn days_until_due(&self, now: DateTime<Utc>) -> Option<i64> {
        self.due_date.map(|due| (due - now).num_days())
    }
}

// =============================================================================
// Balance Report
// =============================================================================

/// The derived financial balance of a tenant.
///
/// Computed from a single consistent snapshot; see
/// `balanza_db::SettlementEngine::compute_balance` for the aggregation
/// queries and `crate::settlement::assemble_balance` for the arithmetic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceReport {
    /// Σ total over ALL sales, in cents (status unconstrained).
    pub total_income_cents: i64,

    /// Σ amount over all expenses, in cents.
    pub total_expense_cents: i64,

    /// Σ pending over debts in {pendiente, vencida}, in cents.
    pub pending_debt_cents: i64,

    /// income − expense, in cents.
    pub net_balance_cents: i64,

    /// net − pending debt, in cents.
    pub available_cash_flow_cents: i64,

    /// Counts, for display context.
    pub sale_count: i64,
    pub expense_count: i64,
    pub pending_debt_count: i64,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_enum_defaults() {
        assert_eq!(PaymentKind::default(), PaymentKind::Contado);
        assert_eq!(SaleStatus::default(), SaleStatus::Completada);
        assert_eq!(DebtStatus::default(), DebtStatus::Pendiente);
        assert_eq!(Role::default(), Role::Usuario);
    }

    #[test]
    fn test_enum_wire_values() {
        assert_eq!(
            serde_json::to_string(&PaymentKind::Credito).unwrap(),
            "\"credito\""
        );
        assert_eq!(
            serde_json::to_string(&DebtStatus::Eliminada).unwrap(),
            "\"eliminada\""
        );
        assert_eq!(
            serde_json::to_string(&SaleStatus::Cancelada).unwrap(),
            "\"cancelada\""
        );
    }

    #[test]
    fn test_debt_status_is_open() {
        assert!(DebtStatus::Pendiente.is_open());
        assert!(DebtStatus::Parcial.is_open());
        assert!(DebtStatus::Vencida.is_open());
        assert!(!DebtStatus::Pagada.is_open());
        assert!(!DebtStatus::Eliminada.is_open());
    }

    fn sample_product() -> Product {
        let now = Utc::now();
        Product {
            id: "p-1".to_string(),
            tenant_id: "t-1".to_string(),
            sku: "MOUSE-01".to_string(),
            name: "Mouse".to_string(),
            description: None,
            category: None,
            unit_cost_cents: 1500,
            sale_price_cents: 3000,
            quantity_on_hand: 50,
            min_quantity: 5,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_product_margin_and_low_stock() {
        let mut product = sample_product();
        assert_eq!(product.unit_margin().cents(), 1500);
        assert!(!product.is_low_stock());

        product.quantity_on_hand = 5;
        assert!(product.is_low_stock());
    }

    #[test]
    fn test_days_until_due() {
        let now = Utc::now();
        let debt = Debt {
            id: "d-1".to_string(),
            tenant_id: "t-1".to_string(),
            sale_id: None,
            customer_name: "Cliente A".to_string(),
            customer_email: None,
            total_cents: 10000,
            paid_cents: 0,
            pending_cents: 10000,
            status: DebtStatus::Pendiente,
            due_date: Some(now + Duration::days(10)),
            description: None,
            created_at: now,
            updated_at: now,
        };

        assert_eq!(debt.days_until_due(now), Some(10));
        let overdue = now + Duration::days(15);
        assert!(debt.days_until_due(overdue).unwrap() < 0);
    }
}
