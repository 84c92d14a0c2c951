//! # Settlement Rules
//!
//! The pure half of the settlement engine: every rule governing how a
//! sale affects money, how a debt's paid/pending amounts and status move
//! together, and how the balance is derived. The I/O half (transactions,
//! stock updates) lives in `balanza-db`.
//!
//! ## Debt State Machine
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Debt Status Derivation                               │
//! │                                                                         │
//! │   paid == 0                 ──►  pendiente                              │
//! │   0 < paid < total          ──►  parcial                                │
//! │   paid >= total             ──►  pagada                                 │
//! │                                                                         │
//! │   vencida / eliminada are never derived from amounts:                   │
//! │   vencida is a reporting state, eliminada is the soft-delete marker.   │
//! │                                                                         │
//! │   When a payment and a manual status arrive in the SAME update,        │
//! │   the payment-derived status wins. A manual status only sticks when    │
//! │   no payment accompanies it.                                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::{BalanceReport, DebtStatus};

// =============================================================================
// Sale Math
// =============================================================================

/// Line subtotal: frozen unit price × quantity.
#[inline]
pub fn line_subtotal(unit_price: Money, quantity: i64) -> Money {
    unit_price.multiply_quantity(quantity)
}

/// Realized margin of a sale line: (sale price − unit cost) × quantity.
///
/// Informational only; returned to the caller for display and never
/// persisted.
#[inline]
pub fn realized_margin(sale_price: Money, unit_cost: Money, quantity: i64) -> Money {
    (sale_price - unit_cost).multiply_quantity(quantity)
}

/// Auto-generated description for a debt created by a credit sale.
pub fn credit_debt_description(quantity: i64, product_name: &str) -> String {
    format!("Venta de {} x {}", quantity, product_name)
}

// =============================================================================
// Debt Rules
// =============================================================================

/// The three debt columns that must always move together.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DebtTerms {
    pub paid: Money,
    pub pending: Money,
    pub status: DebtStatus,
}

/// Derives a debt's status from its paid and total amounts.
///
/// Deterministic; applied after every change to the paid amount.
pub fn derive_debt_status(paid: Money, total: Money) -> DebtStatus {
    if paid >= total {
        DebtStatus::Pagada
    } else if paid.is_positive() {
        DebtStatus::Parcial
    } else {
        DebtStatus::Pendiente
    }
}

/// Pending amount: total − paid, clamped at zero.
#[inline]
pub fn pending_amount(total: Money, paid: Money) -> Money {
    total.saturating_sub(paid)
}

/// Applies a payment to a debt, producing the new consistent terms.
///
/// ## Validation
/// - `new_paid < 0` → [`CoreError::NegativePayment`]
/// - `new_paid > total` → [`CoreError::OverPayment`], reporting the
///   largest additional payment still accepted
///
/// Note `new_paid` is the new cumulative paid amount, not an increment.
///
/// ## Example
/// ```rust
/// use balanza_core::money::Money;
/// use balanza_core::settlement::apply_payment;
/// use balanza_core::types::DebtStatus;
///
/// let terms = apply_payment(Money::from_cents(30000), Money::from_cents(0), Money::from_cents(10000)).unwrap();
/// assert_eq!(terms.pending.cents(), 20000);
/// assert_eq!(terms.status, DebtStatus::Parcial);
/// ```
pub fn apply_payment(total: Money, current_paid: Money, new_paid: Money) -> CoreResult<DebtTerms> {
    if new_paid.is_negative() {
        return Err(CoreError::NegativePayment);
    }
    if new_paid > total {
        return Err(CoreError::OverPayment {
            total_cents: total.cents(),
            max_additional_cents: (total - current_paid).cents(),
        });
    }

    Ok(DebtTerms {
        paid: new_paid,
        pending: pending_amount(total, new_paid),
        status: derive_debt_status(new_paid, total),
    })
}

/// Resolves one debt update that may carry a payment, a manual status,
/// both, or neither.
///
/// The ordering rule: a payment-derived status always beats a manual
/// one supplied in the same update. A stale manual status must never
/// override a fresh payment-derived one.
pub fn settle_debt_update(
    total: Money,
    current_paid: Money,
    current_status: DebtStatus,
    new_paid: Option<Money>,
    requested_status: Option<DebtStatus>,
) -> CoreResult<DebtTerms> {
    match new_paid {
        // Payment present: derive everything, ignore the manual status.
        Some(paid) => apply_payment(total, current_paid, paid),

        // No payment: the manual status is honored verbatim.
        None => Ok(DebtTerms {
            paid: current_paid,
            pending: pending_amount(total, current_paid),
            status: requested_status.unwrap_or(current_status),
        }),
    }
}

// =============================================================================
// Balance Aggregation
// =============================================================================

/// Assembles a balance report from pre-aggregated sums.
///
/// ```text
/// net_balance         = total_income − total_expense
/// available_cash_flow = net_balance − pending_debt
/// ```
///
/// Income sums ALL sales regardless of status (cancelled included);
/// kept as observed and pinned by tests.
pub fn assemble_balance(
    total_income: Money,
    total_expense: Money,
    pending_debt: Money,
    sale_count: i64,
    expense_count: i64,
    pending_debt_count: i64,
) -> BalanceReport {
    let net_balance = total_income - total_expense;
    let available_cash_flow = net_balance - pending_debt;

    BalanceReport {
        total_income_cents: total_income.cents(),
        total_expense_cents: total_expense.cents(),
        pending_debt_cents: pending_debt.cents(),
        net_balance_cents: net_balance.cents(),
        available_cash_flow_cents: available_cash_flow.cents(),
        sale_count,
        expense_count,
        pending_debt_count,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn m(cents: i64) -> Money {
        Money::from_cents(cents)
    }

    #[test]
    fn test_line_subtotal_and_margin() {
        // Mouse: cost $15.00, price $30.00, quantity 10
        assert_eq!(line_subtotal(m(3000), 10).cents(), 30000);
        assert_eq!(realized_margin(m(3000), m(1500), 10).cents(), 15000);
    }

    #[test]
    fn test_credit_debt_description() {
        assert_eq!(credit_debt_description(10, "Mouse"), "Venta de 10 x Mouse");
    }

    #[test]
    fn test_derive_debt_status_mapping() {
        let total = m(30000);

        assert_eq!(derive_debt_status(m(0), total), DebtStatus::Pendiente);
        assert_eq!(derive_debt_status(m(1), total), DebtStatus::Parcial);
        assert_eq!(derive_debt_status(m(29999), total), DebtStatus::Parcial);
        assert_eq!(derive_debt_status(m(30000), total), DebtStatus::Pagada);
    }

    #[test]
    fn test_apply_payment_recomputes_terms() {
        let total = m(30000);

        let terms = apply_payment(total, m(0), m(12000)).unwrap();
        assert_eq!(terms.paid, m(12000));
        assert_eq!(terms.pending, m(18000));
        assert_eq!(terms.status, DebtStatus::Parcial);
    }

    #[test]
    fn test_apply_payment_boundaries() {
        let total = m(30000);

        // Full payment
        let full = apply_payment(total, m(10000), total).unwrap();
        assert_eq!(full.pending, Money::zero());
        assert_eq!(full.status, DebtStatus::Pagada);

        // Back to zero
        let none = apply_payment(total, m(10000), Money::zero()).unwrap();
        assert_eq!(none.pending, total);
        assert_eq!(none.status, DebtStatus::Pendiente);
    }

    #[test]
    fn test_apply_payment_idempotent() {
        let total = m(30000);

        let first = apply_payment(total, m(0), m(5000)).unwrap();
        let second = apply_payment(total, first.paid, m(5000)).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_apply_payment_rejects_invalid_amounts() {
        let total = m(30000);

        assert!(matches!(
            apply_payment(total, m(0), m(-1)),
            Err(CoreError::NegativePayment)
        ));

        match apply_payment(total, m(20000), m(30001)) {
            Err(CoreError::OverPayment {
                total_cents,
                max_additional_cents,
            }) => {
                assert_eq!(total_cents, 30000);
                assert_eq!(max_additional_cents, 10000);
            }
            other => panic!("expected OverPayment, got {:?}", other.map(|t| t.status)),
        }
    }

    #[test]
    fn test_payment_derived_status_beats_manual() {
        let total = m(30000);

        // Payment and manual status in the same update: derived wins.
        let terms = settle_debt_update(
            total,
            m(0),
            DebtStatus::Pendiente,
            Some(m(30000)),
            Some(DebtStatus::Vencida),
        )
        .unwrap();
        assert_eq!(terms.status, DebtStatus::Pagada);
    }

    #[test]
    fn test_manual_status_honored_without_payment() {
        let total = m(30000);

        let terms = settle_debt_update(
            total,
            m(0),
            DebtStatus::Pendiente,
            None,
            Some(DebtStatus::Vencida),
        )
        .unwrap();
        assert_eq!(terms.status, DebtStatus::Vencida);
        assert_eq!(terms.paid, Money::zero());
        assert_eq!(terms.pending, total);
    }

    #[test]
    fn test_no_op_update_keeps_current_state() {
        let total = m(30000);

        let terms =
            settle_debt_update(total, m(5000), DebtStatus::Parcial, None, None).unwrap();
        assert_eq!(terms.paid, m(5000));
        assert_eq!(terms.pending, m(25000));
        assert_eq!(terms.status, DebtStatus::Parcial);
    }

    #[test]
    fn test_assemble_balance() {
        // Income 300.00, expenses 0, pending debt 300.00
        let report = assemble_balance(m(30000), m(0), m(30000), 1, 0, 1);

        assert_eq!(report.net_balance_cents, 30000);
        assert_eq!(report.available_cash_flow_cents, 0);
        assert_eq!(report.sale_count, 1);
        assert_eq!(report.pending_debt_count, 1);
    }

    #[test]
    fn test_assemble_balance_can_go_negative() {
        let report = assemble_balance(m(10000), m(15000), m(2000), 2, 3, 1);

        assert_eq!(report.net_balance_cents, -5000);
        assert_eq!(report.available_cash_flow_cents, -7000);
    }
}
