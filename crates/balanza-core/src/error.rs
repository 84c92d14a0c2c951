//! # Error Types
//!
//! Domain-specific error types for balanza-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  balanza-core errors (this file)                                       │
//! │  ├── CoreError        - Settlement rule violations                     │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  balanza-db errors (separate crate)                                    │
//! │  └── DbError          - Database operation failures                    │
//! │                                                                         │
//! │  balanza-auth errors (separate crate)                                  │
//! │  └── AuthError        - Credential and token failures                  │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → DbError → caller                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (SKU, amounts, etc.)
//! 3. Errors are enum variants, never String
//! 4. Each error variant maps to a user-facing message

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Settlement rule violations.
///
/// These errors represent business rule failures. They should be caught
/// and translated to user-friendly messages by the presentation layer.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Insufficient stock to complete a sale.
    ///
    /// ## When This Occurs
    /// - Requested quantity exceeds the product's quantity on hand
    /// - A concurrent sale consumed the stock between listing and checkout
    ///
    /// The message reports the available quantity so the caller can show
    /// the customer what is still sellable.
    #[error("Stock insuficiente para {sku}: disponible {available}, solicitado {requested}")]
    InsufficientStock {
        sku: String,
        available: i64,
        requested: i64,
    },

    /// Payment recorded against a debt exceeds the debt's total.
    ///
    /// The message reports the largest additional payment that would
    /// still be accepted.
    #[error(
        "El abono no puede ser mayor a {total_cents} centavos. Máximo adicional permitido: {max_additional_cents}"
    )]
    OverPayment {
        total_cents: i64,
        max_additional_cents: i64,
    },

    /// Payment amounts can never be negative.
    #[error("El monto pagado no puede ser negativo")]
    NegativePayment,

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when input doesn't meet requirements.
/// Used for early validation before settlement logic runs.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g., invalid UUID, malformed email).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
