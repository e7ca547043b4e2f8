//! # Error Types
//!
//! Domain-specific error types for atelier-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                          Error Types                                │
//! │                                                                     │
//! │  atelier-core errors (this file + coupon.rs)                        │
//! │  ├── CoreError        - Pricing / domain rule failures              │
//! │  ├── ValidationError  - Input validation failures                   │
//! │  └── CouponError      - Coupon redemption rule failures             │
//! │                                                                     │
//! │  atelier-db errors (separate crate)                                 │
//! │  ├── DbError          - Database operation failures                 │
//! │  └── ServiceError     - What callers of the services see            │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (product name, code, amounts)
//! 3. Errors are enum variants, never String
//! 4. Each error variant maps to a user-facing message

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
///
/// These represent business rule violations in pure calculations. They are
/// caught by the service layer and translated into caller-facing errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    /// A priced line is malformed: non-positive quantity or negative price.
    #[error("Invalid line item: {reason}")]
    InvalidLineItem { reason: String },

    /// A discount percentage outside 0..=100%.
    #[error("Invalid discount: {bps} bps is not within 0..=10000")]
    InvalidDiscount { bps: u32 },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These occur when caller input doesn't meet requirements, before any
/// business logic runs.
#[derive(Debug, Error, PartialEq, Eq)]
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

    /// Invalid format (e.g., invalid code characters).
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::InvalidLineItem {
            reason: "quantity must be positive".to_string(),
        };
        assert_eq!(err.to_string(), "Invalid line item: quantity must be positive");

        let err = CoreError::InvalidDiscount { bps: 12000 };
        assert_eq!(
            err.to_string(),
            "Invalid discount: 12000 bps is not within 0..=10000"
        );
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "code".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
