//! # Validation Module
//!
//! Input validation utilities for Atelier Commerce.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                       Validation Layers                             │
//! │                                                                     │
//! │  Layer 1: Frontend (TypeScript)                                     │
//! │  ├── Basic format checks (empty, length)                            │
//! │  └── Immediate user feedback                                        │
//! │           │                                                         │
//! │           ▼                                                         │
//! │  Layer 2: THIS MODULE - business rule validation                    │
//! │           │                                                         │
//! │           ▼                                                         │
//! │  Layer 3: Database (SQLite)                                         │
//! │  ├── NOT NULL / UNIQUE / CHECK constraints                          │
//! │  └── Foreign key constraints                                        │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::ValidationError;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Maximum quantity of a single line item.
///
/// Prevents accidental over-ordering (e.g., typing 1000 instead of 10).
pub const MAX_ITEM_QUANTITY: i64 = 999;

/// Maximum number of line items on a single order.
pub const MAX_ORDER_LINES: usize = 100;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a coupon code string.
///
/// ## Rules
/// - Must not be empty
/// - At most 40 characters
/// - Alphanumeric, hyphens, and underscores only
///
/// ## Example
/// ```rust
/// use atelier_core::validation::validate_coupon_code;
///
/// assert!(validate_coupon_code("SUMMER15").is_ok());
/// assert!(validate_coupon_code("").is_err());
/// assert!(validate_coupon_code("BAD CODE!").is_err());
/// ```
pub fn validate_coupon_code(code: &str) -> ValidationResult<()> {
    let code = code.trim();

    if code.is_empty() {
        return Err(ValidationError::Required {
            field: "code".to_string(),
        });
    }

    if code.len() > 40 {
        return Err(ValidationError::TooLong {
            field: "code".to_string(),
            max: 40,
        });
    }

    if !code
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
    {
        return Err(ValidationError::InvalidFormat {
            field: "code".to_string(),
            reason: "must contain only letters, numbers, hyphens, and underscores".to_string(),
        });
    }

    Ok(())
}

/// Validates a product or offer display name.
pub fn validate_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        });
    }

    if name.len() > 200 {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: 200,
        });
    }

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a line item quantity.
pub fn validate_quantity(quantity: i64) -> ValidationResult<()> {
    if quantity <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if quantity > MAX_ITEM_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_ITEM_QUANTITY,
        });
    }

    Ok(())
}

/// Validates a payment amount in cents.
pub fn validate_payment_amount(amount_cents: i64) -> ValidationResult<()> {
    if amount_cents <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "amount".to_string(),
        });
    }

    Ok(())
}

/// Validates a discount percentage given in basis points.
pub fn validate_discount_bps(bps: u32) -> ValidationResult<()> {
    if bps > 10_000 {
        return Err(ValidationError::OutOfRange {
            field: "discount_percentage".to_string(),
            min: 0,
            max: 10_000,
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coupon_code() {
        assert!(validate_coupon_code("SUMMER15").is_ok());
        assert!(validate_coupon_code("EARLY-BIRD_2").is_ok());
        assert!(validate_coupon_code("").is_err());
        assert!(validate_coupon_code("   ").is_err());
        assert!(validate_coupon_code("HAS SPACE").is_err());
        assert!(validate_coupon_code(&"X".repeat(41)).is_err());
    }

    #[test]
    fn test_name() {
        assert!(validate_name("Classic Tee").is_ok());
        assert!(validate_name("").is_err());
        assert!(validate_name(&"n".repeat(201)).is_err());
    }

    #[test]
    fn test_quantity() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(999).is_ok());
        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(-3).is_err());
        assert!(validate_quantity(1000).is_err());
    }

    #[test]
    fn test_payment_amount() {
        assert!(validate_payment_amount(1).is_ok());
        assert!(validate_payment_amount(0).is_err());
        assert!(validate_payment_amount(-50).is_err());
    }

    #[test]
    fn test_discount_bps() {
        assert!(validate_discount_bps(0).is_ok());
        assert!(validate_discount_bps(10_000).is_ok());
        assert!(validate_discount_bps(10_001).is_err());
    }
}
