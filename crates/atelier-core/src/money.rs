//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                         │
//! │                                                                     │
//! │  In JavaScript/floating point:                                      │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                       │
//! │                                                                     │
//! │  Summing dozens of order lines in floats drifts off by cents.       │
//! │                                                                     │
//! │  OUR SOLUTION: Integer Cents                                        │
//! │    ₹499.00 = 49900 cents. Every subtotal, tax, and discount is      │
//! │    an exact integer; rounding happens once, explicitly, per rate    │
//! │    application.                                                     │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use atelier_core::money::Money;
//!
//! // Create from cents (preferred)
//! let price = Money::from_cents(49900); // 499.00
//!
//! // Arithmetic operations
//! let line = price * 2;                        // 998.00
//! let total = line + Money::from_cents(17964); // 1177.64
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};
use ts_rs::TS;

use crate::types::TaxRate;

/// Basis points in one whole (100%): 10000 bps = 100.00%.
pub const BPS_SCALE: i128 = 10_000;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the smallest currency unit (cents/paise).
///
/// ## Design Decisions
/// - **i64 (signed)**: allows negative values for refunds and adjustments
/// - **Single field tuple struct**: zero-cost abstraction over i64
/// - **Derives**: full serde support for JSON serialization
///
/// Every monetary value in the system flows through this type: product
/// prices, line subtotals, order totals, invoice amounts, payments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents (the smallest currency unit).
    ///
    /// ## Example
    /// ```rust
    /// use atelier_core::money::Money;
    ///
    /// let price = Money::from_cents(49900); // 499.00
    /// assert_eq!(price.cents(), 49900);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Creates a Money value from major and minor units.
    ///
    /// For negative amounts, only the major unit should be negative:
    /// `from_major_minor(-5, 50)` = -5.50, not -4.50.
    #[inline]
    pub const fn from_major_minor(major: i64, minor: i64) -> Self {
        if major < 0 {
            Money(major * 100 - minor)
        } else {
            Money(major * 100 + minor)
        }
    }

    /// Returns the value in cents (smallest currency unit).
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the major unit portion.
    #[inline]
    pub const fn major(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor unit portion (always 0-99).
    #[inline]
    pub const fn minor(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is positive (greater than zero).
    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Returns the absolute value.
    #[inline]
    pub const fn abs(&self) -> Self {
        Money(self.0.abs())
    }

    /// Calculates tax on this amount, rounding half-up at the cent.
    ///
    /// Uses integer math: `(amount * bps + 5000) / 10000` with i128
    /// intermediates so large order totals cannot overflow.
    ///
    /// ## Example
    /// ```rust
    /// use atelier_core::money::Money;
    /// use atelier_core::types::TaxRate;
    ///
    /// let line = Money::from_cents(99800);  // 998.00
    /// let rate = TaxRate::from_bps(1800);   // 18.00%
    ///
    /// // 998.00 × 18% = 179.64
    /// assert_eq!(line.calculate_tax(rate).cents(), 17964);
    /// ```
    pub fn calculate_tax(&self, rate: TaxRate) -> Money {
        let tax_cents = (self.0 as i128 * rate.bps() as i128 + 5000) / BPS_SCALE;
        Money::from_cents(tax_cents as i64)
    }

    /// Calculates a percentage portion of this amount (e.g. a discount),
    /// given in basis points. Rounds half-up at the cent.
    ///
    /// ## Example
    /// ```rust
    /// use atelier_core::money::Money;
    ///
    /// let subtotal = Money::from_cents(99800); // 998.00
    /// // 15% of 998.00 = 149.70
    /// assert_eq!(subtotal.percentage(1500).cents(), 14970);
    /// ```
    pub fn percentage(&self, bps: u32) -> Money {
        let part = (self.0 as i128 * bps as i128 + 5000) / BPS_SCALE;
        Money::from_cents(part as i64)
    }

    /// Multiplies money by a quantity.
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display implementation shows money in a human-readable format.
///
/// This is for debugging and logs. UI formatting (currency symbol,
/// localization) belongs to the frontend.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}{}.{:02}", sign, self.major().abs(), self.minor())
    }
}

/// Default money is zero.
impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

impl Mul<i32> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i32) -> Self {
        Money(self.0 * qty as i64)
    }
}

/// Summing an iterator of Money values (line subtotals, taxes).
impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_cents() {
        let money = Money::from_cents(49900);
        assert_eq!(money.cents(), 49900);
        assert_eq!(money.major(), 499);
        assert_eq!(money.minor(), 0);
    }

    #[test]
    fn test_from_major_minor() {
        let money = Money::from_major_minor(10, 99);
        assert_eq!(money.cents(), 1099);

        let negative = Money::from_major_minor(-5, 50);
        assert_eq!(negative.cents(), -550);
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Money::from_cents(1099)), "10.99");
        assert_eq!(format!("{}", Money::from_cents(500)), "5.00");
        assert_eq!(format!("{}", Money::from_cents(-550)), "-5.50");
        assert_eq!(format!("{}", Money::from_cents(0)), "0.00");
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_cents(1000);
        let b = Money::from_cents(500);

        assert_eq!((a + b).cents(), 1500);
        assert_eq!((a - b).cents(), 500);
        let result: Money = a * 3;
        assert_eq!(result.cents(), 3000);
    }

    #[test]
    fn test_sum() {
        let lines = [Money::from_cents(100), Money::from_cents(250), Money::from_cents(49)];
        let total: Money = lines.into_iter().sum();
        assert_eq!(total.cents(), 399);
    }

    #[test]
    fn test_tax_calculation_exact() {
        // 998.00 at 18% = 179.64, no rounding needed
        let amount = Money::from_cents(99800);
        let rate = TaxRate::from_bps(1800);
        assert_eq!(amount.calculate_tax(rate).cents(), 17964);
    }

    #[test]
    fn test_tax_calculation_with_rounding() {
        // 10.00 at 8.25% = 0.825 → rounds half-up to 0.83
        let amount = Money::from_cents(1000);
        let rate = TaxRate::from_bps(825);
        assert_eq!(amount.calculate_tax(rate).cents(), 83);
    }

    #[test]
    fn test_percentage() {
        let subtotal = Money::from_cents(99800);
        assert_eq!(subtotal.percentage(1500).cents(), 14970); // 15%
        assert_eq!(subtotal.percentage(0).cents(), 0);
        assert_eq!(subtotal.percentage(10000).cents(), 99800); // 100%
    }

    #[test]
    fn test_zero_and_checks() {
        let zero = Money::zero();
        assert!(zero.is_zero());
        assert!(!zero.is_positive());
        assert!(!zero.is_negative());

        let positive = Money::from_cents(100);
        assert!(positive.is_positive());

        let negative = Money::from_cents(-100);
        assert!(negative.is_negative());
    }

    #[test]
    fn test_multiply_quantity() {
        let unit_price = Money::from_cents(49900);
        let line_total = unit_price.multiply_quantity(2);
        assert_eq!(line_total.cents(), 99800);
    }

    /// Large totals must not overflow the intermediate multiplication.
    #[test]
    fn test_tax_on_large_amount() {
        let amount = Money::from_cents(9_000_000_000_00); // 9 billion major units
        let rate = TaxRate::from_bps(1800);
        assert_eq!(amount.calculate_tax(rate).cents(), 1_620_000_000_00);
    }
}
