//! # Pricing Calculator
//!
//! Pure order-total computation from priced line items.
//!
//! ## Calculation
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │  For each line:                                                     │
//! │      line subtotal = quantity × unit price                          │
//! │      line tax      = line subtotal × tax rate      (rounded ½-up)   │
//! │                                                                     │
//! │  subtotal = Σ line subtotals                                        │
//! │  tax      = Σ line taxes                                            │
//! │  discount = subtotal × discount %                  (rounded ½-up)   │
//! │  total    = subtotal + tax − discount                               │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The discount applies to the subtotal only, never to the tax. That is the
//! established billing behavior and is load-bearing for reconciliation with
//! issued invoices; do not "fix" it.
//!
//! No side effects, no clock, no I/O: same input, same output.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::TaxRate;

/// Maximum discount: 100.00% in basis points.
pub const MAX_DISCOUNT_BPS: u32 = 10_000;

// =============================================================================
// Inputs & Outputs
// =============================================================================

/// One priced line entering the calculator.
///
/// Unit price and tax rate are whatever the caller snapshotted — the
/// calculator does not consult the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PricedLine {
    pub quantity: i64,
    pub unit_price: Money,
    pub tax_rate: TaxRate,
}

impl PricedLine {
    pub const fn new(quantity: i64, unit_price: Money, tax_rate: TaxRate) -> Self {
        PricedLine {
            quantity,
            unit_price,
            tax_rate,
        }
    }

    /// quantity × unit price.
    #[inline]
    pub fn subtotal(&self) -> Money {
        self.unit_price.multiply_quantity(self.quantity)
    }

    /// Tax owed on this line.
    #[inline]
    pub fn tax(&self) -> Money {
        self.subtotal().calculate_tax(self.tax_rate)
    }
}

/// Computed order totals. All four amounts are exact to the cent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct OrderTotals {
    pub subtotal: Money,
    pub tax: Money,
    pub discount: Money,
    pub total: Money,
}

impl OrderTotals {
    /// Totals of an empty order.
    pub const fn zero() -> Self {
        OrderTotals {
            subtotal: Money::zero(),
            tax: Money::zero(),
            discount: Money::zero(),
            total: Money::zero(),
        }
    }
}

// =============================================================================
// Calculator
// =============================================================================

/// Computes subtotal/tax/discount/total for a sequence of priced lines and
/// an optional discount percentage in basis points.
///
/// ## Errors
/// - `InvalidLineItem` on non-positive quantity or negative unit price
/// - `InvalidDiscount` when the discount exceeds 100%
///
/// ## Example
/// ```rust
/// use atelier_core::money::Money;
/// use atelier_core::pricing::{calculate_totals, PricedLine};
/// use atelier_core::types::TaxRate;
///
/// let lines = [PricedLine::new(2, Money::from_cents(49900), TaxRate::from_bps(1800))];
///
/// let totals = calculate_totals(&lines, Some(1500)).unwrap();
/// assert_eq!(totals.subtotal.cents(), 99800);  //  998.00
/// assert_eq!(totals.tax.cents(), 17964);       //  179.64
/// assert_eq!(totals.discount.cents(), 14970);  //  149.70
/// assert_eq!(totals.total.cents(), 102794);    // 1027.94
/// ```
pub fn calculate_totals(lines: &[PricedLine], discount_bps: Option<u32>) -> CoreResult<OrderTotals> {
    let mut subtotal = Money::zero();
    let mut tax = Money::zero();

    for line in lines {
        if line.quantity <= 0 {
            return Err(CoreError::InvalidLineItem {
                reason: format!("quantity must be positive, got {}", line.quantity),
            });
        }
        if line.unit_price.is_negative() {
            return Err(CoreError::InvalidLineItem {
                reason: format!("unit price must not be negative, got {}", line.unit_price),
            });
        }

        subtotal += line.subtotal();
        tax += line.tax();
    }

    let discount = match discount_bps {
        Some(bps) if bps > MAX_DISCOUNT_BPS => {
            return Err(CoreError::InvalidDiscount { bps });
        }
        // Discount on the subtotal only; tax is charged on the full amount.
        Some(bps) => subtotal.percentage(bps),
        None => Money::zero(),
    };

    let total = subtotal + tax - discount;

    Ok(OrderTotals {
        subtotal,
        tax,
        discount,
        total,
    })
}

// =============================================================================
// Unit Tests
// =============================================================================
