//! # Document Numbering
//!
//! Business-number formats for the five document series.
//!
//! Numbers are `prefix + 6-digit zero-padded counter` and the stored format
//! is load-bearing: external systems key on strings like `SO-000042`, so
//! the format must never change shape. Counter allocation itself is the
//! storage layer's job (a per-series atomic counter); this module only
//! knows the series and how to print them.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Width of the zero-padded counter portion.
const COUNTER_WIDTH: usize = 6;

/// A named, monotonically increasing document number series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum NumberSeries {
    /// Sale orders: `SO-000001`
    SaleOrder,
    /// Customer invoices: `INV-000001`
    Invoice,
    /// Purchase orders: `PO-000001`
    PurchaseOrder,
    /// Vendor bills: `BILL-000001`
    Bill,
    /// Payments: `PAY-000001`
    Payment,
}

impl NumberSeries {
    /// The series prefix, including the trailing dash.
    pub const fn prefix(&self) -> &'static str {
        match self {
            NumberSeries::SaleOrder => "SO-",
            NumberSeries::Invoice => "INV-",
            NumberSeries::PurchaseOrder => "PO-",
            NumberSeries::Bill => "BILL-",
            NumberSeries::Payment => "PAY-",
        }
    }

    /// Stable key used for the counter row in storage.
    pub const fn key(&self) -> &'static str {
        match self {
            NumberSeries::SaleOrder => "sale_order",
            NumberSeries::Invoice => "invoice",
            NumberSeries::PurchaseOrder => "purchase_order",
            NumberSeries::Bill => "bill",
            NumberSeries::Payment => "payment",
        }
    }

    /// Formats the `n`-th number of this series.
    ///
    /// ## Example
    /// ```rust
    /// use atelier_core::numbering::NumberSeries;
    ///
    /// assert_eq!(NumberSeries::SaleOrder.format(1), "SO-000001");
    /// assert_eq!(NumberSeries::Invoice.format(42), "INV-000042");
    /// ```
    pub fn format(&self, n: i64) -> String {
        format!("{}{:0width$}", self.prefix(), n, width = COUNTER_WIDTH)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_formats_are_bit_exact() {
        assert_eq!(NumberSeries::SaleOrder.format(1), "SO-000001");
        assert_eq!(NumberSeries::Invoice.format(1), "INV-000001");
        assert_eq!(NumberSeries::PurchaseOrder.format(1), "PO-000001");
        assert_eq!(NumberSeries::Bill.format(1), "BILL-000001");
        assert_eq!(NumberSeries::Payment.format(1), "PAY-000001");
    }

    #[test]
    fn test_padding() {
        assert_eq!(NumberSeries::SaleOrder.format(42), "SO-000042");
        assert_eq!(NumberSeries::SaleOrder.format(999_999), "SO-999999");
        // Past the pad width the number keeps growing rather than wrapping
        assert_eq!(NumberSeries::SaleOrder.format(1_000_000), "SO-1000000");
    }

    #[test]
    fn test_series_keys_are_distinct() {
        let keys = [
            NumberSeries::SaleOrder.key(),
            NumberSeries::Invoice.key(),
            NumberSeries::PurchaseOrder.key(),
            NumberSeries::Bill.key(),
            NumberSeries::Payment.key(),
        ];
        let mut deduped = keys.to_vec();
        deduped.sort();
        deduped.dedup();
        assert_eq!(deduped.len(), keys.len());
    }
}
