//! # Domain Types
//!
//! Core domain types used throughout Atelier Commerce.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                          Domain Types                               │
//! │                                                                     │
//! │  Catalog side            Sale side              Billing side        │
//! │  ┌──────────────┐        ┌──────────────┐       ┌────────────────┐  │
//! │  │   Product    │        │  SaleOrder   │       │ CustomerInvoice│  │
//! │  │   Contact    │  ───►  │ SaleOrderItem│  ───► │  InvoiceItem   │  │
//! │  └──────────────┘        └──────────────┘       │    Payment     │  │
//! │                                                 └────────────────┘  │
//! │  ┌──────────────┐        ┌──────────────┐       ┌────────────────┐  │
//! │  │DiscountOffer │        │PurchaseOrder │       │   VendorBill   │  │
//! │  │  CouponCode  │        │ PurchaseItem │  ───► │    BillItem    │  │
//! │  └──────────────┘        └──────────────┘       └────────────────┘  │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Dual-Key Identity Pattern
//! Every document has:
//! - `id`: UUID v4 - immutable, used for database relations
//! - Business number: (`SO-000001`, `INV-000001`, ...) - human-readable,
//!   monotonically increasing within its series

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;

// =============================================================================
// Tax Rate
// =============================================================================

/// Tax rate represented in basis points (bps).
///
/// ## Why Basis Points?
/// 1 basis point = 0.01% = 1/10000.
/// 1800 bps = 18.00% — percentage fields with two fraction digits are
/// represented exactly, with no floating point involved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TaxRate(u32);

impl TaxRate {
    /// Creates a tax rate from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        TaxRate(bps)
    }

    /// Creates a tax rate from a percentage (for convenience).
    pub fn from_percentage(pct: f64) -> Self {
        TaxRate((pct * 100.0).round() as u32)
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a percentage (for display only).
    #[inline]
    pub fn percentage(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Zero tax rate.
    #[inline]
    pub const fn zero() -> Self {
        TaxRate(0)
    }

    /// Checks if tax rate is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl Default for TaxRate {
    fn default() -> Self {
        TaxRate::zero()
    }
}

// =============================================================================
// Product
// =============================================================================

/// Audience category for a catalog product.
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum ProductCategory {
    Men,
    Women,
    Children,
    Unisex,
}

/// A product available for sale.
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Product {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Display name shown in the storefront and on documents.
    pub name: String,

    /// Audience category.
    pub category: ProductCategory,

    /// Free-form product type (e.g. "t-shirt", "dress").
    pub product_type: String,

    /// Units currently on hand. Never negative.
    pub current_stock: i64,

    /// Sales unit price in cents.
    pub sales_price_cents: i64,

    /// Sales tax rate in basis points (1800 = 18.00%).
    pub sales_tax_bps: u32,

    /// Purchase unit price in cents (vendor side).
    pub purchase_price_cents: i64,

    /// Purchase tax rate in basis points.
    pub purchase_tax_bps: u32,

    /// Whether the product is visible on the storefront.
    pub is_published: bool,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Returns the sales price as a Money type.
    #[inline]
    pub fn sales_price(&self) -> Money {
        Money::from_cents(self.sales_price_cents)
    }

    /// Returns the sales tax rate.
    #[inline]
    pub fn sales_tax_rate(&self) -> TaxRate {
        TaxRate::from_bps(self.sales_tax_bps)
    }

    /// Returns the purchase price as a Money type.
    #[inline]
    pub fn purchase_price(&self) -> Money {
        Money::from_cents(self.purchase_price_cents)
    }

    /// Returns the purchase tax rate.
    #[inline]
    pub fn purchase_tax_rate(&self) -> TaxRate {
        TaxRate::from_bps(self.purchase_tax_bps)
    }

    /// Checks whether the requested quantity can be fulfilled from stock.
    #[inline]
    pub fn can_fulfill(&self, quantity: i64) -> bool {
        self.current_stock >= quantity
    }
}

// =============================================================================
// Contact
// =============================================================================

/// Which side of the ledger a contact can appear on.
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum ContactType {
    Customer,
    Vendor,
    Both,
}

/// A party that may act as customer and/or vendor.
/// Referenced by orders, invoices, bills, and payments.
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Contact {
    pub id: String,
    pub name: String,
    pub contact_type: ContactType,
    pub email: Option<String>,
    pub mobile: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub pincode: Option<String>,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl Contact {
    /// Whether this contact may be billed as a customer.
    #[inline]
    pub fn is_customer(&self) -> bool {
        matches!(self.contact_type, ContactType::Customer | ContactType::Both)
    }

    /// Whether this contact may be paid as a vendor.
    #[inline]
    pub fn is_vendor(&self) -> bool {
        matches!(self.contact_type, ContactType::Vendor | ContactType::Both)
    }
}

// =============================================================================
// Discounts & Coupons
// =============================================================================

/// The context in which a discount offer may be redeemed.
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum SalesChannel {
    /// Self-service storefront checkout.
    Website,
    /// Direct sales by internal staff.
    Sales,
}

/// A percentage-off promotion with a validity window and channel scope.
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DiscountOffer {
    pub id: String,
    pub name: String,
    /// Discount in basis points (1500 = 15.00%).
    pub discount_bps: u32,
    /// Start of the validity window (inclusive).
    #[ts(as = "String")]
    pub start_date: DateTime<Utc>,
    /// End of the validity window (inclusive).
    #[ts(as = "String")]
    pub end_date: DateTime<Utc>,
    /// Channel the offer is valid on.
    pub channel: SalesChannel,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

/// Lifecycle status of a coupon code.
///
/// `Unused → Used` is the only transition, and it happens exactly once,
/// atomically with the order that consumes the coupon.
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum CouponStatus {
    Unused,
    Used,
}

/// A single-use redemption token bound to one discount offer.
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CouponCode {
    pub id: String,
    /// The discount offer this code redeems.
    pub discount_offer_id: String,
    /// Unique, upper-cased code string.
    pub code: String,
    /// Optional expiry independent of the offer window.
    #[ts(as = "Option<String>")]
    pub expiration_date: Option<DateTime<Utc>>,
    pub status: CouponStatus,
    /// When set, only this contact may redeem the code.
    pub contact_id: Option<String>,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

// =============================================================================
// Payment Term
// =============================================================================

/// Policy governing invoice due-date computation.
///
/// Exactly one term carries `is_default = true` at all times; the default
/// is resolved by flag, never by matching on the name string.
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PaymentTerm {
    pub id: String,
    pub name: String,
    pub is_default: bool,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Sale Order
// =============================================================================

/// The status of a sale order.
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Pending,
    Confirmed,
    Cancelled,
    Shipped,
    Delivered,
}

impl Default for OrderStatus {
    fn default() -> Self {
        OrderStatus::Pending
    }
}

/// A confirmed customer purchase request with priced line items.
///
/// Invariant: `total_cents == subtotal_cents + tax_cents - discount_cents`.
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SaleOrder {
    pub id: String,
    /// Business number, `SO-` series.
    pub order_number: String,
    pub customer_id: String,
    pub payment_term_id: String,
    pub coupon_code_id: Option<String>,
    pub subtotal_cents: i64,
    pub tax_cents: i64,
    pub discount_cents: i64,
    pub total_cents: i64,
    pub status: OrderStatus,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl SaleOrder {
    #[inline]
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents)
    }
}

/// A line item in a sale order.
///
/// Unit price and tax rate are captured from the product **at order time**
/// and never change afterwards, regardless of later catalog edits. This is
/// a deliberate invariant: historical orders reproduce exactly.
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SaleOrderItem {
    pub id: String,
    pub sale_order_id: String,
    pub product_id: String,
    /// Quantity ordered. Always positive.
    pub quantity: i64,
    /// Unit price in cents at order time (frozen).
    pub unit_price_cents: i64,
    /// Tax rate in bps at order time (frozen).
    pub tax_rate_bps: u32,
    /// quantity × unit price, in cents.
    pub subtotal_cents: i64,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl SaleOrderItem {
    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_cents(self.unit_price_cents)
    }

    #[inline]
    pub fn subtotal(&self) -> Money {
        Money::from_cents(self.subtotal_cents)
    }
}

// =============================================================================
// Customer Invoice
// =============================================================================

/// The status of an invoice or vendor bill.
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum InvoiceStatus {
    Draft,
    Sent,
    Paid,
    Overdue,
}

/// A billing document derived from a sale order, tracked to payment.
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CustomerInvoice {
    pub id: String,
    /// Business number, `INV-` series.
    pub invoice_number: String,
    pub sale_order_id: Option<String>,
    pub customer_id: String,
    pub payment_term_id: String,
    #[ts(as = "String")]
    pub invoice_date: DateTime<Utc>,
    #[ts(as = "String")]
    pub due_date: DateTime<Utc>,
    pub subtotal_cents: i64,
    pub tax_cents: i64,
    pub discount_cents: i64,
    pub total_cents: i64,
    /// Accumulates as payments are registered against the invoice.
    pub paid_cents: i64,
    pub status: InvoiceStatus,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl CustomerInvoice {
    /// Amount still owed on this invoice.
    #[inline]
    pub fn outstanding(&self) -> Money {
        Money::from_cents(self.total_cents - self.paid_cents)
    }
}

/// A line item on a customer invoice, copied from the sale order item.
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CustomerInvoiceItem {
    pub id: String,
    pub invoice_id: String,
    pub product_id: String,
    pub quantity: i64,
    pub unit_price_cents: i64,
    pub tax_rate_bps: u32,
    pub subtotal_cents: i64,
}

// =============================================================================
// Payment
// =============================================================================

/// How a payment was made.
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Cash,
    Card,
    BankTransfer,
    Online,
}

/// A payment registered against a customer invoice or a vendor bill.
///
/// Exactly one of `invoice_id` / `bill_id` is set (enforced by the schema
/// and by the registration API).
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Payment {
    pub id: String,
    /// Business number, `PAY-` series.
    pub payment_number: String,
    pub contact_id: String,
    pub invoice_id: Option<String>,
    pub bill_id: Option<String>,
    pub amount_cents: i64,
    #[ts(as = "String")]
    pub payment_date: DateTime<Utc>,
    pub method: PaymentMethod,
    /// External reference (gateway payment id, cheque number, ...).
    pub reference: Option<String>,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl Payment {
    #[inline]
    pub fn amount(&self) -> Money {
        Money::from_cents(self.amount_cents)
    }
}

// =============================================================================
// Purchase Order & Vendor Bill
// =============================================================================

/// The status of a purchase order.
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum PurchaseOrderStatus {
    Pending,
    Confirmed,
    Cancelled,
}

/// A purchase from a vendor. Mirrors the sale side without coupons.
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PurchaseOrder {
    pub id: String,
    /// Business number, `PO-` series.
    pub order_number: String,
    pub vendor_id: String,
    pub subtotal_cents: i64,
    pub tax_cents: i64,
    pub total_cents: i64,
    pub status: PurchaseOrderStatus,
    #[ts(as = "String")]
    pub order_date: DateTime<Utc>,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

/// A line item in a purchase order (purchase price/tax snapshots).
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PurchaseOrderItem {
    pub id: String,
    pub purchase_order_id: String,
    pub product_id: String,
    pub quantity: i64,
    pub unit_price_cents: i64,
    pub tax_rate_bps: u32,
    pub subtotal_cents: i64,
}

/// A bill received from a vendor, derived from a purchase order.
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct VendorBill {
    pub id: String,
    /// Business number, `BILL-` series.
    pub bill_number: String,
    pub purchase_order_id: Option<String>,
    pub vendor_id: String,
    #[ts(as = "String")]
    pub bill_date: DateTime<Utc>,
    #[ts(as = "String")]
    pub due_date: DateTime<Utc>,
    pub subtotal_cents: i64,
    pub tax_cents: i64,
    pub total_cents: i64,
    pub paid_cents: i64,
    pub status: InvoiceStatus,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

/// A line item on a vendor bill, copied from the purchase order item.
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct VendorBillItem {
    pub id: String,
    pub bill_id: String,
    pub product_id: String,
    pub quantity: i64,
    pub unit_price_cents: i64,
    pub tax_rate_bps: u32,
    pub subtotal_cents: i64,
}

// =============================================================================
// System Settings
// =============================================================================

/// A key/value system flag.
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SystemSetting {
    pub key: String,
    pub value: Option<String>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

/// Setting key controlling whether a confirmed order generates its invoice
/// immediately, inside the order transaction.
pub const SETTING_AUTOMATIC_INVOICING: &str = "automatic_invoicing";

/// Whether invoices are generated automatically when an order is confirmed.
///
/// Resolved once from [`SETTING_AUTOMATIC_INVOICING`] before the order
/// transaction begins, so the transaction itself stays free of
/// cross-cutting policy reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum InvoicingPolicy {
    Automatic,
    Manual,
}

impl InvoicingPolicy {
    /// Parses the stored setting value; anything other than `"true"` means
    /// manual invoicing.
    pub fn from_setting(value: Option<&str>) -> Self {
        match value {
            Some("true") => InvoicingPolicy::Automatic,
            _ => InvoicingPolicy::Manual,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tax_rate_from_bps() {
        let rate = TaxRate::from_bps(1800);
        assert_eq!(rate.bps(), 1800);
        assert!((rate.percentage() - 18.0).abs() < 0.001);
    }

    #[test]
    fn test_tax_rate_from_percentage() {
        let rate = TaxRate::from_percentage(8.25);
        assert_eq!(rate.bps(), 825);
    }

    #[test]
    fn test_order_status_default() {
        assert_eq!(OrderStatus::default(), OrderStatus::Pending);
    }

    #[test]
    fn test_contact_roles() {
        let contact = Contact {
            id: "c1".into(),
            name: "Jane".into(),
            contact_type: ContactType::Both,
            email: None,
            mobile: None,
            city: None,
            state: None,
            pincode: None,
            created_at: Utc::now(),
        };
        assert!(contact.is_customer());
        assert!(contact.is_vendor());
    }

    #[test]
    fn test_invoicing_policy_from_setting() {
        assert_eq!(
            InvoicingPolicy::from_setting(Some("true")),
            InvoicingPolicy::Automatic
        );
        assert_eq!(
            InvoicingPolicy::from_setting(Some("false")),
            InvoicingPolicy::Manual
        );
        assert_eq!(InvoicingPolicy::from_setting(None), InvoicingPolicy::Manual);
    }

    #[test]
    fn test_invoice_outstanding() {
        let invoice = CustomerInvoice {
            id: "i1".into(),
            invoice_number: "INV-000001".into(),
            sale_order_id: None,
            customer_id: "c1".into(),
            payment_term_id: "t1".into(),
            invoice_date: Utc::now(),
            due_date: Utc::now(),
            subtotal_cents: 99800,
            tax_cents: 17964,
            discount_cents: 0,
            total_cents: 117764,
            paid_cents: 100000,
            status: InvoiceStatus::Sent,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        assert_eq!(invoice.outstanding().cents(), 17764);
    }
}
