//! # Service Layer
//!
//! Transactional workflows composed from the repositories. Services own the
//! transaction boundaries: every multi-statement write either commits as a
//! whole or leaves no trace.
//!
//! ## Error Taxonomy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │  Every ServiceError maps onto one caller-facing kind:               │
//! │                                                                     │
//! │  NotFound      product / order / coupon / term / invoice / bill     │
//! │  Conflict      insufficient stock, coupon already used / expired /  │
//! │                not applicable / offer inactive, overpayment         │
//! │  Unauthorized  signature mismatch, channel mismatch                 │
//! │  Validation    malformed line item, bad discount, bad input         │
//! │  Internal      database failures                                    │
//! │                                                                     │
//! │  HTTP handlers (out of scope here) translate kinds to status codes. │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

use crate::error::DbError;
use atelier_core::{CoreError, CouponError, SignatureError, ValidationError};

pub mod coupons;
pub mod invoicing;
pub mod orders;
pub mod payments;
pub mod purchasing;

pub use coupons::{CouponQuote, CouponService, CreateOfferRequest};
pub use invoicing::InvoiceService;
pub use orders::{ComposedOrder, ComposedOrderItem, CreateOrderRequest, OrderItemRequest, OrderService};
pub use payments::PaymentService;
pub use purchasing::{CreatedPurchaseOrder, PurchaseItemRequest, PurchasingService};

// =============================================================================
// Error Types
// =============================================================================

/// Caller-facing category of a service failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    Conflict,
    Unauthorized,
    Validation,
    Internal,
}

/// What callers of the service layer see.
///
/// The first failure encountered wins; by the time one of these is returned,
/// the surrounding transaction has been rolled back and no writes survive.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Product not found: {id}")]
    ProductNotFound { id: String },

    #[error("Contact not found: {id}")]
    ContactNotFound { id: String },

    #[error("Sale order not found: {id}")]
    OrderNotFound { id: String },

    #[error("Invoice not found: {id}")]
    InvoiceNotFound { id: String },

    #[error("Vendor bill not found: {id}")]
    BillNotFound { id: String },

    #[error("Coupon code not found: {id}")]
    CouponNotFound { id: String },

    #[error("No payment term resolved: none given and no default configured")]
    PaymentTermNotFound,

    #[error("Insufficient stock for {product_id}: requested {requested}, available {available}")]
    InsufficientStock {
        product_id: String,
        requested: i64,
        available: i64,
    },

    /// A coupon redemption rule failed (already used, expired, ...).
    #[error(transparent)]
    Coupon(#[from] CouponError),

    /// The gateway signature did not verify.
    #[error("Payment confirmation signature is invalid")]
    InvalidSignature,

    #[error("Payment of {amount_cents} cents would overpay: {outstanding_cents} cents outstanding")]
    Overpayment {
        amount_cents: i64,
        outstanding_cents: i64,
    },

    /// A pure business rule failed (pricing, discount bounds).
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Caller input failed validation before any business logic ran.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The database failed underneath us.
    #[error(transparent)]
    Db(#[from] DbError),
}

impl ServiceError {
    /// The caller-facing category of this failure.
    pub fn kind(&self) -> ErrorKind {
        match self {
            ServiceError::ProductNotFound { .. }
            | ServiceError::ContactNotFound { .. }
            | ServiceError::OrderNotFound { .. }
            | ServiceError::InvoiceNotFound { .. }
            | ServiceError::BillNotFound { .. }
            | ServiceError::CouponNotFound { .. }
            | ServiceError::PaymentTermNotFound => ErrorKind::NotFound,

            ServiceError::InsufficientStock { .. } | ServiceError::Overpayment { .. } => {
                ErrorKind::Conflict
            }

            // Channel scoping is an authorization concern; the remaining
            // coupon rules are conflicts with the coupon's current state.
            ServiceError::Coupon(CouponError::ChannelMismatch { .. }) => ErrorKind::Unauthorized,
            ServiceError::Coupon(_) => ErrorKind::Conflict,

            ServiceError::InvalidSignature => ErrorKind::Unauthorized,

            ServiceError::Core(_) | ServiceError::Validation(_) => ErrorKind::Validation,

            ServiceError::Db(DbError::NotFound { .. }) => ErrorKind::NotFound,
            ServiceError::Db(_) => ErrorKind::Internal,
        }
    }
}

impl From<SignatureError> for ServiceError {
    fn from(_: SignatureError) -> Self {
        // Malformed hex and a wrong MAC are indistinguishable to the caller:
        // the confirmation did not verify.
        ServiceError::InvalidSignature
    }
}

/// Result type for service operations.
pub type ServiceResult<T> = Result<T, ServiceError>;

// =============================================================================
// Unit Tests
// =============================================================================
