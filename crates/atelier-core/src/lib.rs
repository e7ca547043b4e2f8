//! # atelier-core: Pure Business Logic for Atelier Commerce
//!
//! This crate is the **heart** of the storefront: all pricing, coupon, and
//! verification rules as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                    Atelier Commerce Architecture                    │
//! │                                                                     │
//! │  ┌───────────────────────────────────────────────────────────────┐  │
//! │  │              Storefront / Back-office (HTTP layer)            │  │
//! │  └──────────────────────────────┬────────────────────────────────┘  │
//! │                                 │                                   │
//! │  ┌──────────────────────────────▼────────────────────────────────┐  │
//! │  │              ★ atelier-core (THIS CRATE) ★                    │  │
//! │  │                                                               │  │
//! │  │  ┌─────────┐ ┌─────────┐ ┌─────────┐ ┌──────────┐ ┌────────┐ │  │
//! │  │  │  types  │ │  money  │ │ pricing │ │  coupon  │ │signature│ │  │
//! │  │  │ Product │ │  Money  │ │ totals  │ │  rules   │ │  HMAC  │ │  │
//! │  │  │  Order  │ │ TaxCalc │ │         │ │          │ │        │ │  │
//! │  │  └─────────┘ └─────────┘ └─────────┘ └──────────┘ └────────┘ │  │
//! │  │                                                               │  │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • NO CLOCK READS          │  │
//! │  └──────────────────────────────┬────────────────────────────────┘  │
//! │                                 │                                   │
//! │  ┌──────────────────────────────▼────────────────────────────────┐  │
//! │  │                  atelier-db (Database Layer)                  │  │
//! │  │       SQLite repositories, transactions, order services       │  │
//! │  └───────────────────────────────────────────────────────────────┘  │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, SaleOrder, CouponCode, ...)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`pricing`] - Order total calculation
//! - [`coupon`] - Coupon redemption rules
//! - [`numbering`] - Document number series and formats
//! - [`signature`] - Gateway payment signature verification
//! - [`error`] - Domain error types
//! - [`validation`] - Input validation
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: deterministic - same input, same output; even
//!    "now" is a parameter, never a clock read
//! 2. **No I/O**: database, network, file system access is FORBIDDEN here
//! 3. **Integer Money**: all monetary values are cents (i64), percentages
//!    are basis points (u32)
//! 4. **Explicit Errors**: all errors are typed, never strings or panics

// =============================================================================
// Module Declarations
// =============================================================================

pub mod coupon;
pub mod error;
pub mod money;
pub mod numbering;
pub mod pricing;
pub mod signature;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use atelier_core::Money` instead of
// `use atelier_core::money::Money`.

pub use coupon::CouponError;
pub use error::{CoreError, ValidationError};
pub use money::Money;
pub use numbering::NumberSeries;
pub use pricing::{calculate_totals, OrderTotals, PricedLine};
pub use signature::{GatewayConfirmation, SignatureError};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Days until an invoice is due when the payment term does not say
/// otherwise. Term-specific offsets are a future extension; today every
/// invoice is due this many days after its invoice date.
pub const DEFAULT_INVOICE_DUE_DAYS: i64 = 15;
