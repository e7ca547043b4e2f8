//! # atelier-db: Database Layer for Atelier Commerce
//!
//! SQLite persistence and the transactional services for the storefront and
//! back office.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                     Atelier Commerce Data Flow                      │
//! │                                                                     │
//! │  HTTP handler (create_order, apply_coupon, gateway callback)        │
//! │       │                                                             │
//! │       ▼                                                             │
//! │  ┌───────────────────────────────────────────────────────────────┐  │
//! │  │                   atelier-db (THIS CRATE)                     │  │
//! │  │                                                               │  │
//! │  │   ┌────────────┐   ┌───────────────┐   ┌──────────────────┐  │  │
//! │  │   │  services  │──►│ repositories  │   │    migrations    │  │  │
//! │  │   │ orders     │   │ product, ...  │   │    (embedded)    │  │  │
//! │  │   │ invoicing  │   │ + *_tx fns    │   │ 001_initial.sql  │  │  │
//! │  │   │ payments   │   │               │   │ 002_default.sql  │  │  │
//! │  │   │ purchasing │   └───────┬───────┘   └──────────────────┘  │  │
//! │  │   │ coupons    │           │                                 │  │
//! │  │   └────────────┘   ┌───────▼───────┐                         │  │
//! │  │                    │   Database    │  SqlitePool, WAL mode   │  │
//! │  │                    │   (pool.rs)   │  foreign keys, timeouts │  │
//! │  │                    └───────────────┘                         │  │
//! │  └───────────────────────────────────────────────────────────────┘  │
//! │       │                                                             │
//! │       ▼                                                             │
//! │  SQLite database file (WAL)                                         │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - One repository per aggregate, plus transaction-scoped
//!   write helpers composed by the services
//! - [`service`] - Transactional workflows (order orchestration, invoicing,
//!   payments, purchasing, coupons)
//!
//! ## Usage
//!
//! ```rust,ignore
//! use atelier_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("atelier.db")).await?;
//!
//! let order = db.order_service().create_order(request).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;
pub mod service;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};
pub use service::{ErrorKind, ServiceError, ServiceResult};

// Repository re-exports for convenience
pub use repository::contact::ContactRepository;
pub use repository::coupon::CouponRepository;
pub use repository::invoice::InvoiceRepository;
pub use repository::order::OrderRepository;
pub use repository::payment::PaymentRepository;
pub use repository::payment_term::PaymentTermRepository;
pub use repository::product::ProductRepository;
pub use repository::purchase::PurchaseRepository;
pub use repository::settings::SettingsRepository;

// Service re-exports
pub use service::{
    ComposedOrder, ComposedOrderItem, CouponQuote, CouponService, CreateOfferRequest,
    CreateOrderRequest, CreatedPurchaseOrder, InvoiceService, OrderItemRequest, OrderService,
    PaymentService, PurchaseItemRequest, PurchasingService,
};
