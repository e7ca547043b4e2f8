//! # Order Orchestration Service
//!
//! Composes pricing, coupon redemption, stock reservation, numbering, and
//! (optionally) invoice generation into one atomic order-creation workflow.
//!
//! ## Two-Phase Shape
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │  READ PHASE (pool, no locks held)                                   │
//! │    resolve payment term → load customer → validate coupon →         │
//! │    load products & pre-check stock → snapshot prices →              │
//! │    compute totals → resolve invoicing policy                        │
//! │                                                                     │
//! │  WRITE PHASE (one transaction)                                      │
//! │    allocate SO- number   ← write lock taken by the FIRST statement  │
//! │    insert order header                                              │
//! │    per item: insert item, guarded stock decrement                   │
//! │    coupon compare-and-set (if applied)                              │
//! │    invoice generation (if policy is Automatic)                      │
//! │    commit                                                           │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Any failure in the write phase returns early; dropping the transaction
//! rolls back every prior statement, so a lost stock race or a lost coupon
//! race leaves no order row, no items, and no mutations at all.
//!
//! The read-phase stock pre-check exists only for a friendly error message
//! (it can report the available quantity); correctness under concurrency
//! comes from the guarded decrement inside the transaction.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::error::DbError;
use crate::repository::contact::ContactRepository;
use crate::repository::coupon::{consume_tx, CouponRepository};
use crate::repository::order::{
    generate_order_id, generate_order_item_id, insert_item_tx, insert_order_tx,
};
use crate::repository::payment_term::PaymentTermRepository;
use crate::repository::product::{decrement_stock_tx, stock_of_tx, ProductRepository};
use crate::repository::sequence;
use crate::repository::settings::SettingsRepository;
use crate::service::invoicing;
use crate::service::{ServiceError, ServiceResult};
use atelier_core::validation::{validate_quantity, MAX_ORDER_LINES};
use atelier_core::{
    calculate_totals, coupon, Contact, CouponCode, CouponStatus, CustomerInvoice, InvoicingPolicy,
    NumberSeries, OrderStatus, PaymentTerm, PricedLine, Product, SaleOrder, SaleOrderItem,
    SalesChannel, ValidationError,
};

// =============================================================================
// Requests & Results
// =============================================================================

/// One requested line: which product, how many.
#[derive(Debug, Clone)]
pub struct OrderItemRequest {
    pub product_id: String,
    pub quantity: i64,
}

/// Everything needed to create a sale order.
#[derive(Debug, Clone)]
pub struct CreateOrderRequest {
    pub customer_id: String,
    pub items: Vec<OrderItemRequest>,
    /// Explicit payment term; the system default applies when `None`.
    pub payment_term_id: Option<String>,
    /// Coupon to redeem atomically with the order.
    pub coupon_code_id: Option<String>,
    /// The channel the request arrives on, checked against the coupon's offer.
    pub channel: SalesChannel,
}

/// A persisted line item together with the product it snapshotted.
#[derive(Debug, Clone)]
pub struct ComposedOrderItem {
    pub item: SaleOrderItem,
    pub product: Product,
}

/// The created order with its related records populated.
#[derive(Debug, Clone)]
pub struct ComposedOrder {
    pub order: SaleOrder,
    pub customer: Contact,
    pub payment_term: PaymentTerm,
    /// The redeemed coupon (status `used`), when one was applied.
    pub coupon: Option<CouponCode>,
    pub items: Vec<ComposedOrderItem>,
    /// Present when the invoicing policy generated an invoice in the same
    /// transaction.
    pub invoice: Option<CustomerInvoice>,
}

// =============================================================================
// Service
// =============================================================================

/// The order orchestration service.
#[derive(Debug, Clone)]
pub struct OrderService {
    pool: SqlitePool,
}

impl OrderService {
    /// Creates a new OrderService.
    pub fn new(pool: SqlitePool) -> Self {
        OrderService { pool }
    }

    /// Creates a sale order: prices the requested items at current catalog
    /// prices, reserves stock, redeems the coupon, and (per the invoicing
    /// policy) generates the invoice, all atomically.
    ///
    /// ## Errors
    /// The first failure wins and nothing is persisted:
    /// - `PaymentTermNotFound`, `ContactNotFound`, `ProductNotFound`,
    ///   `CouponNotFound`
    /// - `InsufficientStock` when any line exceeds what is on hand
    /// - `Coupon(...)` when a redemption rule fails
    /// - `Validation` on malformed input
    pub async fn create_order(&self, request: CreateOrderRequest) -> ServiceResult<ComposedOrder> {
        if request.items.is_empty() {
            return Err(ValidationError::Required {
                field: "items".to_string(),
            }
            .into());
        }
        if request.items.len() > MAX_ORDER_LINES {
            return Err(ValidationError::OutOfRange {
                field: "items".to_string(),
                min: 1,
                max: MAX_ORDER_LINES as i64,
            }
            .into());
        }
        for item in &request.items {
            validate_quantity(item.quantity).map_err(ServiceError::Validation)?;
        }

        let now = Utc::now();

        // ---- Read phase ----------------------------------------------------

        let terms = PaymentTermRepository::new(self.pool.clone());
        let payment_term = match &request.payment_term_id {
            Some(id) => terms.get_by_id(id).await?,
            None => terms.get_default().await?,
        }
        .ok_or(ServiceError::PaymentTermNotFound)?;

        let customer = ContactRepository::new(self.pool.clone())
            .get_by_id(&request.customer_id)
            .await?
            .ok_or_else(|| ServiceError::ContactNotFound {
                id: request.customer_id.clone(),
            })?;

        let coupons = CouponRepository::new(self.pool.clone());
        let validated_coupon = match &request.coupon_code_id {
            Some(id) => {
                let (coupon_code, offer) =
                    coupons
                        .get_with_offer(id)
                        .await?
                        .ok_or_else(|| ServiceError::CouponNotFound { id: id.clone() })?;
                let discount_bps = coupon::validate_redemption(
                    &coupon_code,
                    &offer,
                    &customer.id,
                    request.channel,
                    now,
                )?;
                Some((coupon_code, discount_bps))
            }
            None => None,
        };

        let products_repo = ProductRepository::new(self.pool.clone());
        let mut products = Vec::with_capacity(request.items.len());
        for item in &request.items {
            let product = products_repo
                .get_by_id(&item.product_id)
                .await?
                .ok_or_else(|| ServiceError::ProductNotFound {
                    id: item.product_id.clone(),
                })?;

            if !product.can_fulfill(item.quantity) {
                return Err(ServiceError::InsufficientStock {
                    product_id: product.id.clone(),
                    requested: item.quantity,
                    available: product.current_stock,
                });
            }

            products.push(product);
        }

        // Unit price and tax are snapshotted here, from the product rows as
        // they are right now. Later catalog edits never touch this order.
        let lines: Vec<PricedLine> = request
            .items
            .iter()
            .zip(&products)
            .map(|(req, product)| {
                PricedLine::new(req.quantity, product.sales_price(), product.sales_tax_rate())
            })
            .collect();

        let discount_bps = validated_coupon.as_ref().map(|(_, bps)| *bps);
        let totals = calculate_totals(&lines, discount_bps)?;

        let policy = SettingsRepository::new(self.pool.clone())
            .invoicing_policy()
            .await?;

        debug!(
            customer = %customer.id,
            lines = lines.len(),
            total_cents = totals.total.cents(),
            ?policy,
            "Order priced, entering write phase"
        );

        // ---- Write phase ---------------------------------------------------

        let mut tx = self.pool.begin().await.map_err(DbError::from)?;

        let order_number = sequence::allocate(&mut *tx, NumberSeries::SaleOrder).await?;

        let order = SaleOrder {
            id: generate_order_id(),
            order_number,
            customer_id: customer.id.clone(),
            payment_term_id: payment_term.id.clone(),
            coupon_code_id: validated_coupon.as_ref().map(|(c, _)| c.id.clone()),
            subtotal_cents: totals.subtotal.cents(),
            tax_cents: totals.tax.cents(),
            discount_cents: totals.discount.cents(),
            total_cents: totals.total.cents(),
            status: OrderStatus::Confirmed,
            created_at: now,
            updated_at: now,
        };
        insert_order_tx(&mut *tx, &order).await?;

        let mut items = Vec::with_capacity(request.items.len());
        for (req, product) in request.items.iter().zip(&products) {
            let item = SaleOrderItem {
                id: generate_order_item_id(),
                sale_order_id: order.id.clone(),
                product_id: product.id.clone(),
                quantity: req.quantity,
                unit_price_cents: product.sales_price_cents,
                tax_rate_bps: product.sales_tax_bps,
                subtotal_cents: (product.sales_price() * req.quantity).cents(),
                created_at: now,
            };
            insert_item_tx(&mut *tx, &item).await?;

            // The pre-check above may be stale by now; this guarded decrement
            // is what actually decides the race.
            if !decrement_stock_tx(&mut *tx, &product.id, req.quantity).await? {
                return match stock_of_tx(&mut *tx, &product.id).await? {
                    Some(available) => Err(ServiceError::InsufficientStock {
                        product_id: product.id.clone(),
                        requested: req.quantity,
                        available,
                    }),
                    None => Err(ServiceError::ProductNotFound {
                        id: product.id.clone(),
                    }),
                };
            }

            items.push(item);
        }

        if let Some((coupon_code, _)) = &validated_coupon {
            if !consume_tx(&mut *tx, &coupon_code.id).await? {
                // Lost the race: someone consumed this coupon since we
                // validated it. Abort the whole order.
                return Err(atelier_core::CouponError::AlreadyUsed {
                    code: coupon_code.code.clone(),
                }
                .into());
            }
        }

        let invoice = match policy {
            InvoicingPolicy::Automatic => {
                Some(invoicing::generate_in_tx(&mut *tx, &order, &items, now).await?)
            }
            InvoicingPolicy::Manual => None,
        };

        tx.commit().await.map_err(DbError::from)?;

        info!(
            order_number = %order.order_number,
            total_cents = order.total_cents,
            items = items.len(),
            invoiced = invoice.is_some(),
            "Sale order created"
        );

        let coupon = validated_coupon.map(|(mut c, _)| {
            c.status = CouponStatus::Used;
            c
        });

        Ok(ComposedOrder {
            order,
            customer,
            payment_term,
            coupon,
            items: items
                .into_iter()
                .zip(products)
                .map(|(item, product)| ComposedOrderItem { item, product })
                .collect(),
            invoice,
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use crate::repository::contact::generate_contact_id;
    use crate::repository::coupon::generate_coupon_id;
    use crate::repository::product::generate_product_id;
    use atelier_core::{
        ContactType, CouponCode, DiscountOffer, ProductCategory, SETTING_AUTOMATIC_INVOICING,
    };
    use chrono::Duration;

    async fn seed_customer(db: &Database) -> Contact {
        let contact = Contact {
            id: generate_contact_id(),
            name: "Jane Shopper".into(),
            contact_type: ContactType::Customer,
            email: Some("jane@example.com".into()),
            mobile: None,
            city: None,
            state: None,
            pincode: None,
            created_at: Utc::now(),
        };
        db.contacts().insert(&contact).await.unwrap();
        contact
    }

    async fn seed_product(db: &Database, stock: i64) -> Product {
        let now = Utc::now();
        let product = Product {
            id: generate_product_id(),
            name: "Classic Tee".into(),
            category: ProductCategory::Men,
            product_type: "t-shirt".into(),
            current_stock: stock,
            sales_price_cents: 49900,
            sales_tax_bps: 1800,
            purchase_price_cents: 25000,
            purchase_tax_bps: 1200,
            is_published: true,
            created_at: now,
            updated_at: now,
        };
        db.products().insert(&product).await.unwrap();
        product
    }

    async fn seed_coupon(db: &Database, channel: SalesChannel) -> CouponCode {
        let now = Utc::now();
        let offer = DiscountOffer {
            id: generate_coupon_id(),
            name: "Summer Sale".into(),
            discount_bps: 1500,
            start_date: now - Duration::days(1),
            end_date: now + Duration::days(30),
            channel,
            created_at: now,
        };
        db.coupons().insert_offer(&offer).await.unwrap();

        let coupon_code = CouponCode {
            id: generate_coupon_id(),
            discount_offer_id: offer.id,
            code: "SUMMER15".into(),
            expiration_date: None,
            status: CouponStatus::Unused,
            contact_id: None,
            created_at: now,
            updated_at: now,
        };
        db.coupons().insert_coupon(&coupon_code).await.unwrap();
        coupon_code
    }

    fn request(customer: &Contact, product: &Product, quantity: i64) -> CreateOrderRequest {
        CreateOrderRequest {
            customer_id: customer.id.clone(),
            items: vec![OrderItemRequest {
                product_id: product.id.clone(),
                quantity,
            }],
            payment_term_id: None,
            coupon_code_id: None,
            channel: SalesChannel::Website,
        }
    }

    #[tokio::test]
    async fn test_create_order_without_coupon() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let customer = seed_customer(&db).await;
        let product = seed_product(&db, 10).await;

        let composed = db
            .order_service()
            .create_order(request(&customer, &product, 2))
            .await
            .unwrap();

        // 2 × 499.00 @ 18% → 998.00 + 179.64 = 1177.64
        assert_eq!(composed.order.order_number, "SO-000001");
        assert_eq!(composed.order.subtotal_cents, 99800);
        assert_eq!(composed.order.tax_cents, 17964);
        assert_eq!(composed.order.discount_cents, 0);
        assert_eq!(composed.order.total_cents, 117764);
        assert_eq!(composed.order.status, OrderStatus::Confirmed);
        assert_eq!(composed.payment_term.name, "Immediate Payment");
        assert!(composed.coupon.is_none());

        assert_eq!(composed.items.len(), 1);
        let line = &composed.items[0];
        assert_eq!(line.item.quantity, 2);
        assert_eq!(line.item.unit_price_cents, 49900);
        assert_eq!(line.item.tax_rate_bps, 1800);
        assert_eq!(line.item.subtotal_cents, 99800);

        let stocked = db.products().get_by_id(&product.id).await.unwrap().unwrap();
        assert_eq!(stocked.current_stock, 8);
    }

    #[tokio::test]
    async fn test_create_order_with_coupon() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let customer = seed_customer(&db).await;
        let product = seed_product(&db, 10).await;
        let coupon_code = seed_coupon(&db, SalesChannel::Website).await;

        let mut req = request(&customer, &product, 2);
        req.coupon_code_id = Some(coupon_code.id.clone());

        let composed = db.order_service().create_order(req).await.unwrap();

        // discount = 998.00 × 15% = 149.70, applied to the subtotal only
        assert_eq!(composed.order.discount_cents, 14970);
        assert_eq!(composed.order.total_cents, 102794);
        assert_eq!(
            composed.coupon.as_ref().unwrap().status,
            CouponStatus::Used
        );

        let stored = db
            .coupons()
            .get_by_id(&coupon_code.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.status, CouponStatus::Used);
    }

    #[tokio::test]
    async fn test_automatic_invoicing_runs_in_same_transaction() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let customer = seed_customer(&db).await;
        let product = seed_product(&db, 10).await;

        let composed = db
            .order_service()
            .create_order(request(&customer, &product, 2))
            .await
            .unwrap();

        let invoice = composed.invoice.expect("automatic invoicing is the default");
        assert_eq!(invoice.invoice_number, "INV-000001");
        assert_eq!(invoice.subtotal_cents, composed.order.subtotal_cents);
        assert_eq!(invoice.tax_cents, composed.order.tax_cents);
        assert_eq!(invoice.discount_cents, composed.order.discount_cents);
        assert_eq!(invoice.total_cents, composed.order.total_cents);

        let items = db.invoices().get_items(&invoice.id).await.unwrap();
        assert_eq!(items.len(), composed.items.len());
        assert_eq!(items[0].quantity, 2);
        assert_eq!(items[0].unit_price_cents, 49900);
        assert_eq!(items[0].subtotal_cents, 99800);
    }

    #[tokio::test]
    async fn test_manual_invoicing_skips_invoice() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        db.settings()
            .set(SETTING_AUTOMATIC_INVOICING, "false")
            .await
            .unwrap();
        let customer = seed_customer(&db).await;
        let product = seed_product(&db, 10).await;

        let composed = db
            .order_service()
            .create_order(request(&customer, &product, 2))
            .await
            .unwrap();

        assert!(composed.invoice.is_none());
        assert!(db
            .invoices()
            .get_for_order(&composed.order.id)
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_insufficient_stock_rolls_back_everything() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let customer = seed_customer(&db).await;
        let product = seed_product(&db, 1).await;

        let err = db
            .order_service()
            .create_order(request(&customer, &product, 2))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            ServiceError::InsufficientStock {
                requested: 2,
                available: 1,
                ..
            }
        ));

        // no order row, no stock mutation
        assert_eq!(db.orders().count().await.unwrap(), 0);
        let stocked = db.products().get_by_id(&product.id).await.unwrap().unwrap();
        assert_eq!(stocked.current_stock, 1);
    }

    #[tokio::test]
    async fn test_failed_order_leaves_coupon_unused() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let customer = seed_customer(&db).await;
        let product = seed_product(&db, 1).await;
        let coupon_code = seed_coupon(&db, SalesChannel::Website).await;

        let mut req = request(&customer, &product, 2);
        req.coupon_code_id = Some(coupon_code.id.clone());

        db.order_service().create_order(req).await.unwrap_err();

        let stored = db
            .coupons()
            .get_by_id(&coupon_code.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.status, CouponStatus::Unused);
    }

    #[tokio::test]
    async fn test_used_coupon_rejected_before_any_write() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let customer = seed_customer(&db).await;
        let product = seed_product(&db, 10).await;
        let coupon_code = seed_coupon(&db, SalesChannel::Website).await;

        let mut first = request(&customer, &product, 1);
        first.coupon_code_id = Some(coupon_code.id.clone());
        db.order_service().create_order(first).await.unwrap();

        let mut second = request(&customer, &product, 1);
        second.coupon_code_id = Some(coupon_code.id.clone());
        let err = db.order_service().create_order(second).await.unwrap_err();

        assert!(matches!(
            err,
            ServiceError::Coupon(atelier_core::CouponError::AlreadyUsed { .. })
        ));
        assert_eq!(err.kind(), crate::service::ErrorKind::Conflict);
        assert_eq!(db.orders().count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_wrong_channel_rejected() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let customer = seed_customer(&db).await;
        let product = seed_product(&db, 10).await;
        let coupon_code = seed_coupon(&db, SalesChannel::Sales).await;

        let mut req = request(&customer, &product, 1);
        req.coupon_code_id = Some(coupon_code.id.clone());
        let err = db.order_service().create_order(req).await.unwrap_err();

        assert_eq!(err.kind(), crate::service::ErrorKind::Unauthorized);
    }

    #[tokio::test]
    async fn test_unknown_product_rejected() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let customer = seed_customer(&db).await;

        let req = CreateOrderRequest {
            customer_id: customer.id.clone(),
            items: vec![OrderItemRequest {
                product_id: "missing".into(),
                quantity: 1,
            }],
            payment_term_id: None,
            coupon_code_id: None,
            channel: SalesChannel::Website,
        };
        let err = db.order_service().create_order(req).await.unwrap_err();
        assert!(matches!(err, ServiceError::ProductNotFound { .. }));
    }

    #[tokio::test]
    async fn test_unknown_payment_term_rejected() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let customer = seed_customer(&db).await;
        let product = seed_product(&db, 10).await;

        let mut req = request(&customer, &product, 1);
        req.payment_term_id = Some("missing".into());
        let err = db.order_service().create_order(req).await.unwrap_err();
        assert!(matches!(err, ServiceError::PaymentTermNotFound));
    }

    #[tokio::test]
    async fn test_empty_items_rejected() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let customer = seed_customer(&db).await;

        let req = CreateOrderRequest {
            customer_id: customer.id.clone(),
            items: vec![],
            payment_term_id: None,
            coupon_code_id: None,
            channel: SalesChannel::Website,
        };
        let err = db.order_service().create_order(req).await.unwrap_err();
        assert_eq!(err.kind(), crate::service::ErrorKind::Validation);
    }

    // -------------------------------------------------------------------------
    // Concurrency
    // -------------------------------------------------------------------------
    // These run on a temp-file database with a multi-connection pool so the
    // requests genuinely race instead of serializing on one connection.

    async fn temp_db() -> (tempfile::TempDir, Database) {
        let dir = tempfile::tempdir().unwrap();
        let config = DbConfig::new(dir.path().join("atelier.db")).max_connections(5);
        let db = Database::new(config).await.unwrap();
        (dir, db)
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_orders_for_last_unit() {
        let (_dir, db) = temp_db().await;
        let customer = seed_customer(&db).await;
        let product = seed_product(&db, 1).await;

        let mut handles = Vec::new();
        for _ in 0..2 {
            let service = db.order_service();
            let req = request(&customer, &product, 1);
            handles.push(tokio::spawn(async move { service.create_order(req).await }));
        }

        let mut ok = 0;
        for handle in handles {
            if handle.await.unwrap().is_ok() {
                ok += 1;
            }
        }

        assert_eq!(ok, 1, "exactly one order may win the last unit");
        let stocked = db.products().get_by_id(&product.id).await.unwrap().unwrap();
        assert_eq!(stocked.current_stock, 0);
        assert_eq!(db.orders().count().await.unwrap(), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_orders_consume_coupon_once() {
        let (_dir, db) = temp_db().await;
        let customer = seed_customer(&db).await;
        let product = seed_product(&db, 10).await;
        let coupon_code = seed_coupon(&db, SalesChannel::Website).await;

        let mut handles = Vec::new();
        for _ in 0..2 {
            let service = db.order_service();
            let mut req = request(&customer, &product, 1);
            req.coupon_code_id = Some(coupon_code.id.clone());
            handles.push(tokio::spawn(async move { service.create_order(req).await }));
        }

        let mut ok = 0;
        for handle in handles {
            if handle.await.unwrap().is_ok() {
                ok += 1;
            }
        }

        assert_eq!(ok, 1, "the coupon admits exactly one order");
        assert_eq!(db.orders().count().await.unwrap(), 1);

        let stored = db
            .coupons()
            .get_by_id(&coupon_code.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.status, CouponStatus::Used);

        // The losing order rolled back entirely, including its decrement.
        let stocked = db.products().get_by_id(&product.id).await.unwrap().unwrap();
        assert_eq!(stocked.current_stock, 9);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_order_numbers_are_unique() {
        let (_dir, db) = temp_db().await;
        let customer = seed_customer(&db).await;
        let product = seed_product(&db, 100).await;

        let mut handles = Vec::new();
        for _ in 0..8 {
            let service = db.order_service();
            let req = request(&customer, &product, 1);
            handles.push(tokio::spawn(async move { service.create_order(req).await }));
        }

        let mut numbers = Vec::new();
        for handle in handles {
            numbers.push(handle.await.unwrap().unwrap().order.order_number);
        }

        let mut deduped = numbers.clone();
        deduped.sort();
        deduped.dedup();
        assert_eq!(deduped.len(), numbers.len(), "duplicate order numbers: {numbers:?}");
    }
}
