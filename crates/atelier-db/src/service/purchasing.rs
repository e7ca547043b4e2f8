//! # Purchasing Service
//!
//! The vendor-side mirror of the sale pipeline: purchase orders snapshot
//! purchase prices, vendor bills derive from purchase orders the way
//! invoices derive from sale orders. No coupons and no stock decrement on
//! this side; goods receipt replenishes stock instead.

use chrono::{Duration, Utc};
use sqlx::SqlitePool;
use tracing::info;

use crate::error::DbError;
use crate::repository::contact::ContactRepository;
use crate::repository::product::{replenish_stock_tx, ProductRepository};
use crate::repository::purchase::{
    generate_purchase_id, insert_bill_item_tx, insert_bill_tx, insert_order_item_tx,
    insert_order_tx, PurchaseRepository,
};
use crate::repository::sequence;
use crate::service::{ServiceError, ServiceResult};
use atelier_core::validation::validate_quantity;
use atelier_core::{
    calculate_totals, InvoiceStatus, NumberSeries, PricedLine, PurchaseOrder, PurchaseOrderItem,
    PurchaseOrderStatus, ValidationError, VendorBill, VendorBillItem, DEFAULT_INVOICE_DUE_DAYS,
};

// =============================================================================
// Requests & Results
// =============================================================================

/// One requested purchase line.
#[derive(Debug, Clone)]
pub struct PurchaseItemRequest {
    pub product_id: String,
    pub quantity: i64,
}

/// A created purchase order with its persisted line items.
#[derive(Debug, Clone)]
pub struct CreatedPurchaseOrder {
    pub order: PurchaseOrder,
    pub items: Vec<PurchaseOrderItem>,
}

// =============================================================================
// Service
// =============================================================================

/// The purchasing service.
#[derive(Debug, Clone)]
pub struct PurchasingService {
    pool: SqlitePool,
}

impl PurchasingService {
    /// Creates a new PurchasingService.
    pub fn new(pool: SqlitePool) -> Self {
        PurchasingService { pool }
    }

    /// Creates a purchase order against a vendor, snapshotting purchase
    /// prices and tax rates from the current product rows.
    pub async fn create_purchase_order(
        &self,
        vendor_id: &str,
        items: Vec<PurchaseItemRequest>,
    ) -> ServiceResult<CreatedPurchaseOrder> {
        if items.is_empty() {
            return Err(ValidationError::Required {
                field: "items".to_string(),
            }
            .into());
        }
        for item in &items {
            validate_quantity(item.quantity).map_err(ServiceError::Validation)?;
        }

        let vendor = ContactRepository::new(self.pool.clone())
            .get_by_id(vendor_id)
            .await?
            .ok_or_else(|| ServiceError::ContactNotFound {
                id: vendor_id.to_string(),
            })?;
        if !vendor.is_vendor() {
            return Err(ValidationError::InvalidFormat {
                field: "vendor_id".to_string(),
                reason: "contact is not a vendor".to_string(),
            }
            .into());
        }

        let products_repo = ProductRepository::new(self.pool.clone());
        let mut products = Vec::with_capacity(items.len());
        for item in &items {
            let product = products_repo
                .get_by_id(&item.product_id)
                .await?
                .ok_or_else(|| ServiceError::ProductNotFound {
                    id: item.product_id.clone(),
                })?;
            products.push(product);
        }

        let lines: Vec<PricedLine> = items
            .iter()
            .zip(&products)
            .map(|(req, product)| {
                PricedLine::new(
                    req.quantity,
                    product.purchase_price(),
                    product.purchase_tax_rate(),
                )
            })
            .collect();
        let totals = calculate_totals(&lines, None)?;

        let now = Utc::now();
        let mut tx = self.pool.begin().await.map_err(DbError::from)?;

        let order_number = sequence::allocate(&mut *tx, NumberSeries::PurchaseOrder).await?;
        let order = PurchaseOrder {
            id: generate_purchase_id(),
            order_number,
            vendor_id: vendor.id.clone(),
            subtotal_cents: totals.subtotal.cents(),
            tax_cents: totals.tax.cents(),
            total_cents: totals.total.cents(),
            status: PurchaseOrderStatus::Confirmed,
            order_date: now,
            created_at: now,
        };
        insert_order_tx(&mut *tx, &order).await?;

        let mut persisted = Vec::with_capacity(items.len());
        for (req, product) in items.iter().zip(&products) {
            let item = PurchaseOrderItem {
                id: generate_purchase_id(),
                purchase_order_id: order.id.clone(),
                product_id: product.id.clone(),
                quantity: req.quantity,
                unit_price_cents: product.purchase_price_cents,
                tax_rate_bps: product.purchase_tax_bps,
                subtotal_cents: (product.purchase_price() * req.quantity).cents(),
            };
            insert_order_item_tx(&mut *tx, &item).await?;
            persisted.push(item);
        }

        tx.commit().await.map_err(DbError::from)?;

        info!(
            order_number = %order.order_number,
            total_cents = order.total_cents,
            items = persisted.len(),
            "Purchase order created"
        );

        Ok(CreatedPurchaseOrder {
            order,
            items: persisted,
        })
    }

    /// Derives a vendor bill from a purchase order: totals and items copied
    /// exactly, due date 15 days out, initial status `sent`.
    ///
    /// Returns `Ok(None)` when the purchase order does not exist.
    pub async fn create_bill_from_order(
        &self,
        purchase_order_id: &str,
    ) -> ServiceResult<Option<VendorBill>> {
        let purchases = PurchaseRepository::new(self.pool.clone());
        let Some(order) = purchases.get_order_by_id(purchase_order_id).await? else {
            return Ok(None);
        };
        let items = purchases.get_order_items(purchase_order_id).await?;

        let now = Utc::now();
        let mut tx = self.pool.begin().await.map_err(DbError::from)?;

        let bill_number = sequence::allocate(&mut *tx, NumberSeries::Bill).await?;
        let bill = VendorBill {
            id: generate_purchase_id(),
            bill_number,
            purchase_order_id: Some(order.id.clone()),
            vendor_id: order.vendor_id.clone(),
            bill_date: now,
            due_date: now + Duration::days(DEFAULT_INVOICE_DUE_DAYS),
            subtotal_cents: order.subtotal_cents,
            tax_cents: order.tax_cents,
            total_cents: order.total_cents,
            paid_cents: 0,
            status: InvoiceStatus::Sent,
            created_at: now,
            updated_at: now,
        };
        insert_bill_tx(&mut *tx, &bill).await?;

        for item in &items {
            let bill_item = VendorBillItem {
                id: generate_purchase_id(),
                bill_id: bill.id.clone(),
                product_id: item.product_id.clone(),
                quantity: item.quantity,
                unit_price_cents: item.unit_price_cents,
                tax_rate_bps: item.tax_rate_bps,
                subtotal_cents: item.subtotal_cents,
            };
            insert_bill_item_tx(&mut *tx, &bill_item).await?;
        }

        tx.commit().await.map_err(DbError::from)?;

        info!(
            bill_number = %bill.bill_number,
            order_number = %order.order_number,
            "Vendor bill created"
        );

        Ok(Some(bill))
    }

    /// Books goods receipt for a purchase order: every line's quantity is
    /// added back to its product's stock, atomically across all lines.
    pub async fn receive_order(&self, purchase_order_id: &str) -> ServiceResult<()> {
        let purchases = PurchaseRepository::new(self.pool.clone());
        let order = purchases
            .get_order_by_id(purchase_order_id)
            .await?
            .ok_or_else(|| ServiceError::OrderNotFound {
                id: purchase_order_id.to_string(),
            })?;
        let items = purchases.get_order_items(purchase_order_id).await?;

        let mut tx = self.pool.begin().await.map_err(DbError::from)?;

        for item in &items {
            if !replenish_stock_tx(&mut *tx, &item.product_id, item.quantity).await? {
                return Err(ServiceError::ProductNotFound {
                    id: item.product_id.clone(),
                });
            }
        }

        tx.commit().await.map_err(DbError::from)?;

        info!(
            order_number = %order.order_number,
            lines = items.len(),
            "Goods receipt booked"
        );

        Ok(())
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
    use crate::repository::product::generate_product_id;
    use atelier_core::{Contact, ContactType, PaymentMethod, Product, ProductCategory};

    async fn seed_vendor(db: &Database) -> Contact {
        let contact = Contact {
            id: generate_contact_id(),
            name: "Mill & Loom Textiles".into(),
            contact_type: ContactType::Vendor,
            email: None,
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

    #[tokio::test]
    async fn test_create_purchase_order_snapshots_purchase_prices() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let vendor = seed_vendor(&db).await;
        let product = seed_product(&db, 0).await;

        let created = db
            .purchasing_service()
            .create_purchase_order(
                &vendor.id,
                vec![PurchaseItemRequest {
                    product_id: product.id.clone(),
                    quantity: 4,
                }],
            )
            .await
            .unwrap();

        // 4 × 250.00 @ 12% → 1000.00 + 120.00
        assert_eq!(created.order.order_number, "PO-000001");
        assert_eq!(created.order.subtotal_cents, 100000);
        assert_eq!(created.order.tax_cents, 12000);
        assert_eq!(created.order.total_cents, 112000);
        assert_eq!(created.order.status, PurchaseOrderStatus::Confirmed);

        assert_eq!(created.items.len(), 1);
        assert_eq!(created.items[0].unit_price_cents, 25000);
        assert_eq!(created.items[0].tax_rate_bps, 1200);

        // no stock movement at ordering time
        let stocked = db.products().get_by_id(&product.id).await.unwrap().unwrap();
        assert_eq!(stocked.current_stock, 0);
    }

    #[tokio::test]
    async fn test_customer_contact_cannot_be_vendor() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let product = seed_product(&db, 0).await;

        let customer = Contact {
            id: generate_contact_id(),
            name: "Jane Shopper".into(),
            contact_type: ContactType::Customer,
            email: None,
            mobile: None,
            city: None,
            state: None,
            pincode: None,
            created_at: Utc::now(),
        };
        db.contacts().insert(&customer).await.unwrap();

        let err = db
            .purchasing_service()
            .create_purchase_order(
                &customer.id,
                vec![PurchaseItemRequest {
                    product_id: product.id,
                    quantity: 1,
                }],
            )
            .await
            .unwrap_err();
        assert_eq!(err.kind(), crate::service::ErrorKind::Validation);
    }

    #[tokio::test]
    async fn test_bill_from_order_copies_totals_and_items() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let vendor = seed_vendor(&db).await;
        let product = seed_product(&db, 0).await;

        let created = db
            .purchasing_service()
            .create_purchase_order(
                &vendor.id,
                vec![PurchaseItemRequest {
                    product_id: product.id,
                    quantity: 4,
                }],
            )
            .await
            .unwrap();

        let bill = db
            .purchasing_service()
            .create_bill_from_order(&created.order.id)
            .await
            .unwrap()
            .expect("order exists");

        assert_eq!(bill.bill_number, "BILL-000001");
        assert_eq!(bill.subtotal_cents, created.order.subtotal_cents);
        assert_eq!(bill.total_cents, created.order.total_cents);
        assert_eq!(bill.status, InvoiceStatus::Sent);

        let items = db.purchases().get_bill_items(&bill.id).await.unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].quantity, 4);
        assert_eq!(items[0].unit_price_cents, 25000);

        assert!(db
            .purchasing_service()
            .create_bill_from_order("missing")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_bill_payment_settles() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let vendor = seed_vendor(&db).await;
        let product = seed_product(&db, 0).await;

        let created = db
            .purchasing_service()
            .create_purchase_order(
                &vendor.id,
                vec![PurchaseItemRequest {
                    product_id: product.id,
                    quantity: 4,
                }],
            )
            .await
            .unwrap();
        let bill = db
            .purchasing_service()
            .create_bill_from_order(&created.order.id)
            .await
            .unwrap()
            .unwrap();

        let payment = db
            .payment_service()
            .register_bill_payment(&bill.id, bill.total_cents, PaymentMethod::BankTransfer, None)
            .await
            .unwrap();
        assert_eq!(payment.payment_number, "PAY-000001");
        assert_eq!(payment.bill_id.as_deref(), Some(bill.id.as_str()));
        assert!(payment.invoice_id.is_none());

        let settled = db.purchases().get_bill_by_id(&bill.id).await.unwrap().unwrap();
        assert_eq!(settled.status, InvoiceStatus::Paid);
        assert_eq!(settled.paid_cents, bill.total_cents);
    }

    #[tokio::test]
    async fn test_goods_receipt_replenishes_stock() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let vendor = seed_vendor(&db).await;
        let product = seed_product(&db, 3).await;

        let created = db
            .purchasing_service()
            .create_purchase_order(
                &vendor.id,
                vec![PurchaseItemRequest {
                    product_id: product.id.clone(),
                    quantity: 40,
                }],
            )
            .await
            .unwrap();

        db.purchasing_service()
            .receive_order(&created.order.id)
            .await
            .unwrap();

        let stocked = db.products().get_by_id(&product.id).await.unwrap().unwrap();
        assert_eq!(stocked.current_stock, 43);
    }
}
