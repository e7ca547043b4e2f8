//! # Payment Service
//!
//! Gateway confirmation verification and payment registration against
//! invoices and vendor bills.
//!
//! ## Verification Is Pure Observation
//! A verified confirmation does NOT transition the referenced order or its
//! invoice today. Whether verification should mark an invoice `paid` or
//! advance the order is deliberately unresolved; callers that want that
//! behavior register a payment explicitly via [`PaymentService::register_invoice_payment`].
//! A failed verification never mutates anything either.
//!
//! ## Registration
//! Registration allocates a `PAY-` number, inserts the payment row, and
//! accumulates `paid_cents` on the target document in one transaction. The
//! guarded accumulate flips the document to `paid` at full settlement and
//! refuses overpayment at the row, so racing registrations cannot overshoot.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::{info, warn};

use crate::error::DbError;
use crate::repository::invoice::{apply_payment_tx, InvoiceRepository};
use crate::repository::order::OrderRepository;
use crate::repository::payment::{generate_payment_id, insert_tx};
use crate::repository::purchase::{apply_bill_payment_tx, PurchaseRepository};
use crate::repository::sequence;
use crate::service::{ServiceError, ServiceResult};
use atelier_core::signature::verify_confirmation;
use atelier_core::validation::validate_payment_amount;
use atelier_core::{GatewayConfirmation, NumberSeries, Payment, PaymentMethod, SaleOrder};

/// The payment verification and registration service.
#[derive(Debug, Clone)]
pub struct PaymentService {
    pool: SqlitePool,
}

impl PaymentService {
    /// Creates a new PaymentService.
    pub fn new(pool: SqlitePool) -> Self {
        PaymentService { pool }
    }

    /// Verifies a gateway payment confirmation against the shared secret.
    ///
    /// `confirmation.order_ref` must be the sale order's ID. On success the
    /// referenced order is returned unchanged; reconciling it (marking the
    /// invoice paid, advancing the order) is left to the caller. On any
    /// mismatch the error is `InvalidSignature` and nothing is mutated.
    pub async fn verify_gateway_confirmation(
        &self,
        secret: &[u8],
        confirmation: &GatewayConfirmation,
    ) -> ServiceResult<SaleOrder> {
        let order = OrderRepository::new(self.pool.clone())
            .get_by_id(&confirmation.order_ref)
            .await?
            .ok_or_else(|| ServiceError::OrderNotFound {
                id: confirmation.order_ref.clone(),
            })?;

        if let Err(err) = verify_confirmation(secret, confirmation) {
            warn!(
                order_number = %order.order_number,
                payment_ref = %confirmation.payment_ref,
                %err,
                "Rejected gateway confirmation"
            );
            return Err(err.into());
        }

        info!(
            order_number = %order.order_number,
            payment_ref = %confirmation.payment_ref,
            "Gateway confirmation verified"
        );

        Ok(order)
    }

    /// Registers a payment against a customer invoice.
    ///
    /// Fails with `Overpayment` when the amount exceeds what is outstanding;
    /// flips the invoice to `paid` when settled in full.
    pub async fn register_invoice_payment(
        &self,
        invoice_id: &str,
        amount_cents: i64,
        method: PaymentMethod,
        reference: Option<String>,
    ) -> ServiceResult<Payment> {
        validate_payment_amount(amount_cents).map_err(ServiceError::Validation)?;

        let invoice = InvoiceRepository::new(self.pool.clone())
            .get_by_id(invoice_id)
            .await?
            .ok_or_else(|| ServiceError::InvoiceNotFound {
                id: invoice_id.to_string(),
            })?;

        let outstanding = invoice.outstanding().cents();
        if amount_cents > outstanding {
            return Err(ServiceError::Overpayment {
                amount_cents,
                outstanding_cents: outstanding,
            });
        }

        let now = Utc::now();
        let mut tx = self.pool.begin().await.map_err(DbError::from)?;

        let payment_number = sequence::allocate(&mut *tx, NumberSeries::Payment).await?;
        let payment = Payment {
            id: generate_payment_id(),
            payment_number,
            contact_id: invoice.customer_id.clone(),
            invoice_id: Some(invoice.id.clone()),
            bill_id: None,
            amount_cents,
            payment_date: now,
            method,
            reference,
            created_at: now,
        };
        insert_tx(&mut *tx, &payment).await?;

        // The pre-check above may be stale; the guarded accumulate decides.
        if !apply_payment_tx(&mut *tx, &invoice.id, amount_cents).await? {
            return Err(ServiceError::Overpayment {
                amount_cents,
                outstanding_cents: outstanding,
            });
        }

        tx.commit().await.map_err(DbError::from)?;

        info!(
            payment_number = %payment.payment_number,
            invoice_number = %invoice.invoice_number,
            amount_cents,
            "Invoice payment registered"
        );

        Ok(payment)
    }

    /// Registers a payment against a vendor bill. Mirror of the invoice
    /// path, on the purchasing side.
    pub async fn register_bill_payment(
        &self,
        bill_id: &str,
        amount_cents: i64,
        method: PaymentMethod,
        reference: Option<String>,
    ) -> ServiceResult<Payment> {
        validate_payment_amount(amount_cents).map_err(ServiceError::Validation)?;

        let bill = PurchaseRepository::new(self.pool.clone())
            .get_bill_by_id(bill_id)
            .await?
            .ok_or_else(|| ServiceError::BillNotFound {
                id: bill_id.to_string(),
            })?;

        let outstanding = bill.total_cents - bill.paid_cents;
        if amount_cents > outstanding {
            return Err(ServiceError::Overpayment {
                amount_cents,
                outstanding_cents: outstanding,
            });
        }

        let now = Utc::now();
        let mut tx = self.pool.begin().await.map_err(DbError::from)?;

        let payment_number = sequence::allocate(&mut *tx, NumberSeries::Payment).await?;
        let payment = Payment {
            id: generate_payment_id(),
            payment_number,
            contact_id: bill.vendor_id.clone(),
            invoice_id: None,
            bill_id: Some(bill.id.clone()),
            amount_cents,
            payment_date: now,
            method,
            reference,
            created_at: now,
        };
        insert_tx(&mut *tx, &payment).await?;

        if !apply_bill_payment_tx(&mut *tx, &bill.id, amount_cents).await? {
            return Err(ServiceError::Overpayment {
                amount_cents,
                outstanding_cents: outstanding,
            });
        }

        tx.commit().await.map_err(DbError::from)?;

        info!(
            payment_number = %payment.payment_number,
            bill_number = %bill.bill_number,
            amount_cents,
            "Bill payment registered"
        );

        Ok(payment)
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
    use crate::service::orders::{CreateOrderRequest, OrderItemRequest};
    use atelier_core::signature::sign_confirmation;
    use atelier_core::{
        Contact, ContactType, CustomerInvoice, InvoiceStatus, Product, ProductCategory,
        SaleOrder, SalesChannel,
    };

    const SECRET: &[u8] = b"gateway_shared_secret";

    async fn seed_order_and_invoice(db: &Database) -> (SaleOrder, CustomerInvoice) {
        let now = Utc::now();
        let contact = Contact {
            id: generate_contact_id(),
            name: "Jane Shopper".into(),
            contact_type: ContactType::Customer,
            email: None,
            mobile: None,
            city: None,
            state: None,
            pincode: None,
            created_at: now,
        };
        db.contacts().insert(&contact).await.unwrap();

        let product = Product {
            id: generate_product_id(),
            name: "Classic Tee".into(),
            category: ProductCategory::Men,
            product_type: "t-shirt".into(),
            current_stock: 10,
            sales_price_cents: 49900,
            sales_tax_bps: 1800,
            purchase_price_cents: 25000,
            purchase_tax_bps: 1200,
            is_published: true,
            created_at: now,
            updated_at: now,
        };
        db.products().insert(&product).await.unwrap();

        let composed = db
            .order_service()
            .create_order(CreateOrderRequest {
                customer_id: contact.id,
                items: vec![OrderItemRequest {
                    product_id: product.id,
                    quantity: 2,
                }],
                payment_term_id: None,
                coupon_code_id: None,
                channel: SalesChannel::Website,
            })
            .await
            .unwrap();

        let invoice = composed.invoice.clone().expect("automatic by default");
        (composed.order, invoice)
    }

    #[tokio::test]
    async fn test_valid_confirmation_verifies_without_mutation() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let (order, invoice) = seed_order_and_invoice(&db).await;

        let confirmation = GatewayConfirmation {
            order_ref: order.id.clone(),
            payment_ref: "pay_29QQoUBi".into(),
            signature: sign_confirmation(SECRET, &order.id, "pay_29QQoUBi"),
        };

        let verified = db
            .payment_service()
            .verify_gateway_confirmation(SECRET, &confirmation)
            .await
            .unwrap();
        assert_eq!(verified.order_number, order.order_number);

        // verification transitions nothing
        let after = db.orders().get_by_id(&order.id).await.unwrap().unwrap();
        assert_eq!(after.status, order.status);
        let invoice_after = db.invoices().get_by_id(&invoice.id).await.unwrap().unwrap();
        assert_eq!(invoice_after.status, InvoiceStatus::Sent);
        assert_eq!(invoice_after.paid_cents, 0);
    }

    #[tokio::test]
    async fn test_tampered_confirmation_rejected_without_mutation() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let (order, _) = seed_order_and_invoice(&db).await;

        let confirmation = GatewayConfirmation {
            order_ref: order.id.clone(),
            payment_ref: "pay_TAMPERED".into(),
            signature: sign_confirmation(SECRET, &order.id, "pay_29QQoUBi"),
        };

        let err = db
            .payment_service()
            .verify_gateway_confirmation(SECRET, &confirmation)
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::InvalidSignature));
        assert_eq!(err.kind(), crate::service::ErrorKind::Unauthorized);

        let after = db.orders().get_by_id(&order.id).await.unwrap().unwrap();
        assert_eq!(after.status, order.status);
    }

    #[tokio::test]
    async fn test_unknown_order_rejected() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        let confirmation = GatewayConfirmation {
            order_ref: "missing".into(),
            payment_ref: "pay_1".into(),
            signature: sign_confirmation(SECRET, "missing", "pay_1"),
        };
        let err = db
            .payment_service()
            .verify_gateway_confirmation(SECRET, &confirmation)
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::OrderNotFound { .. }));
    }

    #[tokio::test]
    async fn test_payments_accumulate_and_settle() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let (_, invoice) = seed_order_and_invoice(&db).await;
        // total is 1177.64
        assert_eq!(invoice.total_cents, 117764);

        let first = db
            .payment_service()
            .register_invoice_payment(&invoice.id, 100000, PaymentMethod::Card, None)
            .await
            .unwrap();
        assert_eq!(first.payment_number, "PAY-000001");

        let partial = db.invoices().get_by_id(&invoice.id).await.unwrap().unwrap();
        assert_eq!(partial.paid_cents, 100000);
        assert_eq!(partial.status, InvoiceStatus::Sent);

        let second = db
            .payment_service()
            .register_invoice_payment(
                &invoice.id,
                17764,
                PaymentMethod::Online,
                Some("pay_29QQoUBi".into()),
            )
            .await
            .unwrap();
        assert_eq!(second.payment_number, "PAY-000002");

        let settled = db.invoices().get_by_id(&invoice.id).await.unwrap().unwrap();
        assert_eq!(settled.paid_cents, 117764);
        assert_eq!(settled.status, InvoiceStatus::Paid);

        let history = db.payments().list_for_invoice(&invoice.id).await.unwrap();
        assert_eq!(history.len(), 2);
    }

    #[tokio::test]
    async fn test_overpayment_rejected() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let (_, invoice) = seed_order_and_invoice(&db).await;

        let err = db
            .payment_service()
            .register_invoice_payment(&invoice.id, invoice.total_cents + 1, PaymentMethod::Cash, None)
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Overpayment { .. }));
        assert_eq!(err.kind(), crate::service::ErrorKind::Conflict);

        // nothing was written
        let after = db.invoices().get_by_id(&invoice.id).await.unwrap().unwrap();
        assert_eq!(after.paid_cents, 0);
        assert!(db
            .payments()
            .list_for_invoice(&invoice.id)
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_non_positive_amount_rejected() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let (_, invoice) = seed_order_and_invoice(&db).await;

        let err = db
            .payment_service()
            .register_invoice_payment(&invoice.id, 0, PaymentMethod::Cash, None)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), crate::service::ErrorKind::Validation);
    }
}
