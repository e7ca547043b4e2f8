//! # Invoice Generation Service
//!
//! Derives a customer invoice from a confirmed sale order: totals copied
//! verbatim, one invoice item per order item with quantity, unit price, tax
//! rate, and subtotal preserved exactly, due date 15 days out, initial
//! status `sent`.
//!
//! Generation runs in two settings:
//! - inside the order transaction, when the invoicing policy is Automatic
//!   (`generate_in_tx`, called by the order service)
//! - standalone with its own transaction, for manual invoicing
//!   (`generate_for_order`)
//!
//! A payment-term-specific due-date offset is a future extension; today
//! every invoice uses [`DEFAULT_INVOICE_DUE_DAYS`].

use chrono::{DateTime, Duration, Utc};
use sqlx::{SqliteConnection, SqlitePool};
use tracing::info;

use crate::error::{DbError, DbResult};
use crate::repository::invoice::{
    generate_invoice_id, generate_invoice_item_id, insert_invoice_tx, insert_item_tx,
    InvoiceRepository,
};
use crate::repository::order::OrderRepository;
use crate::repository::sequence;
use crate::service::ServiceResult;
use atelier_core::{
    CustomerInvoice, CustomerInvoiceItem, InvoiceStatus, NumberSeries, SaleOrder, SaleOrderItem,
    DEFAULT_INVOICE_DUE_DAYS,
};

/// The invoice generation service.
#[derive(Debug, Clone)]
pub struct InvoiceService {
    pool: SqlitePool,
}

impl InvoiceService {
    /// Creates a new InvoiceService.
    pub fn new(pool: SqlitePool) -> Self {
        InvoiceService { pool }
    }

    /// Generates an invoice for a sale order in its own transaction.
    ///
    /// Returns `Ok(None)` when the order does not exist; generation is a
    /// no-op in that case, not an error.
    pub async fn generate_for_order(&self, order_id: &str) -> ServiceResult<Option<CustomerInvoice>> {
        let orders = OrderRepository::new(self.pool.clone());
        let Some(order) = orders.get_by_id(order_id).await? else {
            return Ok(None);
        };
        let items = orders.get_items(order_id).await?;

        let mut tx = self.pool.begin().await.map_err(DbError::from)?;
        let invoice = generate_in_tx(&mut *tx, &order, &items, Utc::now()).await?;
        tx.commit().await.map_err(DbError::from)?;

        Ok(Some(invoice))
    }

    /// Gets an invoice with its items, by invoice ID.
    pub async fn get_with_items(
        &self,
        invoice_id: &str,
    ) -> ServiceResult<Option<(CustomerInvoice, Vec<CustomerInvoiceItem>)>> {
        let invoices = InvoiceRepository::new(self.pool.clone());
        let Some(invoice) = invoices.get_by_id(invoice_id).await? else {
            return Ok(None);
        };
        let items = invoices.get_items(invoice_id).await?;
        Ok(Some((invoice, items)))
    }
}

/// Generates the invoice inside the caller's transaction. This is the single
/// code path for both automatic and manual invoicing, so the two can never
/// drift apart.
pub(crate) async fn generate_in_tx(
    conn: &mut SqliteConnection,
    order: &SaleOrder,
    items: &[SaleOrderItem],
    now: DateTime<Utc>,
) -> DbResult<CustomerInvoice> {
    let invoice_number = sequence::allocate(conn, NumberSeries::Invoice).await?;

    let invoice = CustomerInvoice {
        id: generate_invoice_id(),
        invoice_number,
        sale_order_id: Some(order.id.clone()),
        customer_id: order.customer_id.clone(),
        payment_term_id: order.payment_term_id.clone(),
        invoice_date: now,
        due_date: now + Duration::days(DEFAULT_INVOICE_DUE_DAYS),
        subtotal_cents: order.subtotal_cents,
        tax_cents: order.tax_cents,
        discount_cents: order.discount_cents,
        total_cents: order.total_cents,
        paid_cents: 0,
        status: InvoiceStatus::Sent,
        created_at: now,
        updated_at: now,
    };
    insert_invoice_tx(conn, &invoice).await?;

    for item in items {
        let invoice_item = CustomerInvoiceItem {
            id: generate_invoice_item_id(),
            invoice_id: invoice.id.clone(),
            product_id: item.product_id.clone(),
            quantity: item.quantity,
            unit_price_cents: item.unit_price_cents,
            tax_rate_bps: item.tax_rate_bps,
            subtotal_cents: item.subtotal_cents,
        };
        insert_item_tx(conn, &invoice_item).await?;
    }

    info!(
        invoice_number = %invoice.invoice_number,
        order_number = %order.order_number,
        total_cents = invoice.total_cents,
        "Invoice generated"
    );

    Ok(invoice)
}

// =============================================================================
// Unit Tests
// =============================================================================
