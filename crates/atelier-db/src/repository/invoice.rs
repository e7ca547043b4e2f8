//! # Customer Invoice Repository
//!
//! Database operations for customer invoices and their line items.
//!
//! ## Payment Accumulation
//! `paid_cents` only ever moves through the guarded accumulate below, which
//! also flips the status to `paid` the moment the invoice is settled in
//! full. The guard rejects overpayment at the row itself, so two racing
//! registrations cannot push `paid_cents` past the total:
//!
//! ```text
//!   UPDATE customer_invoices
//!   SET paid_cents = paid_cents + :amount, ...
//!   WHERE id = :id AND paid_cents + :amount <= total_cents
//!   → rows_affected == 0  ⇒  would overpay, roll back
//! ```

use chrono::Utc;
use sqlx::{SqliteConnection, SqlitePool};
use uuid::Uuid;

use crate::error::DbResult;
use atelier_core::{CustomerInvoice, CustomerInvoiceItem};

const INVOICE_COLUMNS: &str = r#"
    id, invoice_number, sale_order_id, customer_id, payment_term_id,
    invoice_date, due_date, subtotal_cents, tax_cents, discount_cents,
    total_cents, paid_cents, status, created_at, updated_at
"#;

const ITEM_COLUMNS: &str = r#"
    id, invoice_id, product_id, quantity, unit_price_cents, tax_rate_bps,
    subtotal_cents
"#;

/// Repository for customer invoice database operations.
#[derive(Debug, Clone)]
pub struct InvoiceRepository {
    pool: SqlitePool,
}

impl InvoiceRepository {
    /// Creates a new InvoiceRepository.
    pub fn new(pool: SqlitePool) -> Self {
        InvoiceRepository { pool }
    }

    /// Gets an invoice by its ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<CustomerInvoice>> {
        let invoice = sqlx::query_as::<_, CustomerInvoice>(&format!(
            "SELECT {INVOICE_COLUMNS} FROM customer_invoices WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(invoice)
    }

    /// Gets an invoice by its business number (`INV-000042`).
    pub async fn get_by_number(&self, invoice_number: &str) -> DbResult<Option<CustomerInvoice>> {
        let invoice = sqlx::query_as::<_, CustomerInvoice>(&format!(
            "SELECT {INVOICE_COLUMNS} FROM customer_invoices WHERE invoice_number = ?1"
        ))
        .bind(invoice_number)
        .fetch_optional(&self.pool)
        .await?;

        Ok(invoice)
    }

    /// Gets the invoice generated from a sale order, if any.
    pub async fn get_for_order(&self, sale_order_id: &str) -> DbResult<Option<CustomerInvoice>> {
        let invoice = sqlx::query_as::<_, CustomerInvoice>(&format!(
            "SELECT {INVOICE_COLUMNS} FROM customer_invoices WHERE sale_order_id = ?1"
        ))
        .bind(sale_order_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(invoice)
    }

    /// Gets all line items of an invoice.
    pub async fn get_items(&self, invoice_id: &str) -> DbResult<Vec<CustomerInvoiceItem>> {
        let items = sqlx::query_as::<_, CustomerInvoiceItem>(&format!(
            "SELECT {ITEM_COLUMNS} FROM customer_invoice_items WHERE invoice_id = ?1 ORDER BY id"
        ))
        .bind(invoice_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }
}

// =============================================================================
// Transaction-Scoped Operations
// =============================================================================

/// Inserts the invoice header inside the caller's transaction.
pub(crate) async fn insert_invoice_tx(
    conn: &mut SqliteConnection,
    invoice: &CustomerInvoice,
) -> DbResult<()> {
    sqlx::query(
        r#"
        INSERT INTO customer_invoices (
            id, invoice_number, sale_order_id, customer_id, payment_term_id,
            invoice_date, due_date, subtotal_cents, tax_cents, discount_cents,
            total_cents, paid_cents, status, created_at, updated_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15)
        "#,
    )
    .bind(&invoice.id)
    .bind(&invoice.invoice_number)
    .bind(&invoice.sale_order_id)
    .bind(&invoice.customer_id)
    .bind(&invoice.payment_term_id)
    .bind(invoice.invoice_date)
    .bind(invoice.due_date)
    .bind(invoice.subtotal_cents)
    .bind(invoice.tax_cents)
    .bind(invoice.discount_cents)
    .bind(invoice.total_cents)
    .bind(invoice.paid_cents)
    .bind(invoice.status)
    .bind(invoice.created_at)
    .bind(invoice.updated_at)
    .execute(conn)
    .await?;

    Ok(())
}

/// Inserts one invoice line item inside the caller's transaction.
pub(crate) async fn insert_item_tx(
    conn: &mut SqliteConnection,
    item: &CustomerInvoiceItem,
) -> DbResult<()> {
    sqlx::query(
        r#"
        INSERT INTO customer_invoice_items (
            id, invoice_id, product_id, quantity, unit_price_cents,
            tax_rate_bps, subtotal_cents
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
        "#,
    )
    .bind(&item.id)
    .bind(&item.invoice_id)
    .bind(&item.product_id)
    .bind(item.quantity)
    .bind(item.unit_price_cents)
    .bind(item.tax_rate_bps)
    .bind(item.subtotal_cents)
    .execute(conn)
    .await?;

    Ok(())
}

/// Accumulates a payment onto the invoice, flipping the status to `paid`
/// when settled in full. Returns whether a row was updated; `false` means
/// the payment would overpay (or the invoice is gone) and the caller must
/// roll back.
pub(crate) async fn apply_payment_tx(
    conn: &mut SqliteConnection,
    invoice_id: &str,
    amount_cents: i64,
) -> DbResult<bool> {
    let now = Utc::now();

    let result = sqlx::query(
        r#"
        UPDATE customer_invoices
        SET paid_cents = paid_cents + ?2,
            status = CASE WHEN paid_cents + ?2 >= total_cents THEN 'paid' ELSE status END,
            updated_at = ?3
        WHERE id = ?1 AND paid_cents + ?2 <= total_cents
        "#,
    )
    .bind(invoice_id)
    .bind(amount_cents)
    .bind(now)
    .execute(conn)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Generates a new invoice ID.
pub fn generate_invoice_id() -> String {
    Uuid::new_v4().to_string()
}

/// Generates a new invoice item ID.
pub fn generate_invoice_item_id() -> String {
    Uuid::new_v4().to_string()
}
