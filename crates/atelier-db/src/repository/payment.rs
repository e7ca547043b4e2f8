//! # Payment Repository
//!
//! Database operations for registered payments. A payment row always
//! references an invoice or a bill, never both; the schema CHECK enforces
//! this and the service layer's API shape makes it unrepresentable.

use sqlx::{SqliteConnection, SqlitePool};
use uuid::Uuid;

use crate::error::DbResult;
use atelier_core::Payment;

const PAYMENT_COLUMNS: &str = r#"
    id, payment_number, contact_id, invoice_id, bill_id, amount_cents,
    payment_date, method, reference, created_at
"#;

/// Repository for payment database operations.
#[derive(Debug, Clone)]
pub struct PaymentRepository {
    pool: SqlitePool,
}

impl PaymentRepository {
    /// Creates a new PaymentRepository.
    pub fn new(pool: SqlitePool) -> Self {
        PaymentRepository { pool }
    }

    /// Gets a payment by its ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Payment>> {
        let payment = sqlx::query_as::<_, Payment>(&format!(
            "SELECT {PAYMENT_COLUMNS} FROM payments WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(payment)
    }

    /// Lists payments registered against an invoice, oldest first.
    pub async fn list_for_invoice(&self, invoice_id: &str) -> DbResult<Vec<Payment>> {
        let payments = sqlx::query_as::<_, Payment>(&format!(
            r#"
            SELECT {PAYMENT_COLUMNS} FROM payments
            WHERE invoice_id = ?1
            ORDER BY created_at, id
            "#
        ))
        .bind(invoice_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(payments)
    }

    /// Lists payments registered against a vendor bill, oldest first.
    pub async fn list_for_bill(&self, bill_id: &str) -> DbResult<Vec<Payment>> {
        let payments = sqlx::query_as::<_, Payment>(&format!(
            r#"
            SELECT {PAYMENT_COLUMNS} FROM payments
            WHERE bill_id = ?1
            ORDER BY created_at, id
            "#
        ))
        .bind(bill_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(payments)
    }
}

// =============================================================================
// Transaction-Scoped Operations
// =============================================================================

/// Inserts a payment row inside the caller's transaction.
pub(crate) async fn insert_tx(conn: &mut SqliteConnection, payment: &Payment) -> DbResult<()> {
    sqlx::query(
        r#"
        INSERT INTO payments (
            id, payment_number, contact_id, invoice_id, bill_id, amount_cents,
            payment_date, method, reference, created_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
        "#,
    )
    .bind(&payment.id)
    .bind(&payment.payment_number)
    .bind(&payment.contact_id)
    .bind(&payment.invoice_id)
    .bind(&payment.bill_id)
    .bind(payment.amount_cents)
    .bind(payment.payment_date)
    .bind(payment.method)
    .bind(&payment.reference)
    .bind(payment.created_at)
    .execute(conn)
    .await?;

    Ok(())
}

/// Generates a new payment ID.
pub fn generate_payment_id() -> String {
    Uuid::new_v4().to_string()
}
