//! # Purchase Repository
//!
//! Database operations for purchase orders and vendor bills, the vendor-side
//! mirror of sale orders and customer invoices. Bills accumulate payments
//! through the same guarded pattern as invoices.

use chrono::Utc;
use sqlx::{SqliteConnection, SqlitePool};
use uuid::Uuid;

use crate::error::DbResult;
use atelier_core::{PurchaseOrder, PurchaseOrderItem, VendorBill, VendorBillItem};

const ORDER_COLUMNS: &str = r#"
    id, order_number, vendor_id, subtotal_cents, tax_cents, total_cents,
    status, order_date, created_at
"#;

const ORDER_ITEM_COLUMNS: &str = r#"
    id, purchase_order_id, product_id, quantity, unit_price_cents,
    tax_rate_bps, subtotal_cents
"#;

const BILL_COLUMNS: &str = r#"
    id, bill_number, purchase_order_id, vendor_id, bill_date, due_date,
    subtotal_cents, tax_cents, total_cents, paid_cents, status,
    created_at, updated_at
"#;

const BILL_ITEM_COLUMNS: &str = r#"
    id, bill_id, product_id, quantity, unit_price_cents, tax_rate_bps,
    subtotal_cents
"#;

/// Repository for purchase order and vendor bill operations.
#[derive(Debug, Clone)]
pub struct PurchaseRepository {
    pool: SqlitePool,
}

impl PurchaseRepository {
    /// Creates a new PurchaseRepository.
    pub fn new(pool: SqlitePool) -> Self {
        PurchaseRepository { pool }
    }

    /// Gets a purchase order by its ID.
    pub async fn get_order_by_id(&self, id: &str) -> DbResult<Option<PurchaseOrder>> {
        let order = sqlx::query_as::<_, PurchaseOrder>(&format!(
            "SELECT {ORDER_COLUMNS} FROM purchase_orders WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(order)
    }

    /// Gets all line items of a purchase order.
    pub async fn get_order_items(&self, order_id: &str) -> DbResult<Vec<PurchaseOrderItem>> {
        let items = sqlx::query_as::<_, PurchaseOrderItem>(&format!(
            r#"
            SELECT {ORDER_ITEM_COLUMNS} FROM purchase_order_items
            WHERE purchase_order_id = ?1
            ORDER BY id
            "#
        ))
        .bind(order_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    /// Gets a vendor bill by its ID.
    pub async fn get_bill_by_id(&self, id: &str) -> DbResult<Option<VendorBill>> {
        let bill = sqlx::query_as::<_, VendorBill>(&format!(
            "SELECT {BILL_COLUMNS} FROM vendor_bills WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(bill)
    }

    /// Gets the bill derived from a purchase order, if any.
    pub async fn get_bill_for_order(&self, purchase_order_id: &str) -> DbResult<Option<VendorBill>> {
        let bill = sqlx::query_as::<_, VendorBill>(&format!(
            "SELECT {BILL_COLUMNS} FROM vendor_bills WHERE purchase_order_id = ?1"
        ))
        .bind(purchase_order_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(bill)
    }

    /// Gets all line items of a vendor bill.
    pub async fn get_bill_items(&self, bill_id: &str) -> DbResult<Vec<VendorBillItem>> {
        let items = sqlx::query_as::<_, VendorBillItem>(&format!(
            "SELECT {BILL_ITEM_COLUMNS} FROM vendor_bill_items WHERE bill_id = ?1 ORDER BY id"
        ))
        .bind(bill_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }
}

// =============================================================================
// Transaction-Scoped Operations
// =============================================================================

/// Inserts the purchase order header inside the caller's transaction.
pub(crate) async fn insert_order_tx(
    conn: &mut SqliteConnection,
    order: &PurchaseOrder,
) -> DbResult<()> {
    sqlx::query(
        r#"
        INSERT INTO purchase_orders (
            id, order_number, vendor_id, subtotal_cents, tax_cents,
            total_cents, status, order_date, created_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
        "#,
    )
    .bind(&order.id)
    .bind(&order.order_number)
    .bind(&order.vendor_id)
    .bind(order.subtotal_cents)
    .bind(order.tax_cents)
    .bind(order.total_cents)
    .bind(order.status)
    .bind(order.order_date)
    .bind(order.created_at)
    .execute(conn)
    .await?;

    Ok(())
}

/// Inserts one purchase order line item inside the caller's transaction.
pub(crate) async fn insert_order_item_tx(
    conn: &mut SqliteConnection,
    item: &PurchaseOrderItem,
) -> DbResult<()> {
    sqlx::query(
        r#"
        INSERT INTO purchase_order_items (
            id, purchase_order_id, product_id, quantity, unit_price_cents,
            tax_rate_bps, subtotal_cents
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
        "#,
    )
    .bind(&item.id)
    .bind(&item.purchase_order_id)
    .bind(&item.product_id)
    .bind(item.quantity)
    .bind(item.unit_price_cents)
    .bind(item.tax_rate_bps)
    .bind(item.subtotal_cents)
    .execute(conn)
    .await?;

    Ok(())
}

/// Inserts the vendor bill header inside the caller's transaction.
pub(crate) async fn insert_bill_tx(conn: &mut SqliteConnection, bill: &VendorBill) -> DbResult<()> {
    sqlx::query(
        r#"
        INSERT INTO vendor_bills (
            id, bill_number, purchase_order_id, vendor_id, bill_date, due_date,
            subtotal_cents, tax_cents, total_cents, paid_cents, status,
            created_at, updated_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)
        "#,
    )
    .bind(&bill.id)
    .bind(&bill.bill_number)
    .bind(&bill.purchase_order_id)
    .bind(&bill.vendor_id)
    .bind(bill.bill_date)
    .bind(bill.due_date)
    .bind(bill.subtotal_cents)
    .bind(bill.tax_cents)
    .bind(bill.total_cents)
    .bind(bill.paid_cents)
    .bind(bill.status)
    .bind(bill.created_at)
    .bind(bill.updated_at)
    .execute(conn)
    .await?;

    Ok(())
}

/// Inserts one vendor bill line item inside the caller's transaction.
pub(crate) async fn insert_bill_item_tx(
    conn: &mut SqliteConnection,
    item: &VendorBillItem,
) -> DbResult<()> {
    sqlx::query(
        r#"
        INSERT INTO vendor_bill_items (
            id, bill_id, product_id, quantity, unit_price_cents,
            tax_rate_bps, subtotal_cents
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
        "#,
    )
    .bind(&item.id)
    .bind(&item.bill_id)
    .bind(&item.product_id)
    .bind(item.quantity)
    .bind(item.unit_price_cents)
    .bind(item.tax_rate_bps)
    .bind(item.subtotal_cents)
    .execute(conn)
    .await?;

    Ok(())
}

/// Accumulates a payment onto the bill, mirroring the invoice-side guarded
/// accumulate. Returns `false` when the payment would overpay.
pub(crate) async fn apply_bill_payment_tx(
    conn: &mut SqliteConnection,
    bill_id: &str,
    amount_cents: i64,
) -> DbResult<bool> {
    let now = Utc::now();

    let result = sqlx::query(
        r#"
        UPDATE vendor_bills
        SET paid_cents = paid_cents + ?2,
            status = CASE WHEN paid_cents + ?2 >= total_cents THEN 'paid' ELSE status END,
            updated_at = ?3
        WHERE id = ?1 AND paid_cents + ?2 <= total_cents
        "#,
    )
    .bind(bill_id)
    .bind(amount_cents)
    .bind(now)
    .execute(conn)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Generates a new purchase order / bill ID.
pub fn generate_purchase_id() -> String {
    Uuid::new_v4().to_string()
}
