//! # Sale Order Repository
//!
//! Database operations for sale orders and their line items.
//!
//! Orders are never inserted standalone: the header, its items, the stock
//! decrements, and the optional coupon consumption all belong to one
//! transaction owned by the order service. The `*_tx` functions here run on
//! the caller's connection for exactly that reason.

use sqlx::{SqliteConnection, SqlitePool};
use uuid::Uuid;

use crate::error::DbResult;
use atelier_core::{SaleOrder, SaleOrderItem};

const ORDER_COLUMNS: &str = r#"
    id, order_number, customer_id, payment_term_id, coupon_code_id,
    subtotal_cents, tax_cents, discount_cents, total_cents, status,
    created_at, updated_at
"#;

const ITEM_COLUMNS: &str = r#"
    id, sale_order_id, product_id, quantity, unit_price_cents, tax_rate_bps,
    subtotal_cents, created_at
"#;

/// Repository for sale order database operations.
#[derive(Debug, Clone)]
pub struct OrderRepository {
    pool: SqlitePool,
}

impl OrderRepository {
    /// Creates a new OrderRepository.
    pub fn new(pool: SqlitePool) -> Self {
        OrderRepository { pool }
    }

    /// Gets an order by its ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<SaleOrder>> {
        let order = sqlx::query_as::<_, SaleOrder>(&format!(
            "SELECT {ORDER_COLUMNS} FROM sale_orders WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(order)
    }

    /// Gets an order by its business number (`SO-000042`).
    pub async fn get_by_number(&self, order_number: &str) -> DbResult<Option<SaleOrder>> {
        let order = sqlx::query_as::<_, SaleOrder>(&format!(
            "SELECT {ORDER_COLUMNS} FROM sale_orders WHERE order_number = ?1"
        ))
        .bind(order_number)
        .fetch_optional(&self.pool)
        .await?;

        Ok(order)
    }

    /// Gets all line items of an order, in insertion order.
    pub async fn get_items(&self, order_id: &str) -> DbResult<Vec<SaleOrderItem>> {
        let items = sqlx::query_as::<_, SaleOrderItem>(&format!(
            r#"
            SELECT {ITEM_COLUMNS} FROM sale_order_items
            WHERE sale_order_id = ?1
            ORDER BY created_at, id
            "#
        ))
        .bind(order_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    /// Lists a customer's orders, newest first.
    pub async fn list_for_customer(&self, customer_id: &str) -> DbResult<Vec<SaleOrder>> {
        let orders = sqlx::query_as::<_, SaleOrder>(&format!(
            r#"
            SELECT {ORDER_COLUMNS} FROM sale_orders
            WHERE customer_id = ?1
            ORDER BY created_at DESC
            "#
        ))
        .bind(customer_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(orders)
    }

    /// Counts orders (for diagnostics and tests).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sale_orders")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

// =============================================================================
// Transaction-Scoped Operations
// =============================================================================

/// Inserts the order header inside the caller's transaction.
pub(crate) async fn insert_order_tx(
    conn: &mut SqliteConnection,
    order: &SaleOrder,
) -> DbResult<()> {
    sqlx::query(
        r#"
        INSERT INTO sale_orders (
            id, order_number, customer_id, payment_term_id, coupon_code_id,
            subtotal_cents, tax_cents, discount_cents, total_cents, status,
            created_at, updated_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)
        "#,
    )
    .bind(&order.id)
    .bind(&order.order_number)
    .bind(&order.customer_id)
    .bind(&order.payment_term_id)
    .bind(&order.coupon_code_id)
    .bind(order.subtotal_cents)
    .bind(order.tax_cents)
    .bind(order.discount_cents)
    .bind(order.total_cents)
    .bind(order.status)
    .bind(order.created_at)
    .bind(order.updated_at)
    .execute(conn)
    .await?;

    Ok(())
}

/// Inserts one line item inside the caller's transaction.
pub(crate) async fn insert_item_tx(
    conn: &mut SqliteConnection,
    item: &SaleOrderItem,
) -> DbResult<()> {
    sqlx::query(
        r#"
        INSERT INTO sale_order_items (
            id, sale_order_id, product_id, quantity, unit_price_cents,
            tax_rate_bps, subtotal_cents, created_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
        "#,
    )
    .bind(&item.id)
    .bind(&item.sale_order_id)
    .bind(&item.product_id)
    .bind(item.quantity)
    .bind(item.unit_price_cents)
    .bind(item.tax_rate_bps)
    .bind(item.subtotal_cents)
    .bind(item.created_at)
    .execute(conn)
    .await?;

    Ok(())
}

/// Generates a new order ID.
pub fn generate_order_id() -> String {
    Uuid::new_v4().to_string()
}

/// Generates a new order item ID.
pub fn generate_order_item_id() -> String {
    Uuid::new_v4().to_string()
}
