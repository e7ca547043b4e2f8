//! # Product Repository
//!
//! Database operations for catalog products, including the guarded stock
//! mutations the order pipeline depends on.
//!
//! ## Stock Discipline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │  current_stock carries a CHECK (current_stock >= 0), and every      │
//! │  decrement is guarded:                                              │
//! │                                                                     │
//! │     UPDATE products SET current_stock = current_stock - :qty        │
//! │     WHERE id = :id AND current_stock >= :qty                        │
//! │                                                                     │
//! │  Zero rows affected means the caller lost the race (or the product  │
//! │  is gone) and must roll back its whole transaction. Two orders for  │
//! │  the last unit can therefore never both commit.                     │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use atelier_core::Product;

const PRODUCT_COLUMNS: &str = r#"
    id, name, category, product_type, current_stock,
    sales_price_cents, sales_tax_bps, purchase_price_cents, purchase_tax_bps,
    is_published, created_at, updated_at
"#;

/// Repository for product database operations.
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Gets a product by its ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    /// Lists published products, newest first.
    pub async fn list_published(&self, limit: u32, offset: u32) -> DbResult<Vec<Product>> {
        let products = sqlx::query_as::<_, Product>(&format!(
            r#"
            SELECT {PRODUCT_COLUMNS} FROM products
            WHERE is_published = 1
            ORDER BY created_at DESC
            LIMIT ?1 OFFSET ?2
            "#
        ))
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(products)
    }

    /// Inserts a new product.
    pub async fn insert(&self, product: &Product) -> DbResult<()> {
        debug!(id = %product.id, name = %product.name, "Inserting product");

        sqlx::query(
            r#"
            INSERT INTO products (
                id, name, category, product_type, current_stock,
                sales_price_cents, sales_tax_bps,
                purchase_price_cents, purchase_tax_bps,
                is_published, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)
            "#,
        )
        .bind(&product.id)
        .bind(&product.name)
        .bind(product.category)
        .bind(&product.product_type)
        .bind(product.current_stock)
        .bind(product.sales_price_cents)
        .bind(product.sales_tax_bps)
        .bind(product.purchase_price_cents)
        .bind(product.purchase_tax_bps)
        .bind(product.is_published)
        .bind(product.created_at)
        .bind(product.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Updates catalog fields of an existing product. Stock is excluded:
    /// stock moves only through the guarded mutations below.
    pub async fn update(&self, product: &Product) -> DbResult<()> {
        debug!(id = %product.id, "Updating product");

        let now = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE products SET
                name = ?2,
                category = ?3,
                product_type = ?4,
                sales_price_cents = ?5,
                sales_tax_bps = ?6,
                purchase_price_cents = ?7,
                purchase_tax_bps = ?8,
                is_published = ?9,
                updated_at = ?10
            WHERE id = ?1
            "#,
        )
        .bind(&product.id)
        .bind(&product.name)
        .bind(product.category)
        .bind(&product.product_type)
        .bind(product.sales_price_cents)
        .bind(product.sales_tax_bps)
        .bind(product.purchase_price_cents)
        .bind(product.purchase_tax_bps)
        .bind(product.is_published)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", &product.id));
        }

        Ok(())
    }

    /// Adds received units to stock (goods receipt, returns to stock).
    pub async fn replenish_stock(&self, id: &str, quantity: i64) -> DbResult<()> {
        debug!(id = %id, quantity = %quantity, "Replenishing stock");

        let now = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE products
            SET current_stock = current_stock + ?2, updated_at = ?3
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(quantity)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        Ok(())
    }

    /// Counts products (for diagnostics).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

// =============================================================================
// Transaction-Scoped Operations
// =============================================================================

/// Decrements stock if and only if enough is on hand. Returns whether a row
/// was updated; `false` means insufficient stock or unknown product, and
/// the caller must roll back.
pub(crate) async fn decrement_stock_tx(
    conn: &mut SqliteConnection,
    id: &str,
    quantity: i64,
) -> DbResult<bool> {
    let now = Utc::now();

    let result = sqlx::query(
        r#"
        UPDATE products
        SET current_stock = current_stock - ?2, updated_at = ?3
        WHERE id = ?1 AND current_stock >= ?2
        "#,
    )
    .bind(id)
    .bind(quantity)
    .bind(now)
    .execute(conn)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Adds received units to stock inside the caller's transaction, so a goods
/// receipt covering several products lands atomically. Returns whether a row
/// was updated; `false` means the product does not exist.
pub(crate) async fn replenish_stock_tx(
    conn: &mut SqliteConnection,
    id: &str,
    quantity: i64,
) -> DbResult<bool> {
    let now = Utc::now();

    let result = sqlx::query(
        r#"
        UPDATE products
        SET current_stock = current_stock + ?2, updated_at = ?3
        WHERE id = ?1
        "#,
    )
    .bind(id)
    .bind(quantity)
    .bind(now)
    .execute(conn)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Reads a product's current stock inside the caller's transaction.
/// `None` when the product does not exist.
pub(crate) async fn stock_of_tx(
    conn: &mut SqliteConnection,
    id: &str,
) -> DbResult<Option<i64>> {
    let stock: Option<i64> =
        sqlx::query_scalar("SELECT current_stock FROM products WHERE id = ?1")
            .bind(id)
            .fetch_optional(conn)
            .await?;

    Ok(stock)
}

/// Generates a new product ID.
pub fn generate_product_id() -> String {
    Uuid::new_v4().to_string()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use atelier_core::ProductCategory;

    fn tee(stock: i64) -> Product {
        let now = Utc::now();
        Product {
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
        }
    }

    #[tokio::test]
    async fn test_insert_and_get() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.products();

        let product = tee(100);
        repo.insert(&product).await.unwrap();

        let loaded = repo.get_by_id(&product.id).await.unwrap().unwrap();
        assert_eq!(loaded.name, "Classic Tee");
        assert_eq!(loaded.current_stock, 100);
        assert_eq!(loaded.sales_price().cents(), 49900);
        assert_eq!(loaded.sales_tax_rate().bps(), 1800);
    }

    #[tokio::test]
    async fn test_guarded_decrement() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.products();

        let product = tee(3);
        repo.insert(&product).await.unwrap();

        let mut conn = db.pool().acquire().await.unwrap();

        assert!(decrement_stock_tx(&mut conn, &product.id, 2).await.unwrap());
        assert_eq!(stock_of_tx(&mut conn, &product.id).await.unwrap(), Some(1));

        // more than remains: refused, stock untouched
        assert!(!decrement_stock_tx(&mut conn, &product.id, 2).await.unwrap());
        assert_eq!(stock_of_tx(&mut conn, &product.id).await.unwrap(), Some(1));

        // unknown product: refused
        assert!(!decrement_stock_tx(&mut conn, "missing", 1).await.unwrap());
        assert_eq!(stock_of_tx(&mut conn, "missing").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_replenish() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.products();

        let product = tee(0);
        repo.insert(&product).await.unwrap();

        repo.replenish_stock(&product.id, 40).await.unwrap();
        let loaded = repo.get_by_id(&product.id).await.unwrap().unwrap();
        assert_eq!(loaded.current_stock, 40);

        let err = repo.replenish_stock("missing", 1).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }
}
