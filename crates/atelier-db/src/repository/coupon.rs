//! # Coupon Repository
//!
//! Database operations for discount offers and their coupon codes.
//!
//! ## Consumption
//! A coupon is consumed with a compare-and-set that only succeeds while the
//! status is still `unused`. Run inside the order transaction, this makes
//! "two orders, one coupon" resolve to exactly one winner:
//!
//! ```text
//!   UPDATE coupon_codes SET status = 'used'
//!   WHERE id = :id AND status = 'unused'
//!   → rows_affected == 0  ⇒  somebody else got there first, roll back
//! ```

use chrono::Utc;
use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use atelier_core::{CouponCode, DiscountOffer};

const COUPON_COLUMNS: &str = r#"
    id, discount_offer_id, code, expiration_date, status, contact_id,
    created_at, updated_at
"#;

const OFFER_COLUMNS: &str =
    "id, name, discount_bps, start_date, end_date, channel, created_at";

/// Repository for coupon and discount offer operations.
#[derive(Debug, Clone)]
pub struct CouponRepository {
    pool: SqlitePool,
}

impl CouponRepository {
    /// Creates a new CouponRepository.
    pub fn new(pool: SqlitePool) -> Self {
        CouponRepository { pool }
    }

    /// Gets a coupon by its ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<CouponCode>> {
        let coupon = sqlx::query_as::<_, CouponCode>(&format!(
            "SELECT {COUPON_COLUMNS} FROM coupon_codes WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(coupon)
    }

    /// Gets a coupon by its code string.
    pub async fn get_by_code(&self, code: &str) -> DbResult<Option<CouponCode>> {
        let coupon = sqlx::query_as::<_, CouponCode>(&format!(
            "SELECT {COUPON_COLUMNS} FROM coupon_codes WHERE code = ?1"
        ))
        .bind(code)
        .fetch_optional(&self.pool)
        .await?;

        Ok(coupon)
    }

    /// Gets a discount offer by its ID.
    pub async fn get_offer(&self, id: &str) -> DbResult<Option<DiscountOffer>> {
        let offer = sqlx::query_as::<_, DiscountOffer>(&format!(
            "SELECT {OFFER_COLUMNS} FROM discount_offers WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(offer)
    }

    /// Gets a coupon together with its parent offer.
    ///
    /// The offer reference is NOT NULL, so a coupon whose offer is missing
    /// indicates a broken database and surfaces as an error rather than
    /// `None`.
    pub async fn get_with_offer(
        &self,
        coupon_id: &str,
    ) -> DbResult<Option<(CouponCode, DiscountOffer)>> {
        let Some(coupon) = self.get_by_id(coupon_id).await? else {
            return Ok(None);
        };

        let offer = self
            .get_offer(&coupon.discount_offer_id)
            .await?
            .ok_or_else(|| DbError::not_found("DiscountOffer", &coupon.discount_offer_id))?;

        Ok(Some((coupon, offer)))
    }

    /// Inserts a discount offer.
    pub async fn insert_offer(&self, offer: &DiscountOffer) -> DbResult<()> {
        debug!(id = %offer.id, name = %offer.name, "Inserting discount offer");

        sqlx::query(
            r#"
            INSERT INTO discount_offers (
                id, name, discount_bps, start_date, end_date, channel, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
        )
        .bind(&offer.id)
        .bind(&offer.name)
        .bind(offer.discount_bps)
        .bind(offer.start_date)
        .bind(offer.end_date)
        .bind(offer.channel)
        .bind(offer.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Inserts a coupon code.
    pub async fn insert_coupon(&self, coupon: &CouponCode) -> DbResult<()> {
        debug!(id = %coupon.id, code = %coupon.code, "Inserting coupon code");

        sqlx::query(
            r#"
            INSERT INTO coupon_codes (
                id, discount_offer_id, code, expiration_date, status, contact_id,
                created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
        )
        .bind(&coupon.id)
        .bind(&coupon.discount_offer_id)
        .bind(&coupon.code)
        .bind(coupon.expiration_date)
        .bind(coupon.status)
        .bind(&coupon.contact_id)
        .bind(coupon.created_at)
        .bind(coupon.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

// =============================================================================
// Transaction-Scoped Operations
// =============================================================================

/// Marks a coupon used, guarded by its current `unused` status. Returns
/// whether the transition happened; `false` means the coupon was already
/// consumed and the caller must roll back.
pub(crate) async fn consume_tx(conn: &mut SqliteConnection, coupon_id: &str) -> DbResult<bool> {
    let now = Utc::now();

    let result = sqlx::query(
        r#"
        UPDATE coupon_codes
        SET status = 'used', updated_at = ?2
        WHERE id = ?1 AND status = 'unused'
        "#,
    )
    .bind(coupon_id)
    .bind(now)
    .execute(conn)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Generates a new coupon or offer ID.
pub fn generate_coupon_id() -> String {
    Uuid::new_v4().to_string()
}

// =============================================================================
// Unit Tests
// =============================================================================
