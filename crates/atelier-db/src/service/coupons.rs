//! # Coupon Service
//!
//! The customer-facing "apply coupon" check and the back-office offer
//! creation path.
//!
//! Applying a coupon at checkout only *quotes* the discount: validation is
//! read-only and idempotent, and a shopper can re-apply the same code any
//! number of times while it stays unused. The coupon is consumed later, by
//! the order transaction, never here.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::info;

use crate::repository::coupon::{generate_coupon_id, CouponRepository};
use crate::service::{ServiceError, ServiceResult};
use atelier_core::validation::{validate_coupon_code, validate_discount_bps, validate_name};
use atelier_core::{coupon, CouponCode, CouponStatus, DiscountOffer, SalesChannel, ValidationError};

// =============================================================================
// Requests & Results
// =============================================================================

/// A validated coupon and the discount it quotes. Nothing has been consumed.
#[derive(Debug, Clone)]
pub struct CouponQuote {
    pub coupon: CouponCode,
    /// Discount in basis points, for the pricing calculator.
    pub discount_bps: u32,
}

/// A discount offer to create, optionally with one attached coupon code.
#[derive(Debug, Clone)]
pub struct CreateOfferRequest {
    pub name: String,
    pub discount_bps: u32,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub channel: SalesChannel,
    /// Attached coupon code; stored upper-cased.
    pub coupon_code: Option<String>,
    /// Restricts the attached code to one customer.
    pub coupon_contact_id: Option<String>,
    /// Expiry of the attached code; defaults to the offer end date.
    pub coupon_expiration: Option<DateTime<Utc>>,
}

// =============================================================================
// Service
// =============================================================================

/// The coupon validation and offer management service.
#[derive(Debug, Clone)]
pub struct CouponService {
    pool: SqlitePool,
}

impl CouponService {
    /// Creates a new CouponService.
    pub fn new(pool: SqlitePool) -> Self {
        CouponService { pool }
    }

    /// Validates a coupon code for redemption by `contact_id` on `channel`.
    ///
    /// Read-only: returns the quote on success and mutates nothing either
    /// way. Lookup is case-insensitive (codes are stored upper-cased).
    pub async fn validate_code(
        &self,
        code: &str,
        contact_id: &str,
        channel: SalesChannel,
    ) -> ServiceResult<CouponQuote> {
        validate_coupon_code(code).map_err(ServiceError::Validation)?;
        let normalized = code.trim().to_uppercase();

        let coupons = CouponRepository::new(self.pool.clone());
        let coupon_code = coupons
            .get_by_code(&normalized)
            .await?
            .ok_or_else(|| ServiceError::CouponNotFound {
                id: normalized.clone(),
            })?;
        let (coupon_code, offer) = coupons
            .get_with_offer(&coupon_code.id)
            .await?
            .ok_or_else(|| ServiceError::CouponNotFound {
                id: normalized.clone(),
            })?;

        let discount_bps =
            coupon::validate_redemption(&coupon_code, &offer, contact_id, channel, Utc::now())?;

        Ok(CouponQuote {
            coupon: coupon_code,
            discount_bps,
        })
    }

    /// Creates a discount offer, optionally with one attached coupon code.
    ///
    /// The code is upper-cased before storage; its expiration defaults to
    /// the offer's end date when not given.
    pub async fn create_offer(
        &self,
        request: CreateOfferRequest,
    ) -> ServiceResult<(DiscountOffer, Option<CouponCode>)> {
        validate_name(&request.name).map_err(ServiceError::Validation)?;
        validate_discount_bps(request.discount_bps).map_err(ServiceError::Validation)?;
        if request.end_date <= request.start_date {
            return Err(ValidationError::InvalidFormat {
                field: "end_date".to_string(),
                reason: "must be after start_date".to_string(),
            }
            .into());
        }

        let now = Utc::now();
        let coupons = CouponRepository::new(self.pool.clone());

        let offer = DiscountOffer {
            id: generate_coupon_id(),
            name: request.name.trim().to_string(),
            discount_bps: request.discount_bps,
            start_date: request.start_date,
            end_date: request.end_date,
            channel: request.channel,
            created_at: now,
        };
        coupons.insert_offer(&offer).await?;

        let coupon_code = match request.coupon_code {
            Some(code) => {
                validate_coupon_code(&code).map_err(ServiceError::Validation)?;
                let coupon_code = CouponCode {
                    id: generate_coupon_id(),
                    discount_offer_id: offer.id.clone(),
                    code: code.trim().to_uppercase(),
                    expiration_date: Some(request.coupon_expiration.unwrap_or(offer.end_date)),
                    status: CouponStatus::Unused,
                    contact_id: request.coupon_contact_id,
                    created_at: now,
                    updated_at: now,
                };
                coupons.insert_coupon(&coupon_code).await?;
                Some(coupon_code)
            }
            None => None,
        };

        info!(
            offer = %offer.name,
            discount_bps = offer.discount_bps,
            with_coupon = coupon_code.is_some(),
            "Discount offer created"
        );

        Ok((offer, coupon_code))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use chrono::Duration;

    fn offer_request(channel: SalesChannel) -> CreateOfferRequest {
        let now = Utc::now();
        CreateOfferRequest {
            name: "Summer Sale".into(),
            discount_bps: 1500,
            start_date: now - Duration::days(1),
            end_date: now + Duration::days(30),
            channel,
            coupon_code: Some("summer15".into()),
            coupon_contact_id: None,
            coupon_expiration: None,
        }
    }

    #[tokio::test]
    async fn test_create_offer_uppercases_code_and_defaults_expiry() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        let (offer, coupon_code) = db
            .coupon_service()
            .create_offer(offer_request(SalesChannel::Website))
            .await
            .unwrap();

        let coupon_code = coupon_code.expect("code attached");
        assert_eq!(coupon_code.code, "SUMMER15");
        assert_eq!(coupon_code.expiration_date, Some(offer.end_date));
        assert_eq!(coupon_code.status, CouponStatus::Unused);
    }

    #[tokio::test]
    async fn test_validate_code_is_read_only_and_case_insensitive() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        db.coupon_service()
            .create_offer(offer_request(SalesChannel::Website))
            .await
            .unwrap();

        for _ in 0..3 {
            let quote = db
                .coupon_service()
                .validate_code("summer15", "contact-1", SalesChannel::Website)
                .await
                .unwrap();
            assert_eq!(quote.discount_bps, 1500);
            assert_eq!(quote.coupon.status, CouponStatus::Unused);
        }

        let stored = db
            .coupons()
            .get_by_code("SUMMER15")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.status, CouponStatus::Unused);
    }

    #[tokio::test]
    async fn test_unknown_code_not_found() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        let err = db
            .coupon_service()
            .validate_code("NOPE", "contact-1", SalesChannel::Website)
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::CouponNotFound { .. }));
        assert_eq!(err.kind(), crate::service::ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_wrong_channel_rejected() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        db.coupon_service()
            .create_offer(offer_request(SalesChannel::Sales))
            .await
            .unwrap();

        let err = db
            .coupon_service()
            .validate_code("SUMMER15", "contact-1", SalesChannel::Website)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), crate::service::ErrorKind::Unauthorized);
    }

    #[tokio::test]
    async fn test_backwards_window_rejected() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        let mut request = offer_request(SalesChannel::Website);
        request.end_date = request.start_date - Duration::days(1);
        let err = db.coupon_service().create_offer(request).await.unwrap_err();
        assert_eq!(err.kind(), crate::service::ErrorKind::Validation);
    }
}
