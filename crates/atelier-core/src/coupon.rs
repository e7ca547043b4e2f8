//! # Coupon Redemption Rules
//!
//! Pure validation of a coupon code against its discount offer.
//!
//! ## Rule Sequence (short-circuits on first failure)
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │  1. status == unused            → else AlreadyUsed                  │
//! │  2. not past expiration date    → else Expired                      │
//! │  3. contact scope matches       → else NotApplicable                │
//! │  4. offer window contains now   → else OfferNotActive               │
//! │  5. offer channel matches       → else ChannelMismatch              │
//! │                                                                     │
//! │  Success → the offer's discount (bps) for the pricing calculator    │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Existence of the code (`CouponNotFound`) is the storage layer's concern;
//! this module only judges a coupon that was found.
//!
//! Validation never mutates anything. Consumption (unused → used) is a
//! separate compare-and-set performed by the order transaction.

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::types::{CouponCode, CouponStatus, DiscountOffer, SalesChannel};

// =============================================================================
// Errors
// =============================================================================

/// Why a coupon cannot be redeemed.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CouponError {
    /// The code has already been consumed by an order.
    #[error("Coupon code {code} has already been used")]
    AlreadyUsed { code: String },

    /// The code's own expiration date has passed.
    #[error("Coupon code {code} has expired")]
    Expired { code: String },

    /// The code is restricted to a different customer.
    #[error("Coupon code {code} is not valid for this customer")]
    NotApplicable { code: String },

    /// The parent offer's validity window does not contain now.
    #[error("Coupon code {code} is not active")]
    OfferNotActive { code: String },

    /// The parent offer is scoped to a different sales channel.
    #[error("Coupon code {code} is not available on this channel")]
    ChannelMismatch { code: String },
}

// =============================================================================
// Validation
// =============================================================================

/// Validates a coupon for redemption by `contact_id` on `channel` at `now`.
///
/// Returns the discount in basis points on success. Read-only and
/// idempotent: calling this any number of times changes nothing.
///
/// ## Example
/// ```rust,ignore
/// let discount_bps = coupon::validate_redemption(
///     &coupon, &offer, "contact-uuid", SalesChannel::Website, Utc::now(),
/// )?;
/// ```
pub fn validate_redemption(
    coupon: &CouponCode,
    offer: &DiscountOffer,
    contact_id: &str,
    channel: SalesChannel,
    now: DateTime<Utc>,
) -> Result<u32, CouponError> {
    if coupon.status == CouponStatus::Used {
        return Err(CouponError::AlreadyUsed {
            code: coupon.code.clone(),
        });
    }

    if let Some(expiration) = coupon.expiration_date {
        if expiration < now {
            return Err(CouponError::Expired {
                code: coupon.code.clone(),
            });
        }
    }

    if let Some(ref scoped_contact) = coupon.contact_id {
        if scoped_contact != contact_id {
            return Err(CouponError::NotApplicable {
                code: coupon.code.clone(),
            });
        }
    }

    // Window is inclusive on both ends.
    if offer.start_date > now || offer.end_date < now {
        return Err(CouponError::OfferNotActive {
            code: coupon.code.clone(),
        });
    }

    if offer.channel != channel {
        return Err(CouponError::ChannelMismatch {
            code: coupon.code.clone(),
        });
    }

    Ok(offer.discount_bps)
}

// =============================================================================
// Unit Tests
// =============================================================================
