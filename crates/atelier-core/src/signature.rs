//! # Gateway Signature Verification
//!
//! Verifies payment confirmations signed by the card gateway.
//!
//! The gateway signs `"{order_ref}|{payment_ref}"` with a shared secret
//! using HMAC-SHA256 and sends the signature hex-encoded. We recompute the
//! MAC and compare via `Mac::verify_slice`, which is constant-time, so the
//! check does not leak how many leading bytes of a forged signature were
//! correct.

use hmac::{Hmac, Mac};
use sha2::Sha256;
use thiserror::Error;

type HmacSha256 = Hmac<Sha256>;

/// Signature verification failures.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SignatureError {
    /// The supplied signature is not valid hex.
    #[error("Signature is not valid hex")]
    MalformedSignature,

    /// The signature does not match the payload.
    #[error("Invalid signature")]
    InvalidSignature,
}

/// A signed payment confirmation as delivered by the gateway callback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayConfirmation {
    /// The gateway's order reference.
    pub order_ref: String,
    /// The gateway's payment reference.
    pub payment_ref: String,
    /// Hex-encoded HMAC-SHA256 over `"{order_ref}|{payment_ref}"`.
    pub signature: String,
}

/// Verifies a gateway confirmation against the shared secret.
///
/// ## Example
/// ```rust
/// use atelier_core::signature::{verify_confirmation, GatewayConfirmation};
///
/// let confirmation = GatewayConfirmation {
///     order_ref: "order_N5lf2ghQ".into(),
///     payment_ref: "pay_29QQoUBi".into(),
///     signature: "bad-signature".into(),
/// };
/// assert!(verify_confirmation(b"secret", &confirmation).is_err());
/// ```
pub fn verify_confirmation(
    secret: &[u8],
    confirmation: &GatewayConfirmation,
) -> Result<(), SignatureError> {
    let payload = format!("{}|{}", confirmation.order_ref, confirmation.payment_ref);

    // Key length is unrestricted for HMAC; new_from_slice cannot fail here,
    // but propagate rather than unwrap.
    let mut mac = HmacSha256::new_from_slice(secret)
        .map_err(|_| SignatureError::InvalidSignature)?;
    mac.update(payload.as_bytes());

    let sig_bytes =
        hex::decode(&confirmation.signature).map_err(|_| SignatureError::MalformedSignature)?;

    mac.verify_slice(&sig_bytes)
        .map_err(|_| SignatureError::InvalidSignature)
}

/// Computes the hex signature the gateway would produce. Used by tests and
/// by the sandbox gateway emulator in development.
pub fn sign_confirmation(secret: &[u8], order_ref: &str, payment_ref: &str) -> String {
    let payload = format!("{order_ref}|{payment_ref}");
    let mut mac = HmacSha256::new_from_slice(secret).expect("HMAC accepts any key length");
    mac.update(payload.as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &[u8] = b"test_key_secret";

    fn confirmation(signature: String) -> GatewayConfirmation {
        GatewayConfirmation {
            order_ref: "order_N5lf2ghQ".into(),
            payment_ref: "pay_29QQoUBi".into(),
            signature,
        }
    }

    #[test]
    fn test_round_trip_verifies() {
        let sig = sign_confirmation(SECRET, "order_N5lf2ghQ", "pay_29QQoUBi");
        assert_eq!(verify_confirmation(SECRET, &confirmation(sig)), Ok(()));
    }

    #[test]
    fn test_tampered_payload_rejected() {
        let sig = sign_confirmation(SECRET, "order_N5lf2ghQ", "pay_29QQoUBi");
        let mut c = confirmation(sig);
        c.payment_ref = "pay_SOMETHING_ELSE".into();
        assert_eq!(
            verify_confirmation(SECRET, &c),
            Err(SignatureError::InvalidSignature)
        );
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let sig = sign_confirmation(b"other_secret", "order_N5lf2ghQ", "pay_29QQoUBi");
        assert_eq!(
            verify_confirmation(SECRET, &confirmation(sig)),
            Err(SignatureError::InvalidSignature)
        );
    }

    #[test]
    fn test_non_hex_signature_rejected() {
        assert_eq!(
            verify_confirmation(SECRET, &confirmation("zz-not-hex".into())),
            Err(SignatureError::MalformedSignature)
        );
    }

    #[test]
    fn test_truncated_signature_rejected() {
        let sig = sign_confirmation(SECRET, "order_N5lf2ghQ", "pay_29QQoUBi");
        let truncated = sig[..sig.len() - 2].to_string();
        assert_eq!(
            verify_confirmation(SECRET, &confirmation(truncated)),
            Err(SignatureError::InvalidSignature)
        );
    }
}
