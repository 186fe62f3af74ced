//! Security utilities for WhatsApp webhook verification
//!
//! This module provides signature verification for incoming WhatsApp webhook
//! requests using the X-Hub-Signature-256 header. Meta signs every webhook
//! payload with HMAC-SHA256 of the raw request body using the app's secret
//! key; the header carries `sha256=<hex_signature>`.
//!
//! The signature MUST be computed on the raw request body bytes, not parsed
//! JSON, and the comparison must be constant-time.

use hmac::{Hmac, Mac};
use log::warn;
use sha2::Sha256;
use subtle::ConstantTimeEq;

type HmacSha256 = Hmac<Sha256>;

/// Verifies the X-Hub-Signature-256 header against the request payload
///
/// # Arguments
///
/// * `signature_header` - The value of the X-Hub-Signature-256 header
///   (e.g., "sha256=abc123...")
/// * `payload` - The raw request body bytes
/// * `app_secret` - The WhatsApp/Facebook app secret
///
/// # Returns
///
/// * `true` if the signature is valid
/// * `false` if the signature is invalid or the header format is incorrect
pub fn verify_signature(signature_header: &str, payload: &[u8], app_secret: &str) -> bool {
    // Extract the signature from the header (format: "sha256=<signature>")
    let signature_hex = match signature_header.strip_prefix("sha256=") {
        Some(sig) => sig,
        None => {
            warn!("Invalid signature header format: expected 'sha256=' prefix");
            return false;
        }
    };

    let expected_signature = match hex::decode(signature_hex) {
        Ok(sig) => sig,
        Err(e) => {
            warn!("Failed to decode signature hex: {e}");
            return false;
        }
    };

    let mut mac = match HmacSha256::new_from_slice(app_secret.as_bytes()) {
        Ok(m) => m,
        Err(e) => {
            warn!("Failed to create HMAC instance: {e}");
            return false;
        }
    };

    mac.update(payload);
    let computed_signature = mac.finalize().into_bytes();

    // Constant-time comparison to prevent timing attacks
    let is_valid: bool = computed_signature.ct_eq(&expected_signature[..]).into();

    if !is_valid {
        warn!("Webhook signature verification failed: signatures do not match");
    }

    is_valid
}
