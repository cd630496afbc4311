// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Structural inspection of JWT access tokens.
//!
//! The payload is decoded without verifying the signature; the server remains
//! the authority on validity. This only tells us whether a token is worth
//! sending or should be refreshed first.

use crate::time_utils::now_millis;
use base64::{
    alphabet,
    engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig},
    Engine as _,
};
use serde::Deserialize;

/// base64url that accepts payloads with or without trailing padding.
const PAYLOAD_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// The only claim the client reads.
#[derive(Debug, Deserialize)]
struct ExpiryClaim {
    /// Expiration time (Unix timestamp, seconds)
    exp: f64,
}

/// Decode the `exp` claim of a three-segment token.
///
/// Returns `None` if the token is malformed or carries no numeric `exp`.
pub fn decode_expiry(token: &str) -> Option<f64> {
    let mut segments = token.split('.');
    let (Some(_header), Some(payload), Some(_signature), None) = (
        segments.next(),
        segments.next(),
        segments.next(),
        segments.next(),
    ) else {
        return None;
    };

    let bytes = PAYLOAD_ENGINE.decode(payload).ok()?;
    let claim: ExpiryClaim = serde_json::from_slice(&bytes).ok()?;
    claim.exp.is_finite().then_some(claim.exp)
}

/// True if the token is absent, undecodable, or its `exp` is at or before `now_ms`.
pub fn is_expired_at(token: Option<&str>, now_ms: i64) -> bool {
    match token.and_then(decode_expiry) {
        Some(exp) => exp * 1000.0 <= now_ms as f64,
        None => true,
    }
}

/// True if the token is absent, undecodable, or already expired.
pub fn is_expired(token: Option<&str>) -> bool {
    is_expired_at(token, now_millis())
}
