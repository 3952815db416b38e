// SPDX-License-Identifier: MIT
// Copyright 2026 OpSuite Contributors

//! Credential minting: one-time codes, session ids, and bearer tokens.
//!
//! The locally minted token is structurally JWT-like (base64url header and
//! payload) but carries NO signature: it is an opaque placeholder for the
//! backend-issued credential and must never be treated as verifiable. This
//! is a known limitation of the scheme, not an oversight.

use crate::models::TokenClaims;
use anyhow::anyhow;
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use ring::rand::{SecureRandom, SystemRandom};

/// Byte length of the random session-id suffix (8 bytes = 16 hex chars).
const SESSION_SUFFIX_BYTES: usize = 8;

/// Generate a fixed-width numeric one-time code. Leading zeros are allowed,
/// and each digit is sampled uniformly.
pub fn generate_otp(length: usize) -> anyhow::Result<String> {
    let rng = SystemRandom::new();
    let mut digits = String::with_capacity(length);
    let mut buf = [0u8; 32];
    while digits.len() < length {
        rng.fill(&mut buf)
            .map_err(|_| anyhow!("system RNG unavailable"))?;
        for byte in buf {
            // Reject 250..=255 so `byte % 10` stays unbiased.
            if byte < 250 {
                digits.push(char::from(b'0' + byte % 10));
                if digits.len() == length {
                    break;
                }
            }
        }
    }
    Ok(digits)
}

/// Generate an opaque session identifier: millisecond timestamp plus a
/// random hex suffix. Unique enough for one client instance; not
/// cryptographic.
pub fn generate_session_id(now_ms: i64) -> anyhow::Result<String> {
    Ok(format!("sess_{:x}_{}", now_ms, random_hex()?))
}

/// Generate an opaque user identifier for locally registered users.
pub fn generate_user_id(now_ms: i64) -> anyhow::Result<String> {
    Ok(format!("usr_{:x}_{}", now_ms, random_hex()?))
}

/// Mint an unsigned, JWT-shaped bearer token carrying subject, email,
/// issued-at, and expiry claims.
///
/// There is no third segment and no signature; [`decode_claims`] can read
/// the payload back, but nothing can (or should) verify it.
pub fn generate_token(
    user_id: &str,
    email: &str,
    now_ms: i64,
    ttl_ms: i64,
) -> anyhow::Result<String> {
    let header = serde_json::json!({ "alg": "none", "typ": "JWT" });
    let claims = TokenClaims {
        sub: user_id.to_string(),
        email: email.to_string(),
        iat: now_ms / 1000,
        exp: (now_ms + ttl_ms) / 1000,
    };

    let header = URL_SAFE_NO_PAD.encode(serde_json::to_vec(&header)?);
    let payload = URL_SAFE_NO_PAD.encode(serde_json::to_vec(&claims)?);
    Ok(format!("{header}.{payload}"))
}

/// Best-effort claim introspection of a token minted by [`generate_token`].
/// Returns `None` for any other shape, including real (signed) JWTs whose
/// payload doesn't carry our claim set.
pub fn decode_claims(token: &str) -> Option<TokenClaims> {
    let payload = token.split('.').nth(1)?;
    let bytes = URL_SAFE_NO_PAD.decode(payload).ok()?;
    serde_json::from_slice(&bytes).ok()
}

fn random_hex() -> anyhow::Result<String> {
    let rng = SystemRandom::new();
    let mut bytes = [0u8; SESSION_SUFFIX_BYTES];
    rng.fill(&mut bytes)
        .map_err(|_| anyhow!("system RNG unavailable"))?;
    Ok(hex::encode(bytes))
}
