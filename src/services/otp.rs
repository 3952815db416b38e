// SPDX-License-Identifier: MIT
// Copyright 2026 OpSuite Contributors

//! One-time-code challenge tracking.
//!
//! At most one live challenge exists per contact key; issuing a new code
//! supersedes the previous one. Challenges are single-use (consumed on the
//! first successful verification) and expired entries are purged lazily on
//! lookup. The map is instance-local by design: two orchestrators (or two
//! client instances) never share pending logins.

use crate::error::AuthError;
use crate::models::UserProfile;
use dashmap::DashMap;
use subtle::ConstantTimeEq;

/// A pending one-time-code login.
///
/// `user` is a snapshot taken when the code was issued; it is deliberately
/// not re-checked against the directory at verify time.
#[derive(Debug, Clone)]
pub struct OtpChallenge {
    pub code: String,
    pub user: UserProfile,
    /// Absolute expiry, epoch milliseconds. Independent of the session TTL.
    pub expires_at: i64,
}

/// Per-contact challenge map.
#[derive(Debug, Default)]
pub struct OtpChallenges {
    map: DashMap<String, OtpChallenge>,
}

impl OtpChallenges {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a challenge for the contact, superseding any prior one.
    pub fn issue(&self, contact: &str, user: UserProfile, code: String, expires_at: i64) {
        self.map.insert(
            contact_key(contact),
            OtpChallenge {
                code,
                user,
                expires_at,
            },
        );
    }

    /// Verify and consume the live challenge for the contact.
    ///
    /// Failure order: absent challenge (`no_pending_login`), expired
    /// challenge (`otp_expired`, which also discards it), code mismatch
    /// (`invalid_otp`, challenge stays live until it expires). A match
    /// consumes the challenge; a second attempt with the same code sees
    /// `no_pending_login`.
    pub fn verify(&self, contact: &str, code: &str, now_ms: i64) -> Result<UserProfile, AuthError> {
        let key = contact_key(contact);

        let expired = match self.map.get(&key) {
            None => return Err(AuthError::NoPendingLogin),
            Some(entry) => now_ms >= entry.expires_at,
        };
        if expired {
            self.map.remove(&key);
            self.purge_expired(now_ms);
            return Err(AuthError::OtpExpired);
        }

        let matches = self
            .map
            .get(&key)
            .map(|entry| bool::from(entry.code.as_bytes().ct_eq(code.as_bytes())))
            .unwrap_or(false);
        self.purge_expired(now_ms);
        if !matches {
            return Err(AuthError::InvalidOtp);
        }

        match self.map.remove(&key) {
            Some((_, challenge)) => Ok(challenge.user),
            None => Err(AuthError::NoPendingLogin),
        }
    }

    /// Drop every expired challenge. Called lazily from lookups.
    fn purge_expired(&self, now_ms: i64) {
        self.map.retain(|_, challenge| now_ms < challenge.expires_at);
    }

    /// Number of live (unexpired) challenges.
    pub fn live_count(&self, now_ms: i64) -> usize {
        self.purge_expired(now_ms);
        self.map.len()
    }
}

fn contact_key(contact: &str) -> String {
    contact.trim().to_ascii_lowercase()
}
