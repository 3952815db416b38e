// SPDX-License-Identifier: MIT
// Copyright 2026 OpSuite Contributors

//! Typed credential store over the key-value port.
//!
//! The full record is persisted under one composite key, and the
//! denormalized convenience fields (token, session id, expiry, active flag,
//! user) under individual keys for fast partial reads. Both representations
//! are written in the same call; with a single-threaded caller there is no
//! window where they disagree.

use crate::models::CredentialRecord;
use crate::store::{keys, KeyValue};
use std::sync::Arc;

/// Credential store: one session-record slot plus denormalized fields.
#[derive(Clone)]
pub struct CredentialStore {
    kv: Arc<dyn KeyValue>,
}

impl CredentialStore {
    pub fn new(kv: Arc<dyn KeyValue>) -> Self {
        Self { kv }
    }

    /// Persist the record and its denormalized fields.
    ///
    /// Storage failure degrades to "session not persisted": logged, not
    /// surfaced. Callers observe the same thing as no session on the next
    /// read, which is the contract.
    pub fn put(&self, record: &CredentialRecord) {
        let full = match serde_json::to_string(record) {
            Ok(full) => full,
            Err(e) => {
                tracing::warn!(error = %e, "failed to serialize session record");
                return;
            }
        };
        let user = serde_json::to_string(&record.user).unwrap_or_else(|_| "{}".to_string());
        let expires_at = record.expires_at.to_string();

        let writes: [(&str, &str); 6] = [
            (keys::SESSION, full.as_str()),
            (keys::USER, user.as_str()),
            (keys::TOKEN, record.token.as_str()),
            (keys::SESSION_ID, record.session_id.as_deref().unwrap_or("")),
            (keys::EXPIRES_AT, expires_at.as_str()),
            (keys::IS_ACTIVE, "true"),
        ];
        for (key, value) in writes {
            if let Err(e) = self.kv.set(key, value) {
                tracing::warn!(key, error = %e, "session not persisted");
                return;
            }
        }
    }

    /// Read the full record. Missing or corrupt data is absent, never an
    /// error.
    pub fn get(&self) -> Option<CredentialRecord> {
        let raw = self.kv.get(keys::SESSION)?;
        match serde_json::from_str(&raw) {
            Ok(record) => Some(record),
            Err(e) => {
                tracing::warn!(error = %e, "stored session record is corrupt, treating as absent");
                None
            }
        }
    }

    /// Fast partial read of the persisted expiry off the denormalized key.
    pub fn expires_at(&self) -> Option<i64> {
        self.kv.get(keys::EXPIRES_AT)?.parse().ok()
    }

    /// Backend-issued refresh token, when one was stored.
    pub fn refresh_token(&self) -> Option<String> {
        self.kv.get(keys::REFRESH_TOKEN).filter(|t| !t.is_empty())
    }

    pub fn set_refresh_token(&self, token: &str) {
        if let Err(e) = self.kv.set(keys::REFRESH_TOKEN, token) {
            tracing::warn!(error = %e, "refresh token not persisted");
        }
    }

    /// Remove every key this store writes, plus key names used by earlier
    /// client versions, so no stale partial state can leak across schema
    /// changes.
    pub fn clear(&self) {
        for key in [
            keys::SESSION,
            keys::USER,
            keys::TOKEN,
            keys::SESSION_ID,
            keys::EXPIRES_AT,
            keys::IS_ACTIVE,
            keys::REFRESH_TOKEN,
        ] {
            self.kv.remove(key);
        }
        for key in keys::LEGACY {
            self.kv.remove(key);
        }
    }

    /// Access to the underlying key-value port, for the logout sweep and
    /// legacy-data migration.
    pub fn raw(&self) -> &Arc<dyn KeyValue> {
        &self.kv
    }
}
