// SPDX-License-Identifier: MIT
// Copyright 2026 OpSuite Contributors

//! Session lifecycle: the state machine over one credential-record slot.
//!
//! A slot is `Absent`, `Active`, or `Expired`. The store itself never
//! expires anything; every read here performs an explicit clock check, and
//! a read that finds an expired record tombstones it: no valid record is
//! ever returned past its expiry.

use crate::clock::Clock;
use crate::error::AuthError;
use crate::models::{CredentialRecord, UserProfile};
use crate::services::token;
use crate::store::CredentialStore;
use std::sync::Arc;

/// Observed state of the session slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Absent,
    Active,
    Expired,
}

/// Optional overrides for [`SessionManager::create`]. Anything left `None`
/// is minted locally (token, session id) or defaulted (expiry).
#[derive(Debug, Clone, Default)]
pub struct CreateOptions {
    pub token: Option<String>,
    pub session_id: Option<String>,
    /// Absolute expiry, epoch milliseconds. Backend-issued sessions carry
    /// their own lifetime and pass it here.
    pub expires_at: Option<i64>,
}

/// Lifecycle manager for the single session slot.
#[derive(Clone)]
pub struct SessionManager {
    store: CredentialStore,
    clock: Arc<dyn Clock>,
    default_ttl_ms: i64,
}

impl SessionManager {
    pub fn new(store: CredentialStore, clock: Arc<dyn Clock>, default_ttl_ms: i64) -> Self {
        Self {
            store,
            clock,
            default_ttl_ms,
        }
    }

    /// Current slot state. Never mutates the store.
    pub fn state(&self) -> SessionState {
        match self.store.get() {
            None => SessionState::Absent,
            Some(record) if self.clock.now_ms() >= record.expires_at => SessionState::Expired,
            Some(_) => SessionState::Active,
        }
    }

    /// Create a session for the user, replacing whatever the slot held.
    pub fn create(
        &self,
        user: UserProfile,
        options: CreateOptions,
    ) -> Result<CredentialRecord, AuthError> {
        let now = self.clock.now_ms();

        let token = match options.token {
            Some(token) => token,
            None => token::generate_token(&user.id, &user.email, now, self.default_ttl_ms)?,
        };
        let session_id = match options.session_id {
            Some(id) => id,
            None => token::generate_session_id(now)?,
        };
        let expires_at = options.expires_at.unwrap_or(now + self.default_ttl_ms);

        let record = CredentialRecord {
            role: user.role,
            user,
            token,
            session_id: Some(session_id),
            expires_at,
            login_time: now,
            is_active: true,
        };
        self.store.put(&record);
        tracing::info!(
            user = %record.user.email,
            expires_at = record.expires_at,
            "session created"
        );
        Ok(record)
    }

    /// Read the record, tombstoning it if expired. An `Active` read has no
    /// side effect.
    pub fn read(&self) -> Option<CredentialRecord> {
        let record = self.store.get()?;
        if self.clock.now_ms() >= record.expires_at {
            tracing::info!(user = %record.user.email, "session expired, clearing");
            self.store.clear();
            return None;
        }
        Some(record)
    }

    /// Slide the expiry to `now + ttl`. Only valid from `Active`; returns
    /// `None` (no-op) on an absent or expired slot.
    pub fn refresh(&self) -> Option<CredentialRecord> {
        let mut record = self.store.get()?;
        let now = self.clock.now_ms();
        if now >= record.expires_at {
            return None;
        }
        record.expires_at = now + self.default_ttl_ms;
        self.store.put(&record);
        Some(record)
    }

    /// Drop the session unconditionally.
    pub fn clear(&self) {
        self.store.clear();
    }
}
