// SPDX-License-Identifier: MIT
// Copyright 2026 OpSuite Contributors

//! Session validation with remote authority and local fallback.
//!
//! The fallback is the point: when the validation service itself is
//! unreachable, a session that already passed login is judged by the local
//! expiry check instead of being failed closed. Explicit rejection by the
//! authority still invalidates.

use crate::clock::Clock;
use crate::services::backend::{AuthBackend, RemoteError};
use crate::store::CredentialStore;
use std::sync::Arc;

/// Why a session failed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationReason {
    MissingCredentials,
    ExpiredSession,
    InvalidSession,
    ValidationError,
}

impl ValidationReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValidationReason::MissingCredentials => "missing_credentials",
            ValidationReason::ExpiredSession => "expired_session",
            ValidationReason::InvalidSession => "invalid_session",
            ValidationReason::ValidationError => "validation_error",
        }
    }
}

impl std::fmt::Display for ValidationReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validation verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidationOutcome {
    pub valid: bool,
    pub reason: Option<ValidationReason>,
}

impl ValidationOutcome {
    pub fn ok() -> Self {
        Self {
            valid: true,
            reason: None,
        }
    }

    pub fn fail(reason: ValidationReason) -> Self {
        Self {
            valid: false,
            reason: Some(reason),
        }
    }
}

/// Decides whether a session is currently trustworthy.
#[derive(Clone)]
pub struct SessionValidator {
    backend: Option<Arc<dyn AuthBackend>>,
    store: CredentialStore,
    clock: Arc<dyn Clock>,
}

impl SessionValidator {
    pub fn new(
        backend: Option<Arc<dyn AuthBackend>>,
        store: CredentialStore,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            backend,
            store,
            clock,
        }
    }

    /// Validate a session's credentials.
    ///
    /// 1. Missing session id or token: `missing_credentials`, no network
    ///    call.
    /// 2. No remote authority configured: local expiry check only.
    /// 3. Remote authority: valid on 2xx, `invalid_session` on explicit
    ///    rejection, `validation_error` on any other non-success answer,
    ///    and the local expiry check when the request never completed.
    pub async fn validate(
        &self,
        session_id: Option<&str>,
        token: Option<&str>,
    ) -> ValidationOutcome {
        let (session_id, token) = match (session_id, token) {
            (Some(sid), Some(tok)) if !sid.is_empty() && !tok.is_empty() => (sid, tok),
            _ => return ValidationOutcome::fail(ValidationReason::MissingCredentials),
        };

        let Some(backend) = &self.backend else {
            return self.local_check();
        };

        match backend.validate(session_id, token).await {
            Ok(true) => ValidationOutcome::ok(),
            Ok(false) => ValidationOutcome::fail(ValidationReason::InvalidSession),
            Err(RemoteError::Rejected { status, message }) => {
                tracing::warn!(status, message = %message, "session validation request rejected");
                ValidationOutcome::fail(ValidationReason::ValidationError)
            }
            Err(RemoteError::Unavailable(error)) => {
                tracing::warn!(
                    %error,
                    "validation authority unreachable, falling back to local expiry check"
                );
                self.local_check()
            }
        }
    }

    /// Compare now against the persisted expiry. No record (or no persisted
    /// expiry) counts as expired.
    fn local_check(&self) -> ValidationOutcome {
        match self.store.expires_at() {
            Some(expires_at) if self.clock.now_ms() < expires_at => ValidationOutcome::ok(),
            _ => ValidationOutcome::fail(ValidationReason::ExpiredSession),
        }
    }
}
