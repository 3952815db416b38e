// SPDX-License-Identifier: MIT
// Copyright 2026 OpSuite Contributors

//! Authentication orchestrator.
//!
//! The façade the UI talks to: login (password or one-time-code path),
//! registration, logout, current-user resolution, and token refresh. Policy
//! lives here: backend-first with static fallback, proactive refresh near
//! expiry, fail-closed validation of freshly minted sessions, and a
//! scorched-earth logout sweep.
//!
//! All state is held on the instance (challenge map, auth-mode flag), so
//! independent orchestrators never leak into each other.

use crate::clock::{Clock, SystemClock};
use crate::config::AuthConfig;
use crate::error::AuthError;
use crate::models::{normalize_profile, Role, UserProfile};
use crate::services::backend::{AuthBackend, BackendSession, HttpBackend, RemoteError};
use crate::services::directory::{StaticUser, UserDirectory};
use crate::services::otp::OtpChallenges;
use crate::services::session::{CreateOptions, SessionManager};
use crate::services::token;
use crate::services::validator::SessionValidator;
use crate::store::{keys, CredentialStore, FileStore, KeyValue};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Which authority issued the current credentials.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMode {
    /// Local static-directory logins; remote failures fall back here.
    Static,
    /// The backend has identified itself as the authority; its rejections
    /// are final and the static table is not consulted.
    Authenticated,
}

/// A one-time code issued by [`Authenticator::send_otp`].
///
/// The code is returned to the caller instead of being delivered
/// out-of-band. That is the documented demo-grade contract; a deployment
/// with real delivery replaces this boundary.
#[derive(Debug, Clone)]
pub struct OtpIssued {
    pub code: String,
    /// Absolute expiry of the code, epoch milliseconds.
    pub expires_at: i64,
}

/// Profile details for registration.
#[derive(Debug, Clone)]
pub struct NewProfile {
    pub name: String,
    pub role: Option<Role>,
    pub department: Option<String>,
}

/// The authentication façade. One instance per application.
pub struct Authenticator {
    config: AuthConfig,
    store: CredentialStore,
    sessions: SessionManager,
    validator: SessionValidator,
    backend: Option<Arc<dyn AuthBackend>>,
    directory: UserDirectory,
    challenges: OtpChallenges,
    clock: Arc<dyn Clock>,
    mode: Mutex<AuthMode>,
}

impl Authenticator {
    pub fn new(
        config: AuthConfig,
        kv: Arc<dyn KeyValue>,
        backend: Option<Arc<dyn AuthBackend>>,
        directory: UserDirectory,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let store = CredentialStore::new(kv);
        let sessions = SessionManager::new(store.clone(), clock.clone(), config.session_ttl_ms);
        let validator = SessionValidator::new(backend.clone(), store.clone(), clock.clone());
        Self {
            config,
            store,
            sessions,
            validator,
            backend,
            directory,
            challenges: OtpChallenges::new(),
            clock,
            mode: Mutex::new(AuthMode::Static),
        }
    }

    /// Production wiring: file-backed store, HTTP backend when configured,
    /// demo directory, wall clock.
    pub fn from_config(config: AuthConfig) -> anyhow::Result<Self> {
        let kv: Arc<dyn KeyValue> = Arc::new(FileStore::open(&config.session_file));
        let backend: Option<Arc<dyn AuthBackend>> = match &config.backend_url {
            Some(url) => Some(Arc::new(HttpBackend::new(
                url,
                Duration::from_secs(config.http_timeout_secs),
            )?)),
            None => None,
        };
        Ok(Self::new(
            config,
            kv,
            backend,
            UserDirectory::demo(),
            Arc::new(SystemClock),
        ))
    }

    /// Authority mode observed so far.
    pub fn mode(&self) -> AuthMode {
        *self
            .mode
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    fn set_mode(&self, mode: AuthMode) {
        *self
            .mode
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner) = mode;
    }

    /// Log in with identifier + secret.
    ///
    /// Backend first when configured; any backend failure falls back to the
    /// static directory, unless the backend has already identified itself
    /// as the authority, in which case its word is final.
    pub async fn login(&self, identifier: &str, secret: &str) -> Result<UserProfile, AuthError> {
        if let Some(backend) = &self.backend {
            match backend.login(identifier, secret).await {
                Ok(session) => return self.persist_backend_session(session),
                Err(err) if self.mode() == AuthMode::Authenticated => {
                    return Err(Self::map_remote(err));
                }
                Err(err) => {
                    tracing::warn!(error = %err, "backend login failed, trying local directory");
                }
            }
        }

        let user = self
            .directory
            .authenticate(identifier, secret)
            .ok_or(AuthError::InvalidCredentials)?;
        let record = self.sessions.create(user, CreateOptions::default())?;
        Ok(record.user)
    }

    /// Register a new account and log it in.
    pub async fn register(
        &self,
        identifier: &str,
        secret: &str,
        profile: NewProfile,
    ) -> Result<UserProfile, AuthError> {
        if let Some(backend) = &self.backend {
            match backend.register(identifier, secret, &profile.name).await {
                Ok(session) => return self.persist_backend_session(session),
                Err(err) if self.mode() == AuthMode::Authenticated => {
                    return Err(Self::map_remote(err));
                }
                Err(err) => {
                    tracing::warn!(error = %err, "backend registration failed, registering locally");
                }
            }
        }

        let now = self.clock.now_ms();
        let user = UserProfile {
            id: token::generate_user_id(now)?,
            email: identifier.trim().to_ascii_lowercase(),
            name: profile.name,
            role: profile.role.unwrap_or(Role::Employee),
            department: profile.department,
        };
        self.directory
            .insert(StaticUser::new(user.clone(), secret))?;
        let record = self.sessions.create(user, CreateOptions::default())?;
        Ok(record.user)
    }

    /// Log out. Remote logout is best-effort; local cleanup is
    /// unconditional, and a final sweep removes any residual key whose name
    /// matches session/auth/token patterns, even ones written outside the
    /// store's own key set.
    pub async fn logout(&self) {
        if let Some(backend) = &self.backend {
            if let Some(record) = self.store.get() {
                if let Err(err) = backend.logout(&record.token).await {
                    tracing::warn!(error = %err, "remote logout failed, clearing local session anyway");
                }
            }
        }

        self.store.clear();

        let kv = self.store.raw();
        for key in kv.keys() {
            let lowered = key.to_ascii_lowercase();
            if lowered.contains("session") || lowered.contains("auth") || lowered.contains("token")
            {
                kv.remove(&key);
            }
        }
        tracing::info!("logged out, credential storage cleared");
    }

    /// Issue a one-time code for the identifier after checking its secret
    /// against the static directory. The code is handed back to the caller
    /// (demo-grade delivery; see [`OtpIssued`]).
    pub fn send_otp(&self, identifier: &str, secret: &str) -> Result<OtpIssued, AuthError> {
        let user = self
            .directory
            .authenticate(identifier, secret)
            .ok_or(AuthError::InvalidCredentials)?;

        let code = token::generate_otp(self.config.otp_length)?;
        let expires_at = self.clock.now_ms() + self.config.otp_ttl_ms;
        self.challenges
            .issue(identifier, user, code.clone(), expires_at);
        tracing::info!(identifier, "one-time code issued");
        Ok(OtpIssued { code, expires_at })
    }

    /// Verify a one-time code and create the session.
    ///
    /// The fresh session is immediately re-validated; if that check fails,
    /// the session is torn down and the login reported as failed. Unlike
    /// the validator's network fallback, this is fail-closed: we are
    /// checking a session we just minted, not recovering an established
    /// one.
    pub async fn verify_otp_and_login(
        &self,
        identifier: &str,
        code: &str,
    ) -> Result<UserProfile, AuthError> {
        let user = self
            .challenges
            .verify(identifier, code, self.clock.now_ms())?;
        let record = self.sessions.create(user, CreateOptions::default())?;

        let outcome = self
            .validator
            .validate(record.session_id.as_deref(), Some(&record.token))
            .await;
        if !outcome.valid {
            tracing::warn!(
                reason = outcome.reason.map(|r| r.as_str()).unwrap_or("unknown"),
                "freshly created session failed validation, clearing"
            );
            self.sessions.clear();
            return Err(AuthError::InvalidSession);
        }
        Ok(record.user)
    }

    /// Resolve the currently logged-in user, if any.
    ///
    /// Near-expiry sessions are refreshed proactively (best-effort);
    /// already-expired sessions get one refresh attempt before being
    /// cleared. A surviving session is re-validated when it has both a
    /// session id and a token, then its TTL slides.
    pub async fn current_user(&self) -> Option<UserProfile> {
        let now = self.clock.now_ms();
        if let Some(expires_at) = self.store.expires_at() {
            if now >= expires_at {
                if self.refresh_access_token().await.is_err() {
                    self.sessions.clear();
                    return None;
                }
            } else if expires_at - now <= self.config.refresh_margin_ms {
                if let Err(err) = self.refresh_access_token().await {
                    tracing::warn!(error = %err, "proactive token refresh failed");
                }
            }
        }

        let Some(record) = self.sessions.read() else {
            return self.migrate_legacy();
        };

        let session_id = record.session_id.as_deref().filter(|s| !s.is_empty());
        if let Some(session_id) = session_id {
            if !record.token.is_empty() {
                let outcome = self
                    .validator
                    .validate(Some(session_id), Some(&record.token))
                    .await;
                if !outcome.valid {
                    tracing::warn!(
                        reason = outcome.reason.map(|r| r.as_str()).unwrap_or("unknown"),
                        "session failed validation, clearing"
                    );
                    self.sessions.clear();
                    return None;
                }
            }
        }

        let record = self.sessions.refresh().unwrap_or(record);
        Some(record.user)
    }

    /// Refresh the access credential.
    ///
    /// With a backend and a stored refresh token, the backend mints a new
    /// token; the record is updated in place even when it just expired,
    /// since this is the recovery path. Without either, the session TTL
    /// slides locally, which only works from `Active`. Returns the new
    /// expiry.
    pub async fn refresh_access_token(&self) -> Result<i64, AuthError> {
        if let Some(backend) = &self.backend {
            if let Some(refresh_token) = self.store.refresh_token() {
                return match backend.refresh(&refresh_token).await {
                    Ok(refreshed) => {
                        let mut record =
                            self.store.get().ok_or(AuthError::MissingCredentials)?;
                        let expires_at = self.clock.now_ms() + refreshed.expires_in * 1000;
                        record.token = refreshed.token;
                        record.expires_at = expires_at;
                        record.is_active = true;
                        self.store.put(&record);
                        tracing::info!(expires_at, "access token refreshed");
                        Ok(expires_at)
                    }
                    Err(err) => Err(Self::map_remote(err)),
                };
            }
        }

        self.sessions
            .refresh()
            .map(|record| record.expires_at)
            .ok_or(AuthError::ExpiredSession)
    }

    /// Adopt a backend-issued session: set the authority mode, normalize
    /// the profile, persist record + refresh token.
    fn persist_backend_session(&self, session: BackendSession) -> Result<UserProfile, AuthError> {
        if session.mode.as_deref() == Some("authenticated") {
            self.set_mode(AuthMode::Authenticated);
        }

        let user = normalize_profile(&session.user);
        let expires_at = self.clock.now_ms() + session.expires_in * 1000;
        let record = self.sessions.create(
            user,
            CreateOptions {
                token: Some(session.token),
                session_id: session.session_id,
                expires_at: Some(expires_at),
            },
        )?;
        if let Some(refresh_token) = &session.refresh_token {
            self.store.set_refresh_token(refresh_token);
        }
        Ok(record.user)
    }

    /// Earlier client versions wrote loose keys instead of the composite
    /// record. When no record exists but coherent legacy data does (a user
    /// plus a token, not already expired), adopt it into a proper session.
    fn migrate_legacy(&self) -> Option<UserProfile> {
        let kv = self.store.raw();

        let user_json = kv.get(keys::USER).or_else(|| kv.get("currentUser"))?;
        let token = kv.get(keys::TOKEN).or_else(|| kv.get("auth_token"))?;
        if token.is_empty() {
            return None;
        }

        let raw = serde_json::from_str(&user_json).ok()?;
        let user = normalize_profile(&raw);
        if user.email.is_empty() {
            return None;
        }

        let expires_at: Option<i64> = kv.get(keys::EXPIRES_AT).and_then(|v| v.parse().ok());
        if let Some(expires_at) = expires_at {
            if self.clock.now_ms() >= expires_at {
                return None;
            }
        }

        let record = self
            .sessions
            .create(
                user,
                CreateOptions {
                    token: Some(token),
                    session_id: kv.get(keys::SESSION_ID).filter(|s| !s.is_empty()),
                    expires_at,
                },
            )
            .ok()?;
        tracing::info!(user = %record.user.email, "migrated legacy credential data");
        Some(record.user)
    }

    fn map_remote(err: RemoteError) -> AuthError {
        match err {
            RemoteError::Rejected { status, message } => {
                if status == 401 || status == 403 {
                    AuthError::InvalidCredentials
                } else {
                    AuthError::BackendRejected { status, message }
                }
            }
            RemoteError::Unavailable(error) => AuthError::BackendUnavailable(error),
        }
    }
}
