// SPDX-License-Identifier: MIT
// Copyright 2026 OpSuite Contributors

//! Remote auth backend port and its HTTP implementation.
//!
//! Transport failure and server rejection are distinct cases with distinct
//! fallback behavior downstream, so they are distinct types here: a request
//! that never completed is [`RemoteError::Unavailable`]; a server that
//! answered non-2xx is [`RemoteError::Rejected`].

use crate::models::RawProfile;
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;

/// Remote call failure.
#[derive(Debug, Clone, thiserror::Error)]
pub enum RemoteError {
    /// The request never completed: DNS, connect, TLS, or timeout.
    #[error("backend unreachable: {0}")]
    Unavailable(String),

    /// The server answered with a non-success status.
    #[error("backend rejected the request ({status}): {message}")]
    Rejected { status: u16, message: String },
}

/// Session material issued by a successful backend login or registration.
#[derive(Debug, Clone, Deserialize)]
pub struct BackendSession {
    pub user: RawProfile,
    pub token: String,
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(default)]
    pub refresh_token: Option<String>,
    /// Lifetime of the issued token, seconds.
    pub expires_in: i64,
    /// Auth mode reported by the backend ("authenticated" or "static").
    #[serde(default)]
    pub mode: Option<String>,
}

/// A refreshed access token.
#[derive(Debug, Clone, Deserialize)]
pub struct RefreshedToken {
    pub token: String,
    /// Lifetime of the new token, seconds.
    pub expires_in: i64,
}

/// Remote authentication authority.
///
/// `validate` returns `Ok(false)` when the server explicitly rejected the
/// session (401/403 or a `valid: false` body); any other non-success status
/// is `Err(Rejected)` and transport failure is `Err(Unavailable)`: the
/// validator treats those three cases differently.
#[async_trait]
pub trait AuthBackend: Send + Sync {
    async fn login(&self, identifier: &str, secret: &str) -> Result<BackendSession, RemoteError>;

    async fn register(
        &self,
        identifier: &str,
        secret: &str,
        name: &str,
    ) -> Result<BackendSession, RemoteError>;

    async fn logout(&self, token: &str) -> Result<(), RemoteError>;

    async fn refresh(&self, refresh_token: &str) -> Result<RefreshedToken, RemoteError>;

    async fn validate(&self, session_id: &str, token: &str) -> Result<bool, RemoteError>;
}

/// Standard response envelope used by the auth endpoints.
#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
struct ApiResponse<T> {
    #[serde(default)]
    success: Option<bool>,
    #[serde(default)]
    data: Option<T>,
    #[serde(default)]
    message: Option<String>,
}

/// Body of `POST /sessions/validate`.
#[derive(Debug, Deserialize)]
struct ValidateResponse {
    #[serde(default)]
    valid: Option<bool>,
}

/// HTTP client for the remote auth backend.
#[derive(Clone)]
pub struct HttpBackend {
    http: reqwest::Client,
    base_url: String,
}

impl HttpBackend {
    /// Create a backend client with an explicit request timeout so
    /// best-effort calls can never stall their caller indefinitely.
    pub fn new(base_url: &str, timeout: Duration) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Unwrap the `{success, data, message}` envelope, treating a missing
    /// payload or an explicit `success: false` as a rejection.
    fn unwrap_envelope<T>(status: u16, envelope: ApiResponse<T>) -> Result<T, RemoteError> {
        if envelope.success == Some(false) {
            return Err(RemoteError::Rejected {
                status,
                message: envelope
                    .message
                    .unwrap_or_else(|| "request rejected".to_string()),
            });
        }
        envelope.data.ok_or(RemoteError::Rejected {
            status,
            message: "response carried no data".to_string(),
        })
    }

    async fn read_rejection(response: reqwest::Response) -> RemoteError {
        let status = response.status().as_u16();
        let message = response.text().await.unwrap_or_default();
        RemoteError::Rejected { status, message }
    }

    async fn post_envelope<T: for<'de> Deserialize<'de>>(
        &self,
        path: &str,
        body: serde_json::Value,
        bearer: Option<&str>,
    ) -> Result<T, RemoteError> {
        let mut request = self.http.post(self.url(path)).json(&body);
        if let Some(token) = bearer {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| RemoteError::Unavailable(e.to_string()))?;

        if !response.status().is_success() {
            return Err(Self::read_rejection(response).await);
        }

        let status = response.status().as_u16();
        let envelope: ApiResponse<T> = response
            .json()
            .await
            .map_err(|e| RemoteError::Rejected {
                status,
                message: format!("malformed response body: {e}"),
            })?;
        Self::unwrap_envelope(status, envelope)
    }
}

#[async_trait]
impl AuthBackend for HttpBackend {
    async fn login(&self, identifier: &str, secret: &str) -> Result<BackendSession, RemoteError> {
        self.post_envelope(
            "/auth/login",
            serde_json::json!({ "identifier": identifier, "secret": secret }),
            None,
        )
        .await
    }

    async fn register(
        &self,
        identifier: &str,
        secret: &str,
        name: &str,
    ) -> Result<BackendSession, RemoteError> {
        self.post_envelope(
            "/auth/register",
            serde_json::json!({ "identifier": identifier, "secret": secret, "name": name }),
            None,
        )
        .await
    }

    async fn logout(&self, token: &str) -> Result<(), RemoteError> {
        let response = self
            .http
            .post(self.url("/auth/logout"))
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| RemoteError::Unavailable(e.to_string()))?;

        if !response.status().is_success() {
            return Err(Self::read_rejection(response).await);
        }
        Ok(())
    }

    async fn refresh(&self, refresh_token: &str) -> Result<RefreshedToken, RemoteError> {
        self.post_envelope(
            "/auth/refresh",
            serde_json::json!({ "refresh_token": refresh_token }),
            None,
        )
        .await
    }

    async fn validate(&self, session_id: &str, token: &str) -> Result<bool, RemoteError> {
        let response = self
            .http
            .post(self.url("/sessions/validate"))
            .bearer_auth(token)
            .json(&serde_json::json!({ "session_id": session_id, "token": token }))
            .send()
            .await
            .map_err(|e| RemoteError::Unavailable(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            // A bare 200 with no valid flag counts as valid.
            let parsed: ValidateResponse = response.json().await.unwrap_or(ValidateResponse {
                valid: None,
            });
            return Ok(parsed.valid.unwrap_or(true));
        }
        if status.as_u16() == 401 || status.as_u16() == 403 {
            return Ok(false);
        }
        Err(Self::read_rejection(response).await)
    }
}
