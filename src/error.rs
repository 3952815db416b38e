// SPDX-License-Identifier: MIT
// Copyright 2026 OpSuite Contributors

//! Authentication error types with stable machine-readable codes.

/// Error type for every authentication and session operation.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Invalid identifier or secret")]
    InvalidCredentials,

    #[error("No pending login for this identifier")]
    NoPendingLogin,

    #[error("One-time code has expired")]
    OtpExpired,

    #[error("One-time code does not match")]
    InvalidOtp,

    #[error("Identifier already registered: {0}")]
    AlreadyRegistered(String),

    #[error("Session credentials are missing")]
    MissingCredentials,

    #[error("Session rejected by the validation authority")]
    InvalidSession,

    #[error("Session has expired")]
    ExpiredSession,

    #[error("Auth backend rejected the request ({status}): {message}")]
    BackendRejected { status: u16, message: String },

    #[error("Auth backend unreachable: {0}")]
    BackendUnavailable(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AuthError {
    /// Stable machine-readable code, suitable for UI dispatch and logs.
    pub fn code(&self) -> &'static str {
        match self {
            AuthError::InvalidCredentials => "invalid_credentials",
            AuthError::NoPendingLogin => "no_pending_login",
            AuthError::OtpExpired => "otp_expired",
            AuthError::InvalidOtp => "invalid_otp",
            AuthError::AlreadyRegistered(_) => "already_registered",
            AuthError::MissingCredentials => "missing_credentials",
            AuthError::InvalidSession => "invalid_session",
            AuthError::ExpiredSession => "expired_session",
            AuthError::BackendRejected { .. } => "backend_rejected",
            AuthError::BackendUnavailable(_) => "backend_unavailable",
            AuthError::Storage(_) => "storage_error",
            AuthError::Internal(_) => "internal_error",
        }
    }

    /// True for user-facing credential failures: wrong secret, bad or stale
    /// one-time code, duplicate registration. These are surfaced verbatim and
    /// never retried automatically.
    pub fn is_credential_error(&self) -> bool {
        matches!(
            self,
            AuthError::InvalidCredentials
                | AuthError::NoPendingLogin
                | AuthError::OtpExpired
                | AuthError::InvalidOtp
                | AuthError::AlreadyRegistered(_)
        )
    }

    /// True for session-validity failures that should tear the session down
    /// and send the caller back to login.
    pub fn is_session_error(&self) -> bool {
        matches!(
            self,
            AuthError::MissingCredentials | AuthError::InvalidSession | AuthError::ExpiredSession
        )
    }
}

/// Result type alias for auth operations.
pub type Result<T> = std::result::Result<T, AuthError>;
