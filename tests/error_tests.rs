// SPDX-License-Identifier: MIT
// Copyright 2026 OpSuite Contributors

use opsuite_auth::AuthError;

#[test]
fn codes_are_stable() {
    assert_eq!(AuthError::InvalidCredentials.code(), "invalid_credentials");
    assert_eq!(AuthError::NoPendingLogin.code(), "no_pending_login");
    assert_eq!(AuthError::OtpExpired.code(), "otp_expired");
    assert_eq!(AuthError::InvalidOtp.code(), "invalid_otp");
    assert_eq!(AuthError::MissingCredentials.code(), "missing_credentials");
    assert_eq!(AuthError::InvalidSession.code(), "invalid_session");
    assert_eq!(AuthError::ExpiredSession.code(), "expired_session");
    assert_eq!(
        AuthError::BackendUnavailable("down".into()).code(),
        "backend_unavailable"
    );
}

#[test]
fn credential_errors_are_classified() {
    assert!(AuthError::InvalidCredentials.is_credential_error());
    assert!(AuthError::OtpExpired.is_credential_error());
    assert!(AuthError::InvalidOtp.is_credential_error());
    assert!(AuthError::NoPendingLogin.is_credential_error());

    assert!(!AuthError::ExpiredSession.is_credential_error());
    assert!(!AuthError::BackendUnavailable("down".into()).is_credential_error());
}

#[test]
fn session_errors_are_classified() {
    assert!(AuthError::MissingCredentials.is_session_error());
    assert!(AuthError::InvalidSession.is_session_error());
    assert!(AuthError::ExpiredSession.is_session_error());

    assert!(!AuthError::InvalidCredentials.is_session_error());
    assert!(!AuthError::Storage("quota".into()).is_session_error());
}
