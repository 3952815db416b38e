// SPDX-License-Identifier: MIT
// Copyright 2026 OpSuite Contributors

//! Services module - session and authentication logic.

pub mod auth;
pub mod backend;
pub mod directory;
pub mod otp;
pub mod session;
pub mod token;
pub mod validator;

pub use auth::{AuthMode, Authenticator, NewProfile, OtpIssued};
pub use backend::{AuthBackend, BackendSession, HttpBackend, RefreshedToken, RemoteError};
pub use directory::{StaticUser, UserDirectory};
pub use otp::{OtpChallenge, OtpChallenges};
pub use session::{CreateOptions, SessionManager, SessionState};
pub use validator::{SessionValidator, ValidationOutcome, ValidationReason};
