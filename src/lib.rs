// SPDX-License-Identifier: MIT
// Copyright 2026 OpSuite Contributors

//! OpSuite client-side authentication core.
//!
//! Session creation, token and one-time-code issuance, expiry, validation
//! with remote/local fallback, and refresh. This is the credential
//! lifecycle behind the OpSuite ERP front-end; everything else (CRUD
//! modules, routing, presentation) is out of scope.
//!
//! The locally minted bearer token is an unsigned placeholder; nothing in
//! this crate provides cryptographic session guarantees.

pub mod clock;
pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod store;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::AuthConfig;
pub use error::{AuthError, Result};
pub use models::{CredentialRecord, Role, UserProfile};
pub use services::{AuthMode, Authenticator, NewProfile, OtpIssued};
