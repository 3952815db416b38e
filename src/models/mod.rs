// SPDX-License-Identifier: MIT
// Copyright 2026 OpSuite Contributors

//! Data models for the authentication core.

pub mod session;
pub mod user;

pub use session::{CredentialRecord, TokenClaims};
pub use user::{normalize_profile, RawProfile, Role, UserProfile};
