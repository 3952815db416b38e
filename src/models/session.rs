// SPDX-License-Identifier: MIT
// Copyright 2026 OpSuite Contributors

//! Session record and token claim models.

use crate::models::user::{Role, UserProfile};
use serde::{Deserialize, Serialize};

/// The persisted proof of an authenticated user.
///
/// A record is valid exactly while `now < expires_at`; any read past that
/// point tombstones it. `role` is a denormalized copy of `user.role` kept
/// for access-control checks that don't want to deref the profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialRecord {
    pub user: UserProfile,
    /// Opaque bearer credential (locally minted placeholder or backend-issued).
    pub token: String,
    /// Server-side session correlation id, when a backend is present.
    pub session_id: Option<String>,
    /// Absolute expiry, epoch milliseconds.
    pub expires_at: i64,
    pub role: Role,
    /// Creation time, epoch milliseconds. Audit/display only.
    pub login_time: i64,
    /// Always true while the record exists.
    pub is_active: bool,
}

/// Claims carried by locally minted tokens. `iat`/`exp` are epoch seconds,
/// following the usual claim conventions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    pub sub: String,
    pub email: String,
    pub iat: i64,
    pub exp: i64,
}
