// SPDX-License-Identifier: MIT
// Copyright 2026 OpSuite Contributors

//! Static user directory.
//!
//! The local fallback authority when no backend is configured (or the
//! backend is unreachable): an in-process table of known users, matched by
//! case-insensitive identifier and constant-time secret comparison. Unknown
//! identifier and wrong secret report the same error so the two cases are
//! indistinguishable to a caller.

use crate::error::AuthError;
use crate::models::{Role, UserProfile};
use std::sync::RwLock;
use subtle::ConstantTimeEq;

/// A directory entry: profile plus login secret.
#[derive(Debug, Clone)]
pub struct StaticUser {
    pub profile: UserProfile,
    secret: String,
}

impl StaticUser {
    pub fn new(profile: UserProfile, secret: impl Into<String>) -> Self {
        Self {
            profile,
            secret: secret.into(),
        }
    }
}

/// In-process user table.
#[derive(Debug, Default)]
pub struct UserDirectory {
    users: RwLock<Vec<StaticUser>>,
}

impl UserDirectory {
    pub fn new(users: Vec<StaticUser>) -> Self {
        Self {
            users: RwLock::new(users),
        }
    }

    /// Demo accounts for the CLI and local development.
    pub fn demo() -> Self {
        let user = |id: &str, email: &str, name: &str, role: Role, dept: Option<&str>| UserProfile {
            id: id.to_string(),
            email: email.to_string(),
            name: name.to_string(),
            role,
            department: dept.map(str::to_string),
        };
        Self::new(vec![
            StaticUser::new(
                user("usr_demo_1", "admin@opsuite.dev", "Site Admin", Role::Admin, None),
                "admin123",
            ),
            StaticUser::new(
                user(
                    "usr_demo_2",
                    "maria@opsuite.dev",
                    "Maria Keller",
                    Role::Manager,
                    Some("Finance"),
                ),
                "ledger42",
            ),
            StaticUser::new(
                user(
                    "usr_demo_3",
                    "jonas@opsuite.dev",
                    "Jonas Brandt",
                    Role::Employee,
                    Some("Warehouse"),
                ),
                "forklift9",
            ),
        ])
    }

    /// Authenticate by identifier + secret. Identifier match is
    /// case-insensitive; the secret comparison is constant-time.
    pub fn authenticate(&self, identifier: &str, secret: &str) -> Option<UserProfile> {
        let users = self.read();
        let wanted = identifier.trim().to_ascii_lowercase();
        users
            .iter()
            .find(|u| u.profile.email.to_ascii_lowercase() == wanted)
            .filter(|u| bool::from(u.secret.as_bytes().ct_eq(secret.as_bytes())))
            .map(|u| u.profile.clone())
    }

    /// True if the identifier is already registered.
    pub fn contains(&self, identifier: &str) -> bool {
        let wanted = identifier.trim().to_ascii_lowercase();
        self.read()
            .iter()
            .any(|u| u.profile.email.to_ascii_lowercase() == wanted)
    }

    /// Register a new user. Fails on a duplicate identifier.
    pub fn insert(&self, user: StaticUser) -> Result<(), AuthError> {
        if self.contains(&user.profile.email) {
            return Err(AuthError::AlreadyRegistered(user.profile.email.clone()));
        }
        self.write().push(user);
        Ok(())
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, Vec<StaticUser>> {
        self.users
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, Vec<StaticUser>> {
        self.users
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}
