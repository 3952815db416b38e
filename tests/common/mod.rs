// SPDX-License-Identifier: MIT
// Copyright 2026 OpSuite Contributors

//! Shared test fixtures: manual clock, in-memory stores, a scriptable
//! backend double, and a known static directory.

use async_trait::async_trait;
use opsuite_auth::clock::ManualClock;
use opsuite_auth::config::AuthConfig;
use opsuite_auth::models::{RawProfile, Role, UserProfile};
use opsuite_auth::services::{
    AuthBackend, BackendSession, RefreshedToken, RemoteError, StaticUser, UserDirectory,
};
use opsuite_auth::store::{KeyValue, MemoryStore, StoreError};
use opsuite_auth::Authenticator;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Session TTL used across the lifecycle tests: 15 minutes.
#[allow(dead_code)]
pub const TEST_TTL_MS: i64 = 900_000;

/// Directory with a known user for login/OTP tests.
#[allow(dead_code)]
pub fn test_directory() -> UserDirectory {
    UserDirectory::new(vec![
        StaticUser::new(
            UserProfile {
                id: "usr_test_1".into(),
                email: "a@b.com".into(),
                name: "Ada Byron".into(),
                role: Role::Employee,
                department: Some("Engineering".into()),
            },
            "pw",
        ),
        StaticUser::new(
            UserProfile {
                id: "usr_test_2".into(),
                email: "boss@b.com".into(),
                name: "Barbara Liskov".into(),
                role: Role::Admin,
                department: None,
            },
            "hunter2",
        ),
    ])
}

/// A fully wired authenticator plus handles to its clock and raw storage.
#[allow(dead_code)]
pub struct TestAuth {
    pub auth: Authenticator,
    pub clock: Arc<ManualClock>,
    pub kv: Arc<MemoryStore>,
}

/// Local-only authenticator (no backend) starting at the given time.
#[allow(dead_code)]
pub fn local_auth(start_ms: i64) -> TestAuth {
    auth_with(start_ms, None)
}

/// Authenticator wired to the given backend double.
#[allow(dead_code)]
pub fn backend_auth(start_ms: i64, backend: Arc<MockBackend>) -> TestAuth {
    auth_with(start_ms, Some(backend as Arc<dyn AuthBackend>))
}

#[allow(dead_code)]
fn auth_with(start_ms: i64, backend: Option<Arc<dyn AuthBackend>>) -> TestAuth {
    let clock = Arc::new(ManualClock::new(start_ms));
    let kv = Arc::new(MemoryStore::new());
    let auth = Authenticator::new(
        AuthConfig::test_default(),
        kv.clone(),
        backend,
        test_directory(),
        clock.clone(),
    );
    TestAuth { auth, clock, kv }
}

/// Backend session payload as a healthy login response would carry it.
#[allow(dead_code)]
pub fn backend_session(email: &str, token: &str, expires_in: i64) -> BackendSession {
    BackendSession {
        user: RawProfile {
            id: Some("srv_u1".into()),
            email: Some(email.into()),
            full_name: Some("Backend User".into()),
            role: Some("manager".into()),
            ..RawProfile::default()
        },
        token: token.into(),
        session_id: Some("srv_sess_1".into()),
        refresh_token: Some("rt_1".into()),
        expires_in,
        mode: None,
    }
}

/// Scriptable [`AuthBackend`] double. Every response slot holds the result
/// the next call will return; counters record how often each endpoint was
/// hit.
#[allow(dead_code)]
pub struct MockBackend {
    pub login_response: Mutex<Result<BackendSession, RemoteError>>,
    pub register_response: Mutex<Result<BackendSession, RemoteError>>,
    pub validate_response: Mutex<Result<bool, RemoteError>>,
    pub refresh_response: Mutex<Result<RefreshedToken, RemoteError>>,
    pub logout_fails: bool,
    pub login_calls: AtomicUsize,
    pub validate_calls: AtomicUsize,
    pub refresh_calls: AtomicUsize,
    pub logout_calls: AtomicUsize,
}

#[allow(dead_code)]
impl MockBackend {
    /// Baseline: everything down except validation, which accepts.
    pub fn new() -> Self {
        Self {
            login_response: Mutex::new(Err(unavailable())),
            register_response: Mutex::new(Err(unavailable())),
            validate_response: Mutex::new(Ok(true)),
            refresh_response: Mutex::new(Err(unavailable())),
            logout_fails: false,
            login_calls: AtomicUsize::new(0),
            validate_calls: AtomicUsize::new(0),
            refresh_calls: AtomicUsize::new(0),
            logout_calls: AtomicUsize::new(0),
        }
    }

    pub fn with_login(self, response: Result<BackendSession, RemoteError>) -> Self {
        *self.login_response.lock().unwrap() = response;
        self
    }

    pub fn with_validate(self, response: Result<bool, RemoteError>) -> Self {
        *self.validate_response.lock().unwrap() = response;
        self
    }

    pub fn with_refresh(self, response: Result<RefreshedToken, RemoteError>) -> Self {
        *self.refresh_response.lock().unwrap() = response;
        self
    }

    pub fn with_failing_logout(mut self) -> Self {
        self.logout_fails = true;
        self
    }
}

#[allow(dead_code)]
pub fn unavailable() -> RemoteError {
    RemoteError::Unavailable("connection refused".into())
}

#[allow(dead_code)]
pub fn rejected(status: u16) -> RemoteError {
    RemoteError::Rejected {
        status,
        message: "rejected by test double".into(),
    }
}

#[async_trait]
impl AuthBackend for MockBackend {
    async fn login(&self, _identifier: &str, _secret: &str) -> Result<BackendSession, RemoteError> {
        self.login_calls.fetch_add(1, Ordering::SeqCst);
        self.login_response.lock().unwrap().clone()
    }

    async fn register(
        &self,
        _identifier: &str,
        _secret: &str,
        _name: &str,
    ) -> Result<BackendSession, RemoteError> {
        self.register_response.lock().unwrap().clone()
    }

    async fn logout(&self, _token: &str) -> Result<(), RemoteError> {
        self.logout_calls.fetch_add(1, Ordering::SeqCst);
        if self.logout_fails {
            Err(unavailable())
        } else {
            Ok(())
        }
    }

    async fn refresh(&self, _refresh_token: &str) -> Result<RefreshedToken, RemoteError> {
        self.refresh_calls.fetch_add(1, Ordering::SeqCst);
        self.refresh_response.lock().unwrap().clone()
    }

    async fn validate(&self, _session_id: &str, _token: &str) -> Result<bool, RemoteError> {
        self.validate_calls.fetch_add(1, Ordering::SeqCst);
        self.validate_response.lock().unwrap().clone()
    }
}

/// Key-value store whose writes always fail, simulating disabled or
/// quota-exhausted storage.
#[allow(dead_code)]
#[derive(Debug, Default)]
pub struct FailingStore;

impl KeyValue for FailingStore {
    fn get(&self, _key: &str) -> Option<String> {
        None
    }

    fn set(&self, _key: &str, _value: &str) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("quota exceeded".into()))
    }

    fn remove(&self, _key: &str) {}

    fn keys(&self) -> Vec<String> {
        Vec::new()
    }
}
