// SPDX-License-Identifier: MIT
// Copyright 2026 OpSuite Contributors

//! Validator tests, including the load-bearing graceful-degradation rule:
//! an unreachable validation authority falls back to the local expiry
//! check instead of failing closed.

use opsuite_auth::clock::ManualClock;
use opsuite_auth::services::{AuthBackend, SessionValidator, ValidationReason};
use opsuite_auth::store::{keys, CredentialStore, KeyValue, MemoryStore};
use std::sync::atomic::Ordering;
use std::sync::Arc;

mod common;
use common::{rejected, unavailable, MockBackend};

struct Fixture {
    clock: Arc<ManualClock>,
    kv: Arc<MemoryStore>,
    validator: SessionValidator,
}

fn validator(backend: Option<Arc<MockBackend>>, now_ms: i64) -> Fixture {
    let clock = Arc::new(ManualClock::new(now_ms));
    let kv = Arc::new(MemoryStore::new());
    let store = CredentialStore::new(kv.clone());
    let validator = SessionValidator::new(
        backend.map(|b| b as Arc<dyn AuthBackend>),
        store,
        clock.clone(),
    );
    Fixture {
        clock,
        kv,
        validator,
    }
}

fn persist_expiry(kv: &MemoryStore, expires_at: i64) {
    kv.set(keys::EXPIRES_AT, &expires_at.to_string()).unwrap();
}

#[tokio::test]
async fn missing_credentials_short_circuits() {
    let backend = Arc::new(MockBackend::new());
    let f = validator(Some(backend.clone()), 0);

    for (sid, token) in [
        (None, None),
        (Some("sess_1"), None),
        (None, Some("tok")),
        (Some(""), Some("tok")),
        (Some("sess_1"), Some("")),
    ] {
        let outcome = f.validator.validate(sid, token).await;
        assert!(!outcome.valid);
        assert_eq!(outcome.reason, Some(ValidationReason::MissingCredentials));
    }

    // No network call was ever attempted.
    assert_eq!(backend.validate_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn local_only_check_against_persisted_expiry() {
    let f = validator(None, 1_000);

    persist_expiry(&f.kv, 2_000);
    let outcome = f.validator.validate(Some("sess_1"), Some("tok")).await;
    assert!(outcome.valid);

    f.clock.set(2_000);
    let outcome = f.validator.validate(Some("sess_1"), Some("tok")).await;
    assert!(!outcome.valid);
    assert_eq!(outcome.reason, Some(ValidationReason::ExpiredSession));
}

#[tokio::test]
async fn no_persisted_expiry_counts_as_expired() {
    let f = validator(None, 0);
    let outcome = f.validator.validate(Some("sess_1"), Some("tok")).await;
    assert!(!outcome.valid);
    assert_eq!(outcome.reason, Some(ValidationReason::ExpiredSession));
}

#[tokio::test]
async fn remote_acceptance_and_rejection() {
    let backend = Arc::new(MockBackend::new().with_validate(Ok(true)));
    let f = validator(Some(backend), 0);
    assert!(f.validator.validate(Some("s"), Some("t")).await.valid);

    let backend = Arc::new(MockBackend::new().with_validate(Ok(false)));
    let f = validator(Some(backend), 0);
    let outcome = f.validator.validate(Some("s"), Some("t")).await;
    assert!(!outcome.valid);
    assert_eq!(outcome.reason, Some(ValidationReason::InvalidSession));
}

#[tokio::test]
async fn remote_server_error_is_validation_error() {
    let backend = Arc::new(MockBackend::new().with_validate(Err(rejected(500))));
    let f = validator(Some(backend), 0);

    let outcome = f.validator.validate(Some("s"), Some("t")).await;
    assert!(!outcome.valid);
    assert_eq!(outcome.reason, Some(ValidationReason::ValidationError));
}

#[tokio::test]
async fn network_failure_falls_back_to_local_expiry_check() {
    // Unexpired record: the unreachable authority does not invalidate a
    // session that already passed login.
    let backend = Arc::new(MockBackend::new().with_validate(Err(unavailable())));
    let f = validator(Some(backend.clone()), 1_000);
    persist_expiry(&f.kv, 10_000);

    let outcome = f.validator.validate(Some("s"), Some("t")).await;
    assert!(outcome.valid, "availability wins over strictness here");
    assert_eq!(backend.validate_calls.load(Ordering::SeqCst), 1);

    // Expired record: the fallback still enforces expiry.
    f.clock.set(10_000);
    let outcome = f.validator.validate(Some("s"), Some("t")).await;
    assert!(!outcome.valid);
    assert_eq!(outcome.reason, Some(ValidationReason::ExpiredSession));
}
