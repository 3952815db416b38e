//! Persistence layer: a small key-value port and the credential store on top.
//!
//! The lifecycle logic never touches a concrete storage engine; it goes
//! through [`KeyValue`] so the same code runs against the on-disk store,
//! the in-memory store, or a test double. The store itself never expires
//! data: expiry is the lifecycle manager's job.

pub mod credentials;
pub mod file;
pub mod memory;

pub use credentials::CredentialStore;
pub use file::FileStore;
pub use memory::MemoryStore;

/// Storage failure. Callers degrade to "session not persisted" rather than
/// surfacing this to the user.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    #[error("serialization failed: {0}")]
    Serialize(String),
}

/// Minimal durable key-value port over string keys and values.
pub trait KeyValue: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
    fn remove(&self, key: &str);
    fn keys(&self) -> Vec<String>;
}

/// Persisted key names.
pub mod keys {
    /// Composite key holding the full JSON credential record.
    pub const SESSION: &str = "opsuite_session";
    /// Denormalized user profile JSON.
    pub const USER: &str = "user";
    /// Denormalized bearer token.
    pub const TOKEN: &str = "token";
    /// Denormalized server-side session id.
    pub const SESSION_ID: &str = "session_id";
    /// Denormalized expiry, stringified epoch milliseconds.
    pub const EXPIRES_AT: &str = "expires_at";
    /// `"true"` sentinel while a session exists.
    pub const IS_ACTIVE: &str = "is_active";
    /// Backend-issued refresh token, when present.
    pub const REFRESH_TOKEN: &str = "refresh_token";

    /// Key names written by earlier client versions. Cleared alongside the
    /// current set so no stale partial state survives a schema change.
    pub const LEGACY: &[&str] = &[
        "auth_token",
        "auth_user",
        "currentUser",
        "erp_session",
        "logged_in",
    ];
}
