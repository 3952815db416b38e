//! Application configuration loaded from environment variables.
//!
//! Every knob has a default so a bare `opsuite-auth` invocation works
//! offline against the demo directory; setting `OPSUITE_BACKEND_URL`
//! switches the orchestrator to backend-first behavior.

use std::env;

/// Default session time-to-live: 15 minutes.
pub const DEFAULT_SESSION_TTL_MS: i64 = 15 * 60 * 1000;

/// Default one-time-code window: 5 minutes.
pub const DEFAULT_OTP_TTL_MS: i64 = 5 * 60 * 1000;

/// Default proactive-refresh margin before expiry: 5 minutes.
pub const DEFAULT_REFRESH_MARGIN_MS: i64 = 5 * 60 * 1000;

/// Default one-time-code width in digits.
pub const DEFAULT_OTP_LENGTH: usize = 6;

/// Default HTTP timeout for backend calls, seconds.
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 5;

/// Authentication configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Base URL of the remote auth backend. `None` means local-only mode:
    /// static directory logins and local expiry checks, no network calls.
    pub backend_url: Option<String>,
    /// Session time-to-live in milliseconds. Backend-issued sessions carry
    /// their own expiry and override this per call.
    pub session_ttl_ms: i64,
    /// One-time-code window in milliseconds, independent of the session TTL.
    pub otp_ttl_ms: i64,
    /// One-time-code width in digits.
    pub otp_length: usize,
    /// How close to expiry `current_user` starts refreshing proactively.
    pub refresh_margin_ms: i64,
    /// Timeout for backend HTTP calls, seconds.
    pub http_timeout_secs: u64,
    /// Path of the on-disk session file used by the CLI.
    pub session_file: String,
}

impl Default for AuthConfig {
    /// Default config for testing only.
    fn default() -> Self {
        Self {
            backend_url: None,
            session_ttl_ms: DEFAULT_SESSION_TTL_MS,
            otp_ttl_ms: DEFAULT_OTP_TTL_MS,
            otp_length: DEFAULT_OTP_LENGTH,
            refresh_margin_ms: DEFAULT_REFRESH_MARGIN_MS,
            http_timeout_secs: DEFAULT_HTTP_TIMEOUT_SECS,
            session_file: ".opsuite-session.json".to_string(),
        }
    }
}

impl AuthConfig {
    /// Load configuration from environment variables.
    ///
    /// Unset variables fall back to defaults; unparseable numbers do too.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok(); // Load .env file if present

        let parse_i64 = |name: &str, default: i64| {
            env::var(name)
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(default)
        };

        Self {
            backend_url: env::var("OPSUITE_BACKEND_URL")
                .ok()
                .map(|v| v.trim_end_matches('/').to_string())
                .filter(|v| !v.is_empty()),
            session_ttl_ms: parse_i64("OPSUITE_SESSION_TTL_MS", DEFAULT_SESSION_TTL_MS),
            otp_ttl_ms: parse_i64("OPSUITE_OTP_TTL_MS", DEFAULT_OTP_TTL_MS),
            otp_length: env::var("OPSUITE_OTP_LENGTH")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_OTP_LENGTH),
            refresh_margin_ms: parse_i64("OPSUITE_REFRESH_MARGIN_MS", DEFAULT_REFRESH_MARGIN_MS),
            http_timeout_secs: env::var("OPSUITE_HTTP_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_HTTP_TIMEOUT_SECS),
            session_file: env::var("OPSUITE_SESSION_FILE")
                .unwrap_or_else(|_| ".opsuite-session.json".to_string()),
        }
    }

    /// Config for tests: local-only, default TTLs.
    pub fn test_default() -> Self {
        Self::default()
    }
}
