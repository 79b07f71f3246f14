//! Session configuration parsed from environment variables.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use std::path::PathBuf;

pub const DEFAULT_BACKEND_URL: &str = "http://localhost:5000";
pub const DEFAULT_VERIFY_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

const TOKEN_DIR: &str = ".newsdesk";
const TOKEN_FILE: &str = "auth_token";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionTimeouts {
    /// Upper bound on the startup verification call.
    pub verify_secs: u64,
    /// Per-request timeout applied by the HTTP client.
    pub request_secs: u64,
}

impl Default for SessionTimeouts {
    fn default() -> Self {
        Self { verify_secs: DEFAULT_VERIFY_TIMEOUT_SECS, request_secs: DEFAULT_REQUEST_TIMEOUT_SECS }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    pub backend_url: String,
    pub token_file: PathBuf,
    pub timeouts: SessionTimeouts,
}

impl SessionConfig {
    /// Config pointing at `backend_url` with default token path and timeouts.
    #[must_use]
    pub fn new(backend_url: &str) -> Self {
        Self {
            backend_url: normalize_base_url(backend_url),
            token_file: default_token_file(std::env::var("HOME").ok().as_deref()),
            timeouts: SessionTimeouts::default(),
        }
    }

    /// Build typed session config from environment variables.
    ///
    /// Optional:
    /// - `NEWSDESK_BACKEND_URL`: default `http://localhost:5000`
    /// - `NEWSDESK_TOKEN_FILE`: default `$HOME/.newsdesk/auth_token`
    /// - `NEWSDESK_VERIFY_TIMEOUT_SECS`: default 10
    /// - `NEWSDESK_REQUEST_TIMEOUT_SECS`: default 30
    #[must_use]
    pub fn from_env() -> Self {
        let backend_url =
            std::env::var("NEWSDESK_BACKEND_URL").unwrap_or_else(|_| DEFAULT_BACKEND_URL.to_owned());
        let token_file = std::env::var("NEWSDESK_TOKEN_FILE")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .map_or_else(|| default_token_file(std::env::var("HOME").ok().as_deref()), PathBuf::from);
        let timeouts = SessionTimeouts {
            verify_secs: env_parse_u64("NEWSDESK_VERIFY_TIMEOUT_SECS", DEFAULT_VERIFY_TIMEOUT_SECS),
            request_secs: env_parse_u64("NEWSDESK_REQUEST_TIMEOUT_SECS", DEFAULT_REQUEST_TIMEOUT_SECS),
        };

        Self { backend_url: normalize_base_url(&backend_url), token_file, timeouts }
    }
}

fn normalize_base_url(raw: &str) -> String {
    raw.trim().trim_end_matches('/').to_owned()
}

fn default_token_file(home: Option<&str>) -> PathBuf {
    let base = home.filter(|h| !h.is_empty()).map_or_else(PathBuf::new, PathBuf::from);
    base.join(TOKEN_DIR).join(TOKEN_FILE)
}

/// Positive integer from `key`; unset, unparsable or zero yields `default`.
fn env_parse_u64(key: &str, default: u64) -> u64 {
    std::env::var(key)
        .ok()
        .and_then(|v| v.trim().parse::<u64>().ok())
        .filter(|v| *v > 0)
        .unwrap_or(default)
}
