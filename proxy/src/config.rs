//! Proxy configuration parsed from environment variables.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_UPSTREAM_TIMEOUT_SECS: u64 = 15;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} is required")]
    Missing(&'static str),
    #[error("invalid PORT: {0}")]
    InvalidPort(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxyConfig {
    /// CMS backend base URL, without a trailing slash.
    pub backend_url: String,
    pub port: u16,
    /// Whether the session cookie carries the `Secure` attribute.
    pub cookie_secure: bool,
    pub upstream_timeout_secs: u64,
}

impl ProxyConfig {
    /// Build proxy config from environment variables.
    ///
    /// Required:
    /// - `BACKEND_URL`
    ///
    /// Optional:
    /// - `PORT`: default 3000
    /// - `COOKIE_SECURE`: boolean; defaults to true when `APP_ENV=production`
    /// - `UPSTREAM_TIMEOUT_SECS`: default 15
    ///
    /// # Errors
    ///
    /// Returns an error if `BACKEND_URL` is unset or `PORT` is not a number.
    pub fn from_env() -> Result<Self, ConfigError> {
        let backend_url = std::env::var("BACKEND_URL")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .ok_or(ConfigError::Missing("BACKEND_URL"))?;
        let port = match std::env::var("PORT") {
            Ok(raw) => raw.trim().parse::<u16>().map_err(|_| ConfigError::InvalidPort(raw))?,
            Err(_) => DEFAULT_PORT,
        };
        let cookie_secure = env_bool("COOKIE_SECURE")
            .unwrap_or_else(|| is_production(std::env::var("APP_ENV").ok().as_deref()));
        let upstream_timeout_secs = std::env::var("UPSTREAM_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.trim().parse::<u64>().ok())
            .unwrap_or(DEFAULT_UPSTREAM_TIMEOUT_SECS);

        Ok(Self {
            backend_url: backend_url.trim().trim_end_matches('/').to_owned(),
            port,
            cookie_secure,
            upstream_timeout_secs,
        })
    }

    #[must_use]
    pub fn login_url(&self) -> String {
        format!("{}/api/auth/login", self.backend_url)
    }
}

pub(crate) fn env_bool(key: &str) -> Option<bool> {
    std::env::var(key)
        .ok()
        .and_then(|raw| match raw.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Some(true),
            "0" | "false" | "no" | "off" => Some(false),
            _ => None,
        })
}

fn is_production(app_env: Option<&str>) -> bool {
    app_env.is_some_and(|env| env.trim().eq_ignore_ascii_case("production"))
}
