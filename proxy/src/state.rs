//! Shared proxy state, injected into handlers via the `State` extractor.

use std::sync::Arc;
use std::time::Duration;

use crate::config::ProxyConfig;

#[derive(Clone)]
pub struct AppState {
    pub http: reqwest::Client,
    pub config: Arc<ProxyConfig>,
}

impl AppState {
    /// # Errors
    ///
    /// Returns an error if the upstream HTTP client cannot be constructed.
    pub fn new(config: ProxyConfig) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.upstream_timeout_secs))
            .build()?;
        Ok(Self { http, config: Arc::new(config) })
    }
}
