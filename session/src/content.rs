//! REST client for articles, authors and categories.
//!
//! SYSTEM CONTEXT
//! ==============
//! Thin JSON mapping over `/api/<resource>[/<id>]`; payloads stay
//! `serde_json::Value` because the CMS forms own their shapes. Requests carry
//! the session's bearer token when there is one, and a 401 is reported back
//! to the `SessionStore` as an implicit logout. This is the only place a
//! session that expires mid-use is detected.

#[cfg(test)]
#[path = "content_test.rs"]
mod content_test;

use std::fmt;
use std::time::Duration;

use reqwest::{Method, StatusCode};
use serde_json::Value;

use crate::backend::backend_message;
use crate::config::SessionConfig;
use crate::error::ContentError;
use crate::store::SessionStore;

/// CMS collections exposed by the backend.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Resource {
    Articles,
    Authors,
    Categories,
}

impl Resource {
    #[must_use]
    pub fn collection_path(self) -> &'static str {
        match self {
            Self::Articles => "/api/articles",
            Self::Authors => "/api/authors",
            Self::Categories => "/api/categories",
        }
    }

    #[must_use]
    pub fn item_path(self, id: &str) -> String {
        format!("{}/{}", self.collection_path(), id.trim_matches('/'))
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.collection_path().trim_start_matches("/api/"))
    }
}

#[derive(Clone)]
pub struct ContentClient {
    http: reqwest::Client,
    base_url: String,
    session: SessionStore,
}

impl ContentClient {
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(config: &SessionConfig, session: SessionStore) -> Result<Self, ContentError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeouts.request_secs))
            .build()?;
        Ok(Self { http, base_url: config.backend_url.clone(), session })
    }

    /// List every item in a collection.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, a non-2xx status, or a
    /// non-JSON body.
    pub async fn list(&self, resource: Resource) -> Result<Value, ContentError> {
        self.request(Method::GET, resource.collection_path(), None).await
    }

    /// List articles with a caller-built query string such as
    /// `category=3&author=9`.
    ///
    /// # Errors
    ///
    /// Same as [`ContentClient::list`].
    pub async fn list_articles(&self, query: &str) -> Result<Value, ContentError> {
        let path = format!("{}{}", Resource::Articles.collection_path(), query_suffix(query));
        self.request(Method::GET, &path, None).await
    }

    /// # Errors
    ///
    /// Same as [`ContentClient::list`].
    pub async fn get(&self, resource: Resource, id: &str) -> Result<Value, ContentError> {
        self.request(Method::GET, &resource.item_path(id), None).await
    }

    /// # Errors
    ///
    /// Same as [`ContentClient::list`].
    pub async fn create(&self, resource: Resource, body: &Value) -> Result<Value, ContentError> {
        self.request(Method::POST, resource.collection_path(), Some(body)).await
    }

    /// # Errors
    ///
    /// Same as [`ContentClient::list`].
    pub async fn update(&self, resource: Resource, id: &str, body: &Value) -> Result<Value, ContentError> {
        self.request(Method::PUT, &resource.item_path(id), Some(body)).await
    }

    async fn request(&self, method: Method, path: &str, body: Option<&Value>) -> Result<Value, ContentError> {
        let url = format!("{}{path}", self.base_url);
        tracing::debug!(%method, %url, "content request");

        let mut req = self.http.request(method, url);
        if let Some(token) = self.session.token() {
            req = req.bearer_auth(token);
        }
        if let Some(body) = body {
            req = req.json(body);
        }

        let resp = req.send().await?;
        let status = resp.status();
        if status == StatusCode::UNAUTHORIZED {
            self.session.handle_unauthorized();
            return Err(ContentError::Unauthorized);
        }
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            return Err(ContentError::Status { status: status.as_u16(), message: failure_message(status, &text) });
        }

        let bytes = resp.bytes().await?;
        parse_body(&bytes)
    }
}

fn query_suffix(query: &str) -> String {
    let query = query.trim().trim_start_matches('?');
    if query.is_empty() { String::new() } else { format!("?{query}") }
}

fn failure_message(status: StatusCode, body: &str) -> String {
    backend_message(body)
        .unwrap_or_else(|| format!("API error: {}", status.canonical_reason().unwrap_or("unknown status")))
}

fn parse_body(bytes: &[u8]) -> Result<Value, ContentError> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Null);
    }
    Ok(serde_json::from_slice(bytes)?)
}
