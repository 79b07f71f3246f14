//! Login proxy routes.
//!
//! SYSTEM CONTEXT
//! ==============
//! Browsers post credentials here instead of to the CMS backend directly.
//! The proxy forwards them, relays the backend's answer verbatim, and on
//! success also drops the token into an `HttpOnly` cookie so server-rendered
//! pages can authenticate without reading browser storage.

#[cfg(test)]
#[path = "routes_test.rs"]
mod routes_test;

use axum::Router;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use axum::routing::{get, post};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use time::Duration;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

pub const COOKIE_NAME: &str = "token";
pub const COOKIE_MAX_AGE_SECS: i64 = 3600;

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/api/auth/login", post(login))
        .route("/healthz", get(healthz))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn healthz() -> &'static str {
    "ok"
}

/// `POST /api/auth/login` — forward credentials, set the session cookie on success.
pub async fn login(State(state): State<AppState>, payload: Result<Json<LoginRequest>, JsonRejection>) -> Response {
    let Json(credentials) = match payload {
        Ok(body) => body,
        Err(e) => {
            tracing::warn!(error = %e, "login request body rejected");
            return authentication_failed();
        }
    };

    let url = state.config.login_url();
    tracing::info!(%url, email = %credentials.email, "forwarding login");

    let upstream = match state.http.post(&url).json(&credentials).send().await {
        Ok(resp) => resp,
        Err(e) => {
            tracing::error!(error = %e, "login upstream unreachable");
            return authentication_failed();
        }
    };
    let status = StatusCode::from_u16(upstream.status().as_u16()).unwrap_or(StatusCode::BAD_GATEWAY);
    let body: Value = match upstream.json().await {
        Ok(body) => body,
        Err(e) => {
            tracing::error!(error = %e, %status, "login upstream returned non-JSON body");
            return authentication_failed();
        }
    };

    if !status.is_success() {
        return (status, Json(body)).into_response();
    }

    let Some(token) = extract_token(&body) else {
        tracing::warn!("login succeeded upstream without a token; no cookie set");
        return Json(body).into_response();
    };
    let jar = CookieJar::new().add(session_cookie(token.to_owned(), state.config.cookie_secure));
    (jar, Json(body)).into_response()
}

/// Token from `{ data: { token } }`, or a top-level `{ token }`.
pub(crate) fn extract_token(body: &Value) -> Option<&str> {
    body.pointer("/data/token")
        .or_else(|| body.get("token"))
        .and_then(Value::as_str)
        .filter(|token| !token.trim().is_empty())
}

pub(crate) fn session_cookie(token: String, secure: bool) -> Cookie<'static> {
    Cookie::build((COOKIE_NAME, token))
        .path("/")
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Strict)
        .max_age(Duration::seconds(COOKIE_MAX_AGE_SECS))
        .build()
}

pub(crate) fn authentication_failed() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "status": 0, "message": "Authentication failed" })),
    )
        .into_response()
}
