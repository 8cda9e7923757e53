//! Session authentication middleware
//!
//! Guards the admin API routes. A request is authorized when it carries a
//! live session token, either as `Authorization: Bearer <token>` or in the
//! `songdrop_session` cookie set at login. The health endpoint and all
//! public pages never pass through this middleware.

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::warn;

use crate::AppState;

/// Name of the session cookie set by `POST /admin/login`
pub const SESSION_COOKIE: &str = "songdrop_session";

/// Authentication middleware for admin routes
pub async fn auth_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let token = extract_token(request.headers()).ok_or(AuthError::MissingToken)?;

    if !state.sessions.validate(&token) {
        warn!("Rejected admin request with invalid or expired session token");
        return Err(AuthError::InvalidToken);
    }

    Ok(next.run(request).await)
}

/// Pull a session token out of the request headers.
///
/// Bearer header wins over the cookie when both are present.
pub fn extract_token(headers: &HeaderMap) -> Option<String> {
    if let Some(value) = headers.get(header::AUTHORIZATION) {
        if let Ok(value) = value.to_str() {
            if let Some(token) = value.strip_prefix("Bearer ") {
                return Some(token.trim().to_string());
            }
        }
    }

    let cookies = headers.get(header::COOKIE)?.to_str().ok()?;
    cookies.split(';').find_map(|pair| {
        let (name, value) = pair.trim().split_once('=')?;
        (name == SESSION_COOKIE).then(|| value.to_string())
    })
}

/// Authentication error types for HTTP responses
#[derive(Debug)]
pub enum AuthError {
    MissingToken,
    InvalidToken,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let message = match self {
            AuthError::MissingToken => "Authentication required",
            AuthError::InvalidToken => "Invalid or expired session",
        };

        let body = Json(json!({ "error": message }));
        (StatusCode::UNAUTHORIZED, body).into_response()
    }
}
