//! Admin endpoints: login, queue management, reorder

use axum::{
    extract::{Path, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{info, warn};
use uuid::Uuid;

use songdrop_common::session::{session_ttl, verify_password};
use songdrop_common::Error;

use crate::api::auth::{extract_token, SESSION_COOKIE};
use crate::api::public::RequestInfo;
use crate::api::ApiError;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct ReorderResponse {
    pub success: bool,
    pub updated: usize,
}

/// POST /admin/login
///
/// Exchanges the admin password for a session token, returned in the body
/// and as an HttpOnly cookie so both the dashboard and API clients can use
/// it.
pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<Response, ApiError> {
    if !verify_password(&state.db, &body.password).await? {
        warn!("Failed admin login attempt");
        let body = Json(json!({ "error": "Invalid password" }));
        return Ok((StatusCode::UNAUTHORIZED, body).into_response());
    }

    let ttl = session_ttl(&state.db).await;
    let token = state.sessions.create(ttl);
    info!("Admin logged in (session valid {}h)", ttl.num_hours());

    let cookie = format!(
        "{}={}; HttpOnly; Path=/; SameSite=Strict",
        SESSION_COOKIE, token
    );
    let response = (
        StatusCode::OK,
        [(header::SET_COOKIE, cookie)],
        Json(json!({ "token": token })),
    );
    Ok(response.into_response())
}

/// POST /admin/logout
///
/// Revokes the presented session. Succeeds even without one so the
/// dashboard's logout button is always safe to press.
pub async fn logout(State(state): State<AppState>, headers: HeaderMap) -> Response {
    if let Some(token) = extract_token(&headers) {
        state.sessions.revoke(&token);
        info!("Admin session revoked");
    }

    let cookie = format!("{}=; HttpOnly; Path=/; Max-Age=0", SESSION_COOKIE);
    (
        StatusCode::OK,
        [(header::SET_COOKIE, cookie)],
        Json(json!({ "success": true })),
    )
        .into_response()
}

/// GET /api/admin/requests
///
/// Full records, pending first by rank, then the played/skipped history.
pub async fn list_requests(
    State(state): State<AppState>,
) -> Result<Json<Vec<RequestInfo>>, ApiError> {
    let requests = state.queue.admin_queue().await?;
    Ok(Json(requests.into_iter().map(RequestInfo::from).collect()))
}

/// POST /api/admin/requests/:id/played
pub async fn mark_played(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<RequestInfo>, ApiError> {
    let request = state.queue.mark_played(id).await?;
    Ok(Json(request.into()))
}

/// POST /api/admin/requests/:id/skipped
pub async fn mark_skipped(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<RequestInfo>, ApiError> {
    let request = state.queue.mark_skipped(id).await?;
    Ok(Json(request.into()))
}

/// POST /api/admin/reorder
///
/// Body: `{"order": ["<id>", ...]}` - the full desired display order of
/// the pending queue as the dashboard shows it after a drag-and-drop.
/// The payload is validated here so a malformed body is rejected before
/// the queue manager runs.
pub async fn reorder(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<Json<ReorderResponse>, ApiError> {
    let ordered_ids = parse_order_payload(&body)?;
    let updated = state.queue.reorder(&ordered_ids).await?;
    Ok(Json(ReorderResponse {
        success: true,
        updated,
    }))
}

fn parse_order_payload(body: &Value) -> Result<Vec<Uuid>, ApiError> {
    let items = body
        .get("order")
        .and_then(Value::as_array)
        .ok_or_else(|| Error::InvalidOrder("'order' must be an array of ids".to_string()))?;

    items
        .iter()
        .map(|item| {
            let s = item
                .as_str()
                .ok_or_else(|| Error::InvalidOrder(format!("Not an id: {}", item)))?;
            Uuid::parse_str(s).map_err(|_| Error::InvalidOrder(format!("Not a valid id: {}", s)))
        })
        .collect::<Result<Vec<_>, Error>>()
        .map_err(ApiError::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_payload_accepts_id_array() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let body = json!({ "order": [a.to_string(), b.to_string()] });
        assert_eq!(parse_order_payload(&body).unwrap(), vec![a, b]);
    }

    #[test]
    fn order_payload_rejects_non_array() {
        for body in [json!({}), json!({ "order": "abc" }), json!({ "order": 7 })] {
            assert!(parse_order_payload(&body).is_err());
        }
    }

    #[test]
    fn order_payload_rejects_non_uuid_elements() {
        let body = json!({ "order": ["not-a-uuid"] });
        assert!(parse_order_payload(&body).is_err());

        let body = json!({ "order": [42] });
        assert!(parse_order_payload(&body).is_err());
    }
}
