//! Public endpoints: queue display and request submission

use axum::{extract::State, http::StatusCode, Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use songdrop_common::{RequestStatus, SongRequest};

use crate::api::ApiError;
use crate::queue::{NewRequest, PublicEntry};
use crate::AppState;

/// Full request record as exposed over the API
#[derive(Debug, Serialize)]
pub struct RequestInfo {
    pub id: Uuid,
    pub name: String,
    #[serde(rename = "songTitle")]
    pub song_title: String,
    pub status: RequestStatus,
    pub order: i64,
    #[serde(rename = "paymentReference")]
    pub payment_reference: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl From<SongRequest> for RequestInfo {
    fn from(request: SongRequest) -> Self {
        Self {
            id: request.id,
            name: request.requester_name,
            song_title: request.song_title,
            status: request.status,
            order: request.display_order,
            payment_reference: request.payment_reference,
            timestamp: request.created_at,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SubmitRequest {
    pub name: Option<String>,
    // Defaulted so an absent title reaches the manager's validation
    // instead of a serde rejection
    #[serde(rename = "songTitle", default)]
    pub song_title: String,
    #[serde(rename = "paymentReference")]
    pub payment_reference: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SubmitResponse {
    pub message: String,
    pub request: RequestInfo,
}

/// GET /api/queue
///
/// Public projection of the pending queue, ascending by rank. Polled by
/// the public display page.
pub async fn get_queue(
    State(state): State<AppState>,
) -> Result<Json<Vec<PublicEntry>>, ApiError> {
    let queue = state.queue.public_queue().await?;
    Ok(Json(queue))
}

/// POST /api/requests
///
/// Submission entry point, called by the request page once the payment
/// provider has redirected back with a reference.
pub async fn submit_request(
    State(state): State<AppState>,
    Json(body): Json<SubmitRequest>,
) -> Result<(StatusCode, Json<SubmitResponse>), ApiError> {
    let created = state
        .queue
        .submit(NewRequest {
            name: body.name,
            song_title: body.song_title,
            payment_reference: body.payment_reference,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(SubmitResponse {
            message: "Song request submitted successfully!".to_string(),
            request: created.into(),
        }),
    ))
}
