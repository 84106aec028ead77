//! Handlers for the verification gate.
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `POST` | `/api/verify/evidence` | Judge a photo and award on success |
//! | `POST` | `/api/verify/witness` | Ask a room to vouch for a claim |
//! | `GET` | `/api/verify/witness/{id}` | Status of a witness request |
//! | `POST` | `/api/verify/witness/{id}/confirm` | Vouch as a community member |
//! | `POST` | `/api/verify/witness/{id}/cancel` | Withdraw a request |
//! | `GET` | `/api/rooms/{type}/{name}/witnesses` | Pending requests in a room |
//!
//! Witness awards land asynchronously. Clients follow `/ws/witness` or poll
//! the status endpoint.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde::Deserialize;
use shamrock_core::CoreError;
use shamrock_types::{ActionKind, ProfileId, RoomKey, RoomType, WitnessRequestId};
use shamrock_verify::EvidenceImage;
use tracing::info;

use crate::error::ApiError;
use crate::handlers::parse_uuid;
use crate::state::AppState;

/// Body of `POST /api/verify/evidence`.
#[derive(Debug, Deserialize)]
pub struct EvidenceBody {
    /// The action being claimed.
    pub action: ActionKind,
    /// Quantity for per-unit actions.
    #[serde(default)]
    pub quantity: Option<u64>,
    /// The photo as a `data:` URL or bare base64.
    pub image: String,
}

/// Body of `POST /api/verify/witness`.
#[derive(Debug, Deserialize)]
pub struct WitnessBody {
    /// The action being claimed.
    pub action: ActionKind,
    /// Quantity for per-unit actions.
    #[serde(default)]
    pub quantity: Option<u64>,
    /// Room to ask; the neighborhood room when absent.
    #[serde(default)]
    pub room: Option<RoomKey>,
}

/// Body of the confirm endpoint.
#[derive(Debug, Deserialize)]
pub struct ConfirmBody {
    /// Id of the vouching member.
    pub confirmer: String,
}

fn request_id(raw: &str) -> Result<WitnessRequestId, ApiError> {
    parse_uuid(raw).map(WitnessRequestId::from)
}

/// Judge a photo of a completed action.
pub async fn submit_evidence(
    State(state): State<Arc<AppState>>,
    Json(body): Json<EvidenceBody>,
) -> Result<impl IntoResponse, ApiError> {
    let image = EvidenceImage::from_data_url(&body.image).map_err(CoreError::from)?;
    let result = state.app.verify_evidence(body.action, body.quantity, &image).await?;
    Ok(Json(result))
}

/// Post a witness request.
///
/// The background task that awards the claim keeps running after the
/// response is sent.
pub async fn request_witness(
    State(state): State<Arc<AppState>>,
    Json(body): Json<WitnessBody>,
) -> Result<impl IntoResponse, ApiError> {
    let claim = state
        .app
        .request_witness(body.action, body.quantity, body.room)
        .await?;
    info!(request_id = %claim.request.id, room = %claim.request.room, "Witness requested");
    Ok((
        StatusCode::ACCEPTED,
        Json(serde_json::json!({
            "request": claim.request,
            "message": claim.message,
        })),
    ))
}

/// Status of a witness request.
pub async fn witness_status(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id = request_id(&id)?;
    Ok(Json(state.app.witness_status(id).await?))
}

/// Vouch for a witness request.
pub async fn confirm_witness(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(body): Json<ConfirmBody>,
) -> Result<impl IntoResponse, ApiError> {
    let id = request_id(&id)?;
    let confirmer = ProfileId::from(parse_uuid(&body.confirmer)?);
    Ok(Json(state.app.confirm_witness(id, confirmer).await?))
}

/// Withdraw a witness request.
pub async fn cancel_witness(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id = request_id(&id)?;
    Ok(Json(state.app.cancel_witness(id).await?))
}

/// Pending witness requests in a room.
pub async fn pending_witnesses(
    State(state): State<Arc<AppState>>,
    Path((room_type, room_name)): Path<(RoomType, String)>,
) -> impl IntoResponse {
    let room = RoomKey::new(room_type, room_name);
    Json(state.app.pending_witnesses(&room).await)
}
