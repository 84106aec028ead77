//! REST handlers for the profile, community, shop, missions and chat.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET` | `/api/health` | Liveness and backend names |
//! | `GET` | `/api/profile` | Current profile |
//! | `PATCH` | `/api/profile` | Edit name, street, groups or bio |
//! | `POST` | `/api/profile/register` | One-time registration |
//! | `PUT` | `/api/profile/avatar` | Select an unlocked avatar |
//! | `PUT` | `/api/profile/theme` | Select an owned theme (or clear) |
//! | `GET` | `/api/neighborhoods` | Selectable neighborhoods |
//! | `GET` | `/api/standings` | Neighborhood points totals |
//! | `GET` | `/api/peers` | Community member pool |
//! | `PUT` | `/api/peers` | Replace the member pool |
//! | `GET` | `/api/leaderboard` | Ranked entries (`?scope=county`) |
//! | `GET` | `/api/actions` | Action catalog |
//! | `GET` | `/api/badges` | Badge catalog |
//! | `POST` | `/api/badges` | Add a badge definition |
//! | `GET` | `/api/shop` | Shop listings |
//! | `POST` | `/api/shop/items` | Add a shop item |
//! | `POST` | `/api/shop/{id}/purchase` | Buy an item |
//! | `GET` | `/api/mission` | Active goal and cooldown |
//! | `POST` | `/api/mission` | Issue a team goal |
//! | `POST` | `/api/mission/tick` | Tick the active goal |
//! | `GET` | `/api/rooms` | Rooms the user belongs to |
//! | `GET` | `/api/rooms/{type}/{name}/messages` | Room history |
//! | `POST` | `/api/rooms/{type}/{name}/messages` | Post a message |

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde::Deserialize;
use shamrock_core::{NEIGHBORHOODS, ProfileUpdate, RegistrationForm};
use shamrock_types::{
    Attachment, BadgeDefinition, LeaderRole, LeaderboardScope, PeerProfile, RoomKey, RoomType,
    ShopItem,
};
use uuid::Uuid;

use crate::error::ApiError;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request bodies
// ---------------------------------------------------------------------------

/// Query parameters for `GET /api/leaderboard`.
#[derive(Debug, Deserialize)]
pub struct LeaderboardQuery {
    /// `neighborhood` or `county`; the configured default when absent.
    pub scope: Option<LeaderboardScope>,
}

/// Body of `PUT /api/profile/avatar`.
#[derive(Debug, Deserialize)]
pub struct AvatarBody {
    /// The avatar icon.
    pub icon: String,
}

/// Body of `PUT /api/profile/theme`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemeBody {
    /// Theme item id, or `null` for the default palette.
    pub theme_id: Option<String>,
}

/// Body of `POST /api/mission`.
#[derive(Debug, Deserialize)]
pub struct GoalBody {
    /// Goal text.
    pub goal: String,
}

/// Body of `POST /api/mission/tick`.
#[derive(Debug, Deserialize)]
pub struct TickBody {
    /// Which leader is ticking.
    pub role: LeaderRole,
}

/// Body of `POST /api/rooms/{type}/{name}/messages`.
#[derive(Debug, Deserialize)]
pub struct PostMessageBody {
    /// Message text.
    pub text: String,
    /// Optional media attachment.
    #[serde(default)]
    pub attachment: Option<Attachment>,
}

// ---------------------------------------------------------------------------
// GET /api/health
// ---------------------------------------------------------------------------

/// Report liveness and which backends are in use.
pub async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "store": state.app.store_name(),
        "judge": state.app.judge_name(),
        "startedAt": state.started_at,
    }))
}

// ---------------------------------------------------------------------------
// Profile
// ---------------------------------------------------------------------------

/// Return the current profile.
pub async fn get_profile(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(state.app.profile().await)
}

/// Register the profile.
pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(form): Json<RegistrationForm>,
) -> Result<impl IntoResponse, ApiError> {
    let result = state.app.register(form).await?;
    Ok((StatusCode::CREATED, Json(result)))
}

/// Edit a registered profile.
pub async fn update_profile(
    State(state): State<Arc<AppState>>,
    Json(update): Json<ProfileUpdate>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(state.app.update_profile(update).await?))
}

/// Select an avatar.
pub async fn select_avatar(
    State(state): State<Arc<AppState>>,
    Json(body): Json<AvatarBody>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(state.app.select_avatar(&body.icon).await?))
}

/// Select (or clear) a theme.
pub async fn select_theme(
    State(state): State<Arc<AppState>>,
    Json(body): Json<ThemeBody>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(state.app.select_theme(body.theme_id.as_deref()).await?))
}

// ---------------------------------------------------------------------------
// Community
// ---------------------------------------------------------------------------

/// List the neighborhoods a user can register in.
pub async fn list_neighborhoods() -> impl IntoResponse {
    Json(NEIGHBORHOODS.as_slice())
}

/// Neighborhood totals, highest first.
pub async fn standings(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(state.app.neighborhood_standings().await)
}

/// List community members.
pub async fn list_peers(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(state.app.peers().await)
}

/// Replace the community member pool.
pub async fn replace_peers(
    State(state): State<Arc<AppState>>,
    Json(peers): Json<Vec<PeerProfile>>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(state.app.set_peers(peers).await?))
}

/// Ranked leaderboard.
pub async fn leaderboard(
    State(state): State<Arc<AppState>>,
    Query(params): Query<LeaderboardQuery>,
) -> impl IntoResponse {
    Json(state.app.leaderboard(params.scope).await)
}

// ---------------------------------------------------------------------------
// Catalog and shop
// ---------------------------------------------------------------------------

/// The action catalog.
pub async fn list_actions(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(state.app.actions().await)
}

/// The badge catalog.
pub async fn list_badges(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(state.app.badges().await)
}

/// Add a badge definition and re-run the rules.
pub async fn add_badge(
    State(state): State<Arc<AppState>>,
    Json(badge): Json<BadgeDefinition>,
) -> Result<impl IntoResponse, ApiError> {
    let result = state.app.add_badge(badge).await?;
    Ok((StatusCode::CREATED, Json(result)))
}

/// Shop listings with affordability and ownership.
pub async fn list_shop(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(state.app.shop().await)
}

/// Add a shop item.
pub async fn add_shop_item(
    State(state): State<Arc<AppState>>,
    Json(item): Json<ShopItem>,
) -> Result<impl IntoResponse, ApiError> {
    let result = state.app.add_shop_item(item).await?;
    Ok((StatusCode::CREATED, Json(result)))
}

/// Buy a shop item.
pub async fn purchase(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(state.app.purchase(&id).await?))
}

// ---------------------------------------------------------------------------
// Missions
// ---------------------------------------------------------------------------

/// Active goal, tick flags and the cooldown.
pub async fn get_mission(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let profile = state.app.profile().await;
    let next_goal_at = state.app.next_goal_available_at().await;
    Json(serde_json::json!({
        "activeGoal": profile.active_goal,
        "captainTicked": profile.has_captain_ticked_goal,
        "assistantTicked": profile.has_assistant_ticked_goal,
        "nextGoalAvailableAt": next_goal_at,
    }))
}

/// Issue a team goal.
pub async fn set_goal(
    State(state): State<Arc<AppState>>,
    Json(body): Json<GoalBody>,
) -> Result<impl IntoResponse, ApiError> {
    let message = state.app.set_goal(&body.goal).await?;
    Ok((StatusCode::CREATED, Json(message)))
}

/// Tick the active goal.
pub async fn tick_goal(
    State(state): State<Arc<AppState>>,
    Json(body): Json<TickBody>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(state.app.tick_goal(body.role).await?))
}

// ---------------------------------------------------------------------------
// Chat
// ---------------------------------------------------------------------------

/// Rooms the user belongs to.
pub async fn list_rooms(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(state.app.rooms().await)
}

/// Recent history of a room, oldest first.
pub async fn list_messages(
    State(state): State<Arc<AppState>>,
    Path((room_type, room_name)): Path<(RoomType, String)>,
) -> Result<impl IntoResponse, ApiError> {
    let room = RoomKey::new(room_type, room_name);
    Ok(Json(state.app.messages(&room).await?))
}

/// Post a message to a room.
pub async fn post_message(
    State(state): State<Arc<AppState>>,
    Path((room_type, room_name)): Path<(RoomType, String)>,
    Json(body): Json<PostMessageBody>,
) -> Result<impl IntoResponse, ApiError> {
    let room = RoomKey::new(room_type, room_name);
    let message = state.app.post_message(room, &body.text, body.attachment).await?;
    Ok((StatusCode::CREATED, Json(message)))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Parse a UUID from a path or body string.
pub(crate) fn parse_uuid(s: &str) -> Result<Uuid, ApiError> {
    s.parse::<Uuid>()
        .map_err(|e| ApiError::InvalidUuid(format!("{s}: {e}")))
}
