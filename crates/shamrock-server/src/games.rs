//! Handlers for the games corner.
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `POST` | `/api/games/{game}` | Start a quiz or memory round |
//! | `POST` | `/api/games/rounds/{id}/answer` | Answer the current quiz question |
//! | `POST` | `/api/games/rounds/{id}/flip` | Flip a memory card |
//! | `GET` | `/api/games/rounds/{id}` | Face-up view of a memory board |
//! | `POST` | `/api/games/sanctuary` | Score a sanctuary grid |

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde::Deserialize;
use shamrock_types::{GameRoundId, MiniGame};

use crate::error::ApiError;
use crate::handlers::parse_uuid;
use crate::state::AppState;

/// Body of the answer endpoint.
#[derive(Debug, Deserialize)]
pub struct AnswerBody {
    /// The chosen option or typed word.
    pub answer: String,
}

/// Body of the flip endpoint.
#[derive(Debug, Deserialize)]
pub struct FlipBody {
    /// 0-based card position.
    pub index: usize,
}

/// Body of the sanctuary endpoint.
#[derive(Debug, Deserialize)]
pub struct SanctuaryBody {
    /// Grid cells in row-major order; `null` for empty.
    pub grid: Vec<Option<String>>,
}

fn round_id(raw: &str) -> Result<GameRoundId, ApiError> {
    parse_uuid(raw).map(GameRoundId::from)
}

/// Start a round.
pub async fn start_game(
    State(state): State<Arc<AppState>>,
    Path(game): Path<MiniGame>,
) -> Result<impl IntoResponse, ApiError> {
    let start = state.app.start_game(game).await?;
    Ok((StatusCode::CREATED, Json(start)))
}

/// Answer the current question.
pub async fn answer(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(body): Json<AnswerBody>,
) -> Result<impl IntoResponse, ApiError> {
    let id = round_id(&id)?;
    Ok(Json(state.app.answer(id, &body.answer).await?))
}

/// Flip a card.
pub async fn flip(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(body): Json<FlipBody>,
) -> Result<impl IntoResponse, ApiError> {
    let id = round_id(&id)?;
    Ok(Json(state.app.flip(id, body.index).await?))
}

/// Face-up view of a memory board.
pub async fn board(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id = round_id(&id)?;
    Ok(Json(state.app.board(id).await?))
}

/// Score a sanctuary and credit the reward.
pub async fn submit_sanctuary(
    State(state): State<Arc<AppState>>,
    Json(body): Json<SanctuaryBody>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(state.app.submit_sanctuary(&body.grid).await?))
}
