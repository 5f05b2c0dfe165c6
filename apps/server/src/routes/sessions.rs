//! Quiz session endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use tracing::info;
use uuid::Uuid;

use crate::error::Result;
use crate::models::*;
use crate::services::quiz;
use crate::AppState;

/// POST /api/sessions
pub async fn create(
    State(state): State<AppState>,
    Query(overrides): Query<FilterOverrides>,
) -> Result<(StatusCode, Json<RoundView>)> {
    let filter = state.default_filter.with_overrides(&overrides)?;
    let id = state.sessions.create(filter)?;
    info!(session = %id, "session created");

    let view = quiz::load_next(&state, id, &FilterOverrides::default()).await?;
    Ok((StatusCode::CREATED, Json(view)))
}

/// GET /api/sessions/:id
pub async fn get(State(state): State<AppState>, Path(id): Path<Uuid>) -> Result<Json<RoundView>> {
    let view = state.sessions.with_session(id, |session| Ok(session.view()))?;
    Ok(Json(view))
}

/// POST /api/sessions/:id/next
pub async fn next(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(overrides): Query<FilterOverrides>,
) -> Result<Json<RoundView>> {
    let view = quiz::load_next(&state, id, &overrides).await?;
    Ok(Json(view))
}

/// POST /api/sessions/:id/answer
pub async fn answer(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<AnswerRequest>,
) -> Result<Json<AnswerResponse>> {
    let response = quiz::submit_answer(&state.sessions, id, &payload.input)?;
    Ok(Json(response))
}

/// POST /api/sessions/:id/retry
pub async fn retry(State(state): State<AppState>, Path(id): Path<Uuid>) -> Result<Json<RoundView>> {
    Ok(Json(quiz::retry(&state.sessions, id)?))
}

/// POST /api/sessions/:id/continue
pub async fn continue_round(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<RoundView>> {
    Ok(Json(quiz::continue_round(&state, id).await?))
}

/// GET /api/sessions/:id/entry
pub async fn entry(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>> {
    Ok(Json(quiz::current_entry(&state.sessions, id)?))
}
