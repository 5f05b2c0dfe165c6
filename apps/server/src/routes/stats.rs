//! Lexicon statistics endpoint

use axum::{extract::State, Json};

use crate::error::{ApiError, Result};
use crate::models::StatsResponse;
use crate::AppState;

/// GET /api/stats
pub async fn get(State(state): State<AppState>) -> Result<Json<StatsResponse>> {
    let app = state.clone();
    let lexicon = tokio::task::spawn_blocking(move || {
        let lexicon = app
            .lexicon
            .lock()
            .map_err(|_| ApiError::Internal("lexicon lock poisoned".to_string()))?;
        Ok::<_, ApiError>(lexicon.stats()?)
    })
    .await
    .map_err(|e| ApiError::Internal(format!("stats task failed: {e}")))??;

    Ok(Json(StatsResponse {
        lexicon,
        sessions: state.sessions.len()?,
    }))
}
