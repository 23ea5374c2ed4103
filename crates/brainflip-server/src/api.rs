use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::response::Json;
use serde_json::Value;

use brainflip_core::{Leaderboard, ScoreService, ServiceError, Submission};

use crate::error::AppError;
use crate::state::AppState;

/// Runs a store operation on the blocking pool. The lock stays held until it
/// finishes, so file access remains serialized.
async fn with_service<T, F>(state: &AppState, op: F) -> Result<T, AppError>
where
    T: Send + 'static,
    F: FnOnce(&ScoreService) -> Result<T, ServiceError> + Send + 'static,
{
    let guard = state.scores.lock().await;
    let service = guard.clone();
    let result = tokio::task::spawn_blocking(move || op(&service)).await?;
    drop(guard);
    Ok(result?)
}

/// GET /api/scores — the current top scores, highest first.
pub async fn list_scores(State(state): State<AppState>) -> Result<Json<Leaderboard>, AppError> {
    let board = with_service(&state, ScoreService::list).await?;
    Ok(Json(board))
}

/// POST /api/scores — validate `{ "score": ... }` and merge it into the leaderboard.
///
/// A body without a JSON content type is read as an empty object, so it is
/// reported as a missing score. Malformed JSON keeps the extractor's status.
pub async fn submit_score(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Submission>, AppError> {
    let body = match payload {
        Ok(Json(body)) => body,
        Err(JsonRejection::MissingJsonContentType(_)) => Value::Null,
        Err(rejection) => return Err(rejection.into()),
    };

    let submission = with_service(&state, move |service| service.submit(body.get("score"))).await?;
    Ok(Json(submission))
}
