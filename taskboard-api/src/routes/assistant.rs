/// Assistant endpoints
///
/// - `POST /v1/projects/:project_id/assistant/summarize` → `{ "summary": "..." }`
/// - `POST /v1/projects/:project_id/assistant/ask` → `{ "answer": "..." }`
///
/// Both answer 503 when no completion service is configured. The
/// assistant's text is returned as-is.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use taskboard_shared::assistant::summarize_board;
use taskboard_shared::auth::middleware::AuthContext;
use uuid::Uuid;

pub const QUESTION_MAX: usize = 2000;

#[derive(Debug, Serialize, Deserialize)]
pub struct SummaryResponse {
    pub summary: String,
}

#[derive(Debug, Deserialize)]
pub struct AskRequest {
    #[serde(default)]
    pub question: String,

    /// Narrows the context to a single task
    pub task_id: Option<Uuid>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AskResponse {
    pub answer: String,
}

pub async fn summarize(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(project_id): Path<Uuid>,
) -> ApiResult<Json<SummaryResponse>> {
    let assistant = state.assistant()?;
    let digest = state.board.digest(auth.user_id, project_id, None).await?;

    let summary = summarize_board(assistant, &digest).await?;
    Ok(Json(SummaryResponse { summary }))
}

pub async fn ask(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(project_id): Path<Uuid>,
    Json(req): Json<AskRequest>,
) -> ApiResult<Json<AskResponse>> {
    let question = req.question.trim();
    if question.is_empty() {
        return Err(ApiError::invalid("question", "must not be blank"));
    }
    if question.chars().count() > QUESTION_MAX {
        return Err(ApiError::invalid(
            "question",
            format!("must be at most {} characters", QUESTION_MAX),
        ));
    }

    let assistant = state.assistant()?;
    let digest = state
        .board
        .digest(auth.user_id, project_id, req.task_id)
        .await?;

    tracing::debug!(
        assistant = assistant.name(),
        project_id = %project_id,
        focused = req.task_id.is_some(),
        "Asking assistant"
    );
    let answer = assistant.ask(&digest, question).await?;
    Ok(Json(AskResponse { answer }))
}
