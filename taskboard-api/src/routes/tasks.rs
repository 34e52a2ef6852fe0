/// Task endpoints
///
/// Task responses carry the column expanded as `{id, name, order}`. The move
/// endpoint is addressed by task alone; the destination column must belong
/// to the task's project.
///
/// # Endpoints
///
/// - `GET|POST /v1/projects/:project_id/tasks`
/// - `GET|PUT|DELETE /v1/projects/:project_id/tasks/:task_id`
/// - `PATCH /v1/tasks/:task_id/move` with `{ "column_id": "...", "order": 0 }`

use super::MessageResponse;
use crate::{app::AppState, error::ApiResult};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use taskboard_shared::auth::middleware::AuthContext;
use taskboard_shared::models::task::TaskView;
use uuid::Uuid;

#[derive(Debug, Deserialize)]
pub struct CreateTaskRequest {
    pub column_id: Option<Uuid>,
    #[serde(default)]
    pub title: String,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateTaskRequest {
    #[serde(default)]
    pub title: String,
    pub description: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MoveTaskRequest {
    pub column_id: Uuid,
    pub order: i32,
}

pub async fn list_tasks(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(project_id): Path<Uuid>,
) -> ApiResult<Json<Vec<TaskView>>> {
    Ok(Json(state.board.list_tasks(auth.user_id, project_id).await?))
}

pub async fn get_task(
    State(state): State<AppState>,
    auth: AuthContext,
    Path((project_id, task_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<Json<TaskView>> {
    Ok(Json(state.board.get_task(auth.user_id, project_id, task_id).await?))
}

pub async fn create_task(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(project_id): Path<Uuid>,
    Json(req): Json<CreateTaskRequest>,
) -> ApiResult<(StatusCode, Json<TaskView>)> {
    let task = state
        .board
        .create_task(
            auth.user_id,
            project_id,
            req.column_id,
            &req.title,
            req.description.as_deref(),
        )
        .await?;
    Ok((StatusCode::CREATED, Json(task)))
}

pub async fn update_task(
    State(state): State<AppState>,
    auth: AuthContext,
    Path((project_id, task_id)): Path<(Uuid, Uuid)>,
    Json(req): Json<UpdateTaskRequest>,
) -> ApiResult<Json<TaskView>> {
    let task = state
        .board
        .update_task(
            auth.user_id,
            project_id,
            task_id,
            &req.title,
            req.description.as_deref(),
        )
        .await?;
    Ok(Json(task))
}

pub async fn delete_task(
    State(state): State<AppState>,
    auth: AuthContext,
    Path((project_id, task_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<Json<MessageResponse>> {
    state
        .board
        .delete_task(auth.user_id, project_id, task_id)
        .await?;
    Ok(Json(MessageResponse::new("Task deleted")))
}

/// Moves a task to `order` within `column_id`
///
/// # Errors
///
/// - `404 Not Found`: Unknown task, or a column outside the task's project
/// - `422 Unprocessable Entity`: Negative order
pub async fn move_task(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(task_id): Path<Uuid>,
    Json(req): Json<MoveTaskRequest>,
) -> ApiResult<Json<TaskView>> {
    let task = state
        .board
        .move_task(auth.user_id, task_id, req.column_id, req.order)
        .await?;
    Ok(Json(task))
}
