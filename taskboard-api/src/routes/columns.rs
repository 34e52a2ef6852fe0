/// Column endpoints, all scoped to a project the caller owns
///
/// New columns are appended after the last one. Updates only rename; a
/// column's position never changes through this API.

use super::MessageResponse;
use crate::{app::AppState, error::ApiResult};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use taskboard_shared::auth::middleware::AuthContext;
use taskboard_shared::models::column::Column;
use uuid::Uuid;

#[derive(Debug, Deserialize)]
pub struct ColumnRequest {
    #[serde(default)]
    pub name: String,
}

pub async fn list_columns(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(project_id): Path<Uuid>,
) -> ApiResult<Json<Vec<Column>>> {
    Ok(Json(state.board.list_columns(auth.user_id, project_id).await?))
}

pub async fn create_column(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(project_id): Path<Uuid>,
    Json(req): Json<ColumnRequest>,
) -> ApiResult<(StatusCode, Json<Column>)> {
    let column = state
        .board
        .create_column(auth.user_id, project_id, &req.name)
        .await?;
    Ok((StatusCode::CREATED, Json(column)))
}

pub async fn update_column(
    State(state): State<AppState>,
    auth: AuthContext,
    Path((project_id, column_id)): Path<(Uuid, Uuid)>,
    Json(req): Json<ColumnRequest>,
) -> ApiResult<Json<Column>> {
    let column = state
        .board
        .update_column(auth.user_id, project_id, column_id, &req.name)
        .await?;
    Ok(Json(column))
}

pub async fn delete_column(
    State(state): State<AppState>,
    auth: AuthContext,
    Path((project_id, column_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<Json<MessageResponse>> {
    state
        .board
        .delete_column(auth.user_id, project_id, column_id)
        .await?;
    Ok(Json(MessageResponse::new("Column deleted")))
}
