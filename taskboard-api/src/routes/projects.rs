/// Project endpoints
///
/// - `GET /v1/projects` - Caller's projects, newest first
/// - `POST /v1/projects` - Create a project seeded with default columns
/// - `GET /v1/projects/:project_id` - One project
/// - `PUT /v1/projects/:project_id` - Update name and description
/// - `DELETE /v1/projects/:project_id` - Delete with all columns and tasks

use super::MessageResponse;
use crate::{app::AppState, error::ApiResult};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use taskboard_shared::auth::middleware::AuthContext;
use taskboard_shared::models::{column::Column, project::Project};
use uuid::Uuid;

/// Create and update request
///
/// A missing name is treated as blank so it surfaces as a field error.
#[derive(Debug, Deserialize)]
pub struct ProjectRequest {
    #[serde(default)]
    pub name: String,
    pub description: Option<String>,
}

/// A newly created project with its seeded columns
#[derive(Debug, Serialize, Deserialize)]
pub struct CreatedProject {
    #[serde(flatten)]
    pub project: Project,
    pub columns: Vec<Column>,
}

pub async fn list_projects(
    State(state): State<AppState>,
    auth: AuthContext,
) -> ApiResult<Json<Vec<Project>>> {
    Ok(Json(state.board.list_projects(auth.user_id).await?))
}

pub async fn create_project(
    State(state): State<AppState>,
    auth: AuthContext,
    Json(req): Json<ProjectRequest>,
) -> ApiResult<(StatusCode, Json<CreatedProject>)> {
    let (project, columns) = state
        .board
        .create_project(auth.user_id, &req.name, req.description.as_deref())
        .await?;

    Ok((StatusCode::CREATED, Json(CreatedProject { project, columns })))
}

pub async fn get_project(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(project_id): Path<Uuid>,
) -> ApiResult<Json<Project>> {
    Ok(Json(state.board.get_project(auth.user_id, project_id).await?))
}

pub async fn update_project(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(project_id): Path<Uuid>,
    Json(req): Json<ProjectRequest>,
) -> ApiResult<Json<Project>> {
    let project = state
        .board
        .update_project(auth.user_id, project_id, &req.name, req.description.as_deref())
        .await?;
    Ok(Json(project))
}

pub async fn delete_project(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(project_id): Path<Uuid>,
) -> ApiResult<Json<MessageResponse>> {
    state.board.delete_project(auth.user_id, project_id).await?;
    Ok(Json(MessageResponse::new("Project deleted")))
}
