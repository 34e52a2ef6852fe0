/// Persistence seam for the board
///
/// [`BoardStore`] is the narrow set of record operations the Ordering Engine
/// needs. It performs no ownership checks: callers (see `board::Board`)
/// verify that the requesting user owns the project before touching it.
///
/// Two implementations ship with the crate:
///
/// - [`postgres::PgBoardStore`]: durable, delegates to the `models` SQL
/// - [`memory::MemoryBoardStore`]: process-local, for tests and demos
///
/// Both apply [`crate::ordering::reorder`] to the destination column on
/// `relocate_task`, atomically with respect to other writers.

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::models::column::Column;
use crate::models::project::{CreateProject, Project, UpdateProject};
use crate::models::task::{CreateTask, Task, UpdateTask};
use crate::models::user::{CreateUser, User};

pub mod memory;
pub mod postgres;

/// Store errors
#[derive(Debug, Error)]
pub enum StoreError {
    /// A uniqueness constraint was violated
    #[error("Conflict: {0}")]
    Conflict(String),

    /// The backend is unreachable or failed
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Record storage for users, projects, columns and tasks
#[async_trait]
pub trait BoardStore: Send + Sync {
    /// Backend name for logs and health output
    fn name(&self) -> &'static str;

    /// Verifies the backend is reachable
    async fn ping(&self) -> Result<(), StoreError>;

    /// Inserts a user; duplicate email yields [`StoreError::Conflict`]
    async fn insert_user(&self, data: CreateUser) -> Result<User, StoreError>;

    /// Case-insensitive lookup
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;

    /// Inserts a project and its seeded columns as one unit
    async fn insert_project(
        &self,
        data: CreateProject,
        column_names: &[&str],
    ) -> Result<(Project, Vec<Column>), StoreError>;

    /// Finds a project only if `owner` owns it
    async fn find_project(&self, id: Uuid, owner: Uuid) -> Result<Option<Project>, StoreError>;

    /// Owner's projects, newest first
    async fn list_projects(&self, owner: Uuid) -> Result<Vec<Project>, StoreError>;

    async fn update_project(
        &self,
        id: Uuid,
        owner: Uuid,
        data: UpdateProject,
    ) -> Result<Option<Project>, StoreError>;

    /// Deletes a project with all its columns and tasks
    async fn delete_project(&self, id: Uuid, owner: Uuid) -> Result<bool, StoreError>;

    /// Appends a column with `order = max + 1` (or 0)
    async fn insert_column(&self, project_id: Uuid, name: &str) -> Result<Column, StoreError>;

    async fn find_column(&self, project_id: Uuid, id: Uuid) -> Result<Option<Column>, StoreError>;

    /// Columns sorted by `(order, created_at, id)`
    async fn list_columns(&self, project_id: Uuid) -> Result<Vec<Column>, StoreError>;

    async fn rename_column(
        &self,
        project_id: Uuid,
        id: Uuid,
        name: &str,
    ) -> Result<Option<Column>, StoreError>;

    /// Deletes a column with all its tasks
    async fn delete_column(&self, project_id: Uuid, id: Uuid) -> Result<bool, StoreError>;

    /// Appends a task with `order = max + 1` in its column (or 0)
    ///
    /// Returns `None` if the column is not part of the project.
    async fn insert_task(&self, data: CreateTask) -> Result<Option<Task>, StoreError>;

    async fn find_task(&self, id: Uuid) -> Result<Option<Task>, StoreError>;

    /// Project tasks sorted by `(order, created_at, id)`
    async fn list_tasks(&self, project_id: Uuid) -> Result<Vec<Task>, StoreError>;

    async fn update_task(
        &self,
        project_id: Uuid,
        id: Uuid,
        data: UpdateTask,
    ) -> Result<Option<Task>, StoreError>;

    /// Deletes a task without renumbering its siblings
    async fn delete_task(&self, project_id: Uuid, id: Uuid) -> Result<bool, StoreError>;

    /// Places a task at `order` in `column_id`, shifting that column
    ///
    /// Returns `None` if the task or the column no longer exists.
    async fn relocate_task(
        &self,
        id: Uuid,
        column_id: Uuid,
        order: i32,
    ) -> Result<Option<Task>, StoreError>;
}
