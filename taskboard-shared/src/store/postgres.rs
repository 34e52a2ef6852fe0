/// PostgreSQL-backed [`BoardStore`]
///
/// A thin adapter over the model functions; transactions and row locks live
/// in the models themselves.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::{BoardStore, StoreError};
use crate::db::pool;
use crate::models::column::Column;
use crate::models::project::{CreateProject, Project, UpdateProject};
use crate::models::task::{CreateTask, Task, UpdateTask};
use crate::models::user::{CreateUser, User};

#[derive(Debug, Clone)]
pub struct PgBoardStore {
    pool: PgPool,
}

impl PgBoardStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

fn is_unique_violation(error: &sqlx::Error) -> bool {
    match error {
        sqlx::Error::Database(db_error) => db_error.is_unique_violation(),
        _ => false,
    }
}

#[async_trait]
impl BoardStore for PgBoardStore {
    fn name(&self) -> &'static str {
        "postgres"
    }

    async fn ping(&self) -> Result<(), StoreError> {
        pool::ping(&self.pool).await?;
        Ok(())
    }

    async fn insert_user(&self, data: CreateUser) -> Result<User, StoreError> {
        let email = data.email.clone();
        User::create(&self.pool, data).await.map_err(|e| {
            if is_unique_violation(&e) {
                StoreError::Conflict(format!("email {} is already registered", email))
            } else {
                StoreError::Database(e)
            }
        })
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        Ok(User::find_by_email(&self.pool, email).await?)
    }

    async fn insert_project(
        &self,
        data: CreateProject,
        column_names: &[&str],
    ) -> Result<(Project, Vec<Column>), StoreError> {
        Ok(Project::create_with_columns(&self.pool, data, column_names).await?)
    }

    async fn find_project(&self, id: Uuid, owner: Uuid) -> Result<Option<Project>, StoreError> {
        Ok(Project::find_owned(&self.pool, id, owner).await?)
    }

    async fn list_projects(&self, owner: Uuid) -> Result<Vec<Project>, StoreError> {
        Ok(Project::list_by_owner(&self.pool, owner).await?)
    }

    async fn update_project(
        &self,
        id: Uuid,
        owner: Uuid,
        data: UpdateProject,
    ) -> Result<Option<Project>, StoreError> {
        Ok(Project::update(&self.pool, id, owner, data).await?)
    }

    async fn delete_project(&self, id: Uuid, owner: Uuid) -> Result<bool, StoreError> {
        Ok(Project::delete(&self.pool, id, owner).await?)
    }

    async fn insert_column(&self, project_id: Uuid, name: &str) -> Result<Column, StoreError> {
        Ok(Column::create(&self.pool, project_id, name).await?)
    }

    async fn find_column(&self, project_id: Uuid, id: Uuid) -> Result<Option<Column>, StoreError> {
        Ok(Column::find_in_project(&self.pool, project_id, id).await?)
    }

    async fn list_columns(&self, project_id: Uuid) -> Result<Vec<Column>, StoreError> {
        Ok(Column::list_by_project(&self.pool, project_id).await?)
    }

    async fn rename_column(
        &self,
        project_id: Uuid,
        id: Uuid,
        name: &str,
    ) -> Result<Option<Column>, StoreError> {
        Ok(Column::rename(&self.pool, project_id, id, name).await?)
    }

    async fn delete_column(&self, project_id: Uuid, id: Uuid) -> Result<bool, StoreError> {
        Ok(Column::delete(&self.pool, project_id, id).await?)
    }

    async fn insert_task(&self, data: CreateTask) -> Result<Option<Task>, StoreError> {
        Ok(Task::create(&self.pool, data).await?)
    }

    async fn find_task(&self, id: Uuid) -> Result<Option<Task>, StoreError> {
        Ok(Task::find_by_id(&self.pool, id).await?)
    }

    async fn list_tasks(&self, project_id: Uuid) -> Result<Vec<Task>, StoreError> {
        Ok(Task::list_by_project(&self.pool, project_id).await?)
    }

    async fn update_task(
        &self,
        project_id: Uuid,
        id: Uuid,
        data: UpdateTask,
    ) -> Result<Option<Task>, StoreError> {
        Ok(Task::update_details(&self.pool, project_id, id, data).await?)
    }

    async fn delete_task(&self, project_id: Uuid, id: Uuid) -> Result<bool, StoreError> {
        Ok(Task::delete(&self.pool, project_id, id).await?)
    }

    async fn relocate_task(
        &self,
        id: Uuid,
        column_id: Uuid,
        order: i32,
    ) -> Result<Option<Task>, StoreError> {
        Ok(Task::relocate(&self.pool, id, column_id, order).await?)
    }
}
