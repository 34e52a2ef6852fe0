/// Project model and database operations
///
/// A project is the root of the ownership chain: it belongs to exactly one
/// user and exclusively owns its columns, which own their tasks.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE projects (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     name VARCHAR(100) NOT NULL,
///     description TEXT,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
///
/// Columns and tasks reference the project with `ON DELETE CASCADE`, so
/// deleting a project removes everything it owns.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use super::column::Column;

/// Project owned by a single user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Project {
    /// Unique project ID
    pub id: Uuid,

    /// Owning user
    pub user_id: Uuid,

    /// Project name
    pub name: String,

    /// Optional description
    pub description: Option<String>,

    /// When the project was created
    pub created_at: DateTime<Utc>,

    /// When the project was last updated
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a project
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateProject {
    /// Owning user
    pub user_id: Uuid,

    /// Project name
    pub name: String,

    /// Optional description
    pub description: Option<String>,
}

/// Input for updating a project
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateProject {
    /// New name
    pub name: String,

    /// New description (None clears it)
    pub description: Option<String>,
}

impl Project {
    /// Creates a project together with its seeded columns
    ///
    /// The project row and one column per entry of `column_names` (orders
    /// `0, 1, 2, ...`) are inserted in a single transaction.
    pub async fn create_with_columns(
        pool: &PgPool,
        data: CreateProject,
        column_names: &[&str],
    ) -> Result<(Self, Vec<Column>), sqlx::Error> {
        let mut tx = pool.begin().await?;

        let project = sqlx::query_as::<_, Project>(
            r#"
            INSERT INTO projects (user_id, name, description)
            VALUES ($1, $2, $3)
            RETURNING id, user_id, name, description, created_at, updated_at
            "#,
        )
        .bind(data.user_id)
        .bind(data.name)
        .bind(data.description)
        .fetch_one(&mut *tx)
        .await?;

        let mut columns = Vec::with_capacity(column_names.len());
        for (order, name) in column_names.iter().enumerate() {
            let column = sqlx::query_as::<_, Column>(
                r#"
                INSERT INTO columns (project_id, name, sort_order)
                VALUES ($1, $2, $3)
                RETURNING id, project_id, name, sort_order, created_at, updated_at
                "#,
            )
            .bind(project.id)
            .bind(*name)
            .bind(order as i32)
            .fetch_one(&mut *tx)
            .await?;
            columns.push(column);
        }

        tx.commit().await?;

        Ok((project, columns))
    }

    /// Finds a project by ID, only if owned by `user_id`
    pub async fn find_owned(
        pool: &PgPool,
        id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<Self>, sqlx::Error> {
        let project = sqlx::query_as::<_, Project>(
            r#"
            SELECT id, user_id, name, description, created_at, updated_at
            FROM projects
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

        Ok(project)
    }

    /// Lists a user's projects, newest first
    pub async fn list_by_owner(pool: &PgPool, user_id: Uuid) -> Result<Vec<Self>, sqlx::Error> {
        let projects = sqlx::query_as::<_, Project>(
            r#"
            SELECT id, user_id, name, description, created_at, updated_at
            FROM projects
            WHERE user_id = $1
            ORDER BY created_at DESC, id
            "#,
        )
        .bind(user_id)
        .fetch_all(pool)
        .await?;

        Ok(projects)
    }

    /// Updates name and description of an owned project
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        user_id: Uuid,
        data: UpdateProject,
    ) -> Result<Option<Self>, sqlx::Error> {
        let project = sqlx::query_as::<_, Project>(
            r#"
            UPDATE projects
            SET name = $3, description = $4, updated_at = NOW()
            WHERE id = $1 AND user_id = $2
            RETURNING id, user_id, name, description, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(user_id)
        .bind(data.name)
        .bind(data.description)
        .fetch_optional(pool)
        .await?;

        Ok(project)
    }

    /// Deletes an owned project
    ///
    /// ⚠️  Cascades to all columns and tasks of the project.
    pub async fn delete(pool: &PgPool, id: Uuid, user_id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM projects WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
