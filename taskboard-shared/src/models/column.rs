/// Column model and database operations
///
/// Columns are the stations of a project's pipeline. Their `order` is
/// assigned once at creation (`max + 1`, or `0`) and never renumbered.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE columns (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     project_id UUID NOT NULL REFERENCES projects(id) ON DELETE CASCADE,
///     name VARCHAR(50) NOT NULL,
///     sort_order INTEGER NOT NULL,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
///
/// `order` is a reserved word in SQL, hence `sort_order` in the table.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Columns every new project starts with, in display order
pub const DEFAULT_COLUMNS: [&str; 3] = ["To Do", "In Progress", "Done"];

/// Ordered bucket of tasks within a project
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Column {
    /// Unique column ID
    pub id: Uuid,

    /// Owning project
    pub project_id: Uuid,

    /// Column name
    pub name: String,

    /// Left-to-right position among the project's columns
    #[sqlx(rename = "sort_order")]
    pub order: i32,

    /// When the column was created
    pub created_at: DateTime<Utc>,

    /// When the column was last updated
    pub updated_at: DateTime<Utc>,
}

/// Compact column record embedded in task responses
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSummary {
    pub id: Uuid,
    pub name: String,
    pub order: i32,
}

impl From<&Column> for ColumnSummary {
    fn from(column: &Column) -> Self {
        Self {
            id: column.id,
            name: column.name.clone(),
            order: column.order,
        }
    }
}

impl Column {
    /// Appends a column to a project
    ///
    /// The project row is locked while `max(sort_order) + 1` is computed so
    /// two concurrent creations cannot pick the same order.
    pub async fn create(pool: &PgPool, project_id: Uuid, name: &str) -> Result<Self, sqlx::Error> {
        let mut tx = pool.begin().await?;

        sqlx::query("SELECT id FROM projects WHERE id = $1 FOR UPDATE")
            .bind(project_id)
            .fetch_one(&mut *tx)
            .await?;

        let column = sqlx::query_as::<_, Column>(
            r#"
            INSERT INTO columns (project_id, name, sort_order)
            SELECT $1, $2, COALESCE(MAX(sort_order), -1) + 1
            FROM columns
            WHERE project_id = $1
            RETURNING id, project_id, name, sort_order, created_at, updated_at
            "#,
        )
        .bind(project_id)
        .bind(name)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(column)
    }

    /// Finds a column by ID within a project
    pub async fn find_in_project(
        pool: &PgPool,
        project_id: Uuid,
        id: Uuid,
    ) -> Result<Option<Self>, sqlx::Error> {
        let column = sqlx::query_as::<_, Column>(
            r#"
            SELECT id, project_id, name, sort_order, created_at, updated_at
            FROM columns
            WHERE id = $1 AND project_id = $2
            "#,
        )
        .bind(id)
        .bind(project_id)
        .fetch_optional(pool)
        .await?;

        Ok(column)
    }

    /// Lists a project's columns in display order
    pub async fn list_by_project(pool: &PgPool, project_id: Uuid) -> Result<Vec<Self>, sqlx::Error> {
        let columns = sqlx::query_as::<_, Column>(
            r#"
            SELECT id, project_id, name, sort_order, created_at, updated_at
            FROM columns
            WHERE project_id = $1
            ORDER BY sort_order ASC, created_at ASC, id ASC
            "#,
        )
        .bind(project_id)
        .fetch_all(pool)
        .await?;

        Ok(columns)
    }

    /// Renames a column; `order` is untouched
    pub async fn rename(
        pool: &PgPool,
        project_id: Uuid,
        id: Uuid,
        name: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        let column = sqlx::query_as::<_, Column>(
            r#"
            UPDATE columns
            SET name = $3, updated_at = NOW()
            WHERE id = $1 AND project_id = $2
            RETURNING id, project_id, name, sort_order, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(project_id)
        .bind(name)
        .fetch_optional(pool)
        .await?;

        Ok(column)
    }

    /// Deletes a column and, through the foreign key, all of its tasks
    pub async fn delete(pool: &PgPool, project_id: Uuid, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM columns WHERE id = $1 AND project_id = $2")
            .bind(id)
            .bind(project_id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_columns() {
        assert_eq!(DEFAULT_COLUMNS, ["To Do", "In Progress", "Done"]);
    }

    #[test]
    fn test_column_serializes_order_field() {
        let column = Column {
            id: Uuid::new_v4(),
            project_id: Uuid::new_v4(),
            name: "Done".to_string(),
            order: 2,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let json = serde_json::to_value(&column).unwrap();
        assert_eq!(json["order"], 2);
        assert!(json.get("sort_order").is_none());

        let summary = ColumnSummary::from(&column);
        assert_eq!(summary.name, "Done");
        assert_eq!(summary.order, 2);
    }
}
