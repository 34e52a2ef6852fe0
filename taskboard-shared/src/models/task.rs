/// Task model and database operations
///
/// A task's position is fully described by `(column_id, order)`. There is no
/// status field: the column is the task's current station in the pipeline.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE tasks (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     project_id UUID NOT NULL REFERENCES projects(id) ON DELETE CASCADE,
///     column_id UUID NOT NULL REFERENCES columns(id) ON DELETE CASCADE,
///     title VARCHAR(200) NOT NULL,
///     description VARCHAR(1000),
///     sort_order INTEGER NOT NULL,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
///
/// # Concurrency
///
/// [`Task::create`] holds a `FOR UPDATE` lock on the destination column row.
/// [`Task::relocate`] locks both the source and the destination column rows
/// (in id order), then the task, then the destination's task rows. Every
/// writer that changes a task's `(column_id, order)` therefore holds the lock
/// of each column it touches, and never computes orders from a stale view of
/// its siblings.
///
/// # Example
///
/// ```no_run
/// use taskboard_shared::models::task::{Task, CreateTask};
/// use taskboard_shared::db::pool::{connect, PoolConfig};
/// use uuid::Uuid;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = connect(PoolConfig::new("postgresql://localhost/taskboard")).await?;
/// let (project_id, todo, done) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
///
/// let task = Task::create(&pool, CreateTask {
///     project_id,
///     column_id: todo,
///     title: "Write release notes".to_string(),
///     description: None,
/// }).await?;
///
/// if let Some(task) = task {
///     // Put it on top of "Done"
///     Task::relocate(&pool, task.id, done, 0).await?;
/// }
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use super::column::ColumnSummary;
use crate::ordering::{self, Slot};

/// Task stored in a column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Task {
    /// Unique task ID
    pub id: Uuid,

    /// Owning project (denormalized from the column)
    pub project_id: Uuid,

    /// Column the task currently sits in
    pub column_id: Uuid,

    /// Task title
    pub title: String,

    /// Optional description
    pub description: Option<String>,

    /// Position within the column
    #[sqlx(rename = "sort_order")]
    pub order: i32,

    /// When the task was created
    pub created_at: DateTime<Utc>,

    /// When the task was last updated
    pub updated_at: DateTime<Utc>,
}

impl Task {
    pub fn slot(&self) -> Slot {
        Slot::new(self.id, self.order)
    }

    /// Builds the response view with the column expanded
    pub fn with_column(self, column: ColumnSummary) -> TaskView {
        self.into_view(ColumnRef::Expanded(column))
    }

    pub fn into_view(self, column: ColumnRef) -> TaskView {
        TaskView {
            id: self.id,
            project_id: self.project_id,
            column,
            title: self.title,
            description: self.description,
            order: self.order,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Reference to a task's column as it appears on the wire
///
/// Responses expand the column (`{"id", "name", "order"}`) but a bare ID is
/// accepted as well. Comparisons always go through [`ColumnRef::id`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ColumnRef {
    Id(Uuid),
    Expanded(ColumnSummary),
}

impl ColumnRef {
    pub fn id(&self) -> Uuid {
        match self {
            ColumnRef::Id(id) => *id,
            ColumnRef::Expanded(column) => column.id,
        }
    }
}

impl From<Uuid> for ColumnRef {
    fn from(id: Uuid) -> Self {
        ColumnRef::Id(id)
    }
}

/// Task as returned to callers, column reference included
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskView {
    pub id: Uuid,
    pub project_id: Uuid,
    pub column: ColumnRef,
    pub title: String,
    pub description: Option<String>,
    pub order: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TaskView {
    /// Column the task sits in, whatever shape the reference arrived in
    pub fn column_id(&self) -> Uuid {
        self.column.id()
    }

    pub fn slot(&self) -> Slot {
        Slot::new(self.id, self.order)
    }
}

/// Input for creating a task
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTask {
    pub project_id: Uuid,
    pub column_id: Uuid,
    pub title: String,
    pub description: Option<String>,
}

/// Input for updating a task's text fields
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateTask {
    pub title: String,
    pub description: Option<String>,
}

impl Task {
    /// Appends a task to a column
    ///
    /// Returns `None` if the column does not exist in the given project.
    pub async fn create(pool: &PgPool, data: CreateTask) -> Result<Option<Self>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let column = sqlx::query("SELECT id FROM columns WHERE id = $1 AND project_id = $2 FOR UPDATE")
            .bind(data.column_id)
            .bind(data.project_id)
            .fetch_optional(&mut *tx)
            .await?;
        if column.is_none() {
            return Ok(None);
        }

        let task = sqlx::query_as::<_, Task>(
            r#"
            INSERT INTO tasks (project_id, column_id, title, description, sort_order)
            SELECT $1, $2, $3, $4, COALESCE(MAX(sort_order), -1) + 1
            FROM tasks
            WHERE column_id = $2
            RETURNING id, project_id, column_id, title, description, sort_order, created_at, updated_at
            "#,
        )
        .bind(data.project_id)
        .bind(data.column_id)
        .bind(data.title)
        .bind(data.description)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(Some(task))
    }

    /// Finds a task by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            SELECT id, project_id, column_id, title, description, sort_order, created_at, updated_at
            FROM tasks
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(task)
    }

    /// Lists a project's tasks sorted by `(order, created_at, id)`
    pub async fn list_by_project(pool: &PgPool, project_id: Uuid) -> Result<Vec<Self>, sqlx::Error> {
        let tasks = sqlx::query_as::<_, Task>(
            r#"
            SELECT id, project_id, column_id, title, description, sort_order, created_at, updated_at
            FROM tasks
            WHERE project_id = $1
            ORDER BY sort_order ASC, created_at ASC, id ASC
            "#,
        )
        .bind(project_id)
        .fetch_all(pool)
        .await?;

        Ok(tasks)
    }

    /// Updates title and description; position is untouched
    pub async fn update_details(
        pool: &PgPool,
        project_id: Uuid,
        id: Uuid,
        data: UpdateTask,
    ) -> Result<Option<Self>, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            UPDATE tasks
            SET title = $3, description = $4, updated_at = NOW()
            WHERE id = $1 AND project_id = $2
            RETURNING id, project_id, column_id, title, description, sort_order, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(project_id)
        .bind(data.title)
        .bind(data.description)
        .fetch_optional(pool)
        .await?;

        Ok(task)
    }

    /// Deletes a task; remaining siblings keep their orders
    pub async fn delete(pool: &PgPool, project_id: Uuid, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1 AND project_id = $2")
            .bind(id)
            .bind(project_id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Moves a task to `order` in `column_id`, shifting the column's tasks
    ///
    /// The destination column is renumbered with [`ordering::reorder`] whether
    /// or not the task already lived there, and an `order` past the end is
    /// clamped to append. Only rows whose order actually changed are written.
    /// Returns `None` if the task or the column vanished.
    pub async fn relocate(
        pool: &PgPool,
        id: Uuid,
        column_id: Uuid,
        order: i32,
    ) -> Result<Option<Self>, sqlx::Error> {
        for attempt in 1..=RELOCATE_ATTEMPTS {
            match Self::try_relocate(pool, id, column_id, order).await? {
                Relocation::Done(moved) => return Ok(moved),
                Relocation::Raced => {
                    tracing::debug!(task_id = %id, attempt, "Task changed column while locking, retrying");
                }
            }
        }

        Err(sqlx::Error::Protocol(format!(
            "task {} kept changing column during relocation",
            id
        )))
    }

    async fn try_relocate(
        pool: &PgPool,
        id: Uuid,
        column_id: Uuid,
        order: i32,
    ) -> Result<Relocation, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let source = sqlx::query_scalar::<_, Uuid>("SELECT column_id FROM tasks WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;
        let Some(source) = source else {
            return Ok(Relocation::Done(None));
        };

        // Source and destination, in id order, so crossing moves cannot deadlock
        let locked = sqlx::query_scalar::<_, Uuid>(
            "SELECT id FROM columns WHERE id = ANY($1) ORDER BY id FOR UPDATE",
        )
        .bind(vec![source, column_id])
        .fetch_all(&mut *tx)
        .await?;
        if !locked.contains(&column_id) {
            return Ok(Relocation::Done(None));
        }

        let task = sqlx::query_as::<_, Task>(
            r#"
            SELECT id, project_id, column_id, title, description, sort_order, created_at, updated_at
            FROM tasks
            WHERE id = $1
            FOR UPDATE
            "#,
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;
        let Some(task) = task else {
            return Ok(Relocation::Done(None));
        };
        if task.column_id != source {
            return Ok(Relocation::Raced);
        }

        let siblings = sqlx::query_as::<_, Task>(
            r#"
            SELECT id, project_id, column_id, title, description, sort_order, created_at, updated_at
            FROM tasks
            WHERE column_id = $1
            ORDER BY sort_order ASC, created_at ASC, id ASC
            FOR UPDATE
            "#,
        )
        .bind(column_id)
        .fetch_all(&mut *tx)
        .await?;

        let before: Vec<Slot> = siblings.iter().map(Task::slot).collect();
        let after = ordering::reorder(&before, task.id, order);
        let placed = ordering::placed_order(&after, task.id).unwrap_or(order);

        let changed = ordering::changed_slots(&before, &after);
        for slot in changed.iter().filter(|slot| slot.id != task.id) {
            sqlx::query(
                "UPDATE tasks SET sort_order = $2, updated_at = NOW() WHERE id = $1 AND column_id = $3",
            )
            .bind(slot.id)
            .bind(slot.order)
            .bind(column_id)
            .execute(&mut *tx)
            .await?;
        }

        let moved = sqlx::query_as::<_, Task>(
            r#"
            UPDATE tasks
            SET column_id = $2, sort_order = $3, updated_at = NOW()
            WHERE id = $1
            RETURNING id, project_id, column_id, title, description, sort_order, created_at, updated_at
            "#,
        )
        .bind(task.id)
        .bind(column_id)
        .bind(placed)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        tracing::debug!(
            task_id = %moved.id,
            from_column = %source,
            column_id = %column_id,
            order = placed,
            rows_written = changed.len(),
            "Task relocated"
        );

        Ok(Relocation::Done(Some(moved)))
    }
}

/// Lock attempts before a relocation gives up on a task that keeps moving
const RELOCATE_ATTEMPTS: u32 = 5;

enum Relocation {
    Done(Option<Task>),

    /// The task left its column between the first read and the lock
    Raced,
}
