/// Ordering Engine
///
/// [`Board`] is the server-side authority over projects, columns and tasks.
/// Every operation takes the authenticated user's ID and verifies the
/// `Project → Column → Task` ownership chain before touching the store;
/// anything unreachable from the caller is reported as [`BoardError::NotFound`],
/// whether it does not exist or belongs to someone else.
///
/// Ordering rules:
///
/// - new columns and new tasks are appended (`max + 1`, or `0`)
/// - a move places the task at the requested order and shifts the
///   destination column with [`crate::ordering::reorder`]
/// - deletes never renumber; gaps are harmless because display sorts by value
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use taskboard_shared::board::Board;
/// use taskboard_shared::store::memory::MemoryBoardStore;
/// use uuid::Uuid;
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let board = Board::new(Arc::new(MemoryBoardStore::new()));
/// let owner = Uuid::new_v4();
///
/// let (project, columns) = board.create_project(owner, "Launch", None).await?;
/// let task = board
///     .create_task(owner, project.id, Some(columns[0].id), "Draft post", None)
///     .await?;
///
/// let moved = board.move_task(owner, task.id, columns[2].id, 0).await?;
/// assert_eq!(moved.column_id(), columns[2].id);
/// # Ok(())
/// # }
/// ```

use std::collections::HashMap;
use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info};
use uuid::Uuid;

use crate::assistant::digest::{BoardDigest, DigestColumn, DigestTask};
use crate::models::column::{Column, ColumnSummary, DEFAULT_COLUMNS};
use crate::models::project::{CreateProject, Project, UpdateProject};
use crate::models::task::{ColumnRef, CreateTask, Task, TaskView, UpdateTask};
use crate::store::{BoardStore, StoreError};

/// Maximum project name length (characters)
pub const PROJECT_NAME_MAX: usize = 100;

/// Maximum column name length (characters)
pub const COLUMN_NAME_MAX: usize = 50;

/// Maximum task title length (characters)
pub const TASK_TITLE_MAX: usize = 200;

/// Maximum task description length (characters)
pub const TASK_DESCRIPTION_MAX: usize = 1000;

/// Board errors
#[derive(Debug, Error)]
pub enum BoardError {
    /// Entity absent or not owned by the caller
    #[error("{0} not found")]
    NotFound(&'static str),

    /// Input rejected before reaching the store
    #[error("Invalid {field}: {message}")]
    Validation {
        field: &'static str,
        message: String,
    },

    /// Store unavailable or failed
    #[error("Storage error: {0}")]
    TransientIo(#[from] StoreError),
}

impl BoardError {
    fn invalid(field: &'static str, message: impl Into<String>) -> Self {
        BoardError::Validation {
            field,
            message: message.into(),
        }
    }
}

/// Trims a required text field and checks its length
pub fn required_text(field: &'static str, value: &str, max: usize) -> Result<String, BoardError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(BoardError::invalid(field, "must not be blank"));
    }
    if trimmed.chars().count() > max {
        return Err(BoardError::invalid(
            field,
            format!("must be at most {} characters", max),
        ));
    }
    Ok(trimmed.to_string())
}

/// Trims an optional text field; blank becomes `None`
pub fn optional_text(
    field: &'static str,
    value: Option<&str>,
    max: usize,
) -> Result<Option<String>, BoardError> {
    let Some(trimmed) = value.map(str::trim).filter(|v| !v.is_empty()) else {
        return Ok(None);
    };
    if trimmed.chars().count() > max {
        return Err(BoardError::invalid(
            field,
            format!("must be at most {} characters", max),
        ));
    }
    Ok(Some(trimmed.to_string()))
}

/// The Ordering Engine
#[derive(Clone)]
pub struct Board {
    store: Arc<dyn BoardStore>,
}

impl Board {
    pub fn new(store: Arc<dyn BoardStore>) -> Self {
        Self { store }
    }

    /// Underlying store, for account operations that sit outside the board
    pub fn store(&self) -> &Arc<dyn BoardStore> {
        &self.store
    }

    async fn owned_project(&self, owner: Uuid, project_id: Uuid) -> Result<Project, BoardError> {
        self.store
            .find_project(project_id, owner)
            .await?
            .ok_or(BoardError::NotFound("Project"))
    }

    async fn owned_task(
        &self,
        owner: Uuid,
        project_id: Uuid,
        task_id: Uuid,
    ) -> Result<Task, BoardError> {
        self.owned_project(owner, project_id).await?;
        self.store
            .find_task(task_id)
            .await?
            .filter(|task| task.project_id == project_id)
            .ok_or(BoardError::NotFound("Task"))
    }

    async fn resolve(&self, task: Task) -> Result<TaskView, BoardError> {
        let column = self.store.find_column(task.project_id, task.column_id).await?;
        Ok(match column {
            Some(column) => task.with_column(ColumnSummary::from(&column)),
            None => {
                let column_id = task.column_id;
                task.into_view(ColumnRef::Id(column_id))
            }
        })
    }

    // Projects

    pub async fn list_projects(&self, owner: Uuid) -> Result<Vec<Project>, BoardError> {
        Ok(self.store.list_projects(owner).await?)
    }

    /// Creates a project seeded with "To Do", "In Progress" and "Done"
    pub async fn create_project(
        &self,
        owner: Uuid,
        name: &str,
        description: Option<&str>,
    ) -> Result<(Project, Vec<Column>), BoardError> {
        let data = CreateProject {
            user_id: owner,
            name: required_text("name", name, PROJECT_NAME_MAX)?,
            description: optional_text("description", description, TASK_DESCRIPTION_MAX)?,
        };

        let (project, columns) = self.store.insert_project(data, &DEFAULT_COLUMNS).await?;
        info!(project_id = %project.id, user_id = %owner, "Project created");
        Ok((project, columns))
    }

    pub async fn get_project(&self, owner: Uuid, project_id: Uuid) -> Result<Project, BoardError> {
        self.owned_project(owner, project_id).await
    }

    pub async fn update_project(
        &self,
        owner: Uuid,
        project_id: Uuid,
        name: &str,
        description: Option<&str>,
    ) -> Result<Project, BoardError> {
        let data = UpdateProject {
            name: required_text("name", name, PROJECT_NAME_MAX)?,
            description: optional_text("description", description, TASK_DESCRIPTION_MAX)?,
        };

        self.store
            .update_project(project_id, owner, data)
            .await?
            .ok_or(BoardError::NotFound("Project"))
    }

    /// Deletes a project with every column and task it owns
    pub async fn delete_project(&self, owner: Uuid, project_id: Uuid) -> Result<(), BoardError> {
        if !self.store.delete_project(project_id, owner).await? {
            return Err(BoardError::NotFound("Project"));
        }
        info!(project_id = %project_id, user_id = %owner, "Project deleted");
        Ok(())
    }

    // Columns

    pub async fn list_columns(&self, owner: Uuid, project_id: Uuid) -> Result<Vec<Column>, BoardError> {
        self.owned_project(owner, project_id).await?;
        Ok(self.store.list_columns(project_id).await?)
    }

    pub async fn create_column(
        &self,
        owner: Uuid,
        project_id: Uuid,
        name: &str,
    ) -> Result<Column, BoardError> {
        let name = required_text("name", name, COLUMN_NAME_MAX)?;
        self.owned_project(owner, project_id).await?;

        let column = self.store.insert_column(project_id, &name).await?;
        debug!(column_id = %column.id, order = column.order, "Column created");
        Ok(column)
    }

    /// Renames a column; its order never changes
    pub async fn update_column(
        &self,
        owner: Uuid,
        project_id: Uuid,
        column_id: Uuid,
        name: &str,
    ) -> Result<Column, BoardError> {
        let name = required_text("name", name, COLUMN_NAME_MAX)?;
        self.owned_project(owner, project_id).await?;

        self.store
            .rename_column(project_id, column_id, &name)
            .await?
            .ok_or(BoardError::NotFound("Column"))
    }

    /// Deletes a column and all of its tasks
    pub async fn delete_column(
        &self,
        owner: Uuid,
        project_id: Uuid,
        column_id: Uuid,
    ) -> Result<(), BoardError> {
        self.owned_project(owner, project_id).await?;

        if !self.store.delete_column(project_id, column_id).await? {
            return Err(BoardError::NotFound("Column"));
        }
        info!(column_id = %column_id, project_id = %project_id, "Column deleted");
        Ok(())
    }

    // Tasks

    /// All tasks of a project sorted by order, column expanded
    pub async fn list_tasks(&self, owner: Uuid, project_id: Uuid) -> Result<Vec<TaskView>, BoardError> {
        self.owned_project(owner, project_id).await?;

        let columns: HashMap<Uuid, ColumnSummary> = self
            .store
            .list_columns(project_id)
            .await?
            .iter()
            .map(|column| (column.id, ColumnSummary::from(column)))
            .collect();

        let tasks = self.store.list_tasks(project_id).await?;
        let views = tasks
            .into_iter()
            .filter_map(|task| {
                let column = columns.get(&task.column_id)?.clone();
                Some(task.with_column(column))
            })
            .collect();
        Ok(views)
    }

    pub async fn get_task(
        &self,
        owner: Uuid,
        project_id: Uuid,
        task_id: Uuid,
    ) -> Result<TaskView, BoardError> {
        let task = self.owned_task(owner, project_id, task_id).await?;
        self.resolve(task).await
    }

    /// Appends a task to a column of the project
    ///
    /// A missing `column_id` is a validation failure; a column that is not
    /// part of the project is NotFound.
    pub async fn create_task(
        &self,
        owner: Uuid,
        project_id: Uuid,
        column_id: Option<Uuid>,
        title: &str,
        description: Option<&str>,
    ) -> Result<TaskView, BoardError> {
        let column_id = column_id.ok_or_else(|| BoardError::invalid("column_id", "a column is required"))?;
        let data = CreateTask {
            project_id,
            column_id,
            title: required_text("title", title, TASK_TITLE_MAX)?,
            description: optional_text("description", description, TASK_DESCRIPTION_MAX)?,
        };

        self.owned_project(owner, project_id).await?;
        let task = self
            .store
            .insert_task(data)
            .await?
            .ok_or(BoardError::NotFound("Column"))?;

        debug!(task_id = %task.id, column_id = %column_id, order = task.order, "Task created");
        self.resolve(task).await
    }

    /// Updates title and description; position is untouched
    pub async fn update_task(
        &self,
        owner: Uuid,
        project_id: Uuid,
        task_id: Uuid,
        title: &str,
        description: Option<&str>,
    ) -> Result<TaskView, BoardError> {
        let data = UpdateTask {
            title: required_text("title", title, TASK_TITLE_MAX)?,
            description: optional_text("description", description, TASK_DESCRIPTION_MAX)?,
        };

        self.owned_project(owner, project_id).await?;
        let task = self
            .store
            .update_task(project_id, task_id, data)
            .await?
            .ok_or(BoardError::NotFound("Task"))?;
        self.resolve(task).await
    }

    /// Deletes a task; siblings keep their orders
    pub async fn delete_task(&self, owner: Uuid, project_id: Uuid, task_id: Uuid) -> Result<(), BoardError> {
        self.owned_project(owner, project_id).await?;

        if !self.store.delete_task(project_id, task_id).await? {
            return Err(BoardError::NotFound("Task"));
        }
        debug!(task_id = %task_id, "Task deleted");
        Ok(())
    }

    /// Moves a task to `order` in `column_id`
    ///
    /// The destination column must belong to the task's project. Tasks of the
    /// destination at or after `order` are shifted down; the source column of
    /// a cross-column move keeps its gap. An `order` past the end of the
    /// destination appends.
    pub async fn move_task(
        &self,
        owner: Uuid,
        task_id: Uuid,
        column_id: Uuid,
        order: i32,
    ) -> Result<TaskView, BoardError> {
        if order < 0 {
            return Err(BoardError::invalid("order", "must not be negative"));
        }

        let task = self
            .store
            .find_task(task_id)
            .await?
            .ok_or(BoardError::NotFound("Task"))?;
        self.store
            .find_project(task.project_id, owner)
            .await?
            .ok_or(BoardError::NotFound("Task"))?;
        let column = self
            .store
            .find_column(task.project_id, column_id)
            .await?
            .ok_or(BoardError::NotFound("Column"))?;

        let moved = self
            .store
            .relocate_task(task_id, column_id, order)
            .await?
            .ok_or(BoardError::NotFound("Task"))?;

        info!(
            task_id = %task_id,
            from_column = %task.column_id,
            to_column = %column_id,
            requested = order,
            order = moved.order,
            "Task moved"
        );
        Ok(moved.with_column(ColumnSummary::from(&column)))
    }

    // Assistant context

    /// Serialized board state handed to the assistant
    ///
    /// With `focus`, the digest holds only that task under its column.
    pub async fn digest(
        &self,
        owner: Uuid,
        project_id: Uuid,
        focus: Option<Uuid>,
    ) -> Result<BoardDigest, BoardError> {
        let project = self.owned_project(owner, project_id).await?;
        let columns = self.store.list_columns(project_id).await?;
        let tasks = self.store.list_tasks(project_id).await?;

        if let Some(task_id) = focus {
            if !tasks.iter().any(|task| task.id == task_id) {
                return Err(BoardError::NotFound("Task"));
            }
        }

        let columns = columns
            .iter()
            .map(|column| DigestColumn {
                name: column.name.clone(),
                tasks: tasks
                    .iter()
                    .filter(|task| task.column_id == column.id)
                    .filter(|task| focus.map_or(true, |id| task.id == id))
                    .map(|task| DigestTask {
                        title: task.title.clone(),
                        description: task.description.clone(),
                    })
                    .collect(),
            })
            .filter(|column| focus.is_none() || !column.tasks.is_empty())
            .collect();

        Ok(BoardDigest {
            project_name: project.name,
            project_description: project.description,
            columns,
        })
    }
}
