/// In-memory [`BoardStore`]
///
/// Every operation runs under one `RwLock`, so a move is atomic with respect
/// to all other writers. Data is lost when the store is dropped.
///
/// # Example
///
/// ```
/// use taskboard_shared::store::{memory::MemoryBoardStore, BoardStore};
///
/// # #[tokio::main]
/// # async fn main() {
/// let store = MemoryBoardStore::new();
/// assert!(store.ping().await.is_ok());
/// # }
/// ```

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{BoardStore, StoreError};
use crate::models::column::Column;
use crate::models::project::{CreateProject, Project, UpdateProject};
use crate::models::task::{CreateTask, Task, UpdateTask};
use crate::models::user::{CreateUser, User};
use crate::ordering::{self, Slot};

#[derive(Debug, Default)]
struct Tables {
    users: Vec<User>,
    projects: Vec<Project>,
    columns: Vec<Column>,
    tasks: Vec<Task>,
}

impl Tables {
    /// Tasks of one column in read order
    fn column_tasks(&self, column_id: Uuid) -> Vec<&Task> {
        let mut tasks: Vec<&Task> = self.tasks.iter().filter(|t| t.column_id == column_id).collect();
        tasks.sort_by(|a, b| {
            (a.order, a.created_at, a.id).cmp(&(b.order, b.created_at, b.id))
        });
        tasks
    }
}

#[derive(Debug, Default)]
pub struct MemoryBoardStore {
    tables: RwLock<Tables>,
}

impl MemoryBoardStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BoardStore for MemoryBoardStore {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }

    async fn insert_user(&self, data: CreateUser) -> Result<User, StoreError> {
        let mut tables = self.tables.write().await;
        if tables.users.iter().any(|u| u.email.eq_ignore_ascii_case(&data.email)) {
            return Err(StoreError::Conflict(format!(
                "email {} is already registered",
                data.email
            )));
        }

        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            email: data.email,
            password_hash: data.password_hash,
            name: data.name,
            created_at: now,
            updated_at: now,
        };
        tables.users.push(user.clone());
        Ok(user)
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .iter()
            .find(|u| u.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn insert_project(
        &self,
        data: CreateProject,
        column_names: &[&str],
    ) -> Result<(Project, Vec<Column>), StoreError> {
        let mut tables = self.tables.write().await;
        let now = Utc::now();
        let project = Project {
            id: Uuid::new_v4(),
            user_id: data.user_id,
            name: data.name,
            description: data.description,
            created_at: now,
            updated_at: now,
        };

        let columns: Vec<Column> = column_names
            .iter()
            .enumerate()
            .map(|(order, name)| Column {
                id: Uuid::new_v4(),
                project_id: project.id,
                name: (*name).to_string(),
                order: order as i32,
                created_at: now,
                updated_at: now,
            })
            .collect();

        tables.projects.push(project.clone());
        tables.columns.extend(columns.iter().cloned());
        Ok((project, columns))
    }

    async fn find_project(&self, id: Uuid, owner: Uuid) -> Result<Option<Project>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables
            .projects
            .iter()
            .find(|p| p.id == id && p.user_id == owner)
            .cloned())
    }

    async fn list_projects(&self, owner: Uuid) -> Result<Vec<Project>, StoreError> {
        let tables = self.tables.read().await;
        let mut projects: Vec<Project> = tables
            .projects
            .iter()
            .filter(|p| p.user_id == owner)
            .cloned()
            .collect();
        projects.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(a.id.cmp(&b.id)));
        Ok(projects)
    }

    async fn update_project(
        &self,
        id: Uuid,
        owner: Uuid,
        data: UpdateProject,
    ) -> Result<Option<Project>, StoreError> {
        let mut tables = self.tables.write().await;
        let Some(project) = tables
            .projects
            .iter_mut()
            .find(|p| p.id == id && p.user_id == owner)
        else {
            return Ok(None);
        };

        project.name = data.name;
        project.description = data.description;
        project.updated_at = Utc::now();
        Ok(Some(project.clone()))
    }

    async fn delete_project(&self, id: Uuid, owner: Uuid) -> Result<bool, StoreError> {
        let mut tables = self.tables.write().await;
        let before = tables.projects.len();
        tables.projects.retain(|p| !(p.id == id && p.user_id == owner));
        if tables.projects.len() == before {
            return Ok(false);
        }

        tables.columns.retain(|c| c.project_id != id);
        tables.tasks.retain(|t| t.project_id != id);
        Ok(true)
    }

    async fn insert_column(&self, project_id: Uuid, name: &str) -> Result<Column, StoreError> {
        let mut tables = self.tables.write().await;
        let order = ordering::next_order(
            tables
                .columns
                .iter()
                .filter(|c| c.project_id == project_id)
                .map(|c| c.order),
        );

        let now = Utc::now();
        let column = Column {
            id: Uuid::new_v4(),
            project_id,
            name: name.to_string(),
            order,
            created_at: now,
            updated_at: now,
        };
        tables.columns.push(column.clone());
        Ok(column)
    }

    async fn find_column(&self, project_id: Uuid, id: Uuid) -> Result<Option<Column>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables
            .columns
            .iter()
            .find(|c| c.id == id && c.project_id == project_id)
            .cloned())
    }

    async fn list_columns(&self, project_id: Uuid) -> Result<Vec<Column>, StoreError> {
        let tables = self.tables.read().await;
        let mut columns: Vec<Column> = tables
            .columns
            .iter()
            .filter(|c| c.project_id == project_id)
            .cloned()
            .collect();
        columns.sort_by(|a, b| (a.order, a.created_at, a.id).cmp(&(b.order, b.created_at, b.id)));
        Ok(columns)
    }

    async fn rename_column(
        &self,
        project_id: Uuid,
        id: Uuid,
        name: &str,
    ) -> Result<Option<Column>, StoreError> {
        let mut tables = self.tables.write().await;
        let Some(column) = tables
            .columns
            .iter_mut()
            .find(|c| c.id == id && c.project_id == project_id)
        else {
            return Ok(None);
        };

        column.name = name.to_string();
        column.updated_at = Utc::now();
        Ok(Some(column.clone()))
    }

    async fn delete_column(&self, project_id: Uuid, id: Uuid) -> Result<bool, StoreError> {
        let mut tables = self.tables.write().await;
        let before = tables.columns.len();
        tables.columns.retain(|c| !(c.id == id && c.project_id == project_id));
        if tables.columns.len() == before {
            return Ok(false);
        }

        tables.tasks.retain(|t| t.column_id != id);
        Ok(true)
    }

    async fn insert_task(&self, data: CreateTask) -> Result<Option<Task>, StoreError> {
        let mut tables = self.tables.write().await;
        let column_exists = tables
            .columns
            .iter()
            .any(|c| c.id == data.column_id && c.project_id == data.project_id);
        if !column_exists {
            return Ok(None);
        }

        let order = ordering::next_order(
            tables
                .tasks
                .iter()
                .filter(|t| t.column_id == data.column_id)
                .map(|t| t.order),
        );

        let now = Utc::now();
        let task = Task {
            id: Uuid::new_v4(),
            project_id: data.project_id,
            column_id: data.column_id,
            title: data.title,
            description: data.description,
            order,
            created_at: now,
            updated_at: now,
        };
        tables.tasks.push(task.clone());
        Ok(Some(task))
    }

    async fn find_task(&self, id: Uuid) -> Result<Option<Task>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables.tasks.iter().find(|t| t.id == id).cloned())
    }

    async fn list_tasks(&self, project_id: Uuid) -> Result<Vec<Task>, StoreError> {
        let tables = self.tables.read().await;
        let mut tasks: Vec<Task> = tables
            .tasks
            .iter()
            .filter(|t| t.project_id == project_id)
            .cloned()
            .collect();
        tasks.sort_by(|a, b| (a.order, a.created_at, a.id).cmp(&(b.order, b.created_at, b.id)));
        Ok(tasks)
    }

    async fn update_task(
        &self,
        project_id: Uuid,
        id: Uuid,
        data: UpdateTask,
    ) -> Result<Option<Task>, StoreError> {
        let mut tables = self.tables.write().await;
        let Some(task) = tables
            .tasks
            .iter_mut()
            .find(|t| t.id == id && t.project_id == project_id)
        else {
            return Ok(None);
        };

        task.title = data.title;
        task.description = data.description;
        task.updated_at = Utc::now();
        Ok(Some(task.clone()))
    }

    async fn delete_task(&self, project_id: Uuid, id: Uuid) -> Result<bool, StoreError> {
        let mut tables = self.tables.write().await;
        let before = tables.tasks.len();
        tables.tasks.retain(|t| !(t.id == id && t.project_id == project_id));
        Ok(tables.tasks.len() != before)
    }

    async fn relocate_task(
        &self,
        id: Uuid,
        column_id: Uuid,
        order: i32,
    ) -> Result<Option<Task>, StoreError> {
        let mut tables = self.tables.write().await;
        if !tables.columns.iter().any(|c| c.id == column_id) {
            return Ok(None);
        }
        if !tables.tasks.iter().any(|t| t.id == id) {
            return Ok(None);
        }

        let before: Vec<Slot> = tables.column_tasks(column_id).into_iter().map(Task::slot).collect();
        let after = ordering::reorder(&before, id, order);
        let placed = ordering::placed_order(&after, id).unwrap_or(order);

        let now = Utc::now();
        for slot in ordering::changed_slots(&before, &after) {
            if let Some(task) = tables.tasks.iter_mut().find(|t| t.id == slot.id) {
                task.order = slot.order;
                task.updated_at = now;
            }
        }

        let moved = tables.tasks.iter_mut().find(|t| t.id == id).map(|task| {
            task.column_id = column_id;
            task.order = placed;
            task.updated_at = now;
            task.clone()
        });

        Ok(moved)
    }
}
