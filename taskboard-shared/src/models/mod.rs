/// Database models for the task board
///
/// Each model owns its SQL. Ownership runs `User → Project → Column → Task`;
/// every child table cascades on delete of its parent.
///
/// # Models
///
/// - `user`: accounts that own projects
/// - `project`: top-level boards, seeded with default columns
/// - `column`: ordered stations within a project
/// - `task`: ordered cards within a column
///
/// # Example
///
/// ```no_run
/// use taskboard_shared::models::column::DEFAULT_COLUMNS;
/// use taskboard_shared::models::project::{CreateProject, Project};
/// use taskboard_shared::db::pool::{connect, PoolConfig};
/// use uuid::Uuid;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = connect(PoolConfig::new("postgresql://localhost/taskboard")).await?;
///
/// let (project, columns) = Project::create_with_columns(&pool, CreateProject {
///     user_id: Uuid::new_v4(),
///     name: "Launch".to_string(),
///     description: None,
/// }, &DEFAULT_COLUMNS).await?;
///
/// assert_eq!(columns.len(), 3);
/// # Ok(())
/// # }
/// ```

pub mod column;
pub mod project;
pub mod task;
pub mod user;
