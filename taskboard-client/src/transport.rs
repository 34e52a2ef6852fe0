/// Connection between the projection and the board server
///
/// The projection only needs three calls: read the columns, read the tasks,
/// and request a move. Implementations:
///
/// - [`HttpTransport`](crate::http::HttpTransport): the REST API over reqwest
/// - [`MockTransport`](crate::mock::MockTransport): scripted, for tests
///
/// # Example
///
/// ```no_run
/// use taskboard_client::transport::{BoardTransport, TransportResult};
/// use uuid::Uuid;
///
/// # async fn example(transport: &dyn BoardTransport) -> TransportResult<()> {
/// let project_id = Uuid::new_v4();
/// let tasks = transport.list_tasks(project_id).await?;
/// if let Some(first) = tasks.first() {
///     transport.move_task(first.id, first.column_id(), 0).await?;
/// }
/// # Ok(())
/// # }
/// ```

use async_trait::async_trait;
use taskboard_shared::models::{column::Column, task::TaskView};
use uuid::Uuid;

/// Transport error types
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    /// Request never produced a response
    #[error("Network error: {0}")]
    Network(String),

    /// Server answered with a non-success status
    #[error("Server returned {status}: {message}")]
    Status { status: u16, message: String },

    /// Response body was not what the endpoint promises
    #[error("Failed to decode response: {0}")]
    Decode(String),
}

impl TransportError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, TransportError::Status { status: 404, .. })
    }
}

/// Transport result type alias
pub type TransportResult<T> = Result<T, TransportError>;

/// Board operations the projection reconciles against
#[async_trait]
pub trait BoardTransport: Send + Sync {
    /// Name used in logs
    fn name(&self) -> &str;

    async fn list_columns(&self, project_id: Uuid) -> TransportResult<Vec<Column>>;

    async fn list_tasks(&self, project_id: Uuid) -> TransportResult<Vec<TaskView>>;

    /// Asks the server to place `task_id` at `order` in `column_id`
    async fn move_task(&self, task_id: Uuid, column_id: Uuid, order: i32) -> TransportResult<TaskView>;
}
