/// Scripted transport for testing the projection
///
/// Serves a fixed board and records every move request. Moves succeed and
/// echo the task at its new position, unless the transport was built with
/// [`MockTransport::failing`]. With [`MockTransport::hold`] each move waits
/// for a permit on the shared `Notify`, so tests can observe the board while
/// a confirmation is in flight.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use taskboard_shared::models::{column::Column, task::TaskView};
use tokio::sync::Notify;
use uuid::Uuid;

use crate::transport::{BoardTransport, TransportError, TransportResult};

/// A move the transport was asked to perform
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveCall {
    pub task_id: Uuid,
    pub column_id: Uuid,
    pub order: i32,
}

#[derive(Debug, Default)]
pub struct MockTransport {
    columns: Vec<Column>,
    tasks: Vec<TaskView>,
    should_fail: AtomicBool,
    calls: Mutex<Vec<MoveCall>>,
    gate: Option<Arc<Notify>>,
}

impl MockTransport {
    /// Transport serving an empty board
    pub fn new() -> Self {
        Self::default()
    }

    /// Transport serving the given board
    pub fn with_board(columns: Vec<Column>, tasks: Vec<TaskView>) -> Self {
        Self {
            columns,
            tasks,
            ..Self::default()
        }
    }

    /// Every move fails with a 404
    pub fn failing(self) -> Self {
        self.should_fail.store(true, Ordering::SeqCst);
        self
    }

    /// Moves wait on `gate` before answering
    pub fn hold(mut self, gate: Arc<Notify>) -> Self {
        self.gate = Some(gate);
        self
    }

    pub fn set_failing(&self, should_fail: bool) {
        self.should_fail.store(should_fail, Ordering::SeqCst);
    }

    /// Moves received so far
    pub fn calls(&self) -> Vec<MoveCall> {
        self.calls
            .lock()
            .map(|calls| calls.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl BoardTransport for MockTransport {
    fn name(&self) -> &str {
        "mock"
    }

    async fn list_columns(&self, _project_id: Uuid) -> TransportResult<Vec<Column>> {
        Ok(self.columns.clone())
    }

    async fn list_tasks(&self, _project_id: Uuid) -> TransportResult<Vec<TaskView>> {
        Ok(self.tasks.clone())
    }

    async fn move_task(&self, task_id: Uuid, column_id: Uuid, order: i32) -> TransportResult<TaskView> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(MoveCall {
                task_id,
                column_id,
                order,
            });
        }

        if let Some(gate) = &self.gate {
            gate.notified().await;
        }

        if self.should_fail.load(Ordering::SeqCst) {
            return Err(TransportError::Status {
                status: 404,
                message: "Task not found".to_string(),
            });
        }

        let mut task = self
            .tasks
            .iter()
            .find(|task| task.id == task_id)
            .cloned()
            .ok_or_else(|| TransportError::Status {
                status: 404,
                message: "Task not found".to_string(),
            })?;
        task.column = column_id.into();
        task.order = order;
        Ok(task)
    }
}
