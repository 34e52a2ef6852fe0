/// Optimistic projection of a board
///
/// Drag-and-drop moves are applied to the local snapshot immediately and
/// confirmed with the server afterwards. If the server rejects the move, or
/// cannot be reached, the snapshot captured just before the move is restored
/// as a whole.
///
/// Snapshots are published on a `tokio::sync::watch` channel; a renderer
/// subscribes and redraws on every change.
///
/// A [`PendingMove`] owns the rollback. If it is dropped before the server
/// confirmed the move (the settling future was cancelled, timed out or never
/// polled), the previous snapshot is published and the projection accepts
/// moves again.
///
/// # Flow
///
/// ```text
/// drop ──resolve_drop──► MoveIntent ──begin_move (sync)──► optimistic snapshot published
///                                              │
///                                       settle (async) ──► Confirmed
///                                              └─────────► RolledBack (previous snapshot published)
/// ```
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use taskboard_client::mock::MockTransport;
/// use taskboard_client::projection::{DropTarget, Projection};
/// use uuid::Uuid;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let project_id = Uuid::new_v4();
/// let projection = Projection::new(project_id, Arc::new(MockTransport::new()));
/// projection.refresh().await?;
///
/// let (task_id, column_id) = (Uuid::new_v4(), Uuid::new_v4());
/// let outcome = projection.drop_task(task_id, DropTarget::Column(column_id)).await?;
/// println!("{:?}", outcome);
/// # Ok(())
/// # }
/// ```

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use taskboard_shared::models::task::TaskView;
use tokio::sync::watch;
use uuid::Uuid;

use crate::snapshot::BoardSnapshot;
use crate::transport::{BoardTransport, TransportError};

/// Where a dragged task was released
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropTarget {
    /// On another task: insert before it
    Task(Uuid),

    /// On a column's empty space: append
    Column(Uuid),
}

/// A resolved move request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveIntent {
    pub task_id: Uuid,
    pub from_column: Uuid,
    pub column_id: Uuid,
    pub order: i32,
}

/// An optimistic move awaiting confirmation
pub struct PendingMove {
    pub intent: MoveIntent,
    guard: RollbackGuard,
}

impl std::fmt::Debug for PendingMove {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PendingMove").field("intent", &self.intent).finish()
    }
}

/// Restores `previous` and releases the in-flight flag when dropped,
/// unless the move was confirmed first
struct RollbackGuard {
    state: Arc<watch::Sender<BoardSnapshot>>,
    in_flight: Arc<AtomicBool>,
    previous: Option<BoardSnapshot>,
}

impl RollbackGuard {
    fn confirm(mut self) {
        self.previous = None;
    }
}

impl Drop for RollbackGuard {
    fn drop(&mut self) {
        if let Some(previous) = self.previous.take() {
            self.state.send_replace(previous);
        }
        self.in_flight.store(false, Ordering::SeqCst);
    }
}

/// How a move ended
#[derive(Debug, Clone, PartialEq)]
pub enum MoveOutcome {
    /// No valid target; nothing changed and nothing was sent
    Ignored,

    /// Server accepted the move
    Confirmed(TaskView),

    /// Server rejected the move or was unreachable; the board was restored
    RolledBack(TransportError),
}

/// Projection error types
#[derive(Debug, thiserror::Error)]
pub enum ProjectionError {
    /// Another move is still awaiting confirmation; also returned by
    /// [`Projection::refresh`], which would otherwise race the rollback
    #[error("A move is already in flight")]
    Busy,

    #[error(transparent)]
    Transport(#[from] TransportError),
}

pub struct Projection {
    project_id: Uuid,
    transport: Arc<dyn BoardTransport>,
    state: Arc<watch::Sender<BoardSnapshot>>,
    in_flight: Arc<AtomicBool>,
}

impl Projection {
    /// Projection with an empty board; call [`Projection::refresh`] to load it
    pub fn new(project_id: Uuid, transport: Arc<dyn BoardTransport>) -> Self {
        Self::with_snapshot(project_id, transport, BoardSnapshot::default())
    }

    pub fn with_snapshot(
        project_id: Uuid,
        transport: Arc<dyn BoardTransport>,
        snapshot: BoardSnapshot,
    ) -> Self {
        let (state, _) = watch::channel(snapshot);
        Self {
            project_id,
            transport,
            state: Arc::new(state),
            in_flight: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn project_id(&self) -> Uuid {
        self.project_id
    }

    /// Receiver notified on every published snapshot
    pub fn subscribe(&self) -> watch::Receiver<BoardSnapshot> {
        self.state.subscribe()
    }

    pub fn current(&self) -> BoardSnapshot {
        self.state.borrow().clone()
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst)
    }

    fn claim(&self) -> Result<(), ProjectionError> {
        self.in_flight
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .map(|_| ())
            .map_err(|_| ProjectionError::Busy)
    }

    /// Replaces the local board with the server's columns and tasks
    ///
    /// Fails with [`ProjectionError::Busy`] while a move is unconfirmed,
    /// including one that began while the board was loading.
    pub async fn refresh(&self) -> Result<(), ProjectionError> {
        if self.is_busy() {
            return Err(ProjectionError::Busy);
        }
        let columns = self.transport.list_columns(self.project_id).await?;
        let tasks = self.transport.list_tasks(self.project_id).await?;

        self.claim()?;
        self.state.send_replace(BoardSnapshot::new(columns, tasks));
        self.in_flight.store(false, Ordering::SeqCst);

        let snapshot = self.state.borrow();
        tracing::debug!(
            project_id = %self.project_id,
            columns = snapshot.columns.len(),
            tasks = snapshot.tasks.len(),
            "Board refreshed"
        );
        Ok(())
    }

    /// Turns a drop into a move, or `None` when there is nothing to do
    ///
    /// Dropping on a task targets that task's column and order. Dropping on
    /// a column targets the number of tasks already in it. Unknown tasks or
    /// columns, and a task dropped on itself, resolve to `None`.
    pub fn resolve_drop(&self, task_id: Uuid, target: DropTarget) -> Option<MoveIntent> {
        let snapshot = self.state.borrow();
        let task = snapshot.task(task_id)?;

        let (column_id, order) = match target {
            DropTarget::Task(other_id) if other_id == task_id => return None,
            DropTarget::Task(other_id) => {
                let other = snapshot.task(other_id)?;
                (other.column_id(), other.order)
            }
            DropTarget::Column(column_id) => {
                snapshot.column(column_id)?;
                let count = snapshot.tasks_in(column_id).len();
                (column_id, i32::try_from(count).ok()?)
            }
        };

        Some(MoveIntent {
            task_id,
            from_column: task.column_id(),
            column_id,
            order,
        })
    }

    /// Publishes the optimistic snapshot for `intent` without waiting
    ///
    /// Fails with [`ProjectionError::Busy`] while an earlier move is
    /// unconfirmed. The returned [`PendingMove`] is passed to
    /// [`Projection::settle`]; dropping it instead rolls the move back.
    pub fn begin_move(&self, intent: MoveIntent) -> Result<Option<PendingMove>, ProjectionError> {
        self.claim()?;

        let previous = self.current();
        let Some(optimistic) = previous.with_move(intent.task_id, intent.column_id, intent.order) else {
            self.in_flight.store(false, Ordering::SeqCst);
            return Ok(None);
        };

        self.state.send_replace(optimistic);
        tracing::debug!(
            task_id = %intent.task_id,
            from_column = %intent.from_column,
            to_column = %intent.column_id,
            order = intent.order,
            "Optimistic move applied"
        );
        Ok(Some(PendingMove {
            intent,
            guard: RollbackGuard {
                state: self.state.clone(),
                in_flight: self.in_flight.clone(),
                previous: Some(previous),
            },
        }))
    }

    /// Confirms a pending move with the server, rolling back on any failure
    pub async fn settle(&self, pending: PendingMove) -> MoveOutcome {
        let PendingMove { intent, guard } = pending;
        let MoveIntent {
            task_id,
            column_id,
            order,
            ..
        } = intent;

        match self.transport.move_task(task_id, column_id, order).await {
            Ok(task) => {
                guard.confirm();
                MoveOutcome::Confirmed(task)
            }
            Err(err) => {
                tracing::warn!(
                    task_id = %task_id,
                    transport = self.transport.name(),
                    error = %err,
                    "Move rejected, restoring previous board"
                );
                drop(guard);
                MoveOutcome::RolledBack(err)
            }
        }
    }

    /// Resolves, applies and confirms a drop in one call
    pub async fn drop_task(&self, task_id: Uuid, target: DropTarget) -> Result<MoveOutcome, ProjectionError> {
        let Some(intent) = self.resolve_drop(task_id, target) else {
            return Ok(MoveOutcome::Ignored);
        };
        match self.begin_move(intent)? {
            Some(pending) => Ok(self.settle(pending).await),
            None => Ok(MoveOutcome::Ignored),
        }
    }
}
