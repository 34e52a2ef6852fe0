/// Local mirror of one project's board
///
/// A snapshot is an immutable value: a move produces a new snapshot rather
/// than editing the current one, which is what makes rollback exact.

use std::cmp::Ordering;
use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use taskboard_shared::models::column::{Column, ColumnSummary};
use taskboard_shared::models::task::{ColumnRef, TaskView};
use taskboard_shared::ordering::{reorder, Slot};
use uuid::Uuid;

/// Columns and tasks of a project as last rendered
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BoardSnapshot {
    pub columns: Vec<Column>,
    pub tasks: Vec<TaskView>,
}

/// Display order: `order`, then creation time, then ID
fn read_order(a: &TaskView, b: &TaskView) -> Ordering {
    a.order
        .cmp(&b.order)
        .then_with(|| a.created_at.cmp(&b.created_at))
        .then_with(|| a.id.cmp(&b.id))
}

impl BoardSnapshot {
    pub fn new(mut columns: Vec<Column>, tasks: Vec<TaskView>) -> Self {
        columns.sort_by(|a, b| a.order.cmp(&b.order).then_with(|| a.created_at.cmp(&b.created_at)));
        Self { columns, tasks }
    }

    pub fn task(&self, id: Uuid) -> Option<&TaskView> {
        self.tasks.iter().find(|task| task.id == id)
    }

    pub fn column(&self, id: Uuid) -> Option<&Column> {
        self.columns.iter().find(|column| column.id == id)
    }

    /// Tasks of a column in display order
    pub fn tasks_in(&self, column_id: Uuid) -> Vec<&TaskView> {
        let mut tasks: Vec<&TaskView> = self
            .tasks
            .iter()
            .filter(|task| task.column_id() == column_id)
            .collect();
        tasks.sort_by(|a, b| read_order(a, b));
        tasks
    }

    /// Snapshot with `task_id` placed at `order` in `column_id`
    ///
    /// The destination column is renumbered with the shared shifting rule;
    /// a source column left by a cross-column move keeps its gap. Returns
    /// `None` if the task is not on this board.
    pub fn with_move(&self, task_id: Uuid, column_id: Uuid, order: i32) -> Option<BoardSnapshot> {
        self.task(task_id)?;

        let destination: Vec<Slot> = self.tasks_in(column_id).iter().map(|task| task.slot()).collect();
        let arranged: HashMap<Uuid, i32> = reorder(&destination, task_id, order)
            .into_iter()
            .map(|slot| (slot.id, slot.order))
            .collect();

        let moved_to = match self.column(column_id) {
            Some(column) => ColumnRef::Expanded(ColumnSummary::from(column)),
            None => ColumnRef::Id(column_id),
        };

        let tasks = self
            .tasks
            .iter()
            .map(|task| {
                let mut task = task.clone();
                if task.id == task_id {
                    task.column = moved_to.clone();
                }
                if let Some(&new_order) = arranged.get(&task.id) {
                    task.order = new_order;
                }
                task
            })
            .collect();

        Some(BoardSnapshot {
            columns: self.columns.clone(),
            tasks,
        })
    }
}
