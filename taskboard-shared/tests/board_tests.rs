/// Ordering Engine behaviour against the in-memory store
///
/// Run with: cargo test -p taskboard-shared --test board_tests

use std::sync::Arc;

use taskboard_shared::board::{Board, BoardError};
use taskboard_shared::models::column::Column;
use taskboard_shared::models::project::Project;
use taskboard_shared::models::task::TaskView;
use taskboard_shared::store::memory::MemoryBoardStore;
use taskboard_shared::store::BoardStore;
use uuid::Uuid;

struct Fixture {
    board: Board,
    owner: Uuid,
    project: Project,
    columns: Vec<Column>,
}

async fn fixture() -> Fixture {
    let board = Board::new(Arc::new(MemoryBoardStore::new()));
    let owner = Uuid::new_v4();
    let (project, columns) = board
        .create_project(owner, "Release", Some("Q3 launch"))
        .await
        .unwrap();

    Fixture {
        board,
        owner,
        project,
        columns,
    }
}

impl Fixture {
    async fn task(&self, column: usize, title: &str) -> TaskView {
        self.board
            .create_task(self.owner, self.project.id, Some(self.columns[column].id), title, None)
            .await
            .unwrap()
    }

    /// Titles and orders of one column, in read order
    async fn column(&self, column: usize) -> Vec<(String, i32)> {
        let column_id = self.columns[column].id;
        self.board
            .list_tasks(self.owner, self.project.id)
            .await
            .unwrap()
            .into_iter()
            .filter(|task| task.column_id() == column_id)
            .map(|task| (task.title, task.order))
            .collect()
    }
}

fn titles(column: &[(String, i32)]) -> Vec<&str> {
    column.iter().map(|(title, _)| title.as_str()).collect()
}

#[tokio::test]
async fn test_project_is_seeded_with_three_columns() {
    let f = fixture().await;

    let columns = f.board.list_columns(f.owner, f.project.id).await.unwrap();
    let seeded: Vec<(&str, i32)> = columns.iter().map(|c| (c.name.as_str(), c.order)).collect();
    assert_eq!(seeded, vec![("To Do", 0), ("In Progress", 1), ("Done", 2)]);
}

#[tokio::test]
async fn test_created_tasks_get_consecutive_orders() {
    let f = fixture().await;

    let orders: Vec<i32> = [
        f.task(0, "A").await,
        f.task(0, "B").await,
        f.task(0, "C").await,
    ]
    .iter()
    .map(|task| task.order)
    .collect();

    assert_eq!(orders, vec![0, 1, 2]);
}

#[tokio::test]
async fn test_new_column_is_appended() {
    let f = fixture().await;

    let column = f.board.create_column(f.owner, f.project.id, "Review").await.unwrap();
    assert_eq!(column.order, 3);

    let renamed = f
        .board
        .update_column(f.owner, f.project.id, column.id, "QA")
        .await
        .unwrap();
    assert_eq!(renamed.name, "QA");
    assert_eq!(renamed.order, 3);
}

#[tokio::test]
async fn test_move_last_task_to_top_of_same_column() {
    let f = fixture().await;
    f.task(0, "A").await;
    f.task(0, "B").await;
    let c = f.task(0, "C").await;

    let moved = f.board.move_task(f.owner, c.id, f.columns[0].id, 0).await.unwrap();
    assert_eq!(moved.order, 0);

    assert_eq!(
        f.column(0).await,
        vec![("C".to_string(), 0), ("A".to_string(), 1), ("B".to_string(), 2)]
    );
}

#[tokio::test]
async fn test_move_down_within_column_preserves_others() {
    let f = fixture().await;
    let a = f.task(0, "A").await;
    f.task(0, "B").await;
    f.task(0, "C").await;
    f.task(0, "D").await;

    f.board.move_task(f.owner, a.id, f.columns[0].id, 2).await.unwrap();

    let column = f.column(0).await;
    assert_eq!(titles(&column), vec!["B", "A", "C", "D"]);
    let orders: Vec<i32> = column.iter().map(|(_, order)| *order).collect();
    assert!(orders.windows(2).all(|pair| pair[0] < pair[1]));
}

#[tokio::test]
async fn test_move_to_empty_column_leaves_source_untouched() {
    let f = fixture().await;
    f.task(0, "A").await;
    f.task(0, "B").await;
    let c = f.task(0, "C").await;

    let moved = f.board.move_task(f.owner, c.id, f.columns[1].id, 0).await.unwrap();

    assert_eq!(moved.column_id(), f.columns[1].id);
    assert_eq!(moved.order, 0);
    assert_eq!(f.column(1).await, vec![("C".to_string(), 0)]);
    assert_eq!(
        f.column(0).await,
        vec![("A".to_string(), 0), ("B".to_string(), 1)]
    );
}

#[tokio::test]
async fn test_cross_column_move_shifts_destination() {
    let f = fixture().await;
    let a = f.task(0, "A").await;
    f.task(1, "X").await;
    f.task(1, "Y").await;

    f.board.move_task(f.owner, a.id, f.columns[1].id, 1).await.unwrap();

    assert_eq!(
        f.column(1).await,
        vec![("X".to_string(), 0), ("A".to_string(), 1), ("Y".to_string(), 2)]
    );
}

#[tokio::test]
async fn test_huge_orders_append_without_colliding() {
    let f = fixture().await;
    let a = f.task(0, "A").await;
    let b = f.task(0, "B").await;
    f.task(0, "C").await;

    let moved = f.board.move_task(f.owner, a.id, f.columns[0].id, i32::MAX).await.unwrap();
    assert_eq!(moved.order, 3);
    f.board.move_task(f.owner, b.id, f.columns[0].id, i32::MAX - 1).await.unwrap();
    f.board.move_task(f.owner, a.id, f.columns[1].id, i32::MAX).await.unwrap();

    assert_eq!(
        f.column(0).await,
        vec![("C".to_string(), 2), ("B".to_string(), 4)]
    );
    assert_eq!(f.column(1).await, vec![("A".to_string(), 0)]);

    let d = f.task(0, "D").await;
    assert_eq!(d.order, 5);
}

#[tokio::test]
async fn test_move_past_end_appends() {
    let f = fixture().await;
    let a = f.task(0, "A").await;
    f.task(0, "B").await;

    f.board.move_task(f.owner, a.id, f.columns[0].id, 2).await.unwrap();

    assert_eq!(
        f.column(0).await,
        vec![("B".to_string(), 1), ("A".to_string(), 2)]
    );
}

#[tokio::test]
async fn test_move_response_expands_column() {
    let f = fixture().await;
    let a = f.task(0, "A").await;

    let moved = f.board.move_task(f.owner, a.id, f.columns[2].id, 0).await.unwrap();
    let json = serde_json::to_value(&moved).unwrap();
    assert_eq!(json["column"]["name"], "Done");
}

#[tokio::test]
async fn test_move_rejects_negative_order() {
    let f = fixture().await;
    let a = f.task(0, "A").await;

    let err = f.board.move_task(f.owner, a.id, f.columns[0].id, -1).await.unwrap_err();
    assert!(matches!(err, BoardError::Validation { field: "order", .. }));
}

#[tokio::test]
async fn test_move_to_column_of_other_project_is_not_found() {
    let f = fixture().await;
    let a = f.task(0, "A").await;
    let (_, other_columns) = f.board.create_project(f.owner, "Other", None).await.unwrap();

    let err = f
        .board
        .move_task(f.owner, a.id, other_columns[0].id, 0)
        .await
        .unwrap_err();
    assert!(matches!(err, BoardError::NotFound("Column")));
}

#[tokio::test]
async fn test_other_users_cannot_reach_the_board() {
    let f = fixture().await;
    let a = f.task(0, "A").await;
    let stranger = Uuid::new_v4();

    assert!(matches!(
        f.board.list_tasks(stranger, f.project.id).await,
        Err(BoardError::NotFound("Project"))
    ));
    assert!(matches!(
        f.board.move_task(stranger, a.id, f.columns[1].id, 0).await,
        Err(BoardError::NotFound("Task"))
    ));
    assert!(matches!(
        f.board.delete_column(stranger, f.project.id, f.columns[0].id).await,
        Err(BoardError::NotFound("Project"))
    ));

    // Nothing moved
    assert_eq!(f.column(0).await, vec![("A".to_string(), 0)]);
}

#[tokio::test]
async fn test_task_of_another_project_is_not_found() {
    let f = fixture().await;
    let a = f.task(0, "A").await;
    let (other, _) = f.board.create_project(f.owner, "Other", None).await.unwrap();

    assert!(matches!(
        f.board.get_task(f.owner, other.id, a.id).await,
        Err(BoardError::NotFound("Task"))
    ));
    assert!(matches!(
        f.board.delete_task(f.owner, other.id, a.id).await,
        Err(BoardError::NotFound("Task"))
    ));
}

#[tokio::test]
async fn test_create_task_requires_column() {
    let f = fixture().await;

    let missing = f
        .board
        .create_task(f.owner, f.project.id, None, "Orphan", None)
        .await
        .unwrap_err();
    assert!(matches!(missing, BoardError::Validation { field: "column_id", .. }));

    let unknown = f
        .board
        .create_task(f.owner, f.project.id, Some(Uuid::new_v4()), "Orphan", None)
        .await
        .unwrap_err();
    assert!(matches!(unknown, BoardError::NotFound("Column")));
}

#[tokio::test]
async fn test_update_task_keeps_position() {
    let f = fixture().await;
    f.task(0, "A").await;
    let b = f.task(0, "B").await;

    let updated = f
        .board
        .update_task(f.owner, f.project.id, b.id, " B2 ", Some("details"))
        .await
        .unwrap();

    assert_eq!(updated.title, "B2");
    assert_eq!(updated.description.as_deref(), Some("details"));
    assert_eq!(updated.order, 1);
    assert_eq!(updated.column_id(), f.columns[0].id);
}

#[tokio::test]
async fn test_delete_task_leaves_gap() {
    let f = fixture().await;
    f.task(0, "A").await;
    let b = f.task(0, "B").await;
    f.task(0, "C").await;

    f.board.delete_task(f.owner, f.project.id, b.id).await.unwrap();

    assert_eq!(
        f.column(0).await,
        vec![("A".to_string(), 0), ("C".to_string(), 2)]
    );
    assert_eq!(f.task(0, "D").await.order, 3);
}

#[tokio::test]
async fn test_delete_column_cascades_tasks() {
    let f = fixture().await;
    let a = f.task(0, "A").await;
    f.task(1, "B").await;

    f.board.delete_column(f.owner, f.project.id, f.columns[0].id).await.unwrap();

    let tasks = f.board.list_tasks(f.owner, f.project.id).await.unwrap();
    assert_eq!(tasks.len(), 1);
    assert!(tasks.iter().all(|task| task.column_id() != f.columns[0].id));
    assert!(matches!(
        f.board.get_task(f.owner, f.project.id, a.id).await,
        Err(BoardError::NotFound("Task"))
    ));
}

#[tokio::test]
async fn test_delete_project_cascades_everything() {
    let f = fixture().await;
    let a = f.task(0, "A").await;

    f.board.delete_project(f.owner, f.project.id).await.unwrap();

    assert!(f.board.list_projects(f.owner).await.unwrap().is_empty());
    assert!(f.board.store().find_task(a.id).await.unwrap().is_none());
    assert!(f.board.store().list_columns(f.project.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_projects_are_listed_newest_first() {
    let f = fixture().await;
    tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    let (newer, _) = f.board.create_project(f.owner, "Newer", None).await.unwrap();

    let projects = f.board.list_projects(f.owner).await.unwrap();
    let ids: Vec<Uuid> = projects.iter().map(|p| p.id).collect();
    assert_eq!(ids, vec![newer.id, f.project.id]);
}

#[tokio::test]
async fn test_validation_limits() {
    let f = fixture().await;

    assert!(f.board.create_project(f.owner, "  ", None).await.is_err());
    assert!(f
        .board
        .create_column(f.owner, f.project.id, &"c".repeat(51))
        .await
        .is_err());
    assert!(f
        .board
        .create_task(f.owner, f.project.id, Some(f.columns[0].id), &"t".repeat(201), None)
        .await
        .is_err());
    assert!(f
        .board
        .create_task(
            f.owner,
            f.project.id,
            Some(f.columns[0].id),
            "ok",
            Some(&"d".repeat(1001))
        )
        .await
        .is_err());
}

#[tokio::test]
async fn test_concurrent_moves_into_one_column_never_share_an_order() {
    let f = fixture().await;
    let mut moving = Vec::new();
    for i in 0..8 {
        moving.push(f.task(0, &format!("T{}", i)).await);
    }
    f.task(1, "X").await;

    let handles: Vec<_> = moving
        .iter()
        .map(|task| {
            let board = f.board.clone();
            let (owner, task_id, column_id) = (f.owner, task.id, f.columns[1].id);
            tokio::spawn(async move { board.move_task(owner, task_id, column_id, 0).await })
        })
        .collect();
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    let column = f.column(1).await;
    assert_eq!(column.len(), 9);
    let mut orders: Vec<i32> = column.iter().map(|(_, order)| *order).collect();
    orders.dedup();
    assert_eq!(orders.len(), 9);
}

#[tokio::test]
async fn test_digest_groups_tasks_by_column() {
    let f = fixture().await;
    f.task(0, "A").await;
    let b = f.task(2, "B").await;

    let digest = f.board.digest(f.owner, f.project.id, None).await.unwrap();
    assert_eq!(digest.project_name, "Release");
    assert_eq!(digest.task_count(), 2);
    let names: Vec<&str> = digest.columns.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["To Do", "In Progress", "Done"]);

    let focused = f.board.digest(f.owner, f.project.id, Some(b.id)).await.unwrap();
    assert_eq!(focused.columns.len(), 1);
    assert_eq!(focused.columns[0].name, "Done");
    assert_eq!(focused.columns[0].tasks[0].title, "B");

    assert!(matches!(
        f.board.digest(f.owner, f.project.id, Some(Uuid::new_v4())).await,
        Err(BoardError::NotFound("Task"))
    ));
}
