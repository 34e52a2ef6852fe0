/// HTTP tests for auth, projects, columns, tasks and moves
///
/// The router runs over the in-memory store, so these need no database.

mod common;

use axum::http::StatusCode;
use common::{create_user, id, send, token_for, TestContext};
use serde_json::{json, Value};
use uuid::Uuid;

fn titles_in(tasks: &Value, column_id: Uuid) -> Vec<(String, i64)> {
    tasks
        .as_array()
        .unwrap()
        .iter()
        .filter(|t| id(&t["column"]["id"]) == column_id)
        .map(|t| (t["title"].as_str().unwrap().to_string(), t["order"].as_i64().unwrap()))
        .collect()
}

#[tokio::test]
async fn test_health_reports_connected_store() {
    let ctx = TestContext::new().await;

    let (status, body) = send(&ctx.app, "GET", "/health", None, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["database"], "connected");
    assert_eq!(body["store"], "memory");
}

#[tokio::test]
async fn test_register_login_refresh() {
    let ctx = TestContext::new().await;
    let credentials = json!({ "email": "sam@example.com", "password": "kanban2024" });

    let (status, registered) = send(&ctx.app, "POST", "/v1/auth/register", None, Some(credentials.clone())).await;
    assert_eq!(status, StatusCode::CREATED, "{}", registered);
    assert!(registered["access_token"].is_string());

    let (status, _) = send(&ctx.app, "POST", "/v1/auth/register", None, Some(credentials.clone())).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, logged_in) = send(&ctx.app, "POST", "/v1/auth/login", None, Some(credentials)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(logged_in["user_id"], registered["user_id"]);

    let (status, _) = send(
        &ctx.app,
        "POST",
        "/v1/auth/login",
        None,
        Some(json!({ "email": "sam@example.com", "password": "wrong-pass1" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, refreshed) = send(
        &ctx.app,
        "POST",
        "/v1/auth/refresh",
        None,
        Some(json!({ "refresh_token": logged_in["refresh_token"] })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let bearer = format!("Bearer {}", refreshed["access_token"].as_str().unwrap());
    let (status, _) = send(&ctx.app, "GET", "/v1/projects", Some(&bearer), None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_register_validation() {
    let ctx = TestContext::new().await;

    let (status, body) = send(
        &ctx.app,
        "POST",
        "/v1/auth/register",
        None,
        Some(json!({ "email": "not-an-email", "password": "short" })),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    let fields: Vec<&str> = body["details"]
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["field"].as_str().unwrap())
        .collect();
    assert_eq!(fields, vec!["email", "password"]);
}

#[tokio::test]
async fn test_board_routes_require_token() {
    let ctx = TestContext::new().await;

    let (status, _) = send(&ctx.app, "GET", "/v1/projects", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(&ctx.app, "GET", "/v1/projects", Some("Token abc"), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&ctx.app, "GET", "/v1/projects", Some("Bearer not.a.jwt"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_create_project_seeds_columns() {
    let ctx = TestContext::new().await;

    let (status, body) = ctx
        .send("POST", "/v1/projects", Some(json!({ "name": "  Launch  ", "description": "Q3" })))
        .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["name"], "Launch");
    let columns: Vec<(&str, i64)> = body["columns"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| (c["name"].as_str().unwrap(), c["order"].as_i64().unwrap()))
        .collect();
    assert_eq!(columns, vec![("To Do", 0), ("In Progress", 1), ("Done", 2)]);

    let project_id = id(&body["id"]);
    let (status, listed) = ctx.send("GET", &format!("/v1/projects/{}/columns", project_id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed.as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_project_validation_and_crud() {
    let ctx = TestContext::new().await;

    let (status, body) = ctx.send("POST", "/v1/projects", Some(json!({ "name": "   " }))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["details"][0]["field"], "name");

    let (status, _) = ctx
        .send("POST", "/v1/projects", Some(json!({ "name": "x".repeat(101) })))
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (project_id, _) = ctx.create_project("Board").await;
    let uri = format!("/v1/projects/{}", project_id);

    let (status, updated) = ctx.send("PUT", &uri, Some(json!({ "name": "Renamed" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["name"], "Renamed");

    let (status, body) = ctx.send("DELETE", &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["message"].is_string());

    let (status, _) = ctx.send("GET", &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_projects_are_private() {
    let ctx = TestContext::new().await;
    let (project_id, columns) = ctx.create_project("Mine").await;
    let task_id = ctx.create_task(project_id, columns[0], "Secret").await;

    let stranger = format!("Bearer {}", token_for(create_user(&ctx.board, "stranger").await));

    let (status, listed) = send(&ctx.app, "GET", "/v1/projects", Some(&stranger), None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(listed.as_array().unwrap().is_empty());

    let (status, _) = send(&ctx.app, "GET", &format!("/v1/projects/{}/tasks", project_id), Some(&stranger), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(
        &ctx.app,
        "PATCH",
        &format!("/v1/tasks/{}/move", task_id),
        Some(&stranger),
        Some(json!({ "column_id": columns[1], "order": 0 })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_column_crud() {
    let ctx = TestContext::new().await;
    let (project_id, columns) = ctx.create_project("Board").await;
    let base = format!("/v1/projects/{}/columns", project_id);

    let (status, created) = ctx.send("POST", &base, Some(json!({ "name": "Review" }))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["order"], 3);

    let review = id(&created["id"]);
    let (status, renamed) = ctx
        .send("PUT", &format!("{}/{}", base, review), Some(json!({ "name": "QA" })))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(renamed["name"], "QA");
    assert_eq!(renamed["order"], 3);

    let task_id = ctx.create_task(project_id, columns[0], "Doomed").await;
    let (status, _) = ctx.send("DELETE", &format!("{}/{}", base, columns[0]), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = ctx
        .send("GET", &format!("/v1/projects/{}/tasks/{}", project_id, task_id), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_task_crud_expands_column() {
    let ctx = TestContext::new().await;
    let (project_id, columns) = ctx.create_project("Board").await;
    let base = format!("/v1/projects/{}/tasks", project_id);

    let (status, body) = ctx.send("POST", &base, Some(json!({ "title": "No column" }))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["details"][0]["field"], "column_id");

    let (status, created) = ctx
        .send(
            "POST",
            &base,
            Some(json!({ "column_id": columns[0], "title": "Write tests", "description": "all of them" })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["order"], 0);
    assert_eq!(created["column"]["name"], "To Do");
    assert_eq!(created["column"]["order"], 0);

    let task_uri = format!("{}/{}", base, created["id"].as_str().unwrap());
    let (status, updated) = ctx
        .send("PUT", &task_uri, Some(json!({ "title": "Write more tests" })))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["title"], "Write more tests");
    assert_eq!(updated["order"], 0);
    assert!(updated["description"].is_null());

    let (status, fetched) = ctx.send("GET", &task_uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["column"]["id"], json!(columns[0]));

    let (status, _) = ctx.send("DELETE", &task_uri, None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = ctx.send("GET", &task_uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_move_to_top_shifts_siblings() {
    let ctx = TestContext::new().await;
    let (project_id, columns) = ctx.create_project("Board").await;
    ctx.create_task(project_id, columns[0], "A").await;
    ctx.create_task(project_id, columns[0], "B").await;
    let c = ctx.create_task(project_id, columns[0], "C").await;

    let (status, moved) = ctx
        .send(
            "PATCH",
            &format!("/v1/tasks/{}/move", c),
            Some(json!({ "column_id": columns[0], "order": 0 })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(moved["order"], 0);
    assert_eq!(moved["column"]["name"], "To Do");

    let (_, tasks) = ctx.send("GET", &format!("/v1/projects/{}/tasks", project_id), None).await;
    assert_eq!(
        titles_in(&tasks, columns[0]),
        vec![("C".to_string(), 0), ("A".to_string(), 1), ("B".to_string(), 2)]
    );
}

#[tokio::test]
async fn test_move_across_columns() {
    let ctx = TestContext::new().await;
    let (project_id, columns) = ctx.create_project("Board").await;
    let a = ctx.create_task(project_id, columns[0], "A").await;
    ctx.create_task(project_id, columns[0], "B").await;
    ctx.create_task(project_id, columns[1], "X").await;

    let (status, moved) = ctx
        .send(
            "PATCH",
            &format!("/v1/tasks/{}/move", a),
            Some(json!({ "column_id": columns[1], "order": 0 })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(moved["column"]["id"], json!(columns[1]));

    let (_, tasks) = ctx.send("GET", &format!("/v1/projects/{}/tasks", project_id), None).await;
    assert_eq!(titles_in(&tasks, columns[0]), vec![("B".to_string(), 1)]);
    assert_eq!(
        titles_in(&tasks, columns[1]),
        vec![("A".to_string(), 0), ("X".to_string(), 1)]
    );
}

#[tokio::test]
async fn test_move_rejections() {
    let ctx = TestContext::new().await;
    let (project_id, columns) = ctx.create_project("Board").await;
    let (_, other_columns) = ctx.create_project("Other").await;
    let task_id = ctx.create_task(project_id, columns[0], "A").await;
    let uri = format!("/v1/tasks/{}/move", task_id);

    let (status, body) = ctx
        .send("PATCH", &uri, Some(json!({ "column_id": columns[0], "order": -1 })))
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["details"][0]["field"], "order");

    let (status, _) = ctx
        .send("PATCH", &uri, Some(json!({ "column_id": other_columns[0], "order": 0 })))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = ctx
        .send(
            "PATCH",
            &format!("/v1/tasks/{}/move", Uuid::new_v4()),
            Some(json!({ "column_id": columns[0], "order": 0 })),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, task) = ctx.send("GET", &format!("/v1/projects/{}/tasks/{}", project_id, task_id), None).await;
    assert_eq!(task["order"], 0);
    assert_eq!(task["column"]["id"], json!(columns[0]));
}
