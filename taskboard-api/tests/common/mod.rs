//! Common test utilities for integration tests
//!
//! This module provides shared infrastructure for integration tests:
//! - An app over the in-memory store and a scripted assistant
//! - Test user creation and JWT token generation
//! - Request helpers returning status and JSON body

#![allow(dead_code)]

use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::Value;
use std::sync::Arc;
use taskboard_api::app::{build_router, AppState};
use taskboard_api::config::Config;
use taskboard_shared::assistant::scripted::ScriptedAssistant;
use taskboard_shared::assistant::Assistant;
use taskboard_shared::auth::jwt::{create_token, Claims, TokenType};
use taskboard_shared::board::Board;
use taskboard_shared::models::user::CreateUser;
use taskboard_shared::store::memory::MemoryBoardStore;
use tower::ServiceExt;
use uuid::Uuid;

pub const JWT_SECRET: &str = "integration-test-secret-at-least-32-bytes";

/// Test context containing all necessary resources
pub struct TestContext {
    pub app: axum::Router,
    pub board: Board,
    pub assistant: Arc<ScriptedAssistant>,
    pub user_id: Uuid,
    pub jwt_token: String,
}

impl TestContext {
    /// App with a scripted assistant
    pub async fn new() -> Self {
        Self::build(Some(Arc::new(ScriptedAssistant::new()))).await
    }

    /// App with no assistant configured
    pub async fn without_assistant() -> Self {
        Self::build(None).await
    }

    /// App whose assistant fails every call
    pub async fn with_failing_assistant() -> Self {
        Self::build(Some(Arc::new(ScriptedAssistant::failing()))).await
    }

    async fn build(assistant: Option<Arc<ScriptedAssistant>>) -> Self {
        let board = Board::new(Arc::new(MemoryBoardStore::new()));

        let user_id = create_user(&board, "owner").await;
        let jwt_token = token_for(user_id);

        let scripted = assistant.clone().unwrap_or_else(|| Arc::new(ScriptedAssistant::new()));
        let dyn_assistant = assistant.map(|a| a as Arc<dyn Assistant>);
        let state = AppState::new(board.clone(), dyn_assistant, Config::for_memory(JWT_SECRET));

        TestContext {
            app: build_router(state),
            board,
            assistant: scripted,
            user_id,
            jwt_token,
        }
    }

    /// Returns authorization header value
    pub fn auth_header(&self) -> String {
        format!("Bearer {}", self.jwt_token)
    }

    /// Sends an authenticated request
    pub async fn send(&self, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        send(&self.app, method, uri, Some(&self.auth_header()), body).await
    }

    /// Creates a project through the API, returning it and its column IDs
    pub async fn create_project(&self, name: &str) -> (Uuid, Vec<Uuid>) {
        let (status, body) = self
            .send("POST", "/v1/projects", Some(serde_json::json!({ "name": name })))
            .await;
        assert_eq!(status, StatusCode::CREATED, "{}", body);

        let columns = body["columns"]
            .as_array()
            .unwrap()
            .iter()
            .map(|c| id(&c["id"]))
            .collect();
        (id(&body["id"]), columns)
    }

    /// Creates a task through the API, returning its ID
    pub async fn create_task(&self, project_id: Uuid, column_id: Uuid, title: &str) -> Uuid {
        let (status, body) = self
            .send(
                "POST",
                &format!("/v1/projects/{}/tasks", project_id),
                Some(serde_json::json!({ "column_id": column_id, "title": title })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{}", body);
        id(&body["id"])
    }
}

/// Inserts a user directly into the store
pub async fn create_user(board: &Board, label: &str) -> Uuid {
    board
        .store()
        .insert_user(CreateUser {
            email: format!("{}-{}@example.com", label, Uuid::new_v4()),
            password_hash: "test_hash".to_string(), // Not used in tests
            name: Some(label.to_string()),
        })
        .await
        .unwrap()
        .id
}

pub fn token_for(user_id: Uuid) -> String {
    create_token(&Claims::new(user_id, TokenType::Access), JWT_SECRET).unwrap()
}

pub fn id(value: &Value) -> Uuid {
    value.as_str().unwrap().parse().unwrap()
}

/// Sends a request through the router and decodes the JSON body
pub async fn send(
    app: &axum::Router,
    method: &str,
    uri: &str,
    authorization: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(value) = authorization {
        builder = builder.header("authorization", value);
    }
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string())),
        None => builder.body(Body::empty()),
    }
    .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
    };
    (status, json)
}
