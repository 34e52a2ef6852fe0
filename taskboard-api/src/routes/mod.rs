/// API route handlers
///
/// This module contains all route handlers organized by resource:
///
/// - `health`: Health check endpoint
/// - `auth`: Authentication endpoints (register, login, refresh)
/// - `projects`: Project CRUD
/// - `columns`: Column CRUD within a project
/// - `tasks`: Task CRUD and the move operation
/// - `assistant`: Board summary and question answering

pub mod assistant;
pub mod auth;
pub mod columns;
pub mod health;
pub mod projects;
pub mod tasks;

use serde::{Deserialize, Serialize};

/// Confirmation body returned by delete endpoints
#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
