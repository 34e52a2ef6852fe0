/// `GET /health`, unauthenticated liveness and store reachability
///
/// ```json
/// { "status": "healthy", "version": "0.1.0", "store": "postgres", "database": "connected" }
/// ```

use crate::{app::AppState, error::ApiResult};
use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// `healthy` or `degraded`
    pub status: String,
    pub version: String,

    /// Store backend name
    pub store: String,

    /// `connected` or `disconnected`
    pub database: String,
}

/// An unreachable store reports `degraded` with a 200 so load balancers can
/// still tell the process is up.
pub async fn health_check(State(state): State<AppState>) -> ApiResult<Json<HealthResponse>> {
    let store = state.board.store();
    let reachable = store
        .ping()
        .await
        .map_err(|err| tracing::warn!(error = %err, backend = store.name(), "Store ping failed"))
        .is_ok();

    let (status, database) = if reachable {
        ("healthy", "connected")
    } else {
        ("degraded", "disconnected")
    };

    Ok(Json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        store: store.name().to_string(),
        database: database.to_string(),
    }))
}
