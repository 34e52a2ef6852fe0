//! # Taskboard API Server
//!
//! HTTP server for the multi-user kanban board: projects, columns, tasks
//! with server-side ordering, and the optional board assistant.
//!
//! ## Usage
//!
//! ```bash
//! JWT_SECRET=... DATABASE_URL=postgres://... cargo run -p taskboard-api
//! STORAGE_BACKEND=memory JWT_SECRET=... cargo run -p taskboard-api
//! ```

use std::sync::Arc;

use taskboard_api::{
    app::{build_router, AppState},
    config::{Config, LogFormat, StorageBackend},
};
use taskboard_shared::{
    assistant::{gemini::GeminiAssistant, Assistant},
    board::Board,
    db::{
        migrations::run_migrations,
        pool::{self, PoolConfig},
    },
    store::{memory::MemoryBoardStore, postgres::PgBoardStore, BoardStore},
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        "taskboard_api=debug,taskboard_shared=debug,tower_http=debug".into()
    });
    let registry = tracing_subscriber::registry().with(filter);
    match config.log_format {
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).init(),
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer()).init(),
    }

    tracing::info!(
        "Taskboard API Server v{} starting...",
        env!("CARGO_PKG_VERSION")
    );

    let mut pg_pool = None;
    let store: Arc<dyn BoardStore> = match config.database.backend {
        StorageBackend::Postgres => {
            let url = config
                .database
                .url
                .clone()
                .ok_or_else(|| anyhow::anyhow!("DATABASE_URL is required for the postgres backend"))?;
            let pool =
                pool::connect(PoolConfig::new(url).with_max_connections(config.database.max_connections)).await?;
            run_migrations(&pool).await?;
            pg_pool = Some(pool.clone());
            Arc::new(PgBoardStore::new(pool))
        }
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory storage; data is lost on shutdown");
            Arc::new(MemoryBoardStore::new())
        }
    };

    let assistant: Option<Arc<dyn Assistant>> = match &config.assistant {
        Some(assistant) => {
            tracing::info!(model = %assistant.model, "Assistant enabled");
            Some(Arc::new(GeminiAssistant::new(assistant.gemini())?))
        }
        None => {
            tracing::info!("No assistant API key configured; assistant endpoints disabled");
            None
        }
    };

    let bind_address = config.bind_address();
    let app = build_router(AppState::new(Board::new(store), assistant, config));

    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    tracing::info!("Server listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(pool) = pg_pool {
        pool::close(pool).await;
    }
    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "Failed to listen for shutdown signal");
        return;
    }
    tracing::info!("Shutdown signal received, exiting...");
}
