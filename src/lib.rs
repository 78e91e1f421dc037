/// Public library interface for the nutrition tracker
///
/// Exports the server type, the domain model, storage, the analytics
/// engine and both transports (HTTP and MCP over stdio).

use std::net::SocketAddr;
use std::path::PathBuf;
use thiserror::Error;

pub mod analytics;
pub mod domain;
pub mod http;
pub mod mcp;
pub mod storage;
pub mod tools;

// Re-export the types most callers need
pub use analytics::{generate_insights, AnalyticsEngine, AnalyticsResult, DataPoint, Insight, InsightKind};
pub use domain::*;
pub use storage::{NutritionStorage, SqliteStorage, StorageError};
pub use tools::ToolError;

/// Errors that can occur while starting or running a transport
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Database error: {0}")]
    Database(#[from] storage::StorageError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// The nutrition tracker: a storage backend plus the analytics engine
pub struct NutritionTrackerServer {
    storage: SqliteStorage,
    analytics: AnalyticsEngine,
}

impl NutritionTrackerServer {
    /// Open the SQLite database at `db_path`, creating the schema if needed
    pub async fn new(db_path: PathBuf) -> Result<Self, ServerError> {
        tracing::info!("Initializing nutrition tracker with database: {:?}", db_path);

        let storage = SqliteStorage::new(db_path)?;
        Ok(Self::from_storage(storage))
    }

    /// Wrap an already opened storage backend
    pub fn from_storage(storage: SqliteStorage) -> Self {
        Self {
            storage,
            analytics: AnalyticsEngine::new(),
        }
    }

    /// Serve MCP JSON-RPC over stdin/stdout until stdin closes
    pub async fn run_stdio(self) -> Result<(), ServerError> {
        self.storage.ping()?;

        let mut mcp_server = mcp::McpServer::new(self);
        mcp_server.run().await
    }

    /// Serve the HTTP API on `addr` until the process is stopped
    pub async fn serve_http(self, addr: SocketAddr) -> Result<(), ServerError> {
        self.storage.ping()?;

        let app = http::create_router(self.into_http_state());
        let listener = tokio::net::TcpListener::bind(addr).await?;
        tracing::info!("HTTP API listening on http://{}", listener.local_addr()?);

        axum::serve(listener, app).await?;
        Ok(())
    }

    /// Move storage and engine into shared state for the HTTP handlers
    pub fn into_http_state(self) -> http::AppState {
        http::AppState::new(self.storage, self.analytics)
    }

    /// Get a reference to the storage layer (useful for testing)
    pub fn storage(&self) -> &SqliteStorage {
        &self.storage
    }

    /// Get a reference to the analytics engine
    pub fn analytics(&self) -> &AnalyticsEngine {
        &self.analytics
    }
}
