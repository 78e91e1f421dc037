//! Application state for the HTTP server.

use std::sync::Arc;
use tokio::sync::Mutex;

use crate::analytics::AnalyticsEngine;
use crate::storage::SqliteStorage;

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// SQLite connections aren't `Sync`, so access is serialized
    pub storage: Arc<Mutex<SqliteStorage>>,
    pub analytics: Arc<AnalyticsEngine>,
}

impl AppState {
    pub fn new(storage: SqliteStorage, analytics: AnalyticsEngine) -> Self {
        Self {
            storage: Arc::new(Mutex::new(storage)),
            analytics: Arc::new(analytics),
        }
    }
}
