//! Shared server state and the bridge from async handlers to the
//! synchronous stock service.

use crate::errors::ApiError;
use beerstock_core::{SqliteBeerRepository, StockResult, StockService};
use rusqlite::Connection;
use std::sync::{Arc, Mutex};

/// State cloned into every handler.
///
/// All requests share one SQLite connection; the mutex serializes them.
#[derive(Clone)]
pub struct AppState {
    conn: Arc<Mutex<Connection>>,
}

impl AppState {
    pub fn new(conn: Connection) -> Self {
        Self {
            conn: Arc::new(Mutex::new(conn)),
        }
    }

    /// Runs one service operation on the blocking pool.
    pub async fn run<T, F>(&self, op: F) -> Result<T, ApiError>
    where
        T: Send + 'static,
        F: FnOnce(&StockService<SqliteBeerRepository<'_>>) -> StockResult<T> + Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || {
            let conn = conn
                .lock()
                .map_err(|_| ApiError::Internal("database connection lock poisoned".to_string()))?;
            let service = StockService::new(SqliteBeerRepository::new(&conn));
            op(&service).map_err(ApiError::from)
        })
        .await
        .map_err(|err| ApiError::Internal(format!("storage task failed: {err}")))?
    }
}
