use std::sync::Arc;

use tracing::error;

use marquee_db::Database;

use crate::error::{ApiError, ApiResult};
use crate::session::SessionStore;

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub db: Database,
    pub sessions: SessionStore,
}

impl AppStateInner {
    pub fn new(db: Database, sessions: SessionStore) -> AppState {
        Arc::new(Self { db, sessions })
    }
}

/// Run blocking DB work off the async runtime. The closure opens and drops
/// its own connection.
pub async fn with_db<F, T>(state: &AppState, f: F) -> ApiResult<T>
where
    F: FnOnce(&Database) -> marquee_db::Result<T> + Send + 'static,
    T: Send + 'static,
{
    let state = Arc::clone(state);
    tokio::task::spawn_blocking(move || f(&state.db))
        .await
        .map_err(|e| {
            error!("spawn_blocking join error: {}", e);
            ApiError::Unexpected(e.to_string())
        })?
        .map_err(ApiError::from)
}
