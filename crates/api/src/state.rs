use std::sync::Arc;

use guardian_core::dmca::DmcaTemplateStore;
use tokio::sync::RwLock;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: guardian_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// In-memory DMCA notice templates. Not persisted across restarts.
    pub templates: Arc<RwLock<DmcaTemplateStore>>,
}

impl AppState {
    /// State with the default DMCA templates loaded.
    pub fn new(pool: guardian_db::DbPool, config: ServerConfig) -> Self {
        Self {
            pool,
            config: Arc::new(config),
            templates: Arc::new(RwLock::new(DmcaTemplateStore::with_defaults())),
        }
    }
}
