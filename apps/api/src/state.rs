use std::sync::Arc;

use crate::config::Config;
use crate::export::pdf::PageConfig;
use crate::persistence::SnapshotStore;
use crate::session::SessionRegistry;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub sessions: SessionRegistry,
    /// Pluggable snapshot store. Default: files under SNAPSHOT_DIR. Swap via STORE_BACKEND.
    pub store: Arc<dyn SnapshotStore>,
    pub config: Config,
    /// A4 geometry and type sizes for the PDF export.
    pub page_config: Arc<PageConfig>,
}

impl AppState {
    pub fn new(config: Config, store: Arc<dyn SnapshotStore>) -> Self {
        AppState {
            sessions: SessionRegistry::default(),
            store,
            config,
            page_config: Arc::new(PageConfig::default()),
        }
    }
}
