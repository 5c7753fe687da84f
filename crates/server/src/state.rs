//! Application State
//!
//! Shared state across all handlers.

use std::sync::Arc;

use balcao_catalog::CatalogIndex;
use balcao_config::Settings;
use balcao_engine::Attendant;
use balcao_persistence::SessionStore;

/// Application state
#[derive(Clone)]
pub struct AppState {
    /// Loaded configuration, immutable for the process lifetime.
    pub settings: Arc<Settings>,
    /// The conversation engine every webhook message is handed to.
    pub attendant: Arc<Attendant>,
    /// Catalog snapshot, for health reporting.
    pub catalog: Arc<CatalogIndex>,
    /// Session store handle, for health probes.
    pub sessions: Arc<dyn SessionStore>,
}

impl AppState {
    pub fn new(
        settings: Arc<Settings>,
        attendant: Arc<Attendant>,
        catalog: Arc<CatalogIndex>,
        sessions: Arc<dyn SessionStore>,
    ) -> Self {
        Self {
            settings,
            attendant,
            catalog,
            sessions,
        }
    }
}
