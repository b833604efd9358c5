//! Application state shared across handlers

use crate::backend::SearchBackend;
use crate::config::Settings;
use crate::metrics::Metrics;
use crate::orchestrator::SearchBarOptions;
use crate::sessions::SessionStore;
use std::sync::Arc;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Global settings
    pub settings: Arc<Settings>,
    /// Live search bar sessions
    pub sessions: SessionStore,
    /// Orchestration metrics
    pub metrics: Arc<Metrics>,
}

impl AppState {
    /// Create new application state
    pub fn new(settings: Settings, backend: Arc<dyn SearchBackend>) -> Self {
        let metrics = Arc::new(Metrics::new());
        let options = SearchBarOptions::from(&settings.search_bar);
        let sessions = SessionStore::with_settings(backend, options, metrics.clone(), &settings.sessions);

        Self {
            settings: Arc::new(settings),
            sessions,
            metrics,
        }
    }

    /// Get instance name
    pub fn instance_name(&self) -> &str {
        &self.settings.general.instance_name
    }
}
