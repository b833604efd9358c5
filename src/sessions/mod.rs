//! Session store
//!
//! Keeps one search bar per client session. Sessions expire after a period
//! without access; an expired session's search bar is dropped, which stops
//! its orchestration task.

use crate::backend::SearchBackend;
use crate::config::SessionSettings;
use crate::metrics::Metrics;
use crate::orchestrator::{SearchBar, SearchBarOptions};
use moka::future::Cache;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;
use uuid::Uuid;

/// Idle-expiring map of session id to search bar
#[derive(Clone)]
pub struct SessionStore {
    cache: Cache<Uuid, Arc<SearchBar>>,
    backend: Arc<dyn SearchBackend>,
    options: SearchBarOptions,
    metrics: Arc<Metrics>,
    idle_timeout: Duration,
}

impl SessionStore {
    /// Create a store with the given idle timeout and capacity
    pub fn new(
        backend: Arc<dyn SearchBackend>,
        options: SearchBarOptions,
        metrics: Arc<Metrics>,
        idle_timeout: Duration,
        max_sessions: u64,
    ) -> Self {
        let cache = Cache::builder()
            .time_to_idle(idle_timeout)
            .max_capacity(max_sessions)
            .eviction_listener(|id, _, cause| {
                debug!("Session {} closed ({:?})", id, cause);
            })
            .build();

        Self {
            cache,
            backend,
            options,
            metrics,
            idle_timeout,
        }
    }

    pub fn with_settings(
        backend: Arc<dyn SearchBackend>,
        options: SearchBarOptions,
        metrics: Arc<Metrics>,
        settings: &SessionSettings,
    ) -> Self {
        Self::new(
            backend,
            options,
            metrics,
            Duration::from_secs(settings.idle_timeout_secs),
            settings.max_sessions,
        )
    }

    /// Start a new search bar and return its session id
    pub async fn create(&self) -> (Uuid, Arc<SearchBar>) {
        let id = Uuid::new_v4();
        let bar = Arc::new(SearchBar::spawn_with_metrics(
            Arc::clone(&self.backend),
            self.options.clone(),
            Arc::clone(&self.metrics),
        ));
        self.cache.insert(id, Arc::clone(&bar)).await;
        (id, bar)
    }

    /// Look up a session, refreshing its idle timer
    pub async fn get(&self, id: &Uuid) -> Option<Arc<SearchBar>> {
        self.cache.get(id).await
    }

    /// How long a session survives without access
    pub fn idle_timeout(&self) -> Duration {
        self.idle_timeout
    }

    /// Close a session; returns whether it existed
    pub async fn remove(&self, id: &Uuid) -> bool {
        self.cache.remove(id).await.is_some()
    }

    /// Number of live sessions (approximate until pending tasks run)
    pub fn len(&self) -> u64 {
        self.cache.entry_count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
