//! Search bar query orchestration
//!
//! A [`SearchBar`] turns a live `(query, filters, view)` input into
//! debounced fetches against a [`SearchBackend`], routed by the configured
//! [`SearchBarApi`] strategy, and publishes the latest [`ResultSnapshot`].
//!
//! Responses are applied last-fetch-wins: every dispatch bumps a generation
//! counter and a settled fetch only lands if its generation is still current.
//! Dropping the `SearchBar` stops its task and aborts outstanding fetches.

mod driver;
mod snapshot;
mod strategy;

pub use snapshot::{ResultSnapshot, SearchBarInput};
pub use strategy::{execute, plan, BackendRequest, Outcome, Plan, SearchBarOptions};

use crate::backend::SearchBackend;
use crate::config::SearchBarApi;
use crate::filters::AppliedFilters;
use crate::metrics::Metrics;
use driver::Driver;
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Handle to a running search bar orchestrator
pub struct SearchBar {
    input_tx: watch::Sender<SearchBarInput>,
    variant_tx: watch::Sender<SearchBarApi>,
    snapshot_rx: watch::Receiver<ResultSnapshot>,
    task: JoinHandle<()>,
}

impl SearchBar {
    /// Start a search bar on the current Tokio runtime
    pub fn spawn(backend: Arc<dyn SearchBackend>, options: SearchBarOptions) -> Self {
        Self::spawn_with_metrics(backend, options, Arc::new(Metrics::new()))
    }

    /// Start a search bar that reports into shared metrics
    pub fn spawn_with_metrics(
        backend: Arc<dyn SearchBackend>,
        options: SearchBarOptions,
        metrics: Arc<Metrics>,
    ) -> Self {
        let (input_tx, input_rx) = watch::channel(SearchBarInput::default());
        let (variant_tx, variant_rx) = watch::channel(options.api_variant);
        let (snapshot_tx, snapshot_rx) = watch::channel(ResultSnapshot::empty(options.api_variant));

        metrics.inc_session();
        let driver = Driver::new(backend, options, metrics, input_rx, variant_rx, snapshot_tx);
        let task = tokio::spawn(driver.run());

        Self {
            input_tx,
            variant_tx,
            snapshot_rx,
            task,
        }
    }

    /// Replace the raw query text
    pub fn set_query(&self, query: impl Into<String>) {
        let query = query.into();
        self.input_tx.send_if_modified(|input| {
            if input.query == query {
                return false;
            }
            input.query = query;
            true
        });
    }

    /// Replace the applied filters
    pub fn set_filters(&self, filters: Option<AppliedFilters>) {
        self.input_tx.send_if_modified(|input| {
            if input.filters == filters {
                return false;
            }
            input.filters = filters;
            true
        });
    }

    /// Replace the selected view
    pub fn set_selected_view(&self, view_urn: Option<String>) {
        self.input_tx.send_if_modified(|input| {
            if input.view_urn == view_urn {
                return false;
            }
            input.view_urn = view_urn;
            true
        });
    }

    /// Replace all inputs at once
    pub fn update(&self, next: SearchBarInput) {
        self.input_tx.send_if_modified(|input| {
            if *input == next {
                return false;
            }
            *input = next;
            true
        });
    }

    /// Switch strategy; the previous strategy's results are dropped
    pub fn set_api_variant(&self, variant: SearchBarApi) {
        self.variant_tx.send_if_modified(|current| {
            if *current == variant {
                return false;
            }
            *current = variant;
            true
        });
    }

    pub fn api_variant(&self) -> SearchBarApi {
        *self.variant_tx.borrow()
    }

    /// Current results
    pub fn snapshot(&self) -> ResultSnapshot {
        self.snapshot_rx.borrow().clone()
    }

    /// Receiver notified whenever the snapshot changes
    pub fn subscribe(&self) -> watch::Receiver<ResultSnapshot> {
        self.snapshot_rx.clone()
    }
}

impl Drop for SearchBar {
    fn drop(&mut self) {
        self.task.abort();
    }
}
