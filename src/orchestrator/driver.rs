//! The task behind a [`SearchBar`](super::SearchBar)
//!
//! One task per search bar owns the result snapshot. It waits on exactly
//! three things: new input, the debounce deadline and in-flight fetches.

use super::snapshot::{ResultSnapshot, SearchBarInput};
use super::strategy::{execute, plan, Outcome, Plan, SearchBarOptions};
use crate::backend::SearchBackend;
use crate::config::SearchBarApi;
use crate::error::BackendError;
use crate::filters::build_or_filters;
use crate::metrics::Metrics;
use crate::models::AndFilterInput;
use futures::FutureExt;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::{JoinError, JoinSet};
use tokio::time::{sleep_until, Instant};
use tracing::{debug, info, warn};

/// Inputs that determine a dispatch; an unchanged key issues nothing
#[derive(Debug, Clone, PartialEq)]
struct DispatchKey {
    query: String,
    or_filters: Vec<AndFilterInput>,
    view_urn: Option<String>,
}

/// A fetch that has come back, tagged with the generation that issued it
struct Settled {
    generation: u64,
    variant: SearchBarApi,
    elapsed: Duration,
    result: Result<Outcome, BackendError>,
}

pub(super) struct Driver {
    backend: Arc<dyn SearchBackend>,
    options: SearchBarOptions,
    metrics: Arc<Metrics>,
    variant: SearchBarApi,
    input_rx: watch::Receiver<SearchBarInput>,
    variant_rx: watch::Receiver<SearchBarApi>,
    snapshot_tx: watch::Sender<ResultSnapshot>,
    input: SearchBarInput,
    debounced_query: String,
    deadline: Option<Instant>,
    last_dispatch: Option<DispatchKey>,
    generation: u64,
    in_flight: JoinSet<Settled>,
}

impl Driver {
    pub(super) fn new(
        backend: Arc<dyn SearchBackend>,
        options: SearchBarOptions,
        metrics: Arc<Metrics>,
        input_rx: watch::Receiver<SearchBarInput>,
        variant_rx: watch::Receiver<SearchBarApi>,
        snapshot_tx: watch::Sender<ResultSnapshot>,
    ) -> Self {
        Self {
            backend,
            variant: options.api_variant,
            options,
            metrics,
            input_rx,
            variant_rx,
            snapshot_tx,
            input: SearchBarInput::default(),
            debounced_query: String::new(),
            deadline: None,
            last_dispatch: None,
            generation: 0,
            in_flight: JoinSet::new(),
        }
    }

    pub(super) async fn run(mut self) {
        debug!(
            "Search bar started with {} via {}",
            self.variant,
            self.backend.name()
        );

        // The effective query starts empty, so the strategy runs once up front
        self.variant = *self.variant_rx.borrow_and_update();
        self.on_input();

        loop {
            let wake_at = self.deadline.unwrap_or_else(Instant::now);

            tokio::select! {
                changed = self.input_rx.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    self.on_input();
                }
                changed = self.variant_rx.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    self.on_variant();
                }
                _ = sleep_until(wake_at), if self.deadline.is_some() => {
                    self.on_quiescent();
                }
                Some(joined) = self.in_flight.join_next(), if !self.in_flight.is_empty() => {
                    self.on_settled(joined);
                }
            }
        }

        debug!("Search bar stopped, abandoning {} fetches", self.in_flight.len());
    }

    fn on_input(&mut self) {
        let input = self.input_rx.borrow_and_update().clone();

        // Only the query is debounced; filters and view apply immediately
        if input.query != self.input.query {
            self.deadline = Some(Instant::now() + self.options.debounce);
        }

        self.input = input;
        self.refresh(false);
    }

    fn on_quiescent(&mut self) {
        self.deadline = None;
        self.debounced_query = self.input.query.clone();
        self.refresh(false);
    }

    fn on_variant(&mut self) {
        let variant = *self.variant_rx.borrow_and_update();
        if variant == self.variant {
            return;
        }

        info!("Search bar switched from {} to {}", self.variant, variant);
        self.variant = variant;
        self.publish(|snapshot| *snapshot = ResultSnapshot::empty(variant));
        self.refresh(true);
    }

    /// Dispatch the current inputs unless they match the last dispatch
    fn refresh(&mut self, force: bool) {
        let key = DispatchKey {
            query: self.debounced_query.clone(),
            or_filters: build_or_filters(self.input.filters.as_ref()),
            view_urn: self.input.view_urn.clone(),
        };

        if !force && self.last_dispatch.as_ref() == Some(&key) {
            return;
        }

        self.generation += 1;
        let plan = plan(
            self.variant,
            &key.query,
            key.or_filters.clone(),
            key.view_urn.clone(),
            &self.options,
        );
        self.last_dispatch = Some(key);

        match plan {
            Plan::ShortCircuit { entities, facets } => {
                debug!("Short-circuiting query '{}'", self.debounced_query);
                self.metrics.record_short_circuit();
                self.publish(|snapshot| {
                    snapshot.entities = entities;
                    snapshot.facets = facets;
                    snapshot.loading = false;
                });
            }
            Plan::Fetch(request) => {
                debug!(
                    "Dispatching {} fetch #{} for '{}'",
                    self.variant, self.generation, self.debounced_query
                );
                self.metrics.record_fetch(self.variant);
                self.publish(|snapshot| snapshot.loading = true);

                let backend = Arc::clone(&self.backend);
                let generation = self.generation;
                let variant = self.variant;

                self.in_flight.spawn(async move {
                    let start = Instant::now();
                    // A panicking backend settles like a failed one
                    let result = AssertUnwindSafe(execute(backend.as_ref(), &request))
                        .catch_unwind()
                        .await
                        .unwrap_or_else(|panic| Err(BackendError::Panicked(panic_message(panic))));
                    Settled {
                        generation,
                        variant,
                        elapsed: start.elapsed(),
                        result,
                    }
                });
            }
        }
    }

    fn on_settled(&mut self, joined: Result<Settled, JoinError>) {
        let settled = match joined {
            Ok(settled) => settled,
            Err(e) => {
                // Only reachable through cancellation
                warn!("Search bar fetch task failed: {}", e);
                if self.in_flight.is_empty() {
                    self.publish(|snapshot| snapshot.loading = false);
                }
                return;
            }
        };

        if settled.result.is_err() {
            self.metrics.record_failure(settled.variant);
        }

        if settled.generation != self.generation {
            debug!(
                "Discarding fetch #{} superseded by #{}",
                settled.generation, self.generation
            );
            self.metrics.record_stale_discard();
            return;
        }

        self.metrics
            .record_response_time(settled.variant, settled.elapsed.as_millis() as u64);

        match settled.result {
            Ok(outcome) => {
                debug!(
                    "Fetch #{} returned {} entities",
                    settled.generation,
                    outcome.entities.len()
                );
                self.publish(|snapshot| {
                    snapshot.entities = Some(outcome.entities);
                    snapshot.facets = outcome.facets;
                    snapshot.loading = false;
                });
            }
            Err(e) => {
                warn!(
                    "Search bar fetch #{} failed (transient: {}): {}",
                    settled.generation,
                    e.is_transient(),
                    e
                );
                self.publish(|snapshot| snapshot.loading = false);
            }
        }
    }

    /// Apply an update, notifying subscribers only on an actual change
    fn publish(&self, update: impl FnOnce(&mut ResultSnapshot)) {
        self.snapshot_tx.send_if_modified(|snapshot| {
            let before = snapshot.clone();
            update(snapshot);
            *snapshot != before
        });
    }
}

fn panic_message(panic: Box<dyn Any + Send>) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}
