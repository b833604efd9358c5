//! Metrics collection module
//!
//! Tracks how search bar orchestration is behaving: fetches per strategy,
//! short-circuited inputs, discarded stale responses, failures and latency.

use crate::config::SearchBarApi;
use serde::Serialize;
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;

const RESPONSE_TIME_WINDOW: usize = 100;

/// Orchestration metrics shared by all search bars of a process
pub struct Metrics {
    /// Search bars started
    pub sessions_started: AtomicU64,
    /// Inputs answered without a remote call
    short_circuits: AtomicU64,
    /// Settled responses dropped because a newer request superseded them
    stale_discards: AtomicU64,
    /// Fetches dispatched per strategy
    fetches: RwLock<HashMap<SearchBarApi, u64>>,
    /// Failed fetches per strategy
    failures: RwLock<HashMap<SearchBarApi, u64>>,
    /// Recent response times per strategy, in ms
    response_times: RwLock<HashMap<SearchBarApi, VecDeque<u64>>>,
}

impl Metrics {
    /// Create a new metrics instance
    pub fn new() -> Self {
        Self {
            sessions_started: AtomicU64::new(0),
            short_circuits: AtomicU64::new(0),
            stale_discards: AtomicU64::new(0),
            fetches: RwLock::new(HashMap::new()),
            failures: RwLock::new(HashMap::new()),
            response_times: RwLock::new(HashMap::new()),
        }
    }

    pub fn inc_session(&self) {
        self.sessions_started.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_short_circuit(&self) {
        self.short_circuits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_stale_discard(&self) {
        self.stale_discards.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a dispatched fetch
    pub fn record_fetch(&self, variant: SearchBarApi) {
        if let Ok(mut fetches) = self.fetches.write() {
            *fetches.entry(variant).or_insert(0) += 1;
        }
    }

    /// Record a failed fetch, whether or not it was superseded
    pub fn record_failure(&self, variant: SearchBarApi) {
        if let Ok(mut failures) = self.failures.write() {
            *failures.entry(variant).or_insert(0) += 1;
        }
    }

    /// Record how long a settled fetch took
    pub fn record_response_time(&self, variant: SearchBarApi, time_ms: u64) {
        if let Ok(mut times) = self.response_times.write() {
            let entry = times.entry(variant).or_default();
            if entry.len() >= RESPONSE_TIME_WINDOW {
                entry.pop_front();
            }
            entry.push_back(time_ms);
        }
    }

    pub fn get_fetches(&self, variant: SearchBarApi) -> u64 {
        self.fetches
            .read()
            .map(|f| f.get(&variant).copied().unwrap_or(0))
            .unwrap_or(0)
    }

    /// Average response time over the recent window
    pub fn get_avg_response_time(&self, variant: SearchBarApi) -> Option<u64> {
        let times = self.response_times.read().ok()?;
        times.get(&variant).and_then(|t| {
            if t.is_empty() {
                None
            } else {
                Some(t.iter().sum::<u64>() / t.len() as u64)
            }
        })
    }

    /// Share of fetches that did not fail, in percent
    pub fn get_reliability(&self, variant: SearchBarApi) -> f64 {
        let fetches = self.get_fetches(variant);
        let failures = self
            .failures
            .read()
            .map(|f| f.get(&variant).copied().unwrap_or(0))
            .unwrap_or(0);

        if fetches == 0 {
            100.0
        } else {
            (fetches.saturating_sub(failures) as f64 / fetches as f64) * 100.0
        }
    }

    /// Point-in-time copy of all counters
    pub fn snapshot(&self) -> MetricsSnapshot {
        let strategies = [
            SearchBarApi::AutocompleteForMultiple,
            SearchBarApi::SearchAcrossEntities,
        ]
        .into_iter()
        .map(|variant| {
            (
                variant.to_string(),
                StrategyStats {
                    fetches: self.get_fetches(variant),
                    avg_response_time: self.get_avg_response_time(variant),
                    reliability: self.get_reliability(variant),
                },
            )
        })
        .collect();

        MetricsSnapshot {
            sessions_started: self.sessions_started.load(Ordering::Relaxed),
            short_circuits: self.short_circuits.load(Ordering::Relaxed),
            stale_discards: self.stale_discards.load(Ordering::Relaxed),
            strategies,
        }
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Statistics for a single strategy
#[derive(Debug, Clone, Serialize)]
pub struct StrategyStats {
    pub fetches: u64,
    pub avg_response_time: Option<u64>,
    pub reliability: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct MetricsSnapshot {
    pub sessions_started: u64,
    pub short_circuits: u64,
    pub stale_discards: u64,
    pub strategies: HashMap<String, StrategyStats>,
}
