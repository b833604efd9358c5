//! catalog-searchbar: search bar data orchestration for a metadata catalog
//!
//! Debounces what the user types, routes it to either the catalog's
//! multi-entity autocomplete or its faceted search, and keeps the latest
//! results available to the caller.

pub mod backend;
pub mod config;
pub mod error;
pub mod filters;
pub mod metrics;
pub mod models;
pub mod orchestrator;
pub mod sessions;
pub mod web;

pub use backend::{GraphQlBackend, SearchBackend};
pub use config::{SearchBarApi, Settings};
pub use error::BackendError;
pub use orchestrator::{ResultSnapshot, SearchBar, SearchBarInput, SearchBarOptions};

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
