//! Strategy selection: what a settled search bar input turns into

use crate::backend::SearchBackend;
use crate::config::{SearchBarApi, SearchBarSettings};
use crate::error::BackendError;
use crate::models::{AndFilterInput, AutocompleteRequest, Entity, FacetMetadata, SearchRequest};
use std::time::Duration;

/// Tunables of one search bar
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchBarOptions {
    /// Strategy at construction
    pub api_variant: SearchBarApi,
    /// Quiescence window for the typed query
    pub debounce: Duration,
    /// Queries shorter than this are not sent to full search
    pub min_query_length: usize,
    /// Result cap for full search
    pub max_results: usize,
}

impl Default for SearchBarOptions {
    fn default() -> Self {
        Self::from(&SearchBarSettings::default())
    }
}

impl From<&SearchBarSettings> for SearchBarOptions {
    fn from(settings: &SearchBarSettings) -> Self {
        Self {
            api_variant: settings.api_variant,
            debounce: settings.debounce(),
            min_query_length: settings.min_query_length,
            max_results: settings.max_results,
        }
    }
}

impl SearchBarOptions {
    pub fn with_api_variant(mut self, variant: SearchBarApi) -> Self {
        self.api_variant = variant;
        self
    }
}

/// A remote call chosen by a strategy
#[derive(Debug, Clone, PartialEq)]
pub enum BackendRequest {
    Autocomplete(AutocompleteRequest),
    Search(SearchRequest),
}

/// What to do with one settled input
#[derive(Debug, Clone, PartialEq)]
pub enum Plan {
    /// Answer locally, no remote call
    ShortCircuit {
        entities: Option<Vec<Entity>>,
        facets: Option<Vec<FacetMetadata>>,
    },
    Fetch(BackendRequest),
}

/// Result of a fetch in the shape common to both strategies
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome {
    pub entities: Vec<Entity>,
    pub facets: Option<Vec<FacetMetadata>>,
}

/// Decide how `variant` handles the given query.
///
/// Autocomplete skips the empty query and never reports facets. Full search
/// skips queries below the minimum length and reports an empty facet list
/// for them, so facet consumers can tell "not searched" from "unknown".
pub fn plan(
    variant: SearchBarApi,
    query: &str,
    or_filters: Vec<AndFilterInput>,
    view_urn: Option<String>,
    options: &SearchBarOptions,
) -> Plan {
    match variant {
        SearchBarApi::AutocompleteForMultiple => {
            if query.is_empty() {
                return Plan::ShortCircuit {
                    entities: None,
                    facets: None,
                };
            }

            Plan::Fetch(BackendRequest::Autocomplete(AutocompleteRequest {
                query: query.to_string(),
                or_filters,
                view_urn,
            }))
        }
        SearchBarApi::SearchAcrossEntities => {
            if query.chars().count() < options.min_query_length {
                return Plan::ShortCircuit {
                    entities: None,
                    facets: Some(vec![]),
                };
            }

            Plan::Fetch(BackendRequest::Search(SearchRequest {
                query: query.to_string(),
                or_filters,
                view_urn,
                count: options.max_results,
            }))
        }
    }
}

/// Run a planned request and normalize the response
pub async fn execute(backend: &dyn SearchBackend, request: &BackendRequest) -> Result<Outcome, BackendError> {
    match request {
        BackendRequest::Autocomplete(request) => {
            let results = backend.autocomplete_multiple(request).await?;
            Ok(Outcome {
                entities: results.into_entities(),
                facets: None,
            })
        }
        BackendRequest::Search(request) => {
            let results = backend.search_across_entities(request).await?;
            Ok(Outcome {
                entities: results.search_results.into_iter().map(|r| r.entity).collect(),
                facets: Some(results.facets.unwrap_or_default()),
            })
        }
    }
}
