//! In-memory backend with scripted responses for orchestration tests

use super::traits::SearchBackend;
use crate::error::BackendError;
use crate::models::{
    AutocompleteRequest, AutocompleteResults, AutocompleteSuggestion, Entity, FacetMetadata, SearchRequest,
    SearchResult, SearchResults,
};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use tokio::sync::oneshot;

#[derive(Debug, Clone, PartialEq)]
pub enum BackendCall {
    Autocomplete(AutocompleteRequest),
    Search(SearchRequest),
}

impl BackendCall {
    pub fn query(&self) -> &str {
        match self {
            BackendCall::Autocomplete(r) => &r.query,
            BackendCall::Search(r) => &r.query,
        }
    }
}

/// Answers by query text; unscripted queries get empty results
#[derive(Default)]
pub struct ScriptedBackend {
    calls: Mutex<Vec<BackendCall>>,
    autocomplete: Mutex<HashMap<String, AutocompleteResults>>,
    search: Mutex<HashMap<String, SearchResults>>,
    failures: Mutex<HashSet<String>>,
    panics: Mutex<HashSet<String>>,
    gates: Mutex<HashMap<String, oneshot::Receiver<()>>>,
}

impl ScriptedBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer an autocomplete query with one suggestion group per entry
    pub fn with_autocomplete(self, query: &str, groups: Vec<Vec<Entity>>) -> Self {
        let results = AutocompleteResults {
            query: query.to_string(),
            suggestions: groups
                .into_iter()
                .map(|entities| AutocompleteSuggestion {
                    entity_type: entities.first().map(|e| e.entity_type.clone()),
                    suggestions: vec![],
                    entities,
                })
                .collect(),
        };
        self.autocomplete.lock().unwrap().insert(query.to_string(), results);
        self
    }

    pub fn with_search(self, query: &str, entities: Vec<Entity>, facets: Vec<FacetMetadata>) -> Self {
        let results = SearchResults {
            start: 0,
            count: entities.len() as u64,
            total: entities.len() as u64,
            search_results: entities.into_iter().map(|entity| SearchResult { entity }).collect(),
            facets: Some(facets),
        };
        self.search.lock().unwrap().insert(query.to_string(), results);
        self
    }

    pub fn failing(self, query: &str) -> Self {
        self.failures.lock().unwrap().insert(query.to_string());
        self
    }

    pub fn panicking(self, query: &str) -> Self {
        self.panics.lock().unwrap().insert(query.to_string());
        self
    }

    /// Hold the response for `query` until the returned sender fires or drops
    pub fn gate(&self, query: &str) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.gates.lock().unwrap().insert(query.to_string(), rx);
        tx
    }

    pub fn calls(&self) -> Vec<BackendCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    async fn settle(&self, call: BackendCall) -> Result<(), BackendError> {
        let query = call.query().to_string();
        self.calls.lock().unwrap().push(call);

        let gate = self.gates.lock().unwrap().remove(&query);
        if let Some(gate) = gate {
            let _ = gate.await;
        }

        let panics = self.panics.lock().unwrap().contains(&query);
        if panics {
            panic!("scripted backend panicked on '{}'", query);
        }

        let failed = self.failures.lock().unwrap().contains(&query);
        if failed {
            return Err(BackendError::Status {
                status: 502,
                body: "bad gateway".to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl SearchBackend for ScriptedBackend {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn autocomplete_multiple(
        &self,
        request: &AutocompleteRequest,
    ) -> Result<AutocompleteResults, BackendError> {
        self.settle(BackendCall::Autocomplete(request.clone())).await?;
        let scripted = self.autocomplete.lock().unwrap().get(&request.query).cloned();
        Ok(scripted.unwrap_or_default())
    }

    async fn search_across_entities(&self, request: &SearchRequest) -> Result<SearchResults, BackendError> {
        self.settle(BackendCall::Search(request.clone())).await?;
        let scripted = self.search.lock().unwrap().get(&request.query).cloned();
        Ok(scripted.unwrap_or_default())
    }
}

/// `count` entities of one type with urns `urn:<prefix>:<n>`
pub fn entities(prefix: &str, count: usize) -> Vec<Entity> {
    (0..count)
        .map(|n| Entity::new(format!("urn:{}:{}", prefix, n), "DATASET"))
        .collect()
}
