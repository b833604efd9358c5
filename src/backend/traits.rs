//! Search backend trait

use crate::error::BackendError;
use crate::models::{AutocompleteRequest, AutocompleteResults, SearchRequest, SearchResults};
use async_trait::async_trait;

/// The two remote operations the search bar can route a query to.
///
/// Implementations own timeouts and retries; callers only see the settled
/// result.
#[async_trait]
pub trait SearchBackend: Send + Sync {
    /// Backend name, for logs
    fn name(&self) -> &str;

    /// Lightweight suggestions grouped by entity type
    async fn autocomplete_multiple(
        &self,
        request: &AutocompleteRequest,
    ) -> Result<AutocompleteResults, BackendError>;

    /// Full search with facet counts
    async fn search_across_entities(&self, request: &SearchRequest) -> Result<SearchResults, BackendError>;
}
