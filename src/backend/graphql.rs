//! Catalog GraphQL implementation of [`SearchBackend`]

use super::client::{GraphQlClient, GraphQlOperation};
use super::traits::SearchBackend;
use crate::config::BackendSettings;
use crate::error::BackendError;
use crate::models::{AutocompleteRequest, AutocompleteResults, SearchRequest, SearchResults};
use async_trait::async_trait;
use serde::Serialize;

const AUTOCOMPLETE_MULTIPLE: GraphQlOperation = GraphQlOperation {
    name: "getAutoCompleteMultipleResults",
    field: "autoCompleteForMultiple",
    document: r#"query getAutoCompleteMultipleResults($input: AutoCompleteMultipleInput!) {
    autoCompleteForMultiple(input: $input) {
        query
        suggestions {
            type
            suggestions
            entities {
                urn
                type
            }
        }
    }
}"#,
};

const SEARCH_ACROSS_ENTITIES: GraphQlOperation = GraphQlOperation {
    name: "getSearchResultsForMultiple",
    field: "searchAcrossEntities",
    document: r#"query getSearchResultsForMultiple($input: SearchAcrossEntitiesInput!) {
    searchAcrossEntities(input: $input) {
        start
        count
        total
        searchResults {
            entity {
                urn
                type
            }
        }
        facets {
            field
            displayName
            aggregations {
                value
                count
                displayName
            }
        }
    }
}"#,
};

#[derive(Serialize)]
struct Variables<'a, T> {
    input: &'a T,
}

/// Search backend talking to the catalog's GraphQL endpoint
#[derive(Clone)]
pub struct GraphQlBackend {
    client: GraphQlClient,
}

impl GraphQlBackend {
    pub fn new(client: GraphQlClient) -> Self {
        Self { client }
    }

    pub fn with_settings(settings: &BackendSettings) -> Result<Self, BackendError> {
        Ok(Self::new(GraphQlClient::with_settings(settings)?))
    }
}

#[async_trait]
impl SearchBackend for GraphQlBackend {
    fn name(&self) -> &str {
        "graphql"
    }

    async fn autocomplete_multiple(
        &self,
        request: &AutocompleteRequest,
    ) -> Result<AutocompleteResults, BackendError> {
        self.client
            .execute(&AUTOCOMPLETE_MULTIPLE, Variables { input: request })
            .await
    }

    async fn search_across_entities(&self, request: &SearchRequest) -> Result<SearchResults, BackendError> {
        self.client
            .execute(&SEARCH_ACROSS_ENTITIES, Variables { input: request })
            .await
    }
}
