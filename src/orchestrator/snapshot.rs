//! Search bar input and output values

use crate::config::SearchBarApi;
use crate::filters::AppliedFilters;
use crate::models::{Entity, FacetMetadata};
use serde::{Deserialize, Serialize};

/// Everything the caller feeds into a search bar
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchBarInput {
    /// Raw text as typed
    #[serde(default)]
    pub query: String,
    /// Selected filter values
    #[serde(default)]
    pub filters: Option<AppliedFilters>,
    /// Selected view, scopes every request
    #[serde(default)]
    pub view_urn: Option<String>,
}

impl SearchBarInput {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Self::default()
        }
    }
}

/// Latest results as seen by the caller.
///
/// `entities: None` means nothing was searched; `Some(vec![])` means the
/// search came back empty. While `loading`, the previous results stay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultSnapshot {
    pub entities: Option<Vec<Entity>>,
    pub facets: Option<Vec<FacetMetadata>>,
    pub loading: bool,
    pub search_api_variant: SearchBarApi,
}

impl ResultSnapshot {
    pub fn empty(variant: SearchBarApi) -> Self {
        Self {
            entities: None,
            facets: None,
            loading: false,
            search_api_variant: variant,
        }
    }

    pub fn entity_count(&self) -> usize {
        self.entities.as_ref().map_or(0, Vec::len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_snapshot_wire_shape() {
        let snapshot = ResultSnapshot {
            entities: Some(vec![]),
            facets: None,
            loading: true,
            search_api_variant: SearchBarApi::AutocompleteForMultiple,
        };

        assert_eq!(
            serde_json::to_value(&snapshot).unwrap(),
            json!({
                "entities": [],
                "facets": null,
                "loading": true,
                "searchApiVariant": "AUTOCOMPLETE_FOR_MULTIPLE"
            })
        );
    }

    #[test]
    fn test_input_accepts_partial_body() {
        let input: SearchBarInput = serde_json::from_value(json!({ "query": "orders" })).unwrap();
        assert_eq!(input, SearchBarInput::new("orders"));
    }
}
