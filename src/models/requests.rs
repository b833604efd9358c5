//! Request and response shapes of the two catalog search operations

use super::entity::{Entity, FacetMetadata};
use serde::{Deserialize, Serialize};

/// Comparison applied by a single filter clause
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FilterOperator {
    #[default]
    Equal,
}

/// A single `field ∈ values` clause
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FacetFilterInput {
    pub field: String,
    pub values: Vec<String>,
    #[serde(default)]
    pub condition: FilterOperator,
    #[serde(default)]
    pub negated: bool,
}

impl FacetFilterInput {
    pub fn equal(field: impl Into<String>, values: Vec<String>) -> Self {
        Self {
            field: field.into(),
            values,
            condition: FilterOperator::Equal,
            negated: false,
        }
    }
}

/// A conjunction of clauses; a list of these is ORed together
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AndFilterInput {
    pub and: Vec<FacetFilterInput>,
}

/// Input of the multi-entity autocomplete operation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AutocompleteRequest {
    pub query: String,
    pub or_filters: Vec<AndFilterInput>,
    pub view_urn: Option<String>,
}

/// A group of suggestions for one entity type
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AutocompleteSuggestion {
    #[serde(rename = "type", default)]
    pub entity_type: Option<String>,
    #[serde(default)]
    pub suggestions: Vec<String>,
    #[serde(default)]
    pub entities: Vec<Entity>,
}

/// Result of the multi-entity autocomplete operation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AutocompleteResults {
    #[serde(default)]
    pub query: String,
    #[serde(default)]
    pub suggestions: Vec<AutocompleteSuggestion>,
}

impl AutocompleteResults {
    /// All suggested entities, group order first, then in-group order
    pub fn into_entities(self) -> Vec<Entity> {
        self.suggestions
            .into_iter()
            .flat_map(|group| group.entities)
            .collect()
    }
}

/// Input of the search-across-entities operation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequest {
    pub query: String,
    pub or_filters: Vec<AndFilterInput>,
    pub view_urn: Option<String>,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub entity: Entity,
}

/// Result of the search-across-entities operation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResults {
    #[serde(default)]
    pub start: u64,
    #[serde(default)]
    pub count: u64,
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub search_results: Vec<SearchResult>,
    #[serde(default)]
    pub facets: Option<Vec<FacetMetadata>>,
}

impl SearchResults {
    /// Matched entities in response order
    pub fn entities(&self) -> Vec<Entity> {
        self.search_results.iter().map(|r| r.entity.clone()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_flatten_keeps_group_order_without_dedup() {
        let results = AutocompleteResults {
            query: "cust".into(),
            suggestions: vec![
                AutocompleteSuggestion {
                    entity_type: Some("DATASET".into()),
                    suggestions: vec![],
                    entities: vec![Entity::new("urn:1", "DATASET"), Entity::new("urn:2", "DATASET")],
                },
                AutocompleteSuggestion {
                    entity_type: Some("DASHBOARD".into()),
                    suggestions: vec![],
                    entities: vec![Entity::new("urn:3", "DASHBOARD"), Entity::new("urn:1", "DATASET")],
                },
            ],
        };

        let urns: Vec<String> = results.into_entities().into_iter().map(|e| e.urn).collect();
        assert_eq!(urns, vec!["urn:1", "urn:2", "urn:3", "urn:1"]);
    }

    #[test]
    fn test_search_request_wire_shape() {
        let request = SearchRequest {
            query: "customer".into(),
            or_filters: vec![AndFilterInput {
                and: vec![FacetFilterInput::equal("platform", vec!["hive".into()])],
            }],
            view_urn: None,
            count: 20,
        };

        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({
                "query": "customer",
                "orFilters": [{
                    "and": [{
                        "field": "platform",
                        "values": ["hive"],
                        "condition": "EQUAL",
                        "negated": false
                    }]
                }],
                "viewUrn": null,
                "count": 20
            })
        );
    }

    #[test]
    fn test_search_results_decode_without_facets() {
        let results: SearchResults = serde_json::from_value(json!({
            "total": 1,
            "searchResults": [{ "entity": { "urn": "urn:1", "type": "DATASET" } }]
        }))
        .unwrap();

        assert_eq!(results.entities().len(), 1);
        assert!(results.facets.is_none());
    }
}
