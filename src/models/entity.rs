//! Catalog entity and facet types

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A catalog record returned by search (dataset, process instance, ...).
///
/// Only the identity fields are typed; everything else the catalog sends is
/// carried through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub urn: String,
    #[serde(rename = "type")]
    pub entity_type: String,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Entity {
    pub fn new(urn: impl Into<String>, entity_type: impl Into<String>) -> Self {
        Self {
            urn: urn.into(),
            entity_type: entity_type.into(),
            fields: Map::new(),
        }
    }
}

/// Aggregated counts for one field, used to render filter options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FacetMetadata {
    pub field: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default)]
    pub aggregations: Vec<AggregationMetadata>,
}

impl FacetMetadata {
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            display_name: None,
            aggregations: vec![],
        }
    }

    pub fn with_aggregation(mut self, value: impl Into<String>, count: u64) -> Self {
        self.aggregations.push(AggregationMetadata {
            value: value.into(),
            count,
            display_name: None,
        });
        self
    }

    /// Sum of all aggregation counts
    pub fn total(&self) -> u64 {
        self.aggregations.iter().map(|a| a.count).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregationMetadata {
    pub value: String,
    pub count: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_entity_keeps_opaque_fields() {
        let raw = json!({
            "urn": "urn:li:dataset:(urn:li:dataPlatform:hive,customers,PROD)",
            "type": "DATASET",
            "name": "customers",
            "platform": { "name": "hive" }
        });

        let entity: Entity = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(entity.entity_type, "DATASET");
        assert_eq!(entity.fields.get("name"), Some(&json!("customers")));
        assert_eq!(serde_json::to_value(&entity).unwrap(), raw);
    }

    #[test]
    fn test_facet_total() {
        let facet = FacetMetadata::new("platform")
            .with_aggregation("urn:li:dataPlatform:hive", 12)
            .with_aggregation("urn:li:dataPlatform:kafka", 3);
        assert_eq!(facet.total(), 15);
    }
}
