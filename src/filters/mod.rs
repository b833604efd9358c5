//! Filter expression building
//!
//! Turns the search bar's applied filters (field → selected values) into
//! the OR-of-ANDs filter list the catalog search operations accept.
//! Only one level of grouping is produced.

use crate::models::{AndFilterInput, FacetFilterInput};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Selected filter values per field
pub type AppliedFilters = BTreeMap<String, BTreeSet<String>>;

/// Separator used by compound filter fields and values
pub const FILTER_DELIMITER: char = '␞';

pub const ENTITY_FILTER_NAME: &str = "_entityType";
pub const TYPE_NAMES_FILTER_NAME: &str = "typeNames";
/// Compound entity type / sub-type field, values look like `DATASET␞table`
pub const ENTITY_SUB_TYPE_FILTER_NAME: &str = "_entityType␞typeNames";

/// How top-level clauses are combined
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnionType {
    #[default]
    And,
    Or,
}

/// Flatten applied filters into equality clauses, skipping empty selections
pub fn convert_filters(applied: Option<&AppliedFilters>) -> Vec<FacetFilterInput> {
    applied
        .into_iter()
        .flatten()
        .filter(|(_, values)| !values.is_empty())
        .map(|(field, values)| FacetFilterInput::equal(field.clone(), values.iter().cloned().collect()))
        .collect()
}

/// Combine clauses into an OR-of-ANDs expression.
///
/// An empty clause list yields an empty (unrestricted) expression.
pub fn generate_or_filters(union: UnionType, filters: Vec<FacetFilterInput>) -> Vec<AndFilterInput> {
    if filters.is_empty() {
        return vec![];
    }

    let (nested, flat): (Vec<_>, Vec<_>) = filters
        .into_iter()
        .partition(|f| f.field == ENTITY_SUB_TYPE_FILTER_NAME);

    let nested_groups: Vec<Vec<FacetFilterInput>> = nested
        .iter()
        .flat_map(|f| f.values.iter().map(|v| expand_nested_value(v, f.negated)))
        .collect();

    match union {
        UnionType::Or => flat
            .into_iter()
            .map(|f| AndFilterInput { and: vec![f] })
            .chain(nested_groups.into_iter().map(|and| AndFilterInput { and }))
            .collect(),
        UnionType::And if nested_groups.is_empty() => vec![AndFilterInput { and: flat }],
        UnionType::And => nested_groups
            .into_iter()
            .map(|group| AndFilterInput {
                and: flat.iter().cloned().chain(group).collect(),
            })
            .collect(),
    }
}

/// Build the expression for a search bar input in one step
pub fn build_or_filters(applied: Option<&AppliedFilters>) -> Vec<AndFilterInput> {
    generate_or_filters(UnionType::And, convert_filters(applied))
}

fn expand_nested_value(value: &str, negated: bool) -> Vec<FacetFilterInput> {
    let mut parts = value.splitn(2, FILTER_DELIMITER);
    let mut clauses = Vec::with_capacity(2);

    if let Some(entity_type) = parts.next().filter(|p| !p.is_empty()) {
        clauses.push(FacetFilterInput {
            negated,
            ..FacetFilterInput::equal(ENTITY_FILTER_NAME, vec![entity_type.to_string()])
        });
    }
    if let Some(sub_type) = parts.next().filter(|p| !p.is_empty()) {
        clauses.push(FacetFilterInput {
            negated,
            ..FacetFilterInput::equal(TYPE_NAMES_FILTER_NAME, vec![sub_type.to_string()])
        });
    }

    clauses
}

#[cfg(test)]
mod tests {
    use super::*;

    fn applied(entries: Vec<(&str, Vec<&str>)>) -> AppliedFilters {
        entries
            .into_iter()
            .map(|(field, values)| {
                (
                    field.to_string(),
                    values.iter().map(|v| v.to_string()).collect(),
                )
            })
            .collect()
    }

    #[test]
    fn test_no_filters_is_unrestricted() {
        assert!(build_or_filters(None).is_empty());
        assert!(build_or_filters(Some(&AppliedFilters::new())).is_empty());
        assert!(build_or_filters(Some(&applied(vec![("platform", vec![])]))).is_empty());
    }

    #[test]
    fn test_and_union_single_group() {
        let filters = applied(vec![
            ("platform", vec!["urn:li:dataPlatform:hive", "urn:li:dataPlatform:kafka"]),
            ("tags", vec!["urn:li:tag:pii"]),
        ]);

        let or_filters = build_or_filters(Some(&filters));
        assert_eq!(or_filters.len(), 1);

        let group = &or_filters[0].and;
        assert_eq!(group.len(), 2);
        assert_eq!(group[0].field, "platform");
        assert_eq!(
            group[0].values,
            vec!["urn:li:dataPlatform:hive", "urn:li:dataPlatform:kafka"]
        );
        assert_eq!(group[1].field, "tags");
    }

    #[test]
    fn test_or_union_one_group_per_clause() {
        let filters = convert_filters(Some(&applied(vec![
            ("domains", vec!["urn:li:domain:sales"]),
            ("owners", vec!["urn:li:corpuser:jdoe"]),
        ])));

        let or_filters = generate_or_filters(UnionType::Or, filters);
        assert_eq!(or_filters.len(), 2);
        assert!(or_filters.iter().all(|g| g.and.len() == 1));
    }

    #[test]
    fn test_nested_sub_type_expands_per_value() {
        let filters = applied(vec![
            (ENTITY_SUB_TYPE_FILTER_NAME, vec!["DATASET␞table", "DASHBOARD"]),
            ("platform", vec!["urn:li:dataPlatform:hive"]),
        ]);

        let or_filters = build_or_filters(Some(&filters));
        assert_eq!(or_filters.len(), 2);

        // Values are ordered, so DASHBOARD comes first
        let fields: Vec<Vec<&str>> = or_filters
            .iter()
            .map(|g| g.and.iter().map(|f| f.field.as_str()).collect())
            .collect();
        assert_eq!(fields[0], vec!["platform", ENTITY_FILTER_NAME]);
        assert_eq!(
            fields[1],
            vec!["platform", ENTITY_FILTER_NAME, TYPE_NAMES_FILTER_NAME]
        );
        assert_eq!(or_filters[1].and[2].values, vec!["table"]);
    }

    #[test]
    fn test_only_sub_type_field_is_expanded() {
        let filters = applied(vec![("owner␞team", vec!["urn:li:corpGroup:data"])]);

        let or_filters = build_or_filters(Some(&filters));
        assert_eq!(or_filters.len(), 1);
        assert_eq!(or_filters[0].and.len(), 1);
        assert_eq!(or_filters[0].and[0].field, "owner␞team");
        assert_eq!(or_filters[0].and[0].values, vec!["urn:li:corpGroup:data"]);
    }
}
