//! Settings structures for catalog-searchbar configuration

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::time::Duration;

/// Main settings structure, loaded from `settings.yml`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub general: GeneralSettings,
    pub server: ServerSettings,
    pub backend: BackendSettings,
    pub search_bar: SearchBarSettings,
    pub sessions: SessionSettings,
}

impl Settings {
    /// Load settings from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse settings from a YAML document
    pub fn from_yaml(content: &str) -> Result<Self> {
        let settings: Settings = serde_yaml::from_str(content)?;
        Ok(settings)
    }

    /// Merge with environment variables (CATALOG_SEARCH_* prefix)
    pub fn merge_env(&mut self) {
        self.merge_vars(|key| std::env::var(key).ok());
    }

    fn merge_vars(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(val) = var("CATALOG_SEARCH_DEBUG") {
            self.general.debug = val.parse().unwrap_or(false);
        }
        if let Some(val) = var("CATALOG_SEARCH_PORT") {
            if let Ok(port) = val.parse() {
                self.server.port = port;
            }
        }
        if let Some(val) = var("CATALOG_SEARCH_BIND_ADDRESS") {
            self.server.bind_address = val;
        }
        if let Some(val) = var("CATALOG_SEARCH_GRAPHQL_URL") {
            self.backend.graphql_url = val;
        }
        if let Some(val) = var("CATALOG_SEARCH_TOKEN") {
            self.backend.token = Some(val);
        }
        if let Some(val) = var("CATALOG_SEARCH_API_VARIANT") {
            self.search_bar.api_variant = SearchBarApi::from(val.as_str());
        }
    }
}

/// General settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    /// Enable debug logging
    pub debug: bool,
    /// Instance name reported by the health endpoint
    pub instance_name: String,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            debug: false,
            instance_name: "catalog-searchbar".to_string(),
        }
    }
}

/// Server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    /// Server port
    pub port: u16,
    /// Bind address
    pub bind_address: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            port: 9002,
            bind_address: "127.0.0.1".to_string(),
        }
    }
}

/// Catalog GraphQL API settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendSettings {
    /// GraphQL endpoint of the catalog
    pub graphql_url: String,
    /// Bearer token sent with every request
    pub token: Option<String>,
    /// Request timeout in seconds
    pub request_timeout: f64,
    /// Verify TLS certificates
    pub verify_ssl: bool,
    /// Proxy for all outgoing requests
    pub proxy: Option<String>,
    /// Extra headers to send
    pub extra_headers: HashMap<String, String>,
}

impl Default for BackendSettings {
    fn default() -> Self {
        Self {
            graphql_url: "http://localhost:8080/api/graphql".to_string(),
            token: None,
            request_timeout: 10.0,
            verify_ssl: true,
            proxy: None,
            extra_headers: HashMap::new(),
        }
    }
}

/// Search bar orchestration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchBarSettings {
    /// Which backend query shape the search bar uses
    pub api_variant: SearchBarApi,
    /// Quiescence window before a typed query is fetched
    pub debounce_ms: u64,
    /// Shortest query the full search strategy will send
    pub min_query_length: usize,
    /// Result cap for the full search strategy
    pub max_results: usize,
}

impl SearchBarSettings {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

impl Default for SearchBarSettings {
    fn default() -> Self {
        Self {
            api_variant: SearchBarApi::default(),
            debounce_ms: 300,
            min_query_length: 3,
            max_results: 20,
        }
    }
}

/// Session store settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionSettings {
    /// Sessions untouched for this long are dropped
    pub idle_timeout_secs: u64,
    /// Upper bound on live sessions
    pub max_sessions: u64,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            idle_timeout_secs: 900,
            max_sessions: 10_000,
        }
    }
}

/// Backend query strategy used by the search bar.
///
/// Parsing never fails: unrecognized values fall back to
/// [`SearchBarApi::AutocompleteForMultiple`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SearchBarApi {
    /// Lightweight multi-entity autocomplete, no facets
    #[default]
    AutocompleteForMultiple,
    /// Full search across entities with facet counts
    SearchAcrossEntities,
}

impl SearchBarApi {
    /// GraphQL enum name
    pub fn as_str(&self) -> &'static str {
        match self {
            SearchBarApi::AutocompleteForMultiple => "AUTOCOMPLETE_FOR_MULTIPLE",
            SearchBarApi::SearchAcrossEntities => "SEARCH_ACROSS_ENTITIES",
        }
    }
}

impl From<&str> for SearchBarApi {
    fn from(value: &str) -> Self {
        let normalized: String = value
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .map(|c| c.to_ascii_lowercase())
            .collect();

        match normalized.as_str() {
            "searchacrossentities" => SearchBarApi::SearchAcrossEntities,
            _ => SearchBarApi::AutocompleteForMultiple,
        }
    }
}

impl From<String> for SearchBarApi {
    fn from(value: String) -> Self {
        SearchBarApi::from(value.as_str())
    }
}

impl From<SearchBarApi> for String {
    fn from(value: SearchBarApi) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for SearchBarApi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.server.port, 9002);
        assert!(!settings.general.debug);
        assert_eq!(
            settings.search_bar.api_variant,
            SearchBarApi::AutocompleteForMultiple
        );
        assert_eq!(settings.search_bar.debounce(), Duration::from_millis(300));
        assert_eq!(settings.search_bar.min_query_length, 3);
        assert_eq!(settings.search_bar.max_results, 20);
    }

    #[test]
    fn test_api_variant_parsing() {
        assert_eq!(
            SearchBarApi::from("SEARCH_ACROSS_ENTITIES"),
            SearchBarApi::SearchAcrossEntities
        );
        assert_eq!(
            SearchBarApi::from("searchAcrossEntities"),
            SearchBarApi::SearchAcrossEntities
        );
        assert_eq!(
            SearchBarApi::from("search-across-entities"),
            SearchBarApi::SearchAcrossEntities
        );
        assert_eq!(
            SearchBarApi::from("AUTOCOMPLETE_FOR_MULTIPLE"),
            SearchBarApi::AutocompleteForMultiple
        );
        assert_eq!(SearchBarApi::from("bogus"), SearchBarApi::AutocompleteForMultiple);
        assert_eq!(SearchBarApi::from(""), SearchBarApi::AutocompleteForMultiple);
    }

    #[test]
    fn test_yaml_loading() {
        let yaml = r#"
server:
  port: 7000
search_bar:
  api_variant: SEARCH_ACROSS_ENTITIES
  debounce_ms: 150
backend:
  graphql_url: https://catalog.example.com/api/graphql
"#;
        let settings = Settings::from_yaml(yaml).unwrap();
        assert_eq!(settings.server.port, 7000);
        assert_eq!(settings.server.bind_address, "127.0.0.1");
        assert_eq!(
            settings.search_bar.api_variant,
            SearchBarApi::SearchAcrossEntities
        );
        assert_eq!(settings.search_bar.debounce_ms, 150);
        assert_eq!(settings.search_bar.max_results, 20);
        assert_eq!(
            settings.backend.graphql_url,
            "https://catalog.example.com/api/graphql"
        );
    }

    #[test]
    fn test_unknown_variant_in_yaml_defaults() {
        let settings = Settings::from_yaml("search_bar:\n  api_variant: LEGACY\n").unwrap();
        assert_eq!(
            settings.search_bar.api_variant,
            SearchBarApi::AutocompleteForMultiple
        );
    }

    #[test]
    fn test_env_overrides() {
        let vars: HashMap<&str, &str> = [
            ("CATALOG_SEARCH_PORT", "8123"),
            ("CATALOG_SEARCH_API_VARIANT", "SEARCH_ACROSS_ENTITIES"),
            ("CATALOG_SEARCH_TOKEN", "secret"),
            ("CATALOG_SEARCH_DEBUG", "true"),
        ]
        .into_iter()
        .collect();

        let mut settings = Settings::default();
        settings.merge_vars(|key| vars.get(key).map(|v| v.to_string()));

        assert_eq!(settings.server.port, 8123);
        assert!(settings.general.debug);
        assert_eq!(settings.backend.token.as_deref(), Some("secret"));
        assert_eq!(
            settings.search_bar.api_variant,
            SearchBarApi::SearchAcrossEntities
        );
    }
}
