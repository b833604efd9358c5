//! GraphQL-over-HTTP client for the catalog API

use crate::config::BackendSettings;
use crate::error::BackendError;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;
use tracing::debug;
use url::Url;

/// A named GraphQL query and the top-level field it selects
#[derive(Debug, Clone, Copy)]
pub struct GraphQlOperation {
    pub name: &'static str,
    pub field: &'static str,
    pub document: &'static str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GraphQlRequest<'a, V> {
    operation_name: &'a str,
    query: &'a str,
    variables: V,
}

#[derive(Deserialize)]
struct GraphQlEnvelope {
    #[serde(default)]
    data: Option<serde_json::Map<String, serde_json::Value>>,
    #[serde(default)]
    errors: Vec<GraphQlErrorMessage>,
}

#[derive(Deserialize)]
struct GraphQlErrorMessage {
    message: String,
}

/// HTTP client wrapper bound to one catalog GraphQL endpoint
#[derive(Clone)]
pub struct GraphQlClient {
    client: Client,
    endpoint: Url,
    token: Option<String>,
    extra_headers: HashMap<String, String>,
}

impl GraphQlClient {
    /// Create a client for an endpoint with default settings
    pub fn new(endpoint: &str) -> Result<Self, BackendError> {
        Self::with_settings(&BackendSettings {
            graphql_url: endpoint.to_string(),
            ..BackendSettings::default()
        })
    }

    /// Create a client with custom settings
    pub fn with_settings(settings: &BackendSettings) -> Result<Self, BackendError> {
        let endpoint = Url::parse(&settings.graphql_url)?;

        let mut builder = Client::builder()
            .timeout(Duration::from_secs_f64(settings.request_timeout))
            .user_agent(format!("catalog-searchbar/{}", crate::VERSION))
            .gzip(true)
            .brotli(true);

        if !settings.verify_ssl {
            builder = builder.danger_accept_invalid_certs(true);
        }

        if let Some(ref proxy_url) = settings.proxy {
            builder = builder.proxy(reqwest::Proxy::all(proxy_url)?);
        }

        Ok(Self {
            client: builder.build()?,
            endpoint,
            token: settings.token.clone(),
            extra_headers: settings.extra_headers.clone(),
        })
    }

    /// Run an operation and decode the selected top-level field
    pub async fn execute<V, T>(&self, operation: &GraphQlOperation, variables: V) -> Result<T, BackendError>
    where
        V: Serialize,
        T: DeserializeOwned,
    {
        let body = GraphQlRequest {
            operation_name: operation.name,
            query: operation.document,
            variables,
        };

        let mut req_builder = self
            .client
            .post(self.endpoint.clone())
            .header("Accept", "application/json")
            .json(&body);

        if let Some(ref token) = self.token {
            req_builder = req_builder.bearer_auth(token);
        }

        for (key, value) in &self.extra_headers {
            req_builder = req_builder.header(key, value);
        }

        debug!("Sending {} to {}", operation.name, self.endpoint);

        let response = req_builder.send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            return Err(BackendError::Status {
                status: status.as_u16(),
                body: text,
            });
        }

        let envelope: GraphQlEnvelope = serde_json::from_str(&text)?;

        if !envelope.errors.is_empty() {
            return Err(BackendError::GraphQl(
                envelope.errors.into_iter().map(|e| e.message).collect(),
            ));
        }

        let value = envelope
            .data
            .and_then(|mut data| data.remove(operation.field))
            .filter(|value| !value.is_null())
            .ok_or(BackendError::MissingData(operation.field))?;

        Ok(serde_json::from_value(value)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = GraphQlClient::new("http://localhost:8080/api/graphql");
        assert!(client.is_ok());
    }

    #[test]
    fn test_invalid_endpoint() {
        let err = GraphQlClient::new("not a url").err().unwrap();
        assert!(matches!(err, BackendError::InvalidEndpoint(_)));
    }
}
