//! Error types for the catalog fetch collaborators

use thiserror::Error;

/// Failure of a remote search or autocomplete call.
///
/// The orchestrator absorbs these; they never reach search bar callers.
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("request to catalog failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("catalog responded with HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("catalog returned GraphQL errors: {}", .0.join("; "))]
    GraphQl(Vec<String>),

    #[error("catalog response is missing `{0}`")]
    MissingData(&'static str),

    #[error("failed to decode catalog response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("invalid catalog endpoint: {0}")]
    InvalidEndpoint(#[from] url::ParseError),

    #[error("catalog fetch panicked: {0}")]
    Panicked(String),
}

impl BackendError {
    /// Whether a retry by the HTTP layer could plausibly succeed
    pub fn is_transient(&self) -> bool {
        match self {
            BackendError::Http(e) => e.is_timeout() || e.is_connect(),
            BackendError::Status { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}
