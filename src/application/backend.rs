//! Boundary to the external content backend.

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

/// A read-only GraphQL operation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphqlQuery {
    pub operation_name: String,
    pub query: String,
    pub variables: Value,
}

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("content backend endpoint is not configured")]
    NotConfigured,
    #[error("content backend did not answer within {seconds}s")]
    Timeout { seconds: u64 },
    #[error("transport error: {0}")]
    Transport(String),
    #[error("content backend returned HTTP {status}: {body}")]
    Status { status: u16, body: String },
    #[error("content backend reported errors: {}", .messages.join("; "))]
    Graphql { messages: Vec<String> },
    #[error("undecodable backend response: {0}")]
    Decode(String),
}

impl BackendError {
    pub fn transport(err: impl std::fmt::Display) -> Self {
        Self::Transport(err.to_string())
    }

    pub fn decode(err: impl std::fmt::Display) -> Self {
        Self::Decode(err.to_string())
    }

    /// Short, stable label for logs and metrics.
    pub fn reason(&self) -> &'static str {
        match self {
            BackendError::NotConfigured => "not_configured",
            BackendError::Timeout { .. } => "timeout",
            BackendError::Transport(_) => "transport",
            BackendError::Status { .. } => "status",
            BackendError::Graphql { .. } => "graphql",
            BackendError::Decode(_) => "decode",
        }
    }
}

/// Executes queries against the content backend and returns the response's
/// `data` object.
#[async_trait]
pub trait ContentBackend: Send + Sync {
    async fn execute(&self, query: &GraphqlQuery) -> Result<Value, BackendError>;

    /// Whether an endpoint is available at all. Pages use this to show a
    /// generic "unavailable" notice.
    fn is_configured(&self) -> bool {
        true
    }
}

/// Stand-in used when no endpoint is configured; every query fails with
/// [`BackendError::NotConfigured`].
#[derive(Debug, Clone, Copy, Default)]
pub struct UnconfiguredBackend;

#[async_trait]
impl ContentBackend for UnconfiguredBackend {
    async fn execute(&self, _query: &GraphqlQuery) -> Result<Value, BackendError> {
        Err(BackendError::NotConfigured)
    }

    fn is_configured(&self) -> bool {
        false
    }
}
