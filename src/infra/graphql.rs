//! reqwest-backed GraphQL client for the content backend.

use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::Deserialize;
use serde_json::Value;

use crate::application::backend::{
    BackendError, ContentBackend, GraphqlQuery, UnconfiguredBackend,
};
use crate::config::BackendSettings;

use super::error::InfraError;

const MAX_ERROR_BODY_CHARS: usize = 512;

#[derive(Debug, Clone)]
pub struct GraphqlBackend {
    client: Client,
    endpoint: Url,
    timeout: Duration,
}

impl GraphqlBackend {
    pub fn new(endpoint: Url, timeout: Duration) -> Result<Self, InfraError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(Self::user_agent())
            .build()
            .map_err(|err| InfraError::http_client(err.to_string()))?;
        Ok(Self {
            client,
            endpoint,
            timeout,
        })
    }

    pub fn user_agent() -> &'static str {
        concat!("edgesite/", env!("CARGO_PKG_VERSION"))
    }
}

#[derive(Debug, Deserialize)]
struct GraphqlResponse {
    #[serde(default)]
    data: Option<Value>,
    #[serde(default)]
    errors: Vec<GraphqlErrorEntry>,
}

#[derive(Debug, Deserialize)]
struct GraphqlErrorEntry {
    #[serde(default)]
    message: String,
}

#[async_trait]
impl ContentBackend for GraphqlBackend {
    async fn execute(&self, query: &GraphqlQuery) -> Result<Value, BackendError> {
        let resp = self
            .client
            .post(self.endpoint.clone())
            .json(query)
            .send()
            .await
            .map_err(|err| self.transport_error(err))?;

        let status = resp.status();
        let bytes = resp
            .bytes()
            .await
            .map_err(|err| self.transport_error(err))?;

        if !status.is_success() {
            let body: String = String::from_utf8_lossy(&bytes)
                .chars()
                .take(MAX_ERROR_BODY_CHARS)
                .collect();
            return Err(BackendError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: GraphqlResponse = serde_json::from_slice(&bytes).map_err(BackendError::decode)?;
        if !parsed.errors.is_empty() {
            return Err(BackendError::Graphql {
                messages: parsed
                    .errors
                    .into_iter()
                    .map(|entry| entry.message)
                    .collect(),
            });
        }

        match parsed.data {
            Some(Value::Null) | None => Err(BackendError::decode("response carried no data")),
            Some(data) => Ok(data),
        }
    }
}

impl GraphqlBackend {
    fn transport_error(&self, err: reqwest::Error) -> BackendError {
        if err.is_timeout() {
            BackendError::Timeout {
                seconds: self.timeout.as_secs(),
            }
        } else if err.is_decode() {
            BackendError::decode(err)
        } else {
            BackendError::transport(err)
        }
    }
}

/// Pick the backend implementation for the configured endpoint.
pub fn build_backend(settings: &BackendSettings) -> Result<Arc<dyn ContentBackend>, InfraError> {
    match settings.endpoint.as_ref() {
        Some(endpoint) => Ok(Arc::new(GraphqlBackend::new(
            endpoint.clone(),
            settings.timeout,
        )?)),
        None => Ok(Arc::new(UnconfiguredBackend)),
    }
}
