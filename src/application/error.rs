use thiserror::Error;

use crate::{config::LoadError, infra::error::InfraError};

/// Errors surfaced by the operator binary. Content fetches never produce one;
/// they degrade to empty results instead.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Infra(#[from] InfraError),
    #[error("failed to load configuration: {0}")]
    Config(#[from] LoadError),
    #[error("validation failed: {0}")]
    Validation(String),
}

impl AppError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }
}
