use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DomainError {
    #[error("domain validation failed: {message}")]
    Validation { message: String },
    #[error("malformed `{entity}` payload: {message}")]
    Malformed {
        entity: &'static str,
        message: String,
    },
}

impl DomainError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn malformed(entity: &'static str, message: impl Into<String>) -> Self {
        Self::Malformed {
            entity,
            message: message.into(),
        }
    }
}
