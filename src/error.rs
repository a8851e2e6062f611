//! Error types shared across the handler, the provider client and the execution client.

use thiserror::Error;

/// Failure talking to the completion provider.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("Connection error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("{status} {message}")]
    Api { status: u16, message: String },
    #[error("Malformed completion response: {0}")]
    Malformed(String),
    #[error("Invalid API key header: {0}")]
    InvalidKey(#[from] reqwest::header::InvalidHeaderValue),
}

/// Outcome of an explanation request that did not produce text.
#[derive(Debug, Error)]
pub enum ExplainError {
    #[error("No code provided")]
    MissingCode,
    #[error("Invalid request body: {0}")]
    InvalidBody(String),
    #[error(transparent)]
    Provider(#[from] ProviderError),
}

impl ExplainError {
    pub fn is_client_error(&self) -> bool {
        matches!(self, ExplainError::MissingCode | ExplainError::InvalidBody(_))
    }
}

/// Failure reaching the execution service or decoding its reply.
#[derive(Debug, Error)]
pub enum ExecutionError {
    #[error("{0}")]
    Transport(#[from] reqwest::Error),
    #[error("invalid JSON in response: {0}")]
    Decode(#[from] serde_json::Error),
}
