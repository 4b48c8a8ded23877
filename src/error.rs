//! Error types for the ETA grid pipeline.

use thiserror::Error;

/// A single matrix query failed. Absorbed per batch by the coordinator.
#[derive(Debug, Error)]
pub enum MatrixError {
    #[error("routing service request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("routing service returned HTTP {status}")]
    HttpStatus { status: u16 },

    #[error(
        "routing service returned code {code}: {}",
        .message.as_deref().unwrap_or("no message")
    )]
    Status {
        code: String,
        message: Option<String>,
    },

    #[error("malformed routing response: {0}")]
    Malformed(String),
}

/// Errors that stop the pipeline before any output is written.
#[derive(Debug, Error)]
pub enum EtaGridError {
    #[error("routing service at {url} is not reachable: {source}")]
    ServiceUnreachable {
        url: String,
        #[source]
        source: MatrixError,
    },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T, E = EtaGridError> = std::result::Result<T, E>;
