//! Error types for the EVSE agent

use reqwest::StatusCode;
use thiserror::Error;

/// Main error type for the EVSE agent
#[derive(Error, Debug)]
pub enum AgentError {
    /// Connection, DNS or timeout failure talking to the device
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The device answered, but not with the status code the endpoint promises
    #[error("Unexpected status code: expected {expected}, got {actual}")]
    UnexpectedStatusCode {
        expected: StatusCode,
        actual: StatusCode,
    },

    /// The response body did not have the expected shape
    #[error("Decode error: {0}")]
    Decode(String),

    /// A command reply did not match the expected token grammar
    #[error("Protocol error: {0}")]
    Protocol(String),

    /// A single status field could not be parsed
    #[error("Unable to parse field {field} from {value:?}: {reason}")]
    FieldParse {
        field: String,
        value: String,
        reason: String,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Metrics error: {0}")]
    Metrics(String),

    #[error("Shutdown error: {0}")]
    Shutdown(String),
}
