//! Error types for the planner API client.

use thiserror::Error;

/// Planner API client errors.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Server answered with a non-success status
    #[error("API request failed with status {status}: {body}")]
    HttpStatus { status: u16, body: String },

    /// The resume parse endpoint reported failure or returned no data
    #[error("Resume parsing failed: {0}")]
    ResumeRejected(String),

    /// The stream was cancelled locally before completion
    #[error("Request cancelled")]
    Cancelled,

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// HTTP transport error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ClientError {
    /// Check if this error is network-related.
    pub fn is_network_error(&self) -> bool {
        match self {
            ClientError::Http(e) => e.is_timeout() || e.is_connect() || e.is_request(),
            ClientError::HttpStatus { status, .. } => (500..600).contains(status),
            _ => false,
        }
    }

    /// Get a user-friendly error message for the error overlay.
    pub fn friendly_message(&self) -> String {
        match self {
            ClientError::HttpStatus { status, .. } => {
                format!("The planner server rejected the request ({status}).")
            }
            ClientError::ResumeRejected(msg) => {
                format!("Could not read the resume text: {msg}")
            }
            ClientError::Cancelled => "Request cancelled.".to_string(),
            ClientError::Http(e) if e.is_connect() => {
                "Could not reach the planner server. Check your network.".to_string()
            }
            ClientError::Http(e) if e.is_timeout() => {
                "Connection to the planner server timed out.".to_string()
            }
            ClientError::ConfigError(msg) => format!("Configuration error: {msg}"),
            other => format!("Error generating plan: {other}"),
        }
    }
}

/// Result type for client operations.
pub type Result<T> = std::result::Result<T, ClientError>;
