//! Error types for the Roster SDK.

use serde::{Deserialize, Serialize};

/// Result type for SDK operations.
pub type RosterResult<T> = Result<T, RosterError>;

/// Error types that can occur when using the Roster SDK.
#[derive(Debug, thiserror::Error)]
pub enum RosterError {
    /// HTTP request failed before a response arrived.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned a non-success response.
    #[error("API error (status {status}): {message}")]
    Api {
        status: u16,
        message: String,
        details: Option<String>,
        /// Raw response body as sent by the server.
        body: String,
    },

    /// Invalid configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl RosterError {
    /// Create an API error from a status code and response body.
    pub fn from_response(status: u16, body: &str) -> Self {
        // Try to parse as ErrorResponse
        if let Ok(error_response) = serde_json::from_str::<ErrorResponse>(body) {
            Self::Api {
                status,
                message: error_response.error,
                details: error_response.details,
                body: body.to_string(),
            }
        } else {
            Self::Api {
                status,
                message: body.to_string(),
                details: None,
                body: body.to_string(),
            }
        }
    }

    /// HTTP status of the upstream response, if one was received.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::Http(err) => err.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Whether the server reported the resource as missing.
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}

/// Error response from the Roster API.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}
