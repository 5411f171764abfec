//! Error types for the Scout client

use scout_core::domain::pattern::PatternError;
use scout_core::error::{ApiErrorBody, ErrorEnvelope, ErrorKind};
use scout_core::pipeline::PipelineFormatError;
use serde_json::Value as JsonValue;
use thiserror::Error;

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, ClientError>;

/// Errors that can occur when talking to the pattern store
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP request failed before a response arrived
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    /// Missing or invalid input
    #[error("Validation error: {0}")]
    Validation(String),

    /// Hand-written pipeline text could not be used
    #[error(transparent)]
    PipelineFormat(#[from] PipelineFormatError),

    /// The query engine rejected the pipeline
    #[error("Query execution failed: {message}")]
    RemoteExecution {
        /// Error message from the API
        message: String,
        /// Extra diagnostics from the API, if any
        details: Option<JsonValue>,
    },

    /// Resource not found
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Resource already exists
    #[error("Conflict: {0}")]
    Conflict(String),

    /// API returned a status code with no dedicated mapping
    #[error("API error (status {status}): {message}")]
    ApiError {
        /// HTTP status code
        status: u16,
        /// Error message from the API
        message: String,
    },

    /// Failed to parse response
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// Request could not be built
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl ClientError {
    /// Create an API error from status code and message
    pub fn api_error(status: u16, message: impl Into<String>) -> Self {
        Self::ApiError {
            status,
            message: message.into(),
        }
    }

    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Map a non-success HTTP answer onto the error taxonomy
    ///
    /// 400/422 become validation errors, 404 not-found, 409 conflict and any
    /// 5xx a remote execution error. Other codes are kept as raw API errors.
    pub fn from_status(status: u16, body: &str) -> Self {
        let parsed: ApiErrorBody = serde_json::from_str(body).unwrap_or_default();
        let message = parsed.best_message().unwrap_or_else(|| {
            if body.trim().is_empty() {
                "Unknown error".to_string()
            } else {
                body.trim().to_string()
            }
        });

        match status {
            400 | 422 => Self::Validation(message),
            404 => Self::NotFound(message),
            409 => Self::Conflict(message),
            500..=599 => Self::RemoteExecution {
                message,
                details: parsed.details,
            },
            _ => Self::api_error(status, message),
        }
    }

    /// Position of this error in the shared taxonomy
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) | Self::InvalidRequest(_) => ErrorKind::Validation,
            Self::PipelineFormat(_) => ErrorKind::PipelineFormat,
            Self::RemoteExecution { .. } => ErrorKind::RemoteExecution,
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::Conflict(_) => ErrorKind::Conflict,
            Self::RequestFailed(_) | Self::ApiError { .. } | Self::ParseError(_) => {
                ErrorKind::Transport
            }
        }
    }

    /// Normalized `{kind, message, details?}` form
    pub fn envelope(&self) -> ErrorEnvelope {
        let message = match self {
            Self::Validation(msg)
            | Self::NotFound(msg)
            | Self::Conflict(msg)
            | Self::InvalidRequest(msg) => msg.clone(),
            Self::RemoteExecution { message, .. } => message.clone(),
            Self::ApiError { message, .. } => message.clone(),
            other => other.to_string(),
        };

        let envelope = ErrorEnvelope::new(self.kind(), message);
        match self {
            Self::RemoteExecution {
                details: Some(details),
                ..
            } => envelope.with_details(details.clone()),
            _ => envelope,
        }
    }

    /// Check if this error is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_)) || matches!(self, Self::ApiError { status: 404, .. })
    }
}

impl From<PatternError> for ClientError {
    fn from(err: PatternError) -> Self {
        Self::Validation(err.to_string())
    }
}
