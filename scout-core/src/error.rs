//! Normalized error envelope
//!
//! Every failure that reaches session logic is reduced to an [`ErrorEnvelope`].
//! Sessions decide what to do from `kind` alone; `message` is what a user sees.

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::fmt;

/// Error taxonomy shared by every layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Missing or invalid input, caught before any remote call or rejected by the backend as such
    Validation,
    /// Hand-written pipeline text is malformed or not an array
    PipelineFormat,
    /// The query engine rejected the pipeline at run time
    RemoteExecution,
    /// The named pattern does not exist
    NotFound,
    /// A pattern with the same name already exists
    Conflict,
    /// Network failure or an answer the client could not interpret
    Transport,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Validation => "validation",
            Self::PipelineFormat => "pipeline_format",
            Self::RemoteExecution => "remote_execution",
            Self::NotFound => "not_found",
            Self::Conflict => "conflict",
            Self::Transport => "transport",
        };
        f.write_str(name)
    }
}

/// `{kind, message, details?}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    pub kind: ErrorKind,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<JsonValue>,
}

impl ErrorEnvelope {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: JsonValue) -> Self {
        self.details = Some(details);
        self
    }
}

impl fmt::Display for ErrorEnvelope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.message, self.kind)
    }
}

/// Error body the backend sends: `{"error": "...", "details": ...}`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub details: Option<JsonValue>,
}

impl ApiErrorBody {
    /// Best human-readable message: `error`, then `message`, then textual `details`
    pub fn best_message(&self) -> Option<String> {
        self.error
            .clone()
            .or_else(|| self.message.clone())
            .or_else(|| match &self.details {
                Some(JsonValue::String(s)) => Some(s.clone()),
                _ => None,
            })
            .filter(|m| !m.trim().is_empty())
    }
}
