//! Pipeline text handling
//!
//! Hand-written pipelines arrive as raw text and must be a JSON array of stage
//! objects before they can be sent anywhere. Parsing distinguishes text that is
//! not JSON at all from JSON that is not array-shaped.

use serde_json::Value as JsonValue;
use thiserror::Error;

/// Why pipeline text was rejected
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PipelineFormatError {
    /// The text is not valid JSON
    #[error("Invalid JSON: {0}")]
    Syntax(String),

    /// The text is valid JSON but not an array
    #[error("Pipeline must be a JSON array (found {0})")]
    NotArray(&'static str),
}

/// Parses pipeline text into its stages
pub fn parse_pipeline(text: &str) -> Result<Vec<JsonValue>, PipelineFormatError> {
    let value: JsonValue =
        serde_json::from_str(text).map_err(|e| PipelineFormatError::Syntax(e.to_string()))?;

    match value {
        JsonValue::Array(stages) => Ok(stages),
        other => Err(PipelineFormatError::NotArray(json_type_name(&other))),
    }
}

/// Pretty-prints stages with two-space indentation, the form used to pre-fill editors
pub fn pretty_pipeline(stages: &[JsonValue]) -> String {
    serde_json::to_string_pretty(stages).unwrap_or_else(|_| "[]".to_string())
}

fn json_type_name(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "boolean",
        JsonValue::Number(_) => "number",
        JsonValue::String(_) => "string",
        JsonValue::Array(_) => "array",
        JsonValue::Object(_) => "object",
    }
}
