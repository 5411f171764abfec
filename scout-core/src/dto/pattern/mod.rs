//! Pattern DTOs

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};

/// Row cap applied when a caller does not pick one
pub const DEFAULT_RESULT_LIMIT: u32 = 50;

/// Body of `POST /queries/{name}/execute`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecuteOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub match_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameters: Option<Map<String, JsonValue>>,
    pub limit: u32,
}

impl Default for ExecuteOptions {
    fn default() -> Self {
        Self {
            match_id: None,
            parameters: None,
            limit: DEFAULT_RESULT_LIMIT,
        }
    }
}

/// Body of `POST /queries`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavePattern {
    pub name: String,
    pub description: String,
    pub pipeline: Vec<JsonValue>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

/// Acknowledgement returned by the save endpoints
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedPattern {
    pub name: String,
}

/// Body of `POST /queries/manual`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ManualPatternRequest {
    pub description: String,
    pub pipeline: Vec<JsonValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub execute: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub based_on: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// Response of `POST /queries/manual`
///
/// Anything beyond the known fields is kept in `extra` so test runs can show
/// the full backend answer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ManualPatternResponse {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub validation_warnings: Vec<ValidationWarning>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub results: Option<Vec<JsonValue>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result_count: Option<usize>,
    #[serde(flatten)]
    pub extra: Map<String, JsonValue>,
}

impl ManualPatternResponse {
    /// Row count under whichever key the backend used
    pub fn row_count(&self) -> Option<usize> {
        self.count
            .or(self.result_count)
            .or_else(|| self.results.as_ref().map(Vec::len))
    }

    /// Warning messages joined with `"; "`, or `None` when there are none
    pub fn combined_warnings(&self) -> Option<String> {
        if self.validation_warnings.is_empty() {
            return None;
        }
        Some(
            self.validation_warnings
                .iter()
                .map(|w| w.message.as_str())
                .collect::<Vec<_>>()
                .join("; "),
        )
    }
}

/// Non-blocking remark the backend attaches to a manual pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationWarning {
    pub message: String,
    #[serde(flatten)]
    pub extra: Map<String, JsonValue>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_execute_options_omit_unset_fields() {
        let body = serde_json::to_value(ExecuteOptions::default()).unwrap();
        assert_eq!(body, json!({ "limit": 50 }));
    }

    #[test]
    fn test_manual_response_warnings() {
        let response: ManualPatternResponse = serde_json::from_value(json!({
            "name": "manual_1",
            "validation_warnings": [
                {"message": "Unknown field 'playr'", "stage": 0},
                {"message": "No $limit stage"}
            ],
            "result_count": 3,
            "execution_time_ms": 12
        }))
        .unwrap();

        assert_eq!(
            response.combined_warnings().as_deref(),
            Some("Unknown field 'playr'; No $limit stage")
        );
        assert_eq!(response.row_count(), Some(3));
        assert_eq!(response.extra.get("execution_time_ms"), Some(&json!(12)));
    }

    #[test]
    fn test_no_warnings() {
        let response: ManualPatternResponse =
            serde_json::from_value(json!({"name": "manual_2"})).unwrap();
        assert!(response.combined_warnings().is_none());
    }
}
