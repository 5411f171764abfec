//! Execution and translation result types

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// Result of running a stored pattern
///
/// Replaced wholesale on each execution; never patched in place.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExecutionResult {
    #[serde(default)]
    pub query_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result_count: Option<usize>,
    #[serde(default)]
    pub results: Vec<JsonValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ExecutionResult {
    /// Row count under whichever key the backend used, else the rows received
    pub fn row_count(&self) -> usize {
        self.count
            .or(self.result_count)
            .unwrap_or(self.results.len())
    }
}

/// Pipeline produced by the natural-language translation service
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NaturalQueryResult {
    #[serde(default)]
    pub pipeline: Vec<JsonValue>,
    #[serde(default)]
    pub explanation: String,
    #[serde(default)]
    pub confidence: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub results: Option<Vec<JsonValue>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result_count: Option<usize>,
    #[serde(default)]
    pub mock: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub saved_as: Option<String>,
    #[serde(default)]
    pub similar_queries: Vec<SimilarQuery>,
}

impl NaturalQueryResult {
    pub fn row_count(&self) -> Option<usize> {
        self.count
            .or(self.result_count)
            .or_else(|| self.results.as_ref().map(Vec::len))
    }

    /// Confidence clamped into `[0, 1]`
    pub fn confidence(&self) -> f64 {
        self.confidence.clamp(0.0, 1.0)
    }

    pub fn confidence_band(&self) -> ConfidenceBand {
        ConfidenceBand::from_score(self.confidence())
    }
}

/// Coarse grading of translation confidence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfidenceBand {
    High,
    Medium,
    Low,
}

impl ConfidenceBand {
    pub fn from_score(score: f64) -> Self {
        if score >= 0.8 {
            Self::High
        } else if score >= 0.6 {
            Self::Medium
        } else {
            Self::Low
        }
    }
}

/// Stored pattern the translator considers close to the request
///
/// The service sends either a bare pattern name or an object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawSimilarQuery")]
pub struct SimilarQuery {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub similarity: Option<f64>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawSimilarQuery {
    Name(String),
    Entry {
        name: String,
        #[serde(default)]
        description: Option<String>,
        #[serde(default, alias = "score")]
        similarity: Option<f64>,
    },
}

impl From<RawSimilarQuery> for SimilarQuery {
    fn from(raw: RawSimilarQuery) -> Self {
        match raw {
            RawSimilarQuery::Name(name) => Self {
                name,
                description: None,
                similarity: None,
            },
            RawSimilarQuery::Entry {
                name,
                description,
                similarity,
            } => Self {
                name,
                description,
                similarity,
            },
        }
    }
}
