//! Natural-language query DTOs

use serde::{Deserialize, Serialize};

use crate::dto::pattern::DEFAULT_RESULT_LIMIT;

/// Body of `POST /queries/natural`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NaturalQueryRequest {
    pub query: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub match_id: Option<String>,
    pub execute: bool,
    pub limit: u32,
}

impl NaturalQueryRequest {
    pub fn new(query: impl Into<String>, execute: bool) -> Self {
        Self {
            query: query.into(),
            match_id: None,
            execute,
            limit: DEFAULT_RESULT_LIMIT,
        }
    }
}
