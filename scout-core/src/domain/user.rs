//! User domain types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Logged-in user as returned by the auth endpoint
///
/// `saved_queries` is the user's pattern collection (pattern names).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub user_id: String,
    pub email: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub provider: String,
    #[serde(default)]
    pub saved_queries: Vec<String>,
    #[serde(
        default,
        deserialize_with = "crate::domain::timestamp::lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(
        default,
        deserialize_with = "crate::domain::timestamp::lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub last_login: Option<DateTime<Utc>>,
}

impl User {
    pub fn has_saved(&self, query_name: &str) -> bool {
        self.saved_queries.iter().any(|q| q == query_name)
    }
}
