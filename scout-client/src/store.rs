//! Store traits
//!
//! Sessions depend on these traits rather than on the HTTP client directly,
//! which keeps them testable against an in-memory store.

use async_trait::async_trait;
use scout_core::domain::pattern::QueryPattern;
use scout_core::domain::result::{ExecutionResult, NaturalQueryResult};
use scout_core::domain::user::User;
use scout_core::dto::natural::NaturalQueryRequest;
use scout_core::dto::pattern::{
    ExecuteOptions, ManualPatternRequest, ManualPatternResponse, SavePattern, SavedPattern,
};
use scout_core::dto::user::LoginRequest;
use serde_json::Value as JsonValue;

use crate::PatternStoreClient;
use crate::error::Result;

/// Access to the query pattern catalog
///
/// Every call is independent; no ordering is guaranteed between calls issued
/// concurrently beyond each response answering its own request.
#[async_trait]
pub trait PatternStore: Send + Sync {
    /// Lists pattern summaries, optionally filtered by tag
    async fn list_patterns(&self, tag: Option<&str>) -> Result<Vec<QueryPattern>>;

    /// Fetches one pattern with its pipeline
    async fn get_pattern(&self, name: &str) -> Result<QueryPattern>;

    /// Runs a stored pattern
    async fn execute_pattern(&self, name: &str, options: &ExecuteOptions)
    -> Result<ExecutionResult>;

    /// Saves a new pattern
    async fn save_pattern(&self, req: &SavePattern) -> Result<SavedPattern>;

    /// Tests or saves a hand-written pipeline
    async fn save_manual(&self, req: &ManualPatternRequest) -> Result<ManualPatternResponse>;

    /// Translates free text into a pipeline
    async fn natural_query(&self, req: &NaturalQueryRequest) -> Result<NaturalQueryResult>;

    /// Deletes a pattern
    async fn delete_pattern(&self, name: &str) -> Result<()>;

    /// Lists match IDs
    async fn list_matches(&self) -> Result<Vec<String>>;

    /// Fetches corpus statistics
    async fn get_stats(&self) -> Result<JsonValue>;
}

/// Access to users and their pattern collections
#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn login(&self, req: &LoginRequest) -> Result<User>;

    async fn user_queries(&self, user_id: &str) -> Result<Vec<QueryPattern>>;

    async fn add_to_collection(&self, user_id: &str, query_name: &str) -> Result<()>;

    async fn remove_from_collection(&self, user_id: &str, query_name: &str) -> Result<()>;
}

#[async_trait]
impl PatternStore for PatternStoreClient {
    async fn list_patterns(&self, tag: Option<&str>) -> Result<Vec<QueryPattern>> {
        PatternStoreClient::list_patterns(self, tag).await
    }

    async fn get_pattern(&self, name: &str) -> Result<QueryPattern> {
        PatternStoreClient::get_pattern(self, name).await
    }

    async fn execute_pattern(
        &self,
        name: &str,
        options: &ExecuteOptions,
    ) -> Result<ExecutionResult> {
        PatternStoreClient::execute_pattern(self, name, options).await
    }

    async fn save_pattern(&self, req: &SavePattern) -> Result<SavedPattern> {
        PatternStoreClient::save_pattern(self, req).await
    }

    async fn save_manual(&self, req: &ManualPatternRequest) -> Result<ManualPatternResponse> {
        PatternStoreClient::save_manual(self, req).await
    }

    async fn natural_query(&self, req: &NaturalQueryRequest) -> Result<NaturalQueryResult> {
        PatternStoreClient::natural_query(self, req).await
    }

    async fn delete_pattern(&self, name: &str) -> Result<()> {
        PatternStoreClient::delete_pattern(self, name).await
    }

    async fn list_matches(&self) -> Result<Vec<String>> {
        PatternStoreClient::list_matches(self).await
    }

    async fn get_stats(&self) -> Result<JsonValue> {
        PatternStoreClient::get_stats(self).await
    }
}

#[async_trait]
impl UserDirectory for PatternStoreClient {
    async fn login(&self, req: &LoginRequest) -> Result<User> {
        PatternStoreClient::login(self, req).await
    }

    async fn user_queries(&self, user_id: &str) -> Result<Vec<QueryPattern>> {
        PatternStoreClient::user_queries(self, user_id).await
    }

    async fn add_to_collection(&self, user_id: &str, query_name: &str) -> Result<()> {
        PatternStoreClient::add_to_collection(self, user_id, query_name).await
    }

    async fn remove_from_collection(&self, user_id: &str, query_name: &str) -> Result<()> {
        PatternStoreClient::remove_from_collection(self, user_id, query_name).await
    }
}
