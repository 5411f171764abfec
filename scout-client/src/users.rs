//! User and collection endpoints

use crate::PatternStoreClient;
use crate::error::Result;
use scout_core::domain::pattern::QueryPattern;
use scout_core::domain::user::User;
use scout_core::dto::user::{AddToCollection, LoginRequest};

impl PatternStoreClient {
    /// Log in by email; the backend creates the user on first login
    pub async fn login(&self, req: &LoginRequest) -> Result<User> {
        let url = self.endpoint(&["auth", "login"])?;
        let response = self.client.post(url).json(req).send().await?;

        self.handle_response(response).await
    }

    /// Patterns in a user's collection, with full details
    pub async fn user_queries(&self, user_id: &str) -> Result<Vec<QueryPattern>> {
        let url = self.endpoint(&["users", user_id, "queries"])?;
        let response = self.client.get(url).send().await?;

        self.handle_response(response).await
    }

    /// Add a pattern to a user's collection
    pub async fn add_to_collection(&self, user_id: &str, query_name: &str) -> Result<()> {
        let url = self.endpoint(&["users", user_id, "queries"])?;
        let response = self
            .client
            .post(url)
            .json(&AddToCollection {
                query_name: query_name.to_string(),
            })
            .send()
            .await?;

        self.handle_empty_response(response).await
    }

    /// Remove a pattern from a user's collection
    pub async fn remove_from_collection(&self, user_id: &str, query_name: &str) -> Result<()> {
        let url = self.endpoint(&["users", user_id, "queries", query_name])?;
        let response = self.client.delete(url).send().await?;

        self.handle_empty_response(response).await
    }
}
