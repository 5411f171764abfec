//! Reference data endpoints

use crate::PatternStoreClient;
use crate::error::Result;
use serde_json::Value as JsonValue;

impl PatternStoreClient {
    /// List the match IDs available for filtering
    pub async fn list_matches(&self) -> Result<Vec<String>> {
        let url = self.endpoint(&["matches"])?;
        let response = self.client.get(url).send().await?;

        self.handle_response(response).await
    }

    /// Get corpus statistics
    ///
    /// The shape is owned by the backend and passed through untouched.
    pub async fn get_stats(&self) -> Result<JsonValue> {
        let url = self.endpoint(&["stats"])?;
        let response = self.client.get(url).send().await?;

        self.handle_response(response).await
    }
}
