//! Query pattern API endpoints

use crate::PatternStoreClient;
use crate::error::Result;
use scout_core::domain::pattern::QueryPattern;
use scout_core::domain::result::{ExecutionResult, NaturalQueryResult};
use scout_core::dto::natural::NaturalQueryRequest;
use scout_core::dto::pattern::{
    ExecuteOptions, ManualPatternRequest, ManualPatternResponse, SavePattern, SavedPattern,
};

impl PatternStoreClient {
    // =============================================================================
    // Catalog
    // =============================================================================

    /// List query patterns, optionally restricted to one tag
    ///
    /// # Arguments
    /// * `tag` - Only return patterns carrying this tag
    ///
    /// # Returns
    /// Pattern summaries (no pipeline)
    pub async fn list_patterns(&self, tag: Option<&str>) -> Result<Vec<QueryPattern>> {
        let url = self.endpoint(&["queries"])?;
        let mut request = self.client.get(url);
        if let Some(tag) = tag {
            request = request.query(&[("tag", tag)]);
        }
        let response = request.send().await?;

        self.handle_response(response).await
    }

    /// Get a pattern with its full definition
    ///
    /// # Arguments
    /// * `name` - The pattern name
    ///
    /// # Returns
    /// The pattern, including its pipeline. Fails with `NotFound` if absent.
    pub async fn get_pattern(&self, name: &str) -> Result<QueryPattern> {
        let url = self.endpoint(&["queries", name])?;
        let response = self.client.get(url).send().await?;

        self.handle_response(response).await
    }

    /// Execute a stored pattern
    ///
    /// # Arguments
    /// * `name` - The pattern name
    /// * `options` - Match filter, parameter values and row limit
    ///
    /// # Example
    /// ```no_run
    /// # use scout_client::PatternStoreClient;
    /// # use scout_core::dto::pattern::ExecuteOptions;
    /// # async fn example() -> anyhow::Result<()> {
    /// let client = PatternStoreClient::new("http://localhost:5001/api");
    /// let mut parameters = serde_json::Map::new();
    /// parameters.insert("player".into(), "Messi".into());
    ///
    /// let result = client.execute_pattern("messi_goals", &ExecuteOptions {
    ///     parameters: Some(parameters),
    ///     ..Default::default()
    /// }).await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn execute_pattern(
        &self,
        name: &str,
        options: &ExecuteOptions,
    ) -> Result<ExecutionResult> {
        let url = self.endpoint(&["queries", name, "execute"])?;
        tracing::debug!("Executing pattern {} (limit {})", name, options.limit);
        let response = self.client.post(url).json(options).send().await?;

        self.handle_response(response).await
    }

    /// Save a new pattern
    ///
    /// Fails with `Conflict` if a pattern with the same name exists.
    pub async fn save_pattern(&self, req: &SavePattern) -> Result<SavedPattern> {
        let url = self.endpoint(&["queries"])?;
        let response = self.client.post(url).json(req).send().await?;

        self.handle_response(response).await
    }

    /// Validate, test-run or save a hand-written pipeline
    ///
    /// With `execute: Some(true)` the backend runs the pipeline and returns rows
    /// and validation warnings.
    pub async fn save_manual(&self, req: &ManualPatternRequest) -> Result<ManualPatternResponse> {
        let url = self.endpoint(&["queries", "manual"])?;
        let response = self.client.post(url).json(req).send().await?;

        self.handle_response(response).await
    }

    /// Translate a natural-language request into a pipeline
    pub async fn natural_query(&self, req: &NaturalQueryRequest) -> Result<NaturalQueryResult> {
        let url = self.endpoint(&["queries", "natural"])?;
        let response = self.client.post(url).json(req).send().await?;

        self.handle_response(response).await
    }

    /// Delete a pattern
    ///
    /// # Arguments
    /// * `name` - The pattern to delete
    pub async fn delete_pattern(&self, name: &str) -> Result<()> {
        let url = self.endpoint(&["queries", name])?;
        let response = self.client.delete(url).send().await?;

        self.handle_empty_response(response).await
    }
}
