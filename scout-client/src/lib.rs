//! Scout HTTP Client
//!
//! A simple, type-safe HTTP client for the Scout pattern store API.
//!
//! The client covers the pattern catalog (list, get, execute, save, delete),
//! the natural-language and manual authoring endpoints, reference data
//! (matches, stats) and the user collection routes. Session logic talks to it
//! through the [`PatternStore`] and [`UserDirectory`] traits so it can be
//! swapped for an in-memory store in tests.
//!
//! # Example
//!
//! ```no_run
//! use scout_client::PatternStoreClient;
//! use scout_core::dto::pattern::ExecuteOptions;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = PatternStoreClient::new("http://localhost:5001/api");
//!
//!     let result = client
//!         .execute_pattern("messi_goals", &ExecuteOptions::default())
//!         .await?;
//!
//!     println!("{:?} rows", result.count);
//!     Ok(())
//! }
//! ```

pub mod error;
mod queries;
mod reference;
mod store;
mod users;

// Re-export commonly used types
pub use error::{ClientError, Result};
pub use store::{PatternStore, UserDirectory};

use reqwest::{Client, Url};
use serde::de::DeserializeOwned;

/// Base URL used when none is configured
pub const DEFAULT_BASE_URL: &str = "http://localhost:5001/api";

/// HTTP client for the Scout pattern store API
#[derive(Debug, Clone)]
pub struct PatternStoreClient {
    /// Base URL of the API (e.g., "http://localhost:5001/api")
    base_url: String,
    /// HTTP client instance
    client: Client,
}

impl PatternStoreClient {
    /// Create a new pattern store client
    ///
    /// # Arguments
    /// * `base_url` - The base URL of the API, including the `/api` prefix
    ///
    /// # Example
    /// ```
    /// use scout_client::PatternStoreClient;
    ///
    /// let client = PatternStoreClient::new("http://localhost:5001/api");
    /// ```
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(base_url, Client::new())
    }

    /// Create a new client with a custom HTTP client
    ///
    /// This allows you to configure timeouts, proxies, TLS settings, etc.
    ///
    /// # Example
    /// ```
    /// use scout_client::PatternStoreClient;
    /// use reqwest::Client;
    /// use std::time::Duration;
    ///
    /// let http_client = Client::builder()
    ///     .timeout(Duration::from_secs(30))
    ///     .build()
    ///     .unwrap();
    ///
    /// let client = PatternStoreClient::with_client("http://localhost:5001/api", http_client);
    /// ```
    pub fn with_client(base_url: impl Into<String>, client: Client) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        }
    }

    /// Get the base URL of the API
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build an endpoint URL from path segments
    ///
    /// Segments are percent-encoded, so pattern names containing spaces or
    /// slashes stay a single path segment.
    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| ClientError::InvalidRequest(format!("bad base URL: {}", e)))?;
        url.path_segments_mut()
            .map_err(|_| ClientError::InvalidRequest("base URL cannot have a path".to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    // =============================================================================
    // Response Handlers
    // =============================================================================

    /// Handle an API response and deserialize JSON
    ///
    /// This method checks the status code and maps failures onto the error
    /// taxonomy, or deserializes the response body if successful.
    async fn handle_response<T: DeserializeOwned>(&self, response: reqwest::Response) -> Result<T> {
        let status = response.status();

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            tracing::debug!("API error {}: {}", status, error_text);
            return Err(ClientError::from_status(status.as_u16(), &error_text));
        }

        response
            .json()
            .await
            .map_err(|e| ClientError::ParseError(format!("Failed to parse JSON response: {}", e)))
    }

    /// Handle an API response that returns no meaningful content (e.g., DELETE operations)
    async fn handle_empty_response(&self, response: reqwest::Response) -> Result<()> {
        let status = response.status();

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            tracing::debug!("API error {}: {}", status, error_text);
            return Err(ClientError::from_status(status.as_u16(), &error_text));
        }

        Ok(())
    }
}

impl Default for PatternStoreClient {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}
