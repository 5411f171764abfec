//! Configuration module
//!
//! Resolved CLI settings: API location, request timeout and where the login
//! session is kept.

use anyhow::{Context, Result, bail};
use reqwest::Url;
use scout_client::PatternStoreClient;
use std::path::PathBuf;
use std::time::Duration;

/// Session file used when the platform has no config directory
const FALLBACK_SESSION_FILE: &str = ".scout-session.json";

/// CLI configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the pattern store API, including the `/api` prefix
    pub api_url: String,

    /// Per-request timeout
    pub timeout: Duration,

    /// Where the logged-in user is persisted
    pub session_file: PathBuf,
}

impl Config {
    /// Validates raw settings
    ///
    /// The URL must be absolute http(s) and the timeout non-zero. Without an
    /// explicit session file, `<config dir>/scout/session.json` is used.
    pub fn new(api_url: &str, timeout_secs: u64, session_file: Option<PathBuf>) -> Result<Self> {
        let url = Url::parse(api_url).with_context(|| format!("Invalid API URL: {}", api_url))?;
        if !matches!(url.scheme(), "http" | "https") {
            bail!("API URL must use http or https, got '{}'", url.scheme());
        }
        if timeout_secs == 0 {
            bail!("Timeout must be at least one second");
        }

        Ok(Self {
            api_url: api_url.trim_end_matches('/').to_string(),
            timeout: Duration::from_secs(timeout_secs),
            session_file: session_file.unwrap_or_else(default_session_file),
        })
    }

    /// Pattern store client honouring the configured timeout
    pub fn client(&self) -> Result<PatternStoreClient> {
        let http = reqwest::Client::builder()
            .timeout(self.timeout)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(PatternStoreClient::with_client(&self.api_url, http))
    }
}

fn default_session_file() -> PathBuf {
    dirs::config_dir()
        .map(|dir| dir.join("scout").join("session.json"))
        .unwrap_or_else(|| PathBuf::from(FALLBACK_SESSION_FILE))
}
