//! User Session
//!
//! Explicit login state handed to whatever needs the current user. The user
//! is optionally persisted to a JSON file so it survives restarts; file
//! problems are logged and otherwise ignored.

use scout_client::{ClientError, Result, UserDirectory};
use scout_core::domain::pattern::QueryPattern;
use scout_core::domain::user::User;
use scout_core::dto::user::LoginRequest;
use std::path::PathBuf;
use std::sync::Arc;

pub struct Session {
    directory: Arc<dyn UserDirectory>,
    user: Option<User>,
    file: Option<PathBuf>,
}

impl Session {
    /// In-memory session
    pub fn new(directory: Arc<dyn UserDirectory>) -> Self {
        Self {
            directory,
            user: None,
            file: None,
        }
    }

    /// Session persisted at `path`
    pub fn with_file(directory: Arc<dyn UserDirectory>, path: impl Into<PathBuf>) -> Self {
        Self {
            file: Some(path.into()),
            ..Self::new(directory)
        }
    }

    /// Loads a previously persisted user; returns whether one was found
    pub fn restore(&mut self) -> bool {
        let Some(path) = &self.file else {
            return false;
        };
        if !path.exists() {
            return false;
        }

        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                tracing::warn!("Failed to read session file {}: {}", path.display(), e);
                return false;
            }
        };
        match serde_json::from_str::<User>(&content) {
            Ok(user) => {
                tracing::debug!("Restored session for {}", user.email);
                self.user = Some(user);
                true
            }
            Err(e) => {
                tracing::warn!("Ignoring unreadable session file {}: {}", path.display(), e);
                false
            }
        }
    }

    pub async fn login(&mut self, email: &str, name: Option<&str>) -> Result<&User> {
        let email = email.trim();
        if email.is_empty() {
            return Err(ClientError::validation("Email is required"));
        }

        let req = LoginRequest {
            email: email.to_string(),
            name: name.map(str::trim).filter(|n| !n.is_empty()).map(str::to_string),
        };
        let user = self.directory.login(&req).await?;
        tracing::info!("Logged in as {}", user.email);

        self.user = Some(user);
        self.persist();
        self.current()
            .ok_or_else(|| ClientError::validation("Login did not produce a user"))
    }

    pub fn logout(&mut self) {
        if let Some(user) = self.user.take() {
            tracing::info!("Logged out {}", user.email);
        }
        if let Some(path) = &self.file {
            if path.exists() {
                if let Err(e) = std::fs::remove_file(path) {
                    tracing::warn!("Failed to remove session file {}: {}", path.display(), e);
                }
            }
        }
    }

    pub fn current(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn is_logged_in(&self) -> bool {
        self.user.is_some()
    }

    /// Whether the logged-in user has `name` in their collection
    pub fn is_query_saved(&self, name: &str) -> bool {
        self.user.as_ref().is_some_and(|u| u.has_saved(name))
    }

    /// Adds a pattern to the user's collection
    pub async fn add_to_collection(&mut self, name: &str) -> Result<()> {
        let user_id = self.require_user()?.user_id.clone();
        self.directory.add_to_collection(&user_id, name).await?;

        if let Some(user) = self.user.as_mut() {
            if !user.has_saved(name) {
                user.saved_queries.push(name.to_string());
            }
        }
        self.persist();
        Ok(())
    }

    /// Removes a pattern from the user's collection
    pub async fn remove_from_collection(&mut self, name: &str) -> Result<()> {
        let user_id = self.require_user()?.user_id.clone();
        self.directory.remove_from_collection(&user_id, name).await?;

        if let Some(user) = self.user.as_mut() {
            user.saved_queries.retain(|q| q != name);
        }
        self.persist();
        Ok(())
    }

    /// Patterns in the user's collection, as the backend knows them
    pub async fn collection(&self) -> Result<Vec<QueryPattern>> {
        let user = self.require_user()?;
        self.directory.user_queries(&user.user_id).await
    }

    fn require_user(&self) -> Result<&User> {
        self.user.as_ref().ok_or_else(|| {
            ClientError::validation("Please login to save queries to your collection")
        })
    }

    fn persist(&self) {
        let (Some(path), Some(user)) = (&self.file, &self.user) else {
            return;
        };
        if let Some(parent) = path.parent() {
            if let Err(e) = std::fs::create_dir_all(parent) {
                tracing::warn!("Failed to create {}: {}", parent.display(), e);
                return;
            }
        }

        let written = serde_json::to_string_pretty(user)
            .map_err(|e| e.to_string())
            .and_then(|json| std::fs::write(path, json).map_err(|e| e.to_string()));
        if let Err(e) = written {
            tracing::warn!("Failed to write session file {}: {}", path.display(), e);
        }
    }
}
