//! Execution Session
//!
//! Catalog browsing: list patterns, select one, bind its parameters and run
//! it against the backend.
//!
//! ```text
//! Idle -> Selecting -> PatternSelected -> ParametersBound -> Executing -> Executed
//!                                                                     \-> Failed
//! ```

use scout_client::{ClientError, PatternStore, Result};
use scout_core::domain::pattern::{ParameterBinding, QueryPattern};
use scout_core::domain::result::ExecutionResult;
use scout_core::dto::pattern::{DEFAULT_RESULT_LIMIT, ExecuteOptions};
use serde_json::Value as JsonValue;
use std::sync::Arc;

use crate::projector;
use crate::ticket::{Ticket, TicketIssuer};

/// Where the session stands in the select/bind/execute cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionPhase {
    Idle,
    Selecting,
    PatternSelected,
    ParametersBound,
    Executing,
    Executed,
    Failed,
}

/// An execute request ready to be sent
#[derive(Debug, Clone)]
pub struct PendingExecution {
    pub ticket: Ticket<String>,
    pub options: ExecuteOptions,
}

/// Catalog browsing and pattern execution state
pub struct ExecutionSession {
    store: Arc<dyn PatternStore>,
    patterns: Vec<QueryPattern>,
    tag: Option<String>,
    matches: Vec<String>,
    stats: Option<JsonValue>,
    selected: Option<QueryPattern>,
    binding: ParameterBinding,
    selected_match: Option<String>,
    result: Option<ExecutionResult>,
    phase: ExecutionPhase,
    loading: bool,
    error: Option<String>,
    limit: u32,
    selections: TicketIssuer,
    pending_select: Option<String>,
    executions: TicketIssuer,
}

impl ExecutionSession {
    pub fn new(store: Arc<dyn PatternStore>) -> Self {
        Self {
            store,
            patterns: Vec::new(),
            tag: None,
            matches: Vec::new(),
            stats: None,
            selected: None,
            binding: ParameterBinding::default(),
            selected_match: None,
            result: None,
            phase: ExecutionPhase::Idle,
            loading: false,
            error: None,
            limit: DEFAULT_RESULT_LIMIT,
            selections: TicketIssuer::new(),
            pending_select: None,
            executions: TicketIssuer::new(),
        }
    }

    /// Overrides the row cap sent with every execution
    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }

    // =============================================================================
    // Catalog and reference data
    // =============================================================================

    /// Loads the catalog, optionally restricted to one tag
    pub async fn load_queries(&mut self, tag: Option<&str>) -> Result<()> {
        self.tag = tag.map(str::to_string);
        self.loading = true;
        let outcome = self.store.list_patterns(tag).await;
        self.loading = false;

        match outcome {
            Ok(patterns) => {
                tracing::debug!("Loaded {} patterns", patterns.len());
                self.patterns = patterns;
                Ok(())
            }
            Err(e) => {
                self.error = Some(format!("Failed to load queries: {}", e.envelope().message));
                Err(e)
            }
        }
    }

    /// Loads the match list; failures are logged and leave the list as is
    pub async fn load_matches(&mut self) {
        match self.store.list_matches().await {
            Ok(matches) => self.matches = matches,
            Err(e) => tracing::warn!("Failed to load matches: {}", e),
        }
    }

    /// Loads catalog statistics; failures are logged and leave stats as is
    pub async fn load_stats(&mut self) {
        match self.store.get_stats().await {
            Ok(stats) => self.stats = Some(stats),
            Err(e) => tracing::warn!("Failed to load stats: {}", e),
        }
    }

    // =============================================================================
    // Selection
    // =============================================================================

    /// Starts selecting `name`; the previous result is cleared immediately
    pub fn begin_select(&mut self, name: &str) -> Ticket<String> {
        self.result = None;
        self.error = None;
        self.loading = true;
        self.phase = ExecutionPhase::Selecting;
        // Executions of the previous pattern must not land on the new one
        self.executions.invalidate();
        self.pending_select = Some(name.to_string());
        self.selections.issue(name.to_string())
    }

    /// Applies a pattern detail response
    ///
    /// Returns `Ok(false)` if a newer selection superseded this one. On
    /// failure the previous selection stays in place.
    pub fn finish_select(
        &mut self,
        ticket: Ticket<String>,
        outcome: Result<QueryPattern>,
    ) -> Result<bool> {
        if !self.selections.is_current(&ticket) {
            tracing::debug!("Discarding stale detail for {}", ticket.key());
            return Ok(false);
        }
        self.loading = false;
        self.pending_select = None;

        let pattern = match outcome.and_then(|p| {
            p.validate_parameters()?;
            Ok(p)
        }) {
            Ok(pattern) => pattern,
            Err(e) => {
                self.error = Some(format!(
                    "Failed to load query details: {}",
                    e.envelope().message
                ));
                self.phase = self.settled_phase();
                return Err(e);
            }
        };

        self.binding = ParameterBinding::for_pattern(&pattern);
        self.selected = Some(pattern);
        self.phase = ExecutionPhase::PatternSelected;
        Ok(true)
    }

    /// Fetches full detail for `name` and makes it the selection
    pub async fn select(&mut self, name: &str) -> Result<bool> {
        let ticket = self.begin_select(name);
        let outcome = self.store.get_pattern(name).await;
        self.finish_select(ticket, outcome)
    }

    /// Binds a value to one of the selected pattern's parameters
    pub fn set_parameter(&mut self, name: &str, value: impl Into<String>) -> Result<()> {
        if self.selected.is_none() {
            return Err(ClientError::validation("No query selected"));
        }
        self.binding.set(name, value)?;
        if matches!(
            self.phase,
            ExecutionPhase::PatternSelected | ExecutionPhase::Executed | ExecutionPhase::Failed
        ) {
            self.phase = ExecutionPhase::ParametersBound;
        }
        Ok(())
    }

    /// Restricts executions to one match, or clears the restriction
    pub fn select_match(&mut self, match_id: Option<String>) {
        self.selected_match = match_id.filter(|m| !m.trim().is_empty());
    }

    // =============================================================================
    // Execution
    // =============================================================================

    /// Prepares an execute request for the selection
    ///
    /// Returns `Ok(None)` when nothing is selected. Required parameters left
    /// blank fail here, before anything is sent.
    pub fn begin_execute(&mut self) -> Result<Option<PendingExecution>> {
        let Some(pattern) = &self.selected else {
            return Ok(None);
        };

        if let Err(e) = self.binding.check_required(pattern) {
            let err = ClientError::from(e);
            self.error = Some(err.envelope().message);
            return Err(err);
        }

        let options = ExecuteOptions {
            match_id: self.selected_match.clone(),
            parameters: (!pattern.parameters.is_empty()).then(|| self.binding.to_json()),
            limit: self.limit,
        };
        let ticket = self.executions.issue(pattern.name.clone());

        self.error = None;
        self.loading = true;
        self.phase = ExecutionPhase::Executing;
        Ok(Some(PendingExecution { ticket, options }))
    }

    /// Applies an execute response
    ///
    /// Returns `Ok(false)` if the response is stale. On failure the previous
    /// result is kept and the error message is surfaced.
    pub fn finish_execute(
        &mut self,
        ticket: Ticket<String>,
        outcome: Result<ExecutionResult>,
    ) -> Result<bool> {
        let same_pattern = self
            .selected
            .as_ref()
            .is_some_and(|p| &p.name == ticket.key());
        if !self.executions.is_current(&ticket) || !same_pattern {
            tracing::debug!("Discarding stale result for {}", ticket.key());
            return Ok(false);
        }
        self.loading = false;

        match outcome {
            Ok(result) => {
                tracing::info!("Executed {}: {} rows", ticket.key(), result.row_count());
                self.result = Some(result);
                self.phase = ExecutionPhase::Executed;
                Ok(true)
            }
            Err(e) => {
                self.error = Some(format!("Failed to execute query: {}", e.envelope().message));
                self.phase = ExecutionPhase::Failed;
                Err(e)
            }
        }
    }

    /// Runs the selected pattern; a no-op returning `Ok(false)` without one
    pub async fn execute(&mut self) -> Result<bool> {
        let Some(pending) = self.begin_execute()? else {
            return Ok(false);
        };
        let outcome = self
            .store
            .execute_pattern(pending.ticket.key(), &pending.options)
            .await;
        self.finish_execute(pending.ticket, outcome)
    }

    // =============================================================================
    // Deletion
    // =============================================================================

    /// Deletes a pattern after `confirm` approves it
    ///
    /// Returns `Ok(false)` if confirmation was declined. Deleting the
    /// selected pattern clears the selection and its result together; the
    /// catalog and stats are reloaded afterwards. A failed reload leaves
    /// `error` set but does not fail the deletion.
    pub async fn delete_pattern(
        &mut self,
        name: &str,
        confirm: impl FnOnce(&str) -> bool,
    ) -> Result<bool> {
        if !confirm(name) {
            return Ok(false);
        }

        self.loading = true;
        let outcome = self.store.delete_pattern(name).await;
        self.loading = false;

        if let Err(e) = outcome {
            self.error = Some(e.envelope().message);
            return Err(e);
        }
        tracing::info!("Deleted pattern {}", name);

        // A detail fetch still in flight for the deleted pattern must not land
        if self.pending_select.as_deref() == Some(name) {
            self.pending_select = None;
            self.selections.invalidate();
            self.loading = false;
            self.phase = self.settled_phase();
        }
        if self.selected.as_ref().is_some_and(|p| p.name == name) {
            self.selected = None;
            self.result = None;
            self.binding = ParameterBinding::default();
            self.selections.invalidate();
            self.executions.invalidate();
            self.phase = ExecutionPhase::Idle;
        }

        let tag = self.tag.clone();
        if let Err(e) = self.load_queries(tag.as_deref()).await {
            tracing::warn!("Deleted {} but reloading the catalog failed: {}", name, e);
        }
        self.load_stats().await;
        Ok(true)
    }

    // =============================================================================
    // Accessors
    // =============================================================================

    pub fn patterns(&self) -> &[QueryPattern] {
        &self.patterns
    }

    pub fn matches(&self) -> &[String] {
        &self.matches
    }

    pub fn stats(&self) -> Option<&JsonValue> {
        self.stats.as_ref()
    }

    pub fn selected(&self) -> Option<&QueryPattern> {
        self.selected.as_ref()
    }

    pub fn binding(&self) -> &ParameterBinding {
        &self.binding
    }

    pub fn selected_match(&self) -> Option<&str> {
        self.selected_match.as_deref()
    }

    pub fn result(&self) -> Option<&ExecutionResult> {
        self.result.as_ref()
    }

    pub fn phase(&self) -> ExecutionPhase {
        self.phase
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Table columns for the current result
    pub fn columns(&self) -> Vec<String> {
        self.result
            .as_ref()
            .map(|r| projector::columns(&r.results))
            .unwrap_or_default()
    }

    fn settled_phase(&self) -> ExecutionPhase {
        match &self.selected {
            None => ExecutionPhase::Idle,
            Some(_) if self.binding.iter().any(|(_, v)| !v.is_empty()) => {
                ExecutionPhase::ParametersBound
            }
            Some(_) => ExecutionPhase::PatternSelected,
        }
    }
}
