//! Natural-Query Session
//!
//! Translates free-text requests into pipelines, lets the user refine the
//! request, save the translated pipeline as a pattern or delete a pattern the
//! service saved on its own.
//!
//! ```text
//! Empty -> Translating -> Translated -> Refining -> Translating
//!                                    -> Saving   -> Saved | SaveFailed
//!                                    -> Deleting -> Deleted | DeleteFailed
//! ```

use scout_client::{ClientError, PatternStore, Result};
use scout_core::domain::result::{ConfidenceBand, NaturalQueryResult};
use scout_core::dto::natural::NaturalQueryRequest;
use scout_core::dto::pattern::{DEFAULT_RESULT_LIMIT, SavePattern};
use std::sync::Arc;

use crate::manual::PipelineSource;
use crate::notice::{NoticeLevel, Notices};
use crate::ticket::{Ticket, TicketIssuer};

/// Prompts offered to first-time users
pub const EXAMPLES: [&str; 5] = [
    "Show me all goals by Messi",
    "Find penalty kicks that were saved",
    "Show successful passes by Barcelona",
    "Find all shots in the first half",
    "Show me dribbles that led to goals",
];

pub const MOCK_MODE_ADVISORY: &str =
    "Running in mock mode (LLM not configured). Results may be limited.";

/// Tags pre-filled in the save dialog
pub const DEFAULT_SAVE_TAGS: &str = "natural-language";

const REFINED_NOTICE_TTL_MS: u64 = 3000;
const SAVE_DIALOG_CLOSE_MS: u64 = 2000;
const MAX_GENERATED_NAME: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NaturalPhase {
    Empty,
    Translating,
    Translated,
    Refining,
    /// A translation failed and there is no result to show
    Failed,
    Saving,
    Saved,
    SaveFailed,
    Deleting,
    Deleted,
    DeleteFailed,
}

/// What a translation request was sent for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Translation {
    Query,
    Refinement,
}

/// A translation request ready to be sent
#[derive(Debug, Clone)]
pub struct PendingTranslation {
    pub ticket: Ticket<Translation>,
    pub request: NaturalQueryRequest,
}

/// Fields of the "save as pattern" dialog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveDialog {
    pub open: bool,
    pub name: String,
    pub description: String,
    /// Comma-separated tag list as typed
    pub tags: String,
    pub error: Option<String>,
    pub success: Option<String>,
    close_at: Option<u64>,
}

impl Default for SaveDialog {
    fn default() -> Self {
        Self {
            open: false,
            name: String::new(),
            description: String::new(),
            tags: DEFAULT_SAVE_TAGS.to_string(),
            error: None,
            success: None,
            close_at: None,
        }
    }
}

pub struct NaturalQuerySession {
    store: Arc<dyn PatternStore>,
    user_query: String,
    original_query: String,
    result: Option<NaturalQueryResult>,
    phase: NaturalPhase,
    loading: bool,
    notices: Notices,
    refine_open: bool,
    refinement_hint: String,
    before_refine: Option<String>,
    save_dialog: SaveDialog,
    auto_execute: bool,
    match_id: Option<String>,
    limit: u32,
    translations: TicketIssuer,
}

impl NaturalQuerySession {
    pub fn new(store: Arc<dyn PatternStore>) -> Self {
        Self {
            store,
            user_query: String::new(),
            original_query: String::new(),
            result: None,
            phase: NaturalPhase::Empty,
            loading: false,
            notices: Notices::new(),
            refine_open: false,
            refinement_hint: String::new(),
            before_refine: None,
            save_dialog: SaveDialog::default(),
            auto_execute: true,
            match_id: None,
            limit: DEFAULT_RESULT_LIMIT,
            translations: TicketIssuer::new(),
        }
    }

    /// Whether translations also run the pipeline (default `true`)
    pub fn set_auto_execute(&mut self, auto_execute: bool) {
        self.auto_execute = auto_execute;
    }

    pub fn set_match(&mut self, match_id: Option<String>) {
        self.match_id = match_id.filter(|m| !m.trim().is_empty());
    }

    pub fn set_limit(&mut self, limit: u32) {
        self.limit = limit;
    }

    pub fn set_user_query(&mut self, text: impl Into<String>) {
        self.user_query = text.into();
    }

    pub fn set_refinement_hint(&mut self, hint: impl Into<String>) {
        self.refinement_hint = hint.into();
    }

    /// Moves the session clock forward
    ///
    /// Expired notices disappear and a save dialog scheduled to close does.
    pub fn advance(&mut self, elapsed_ms: u64) {
        self.notices.advance(elapsed_ms);
        if self
            .save_dialog
            .close_at
            .is_some_and(|at| at <= self.notices.now())
        {
            self.close_save_dialog();
        }
    }

    // =============================================================================
    // Translation
    // =============================================================================

    /// Prepares a translation of the current text
    ///
    /// Blank text fails here without sending anything.
    pub fn begin_execute_query(&mut self) -> Result<PendingTranslation> {
        if self.user_query.trim().is_empty() {
            return Err(self.reject(ClientError::validation("Please enter a query")));
        }

        self.original_query = self.user_query.clone();
        self.result = None;
        Ok(self.dispatch(
            Translation::Query,
            self.user_query.clone(),
            self.auto_execute,
        ))
    }

    /// Prepares a refinement of the last translated request
    ///
    /// Needs either a hint or an edited request text.
    pub fn begin_refine(&mut self) -> Result<PendingTranslation> {
        let hint = self.refinement_hint.trim();
        if hint.is_empty() && self.user_query == self.original_query {
            return Err(self.reject(ClientError::validation(
                "Please modify the query or add a hint",
            )));
        }

        let text = if hint.is_empty() {
            self.user_query.clone()
        } else {
            format!("{}. Additional context: {}", self.user_query, hint)
        };
        self.original_query = self.user_query.clone();
        Ok(self.dispatch(Translation::Refinement, text, true))
    }

    fn dispatch(&mut self, kind: Translation, text: String, execute: bool) -> PendingTranslation {
        self.notices.clear();
        self.loading = true;
        self.phase = NaturalPhase::Translating;

        let mut request = NaturalQueryRequest::new(text, execute);
        request.match_id = self.match_id.clone();
        request.limit = self.limit;
        PendingTranslation {
            ticket: self.translations.issue(kind),
            request,
        }
    }

    /// Applies a translation response
    ///
    /// Returns `Ok(false)` if a newer request superseded this one. A failed
    /// refinement keeps the result it was refining.
    pub fn finish_translate(
        &mut self,
        ticket: Ticket<Translation>,
        outcome: Result<NaturalQueryResult>,
    ) -> Result<bool> {
        if !self.translations.is_current(&ticket) {
            tracing::debug!("Discarding stale translation");
            return Ok(false);
        }
        self.loading = false;

        match outcome {
            Ok(result) => {
                tracing::info!(
                    "Translated with confidence {:.2} ({} stages)",
                    result.confidence(),
                    result.pipeline.len()
                );
                match ticket.key() {
                    Translation::Query if result.mock => {
                        self.notices.warning(MOCK_MODE_ADVISORY);
                    }
                    Translation::Query => {}
                    Translation::Refinement => {
                        self.refine_open = false;
                        self.before_refine = None;
                        self.notices.set_transient(
                            NoticeLevel::Success,
                            "Query refined successfully!",
                            REFINED_NOTICE_TTL_MS,
                        );
                    }
                }
                self.result = Some(result);
                self.phase = NaturalPhase::Translated;
                Ok(true)
            }
            Err(e) => {
                self.notices.error(e.envelope().message);
                self.phase = match (ticket.key(), &self.result) {
                    (Translation::Refinement, Some(_)) => NaturalPhase::Refining,
                    _ => NaturalPhase::Failed,
                };
                Err(e)
            }
        }
    }

    /// Translates the current request text
    pub async fn execute_query(&mut self) -> Result<&NaturalQueryResult> {
        let pending = self.begin_execute_query()?;
        self.send(pending).await
    }

    /// Re-translates with the edited text and/or a hint
    pub async fn refine_query(&mut self) -> Result<&NaturalQueryResult> {
        let pending = self.begin_refine()?;
        self.send(pending).await
    }

    async fn send(&mut self, pending: PendingTranslation) -> Result<&NaturalQueryResult> {
        let outcome = self.store.natural_query(&pending.request).await;
        self.finish_translate(pending.ticket, outcome)?;
        self.result
            .as_ref()
            .ok_or_else(|| ClientError::validation("No translation available"))
    }

    /// Runs one of the built-in example prompts
    pub async fn use_example(&mut self, example: &str) -> Result<&NaturalQueryResult> {
        self.user_query = example.to_string();
        self.execute_query().await
    }

    /// Loads a similar pattern and translates its description
    pub async fn use_similar_query(&mut self, name: &str) -> Result<&NaturalQueryResult> {
        let pattern = match self.store.get_pattern(name).await {
            Ok(pattern) => pattern,
            Err(e) => {
                self.notices.error("Failed to load query");
                return Err(e);
            }
        };

        self.user_query = if pattern.description.trim().is_empty() {
            pattern.name
        } else {
            pattern.description
        };
        self.execute_query().await
    }

    // =============================================================================
    // Refinement
    // =============================================================================

    /// Opens or closes the refine form
    ///
    /// Opening clears the hint and puts back the last translated text.
    /// Closing without editing puts back whatever was there before opening.
    pub fn toggle_refine_form(&mut self) {
        if self.refine_open {
            self.refine_open = false;
            if let Some(previous) = self.before_refine.take() {
                if self.user_query == self.original_query {
                    self.user_query = previous;
                }
            }
            if self.phase == NaturalPhase::Refining {
                self.phase = if self.result.is_some() {
                    NaturalPhase::Translated
                } else {
                    NaturalPhase::Empty
                };
            }
        } else {
            self.refine_open = true;
            self.refinement_hint.clear();
            self.before_refine = Some(std::mem::replace(
                &mut self.user_query,
                self.original_query.clone(),
            ));
            self.phase = NaturalPhase::Refining;
        }
    }

    // =============================================================================
    // Saving and deleting
    // =============================================================================

    /// Opens the save dialog pre-filled from the current result
    ///
    /// Returns `false` when there is nothing to save.
    pub fn open_save_dialog(&mut self) -> bool {
        let Some(result) = &self.result else {
            return false;
        };

        let description = if result.explanation.is_empty() {
            self.user_query.clone()
        } else {
            result.explanation.clone()
        };
        self.save_dialog = SaveDialog {
            open: true,
            name: generate_pattern_name(&self.user_query),
            description,
            ..SaveDialog::default()
        };
        true
    }

    pub fn close_save_dialog(&mut self) {
        self.save_dialog = SaveDialog::default();
    }

    pub fn set_save_name(&mut self, name: impl Into<String>) {
        self.save_dialog.name = name.into();
    }

    pub fn set_save_description(&mut self, description: impl Into<String>) {
        self.save_dialog.description = description.into();
    }

    pub fn set_save_tags(&mut self, tags: impl Into<String>) {
        self.save_dialog.tags = tags.into();
    }

    /// Saves the translated pipeline as a new pattern
    ///
    /// On success the dialog closes itself two seconds later (session time).
    pub async fn save_query(&mut self) -> Result<String> {
        let Some(result) = &self.result else {
            return Err(ClientError::validation("There is no translated query to save"));
        };

        let name = self.save_dialog.name.trim().to_string();
        if name.is_empty() {
            let err = ClientError::validation("Query name is required");
            self.save_dialog.error = Some(err.envelope().message);
            return Err(err);
        }

        let description = if self.save_dialog.description.trim().is_empty() {
            self.user_query.clone()
        } else {
            self.save_dialog.description.clone()
        };
        let req = SavePattern {
            name,
            description,
            pipeline: result.pipeline.clone(),
            tags: parse_tags(&self.save_dialog.tags),
        };

        self.save_dialog.error = None;
        self.save_dialog.success = None;
        self.loading = true;
        self.phase = NaturalPhase::Saving;
        let outcome = self.store.save_pattern(&req).await;
        self.loading = false;

        match outcome {
            Ok(saved) => {
                tracing::info!("Saved natural query as {}", saved.name);
                self.save_dialog.success =
                    Some(format!("Query \"{}\" saved successfully!", saved.name));
                self.save_dialog.close_at =
                    Some(self.notices.now().saturating_add(SAVE_DIALOG_CLOSE_MS));
                if let Some(result) = self.result.as_mut() {
                    result.saved_as = Some(saved.name.clone());
                }
                self.phase = NaturalPhase::Saved;
                Ok(saved.name)
            }
            Err(e) => {
                self.save_dialog.error = Some(e.envelope().message);
                self.phase = NaturalPhase::SaveFailed;
                Err(e)
            }
        }
    }

    /// Deletes the pattern the current result was saved as
    ///
    /// Returns `Ok(false)` if `confirm` declines. Success resets the session.
    pub async fn delete_query(&mut self, confirm: impl FnOnce(&str) -> bool) -> Result<bool> {
        let Some(name) = self.result.as_ref().and_then(|r| r.saved_as.clone()) else {
            return Err(ClientError::validation("The current query has not been saved"));
        };
        if !confirm(&name) {
            return Ok(false);
        }

        self.loading = true;
        self.phase = NaturalPhase::Deleting;
        let outcome = self.store.delete_pattern(&name).await;
        self.loading = false;

        match outcome {
            Ok(()) => {
                tracing::info!("Deleted pattern {}", name);
                self.translations.invalidate();
                self.result = None;
                self.user_query.clear();
                self.original_query.clear();
                self.refinement_hint.clear();
                self.refine_open = false;
                self.before_refine = None;
                self.close_save_dialog();
                self.notices.set(
                    NoticeLevel::Success,
                    format!("Query \"{}\" deleted successfully!", name),
                );
                self.phase = NaturalPhase::Deleted;
                Ok(true)
            }
            Err(e) => {
                self.notices.error(e.envelope().message);
                self.phase = NaturalPhase::DeleteFailed;
                Err(e)
            }
        }
    }

    fn reject(&mut self, err: ClientError) -> ClientError {
        self.notices.error(err.envelope().message);
        err
    }

    // =============================================================================
    // Accessors
    // =============================================================================

    pub fn user_query(&self) -> &str {
        &self.user_query
    }

    pub fn original_query(&self) -> &str {
        &self.original_query
    }

    pub fn result(&self) -> Option<&NaturalQueryResult> {
        self.result.as_ref()
    }

    pub fn phase(&self) -> NaturalPhase {
        self.phase
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn notices(&self) -> &Notices {
        &self.notices
    }

    pub fn is_refine_open(&self) -> bool {
        self.refine_open
    }

    pub fn refinement_hint(&self) -> &str {
        &self.refinement_hint
    }

    pub fn save_dialog(&self) -> &SaveDialog {
        &self.save_dialog
    }

    pub fn confidence_band(&self) -> Option<ConfidenceBand> {
        self.result.as_ref().map(NaturalQueryResult::confidence_band)
    }

    /// Current result as a starting point for manual editing
    pub fn manual_source(&self) -> Option<PipelineSource> {
        self.result.as_ref().map(|r| PipelineSource {
            pipeline: r.pipeline.clone(),
            description: if r.explanation.is_empty() {
                self.user_query.clone()
            } else {
                r.explanation.clone()
            },
            based_on: r.saved_as.clone(),
        })
    }
}

/// Pattern name derived from request text
///
/// Lowercased, anything but ASCII letters, digits and whitespace dropped,
/// whitespace runs turned into `_`, at most 50 characters.
pub fn generate_pattern_name(text: &str) -> String {
    let mut name = String::new();
    let mut in_space = false;
    for c in text.to_lowercase().chars() {
        if c.is_whitespace() {
            if !in_space {
                name.push('_');
            }
            in_space = true;
        } else if c.is_ascii_lowercase() || c.is_ascii_digit() {
            name.push(c);
            in_space = false;
        }
    }
    name.chars().take(MAX_GENERATED_NAME).collect()
}

/// Splits a comma-separated tag list, dropping blanks
pub fn parse_tags(text: &str) -> Vec<String> {
    text.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}
