//! Manual Pipeline Session
//!
//! Hand-editing a pipeline as JSON text, test-running it and saving it as a
//! new pattern. The draft can be pre-filled from a translated natural query.

use scout_client::{ClientError, PatternStore, Result};
use scout_core::dto::pattern::{ManualPatternRequest, ManualPatternResponse};
use scout_core::pipeline::{parse_pipeline, pretty_pipeline};
use serde_json::Value as JsonValue;
use std::sync::Arc;

use crate::notice::{NoticeLevel, Notices};

/// Description sent with a test run when the draft has none
pub const DEFAULT_TEST_DESCRIPTION: &str = "Manual query";

/// Tags attached to manually authored patterns
pub const MANUAL_TAGS: [&str; 2] = ["manual", "user-created"];

/// A pipeline to start a draft from
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PipelineSource {
    pub pipeline: Vec<JsonValue>,
    pub description: String,
    /// Name of the saved pattern the pipeline came from
    pub based_on: Option<String>,
}

/// The text being edited
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ManualDraft {
    pub pipeline: String,
    pub description: String,
    pub based_on: Option<String>,
}

impl ManualDraft {
    fn from_source(source: &PipelineSource) -> Self {
        Self {
            pipeline: pretty_pipeline(&source.pipeline),
            description: source.description.clone(),
            based_on: source.based_on.clone(),
        }
    }

    fn has_pipeline(&self) -> bool {
        !self.pipeline.trim().is_empty()
    }

    fn based_on(&self) -> Option<String> {
        self.based_on.clone().filter(|b| !b.trim().is_empty())
    }
}

pub struct ManualPipelineSession {
    store: Arc<dyn PatternStore>,
    active: bool,
    draft: ManualDraft,
    test_results: Option<ManualPatternResponse>,
    notices: Notices,
    loading: bool,
}

impl ManualPipelineSession {
    pub fn new(store: Arc<dyn PatternStore>) -> Self {
        Self {
            store,
            active: false,
            draft: ManualDraft::default(),
            test_results: None,
            notices: Notices::new(),
            loading: false,
        }
    }

    /// Enters manual mode, or leaves it if already active
    pub fn toggle(&mut self, source: Option<&PipelineSource>) {
        if self.active {
            self.exit();
        } else {
            self.enter(source);
        }
    }

    /// Enters manual mode, pre-filled from `source` or blank
    pub fn enter(&mut self, source: Option<&PipelineSource>) {
        self.active = true;
        self.draft = source.map(ManualDraft::from_source).unwrap_or_default();
        self.notices.clear();
        self.test_results = None;
    }

    pub fn exit(&mut self) {
        self.active = false;
        self.notices.clear();
        self.test_results = None;
    }

    /// Replaces the draft with `source`
    pub fn copy_current_pipeline(&mut self, source: &PipelineSource) {
        self.draft = ManualDraft::from_source(source);
    }

    pub fn set_pipeline_text(&mut self, text: impl Into<String>) {
        self.draft.pipeline = text.into();
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.draft.description = description.into();
    }

    pub fn set_based_on(&mut self, based_on: Option<String>) {
        self.draft.based_on = based_on;
    }

    /// Validates and test-runs the draft without saving it
    ///
    /// Backend validation warnings are shown as a warning notice; the
    /// returned response still carries the rows.
    pub async fn test_manual_pipeline(&mut self) -> Result<&ManualPatternResponse> {
        let pipeline = self.checked_pipeline()?;

        self.notices.clear();
        self.test_results = None;
        let description = if self.draft.description.trim().is_empty() {
            DEFAULT_TEST_DESCRIPTION.to_string()
        } else {
            self.draft.description.clone()
        };
        let req = ManualPatternRequest {
            description,
            pipeline,
            execute: Some(true),
            based_on: self.draft.based_on(),
            ..Default::default()
        };

        self.loading = true;
        let outcome = self.store.save_manual(&req).await;
        self.loading = false;

        match outcome {
            Ok(response) => {
                if let Some(warnings) = response.combined_warnings() {
                    self.notices.warning(format!("Warning: {}", warnings));
                }
                Ok(&*self.test_results.insert(response))
            }
            Err(e) => {
                self.notices.error(e.envelope().message);
                Err(e)
            }
        }
    }

    /// Saves the draft as a new pattern and leaves manual mode
    ///
    /// Returns the name the backend stored it under.
    pub async fn save_manual_query(&mut self) -> Result<String> {
        if self.draft.has_pipeline() && self.draft.description.trim().is_empty() {
            return Err(self.reject(ClientError::validation("Description is required")));
        }
        let pipeline = self.checked_pipeline()?;

        self.notices.clear();
        let req = ManualPatternRequest {
            description: self.draft.description.clone(),
            pipeline,
            execute: Some(false),
            based_on: self.draft.based_on(),
            tags: Some(MANUAL_TAGS.iter().map(|t| t.to_string()).collect()),
            name: None,
        };

        self.loading = true;
        let outcome = self.store.save_manual(&req).await;
        self.loading = false;

        match outcome {
            Ok(response) => {
                tracing::info!("Saved manual pattern {}", response.name);
                self.draft = ManualDraft::default();
                self.exit();
                self.notices.set(
                    NoticeLevel::Success,
                    format!("Query saved as \"{}\"", response.name),
                );
                Ok(response.name)
            }
            Err(e) => {
                self.notices.error(e.envelope().message);
                Err(e)
            }
        }
    }

    /// Local checks shared by test and save; failures never reach the backend
    fn checked_pipeline(&mut self) -> Result<Vec<JsonValue>> {
        if !self.draft.has_pipeline() {
            return Err(self.reject(ClientError::validation("Pipeline is required")));
        }
        parse_pipeline(&self.draft.pipeline).map_err(|e| self.reject(e.into()))
    }

    fn reject(&mut self, err: ClientError) -> ClientError {
        self.notices.error(err.envelope().message);
        err
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn draft(&self) -> &ManualDraft {
        &self.draft
    }

    pub fn test_results(&self) -> Option<&ManualPatternResponse> {
        self.test_results.as_ref()
    }

    pub fn notices(&self) -> &Notices {
        &self.notices
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fake::FakeStore;
    use scout_core::error::ErrorKind;
    use scout_core::pipeline::PipelineFormatError;
    use serde_json::json;

    fn source() -> PipelineSource {
        PipelineSource {
            pipeline: vec![
                json!({"$match": {"type.name": "Shot", "player.name": "Lionel Messi"}}),
                json!({"$limit": 50}),
            ],
            description: "Shots by Messi".to_string(),
            based_on: Some("messi_shots_nl".to_string()),
        }
    }

    fn session(store: &Arc<FakeStore>) -> ManualPipelineSession {
        ManualPipelineSession::new(store.clone())
    }

    #[tokio::test]
    async fn test_json_string_is_not_an_array() {
        let store = Arc::new(FakeStore::default());
        let mut s = session(&store);
        s.enter(None);
        s.set_pipeline_text(r#""not an array""#);

        let err = s.test_manual_pipeline().await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::PipelineFormat);
        assert!(matches!(
            err,
            ClientError::PipelineFormat(PipelineFormatError::NotArray("string"))
        ));
        assert!(s.test_results().is_none());
        assert_eq!(store.call_count(), 0);
    }

    #[tokio::test]
    async fn test_invalid_json_names_the_problem() {
        let store = Arc::new(FakeStore::default());
        let mut s = session(&store);
        s.enter(None);
        s.set_pipeline_text("not an array");

        let err = s.test_manual_pipeline().await.unwrap_err();
        assert!(matches!(
            err,
            ClientError::PipelineFormat(PipelineFormatError::Syntax(_))
        ));
        assert!(s.notices().error_text().unwrap().starts_with("Invalid JSON: "));
        assert!(s.test_results().is_none());
        assert_eq!(store.call_count(), 0);
    }

    #[tokio::test]
    async fn test_empty_pipeline_is_required() {
        let store = Arc::new(FakeStore::default());
        let mut s = session(&store);
        s.enter(None);
        s.set_pipeline_text("   \n");

        let err = s.test_manual_pipeline().await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(s.notices().error_text(), Some("Pipeline is required"));
    }

    #[tokio::test]
    async fn test_copied_pipeline_round_trips_to_backend() {
        let store = Arc::new(FakeStore::default());
        let mut s = session(&store);
        s.enter(None);
        s.copy_current_pipeline(&source());

        s.test_manual_pipeline().await.unwrap();

        let requests = store.manual_requests.lock().unwrap();
        assert_eq!(requests[0].pipeline, source().pipeline);
        assert_eq!(requests[0].execute, Some(true));
        assert_eq!(requests[0].based_on.as_deref(), Some("messi_shots_nl"));
        assert_eq!(requests[0].description, "Shots by Messi");
    }

    #[tokio::test]
    async fn test_description_defaults_for_test_run() {
        let store = Arc::new(FakeStore::default());
        let mut s = session(&store);
        s.enter(None);
        s.set_pipeline_text(r#"[{"$match": {}}]"#);

        let response = s.test_manual_pipeline().await.unwrap();
        assert_eq!(response.row_count(), Some(1));

        let requests = store.manual_requests.lock().unwrap();
        assert_eq!(requests[0].description, DEFAULT_TEST_DESCRIPTION);
        assert_eq!(requests[0].based_on, None);
        assert_eq!(requests[0].tags, None);
    }

    #[tokio::test]
    async fn test_warnings_do_not_hide_results() {
        let store = Arc::new(FakeStore::default());
        store
            .manual_warnings
            .lock()
            .unwrap()
            .extend(["No $limit stage".to_string(), "Unindexed field".to_string()]);
        let mut s = session(&store);
        s.enter(Some(&source()));

        s.test_manual_pipeline().await.unwrap();

        let notice = s.notices().current().unwrap();
        assert_eq!(notice.level, NoticeLevel::Warning);
        assert_eq!(notice.text, "Warning: No $limit stage; Unindexed field");
        assert!(s.test_results().is_some());
    }

    #[tokio::test]
    async fn test_description_required_only_for_save() {
        let store = Arc::new(FakeStore::default());
        let mut s = session(&store);
        s.enter(None);
        s.set_pipeline_text(r#"[{"$limit": 5}]"#);

        assert!(s.test_manual_pipeline().await.is_ok());

        let err = s.save_manual_query().await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(s.notices().error_text(), Some("Description is required"));
        assert_eq!(store.call_count(), 1);
    }

    #[tokio::test]
    async fn test_save_resets_draft_and_exits() {
        let store = Arc::new(FakeStore::default());
        let mut s = session(&store);
        s.enter(Some(&source()));

        let name = s.save_manual_query().await.unwrap();

        assert!(!s.is_active());
        assert_eq!(s.draft(), &ManualDraft::default());
        let requests = store.manual_requests.lock().unwrap();
        assert_eq!(requests[0].execute, Some(false));
        assert_eq!(
            requests[0].tags.as_deref(),
            Some(&["manual".to_string(), "user-created".to_string()][..])
        );
        assert!(store.patterns.lock().unwrap().contains_key(&name));
    }

    #[tokio::test]
    async fn test_failed_save_keeps_draft() {
        let store = Arc::new(FakeStore::default());
        store.fail_next(ClientError::Validation("Pipeline uses $out".to_string()));
        let mut s = session(&store);
        s.enter(Some(&source()));

        assert!(s.save_manual_query().await.is_err());
        assert!(s.is_active());
        assert_eq!(s.draft().description, "Shots by Messi");
        assert_eq!(s.notices().error_text(), Some("Pipeline uses $out"));
    }

    #[test]
    fn test_enter_prefills_and_toggle_clears() {
        let store = Arc::new(FakeStore::default());
        let mut s = session(&store);

        s.toggle(Some(&source()));
        assert!(s.is_active());
        assert!(s.draft().pipeline.starts_with("[\n  {"));
        assert_eq!(s.draft().based_on.as_deref(), Some("messi_shots_nl"));

        s.toggle(None);
        assert!(!s.is_active());

        s.toggle(None);
        assert_eq!(s.draft(), &ManualDraft::default());
    }
}
