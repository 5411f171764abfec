//! In-memory pattern store for session tests

use async_trait::async_trait;
use scout_client::{ClientError, PatternStore, Result, UserDirectory};
use scout_core::domain::pattern::{ParameterSpec, QueryPattern};
use scout_core::domain::result::{ExecutionResult, NaturalQueryResult};
use scout_core::domain::user::User;
use scout_core::dto::natural::NaturalQueryRequest;
use scout_core::dto::pattern::{
    ExecuteOptions, ManualPatternRequest, ManualPatternResponse, SavePattern, SavedPattern,
};
use scout_core::dto::user::LoginRequest;
use serde_json::{Value as JsonValue, json};
use std::collections::{BTreeMap, VecDeque};
use std::sync::Mutex;

/// Records every call and answers from memory
pub(crate) struct FakeStore {
    pub patterns: Mutex<BTreeMap<String, QueryPattern>>,
    pub calls: Mutex<Vec<String>>,
    pub failures: Mutex<VecDeque<ClientError>>,
    pub targeted_failures: Mutex<Vec<(String, ClientError)>>,
    pub rows_available: usize,
    pub execute_requests: Mutex<Vec<(String, ExecuteOptions)>>,
    pub natural_requests: Mutex<Vec<NaturalQueryRequest>>,
    pub natural_responses: Mutex<VecDeque<NaturalQueryResult>>,
    pub manual_requests: Mutex<Vec<ManualPatternRequest>>,
    pub manual_warnings: Mutex<Vec<String>>,
    pub collection: Mutex<Vec<String>>,
}

impl Default for FakeStore {
    fn default() -> Self {
        Self {
            patterns: Mutex::default(),
            calls: Mutex::default(),
            failures: Mutex::default(),
            targeted_failures: Mutex::default(),
            rows_available: 120,
            execute_requests: Mutex::default(),
            natural_requests: Mutex::default(),
            natural_responses: Mutex::default(),
            manual_requests: Mutex::default(),
            manual_warnings: Mutex::default(),
            collection: Mutex::default(),
        }
    }
}

impl FakeStore {
    pub fn with_patterns(patterns: Vec<QueryPattern>) -> Self {
        let store = Self::default();
        {
            let mut map = store.patterns.lock().unwrap();
            for p in patterns {
                map.insert(p.name.clone(), p);
            }
        }
        store
    }

    /// Makes the next call fail with `err`
    pub fn fail_next(&self, err: ClientError) {
        self.failures.lock().unwrap().push_back(err);
    }

    /// Makes the next call recorded as `call` fail with `err`
    pub fn fail_call(&self, call: &str, err: ClientError) {
        self.targeted_failures
            .lock()
            .unwrap()
            .push((call.to_string(), err));
    }

    pub fn queue_natural(&self, result: NaturalQueryResult) {
        self.natural_responses.lock().unwrap().push_back(result);
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: String) -> Result<()> {
        {
            let mut targeted = self.targeted_failures.lock().unwrap();
            if let Some(i) = targeted.iter().position(|(c, _)| *c == call) {
                self.calls.lock().unwrap().push(call);
                return Err(targeted.remove(i).1);
            }
        }
        self.calls.lock().unwrap().push(call);
        match self.failures.lock().unwrap().pop_front() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

/// Pattern with the given parameters; `!` suffix marks a required one
pub(crate) fn pattern(name: &str, params: &[&str]) -> QueryPattern {
    QueryPattern {
        name: name.to_string(),
        description: format!("Description of {}", name),
        parameters: params
            .iter()
            .map(|p| ParameterSpec {
                name: p.trim_end_matches('!').to_string(),
                param_type: None,
                required: p.ends_with('!'),
            })
            .collect(),
        pipeline: Some(vec![json!({"$match": {"type.name": "Shot"}})]),
        ..Default::default()
    }
}

#[async_trait]
impl PatternStore for FakeStore {
    async fn list_patterns(&self, tag: Option<&str>) -> Result<Vec<QueryPattern>> {
        self.record(format!("list:{}", tag.unwrap_or("")))?;
        Ok(self
            .patterns
            .lock()
            .unwrap()
            .values()
            .filter(|p| tag.is_none_or(|t| p.tags.contains(t)))
            .map(|p| QueryPattern {
                pipeline: None,
                ..p.clone()
            })
            .collect())
    }

    async fn get_pattern(&self, name: &str) -> Result<QueryPattern> {
        self.record(format!("get:{}", name))?;
        self.patterns
            .lock()
            .unwrap()
            .get(name)
            .cloned()
            .ok_or_else(|| ClientError::NotFound(format!("Query '{}' not found", name)))
    }

    async fn execute_pattern(
        &self,
        name: &str,
        options: &ExecuteOptions,
    ) -> Result<ExecutionResult> {
        self.record(format!("execute:{}", name))?;
        self.execute_requests
            .lock()
            .unwrap()
            .push((name.to_string(), options.clone()));

        let player = options
            .parameters
            .as_ref()
            .and_then(|p| p.get("player"))
            .cloned()
            .unwrap_or(JsonValue::Null);
        let results: Vec<JsonValue> = (0..self.rows_available)
            .take(options.limit as usize)
            .map(|i| json!({"_id": i, "minute": i, "player": {"name": player}}))
            .collect();

        Ok(ExecutionResult {
            query_name: name.to_string(),
            count: Some(results.len()),
            results,
            ..Default::default()
        })
    }

    async fn save_pattern(&self, req: &SavePattern) -> Result<SavedPattern> {
        self.record(format!("save:{}", req.name))?;
        let mut patterns = self.patterns.lock().unwrap();
        if patterns.contains_key(&req.name) {
            return Err(ClientError::Conflict(format!(
                "Query '{}' already exists",
                req.name
            )));
        }
        patterns.insert(
            req.name.clone(),
            QueryPattern {
                name: req.name.clone(),
                description: req.description.clone(),
                tags: req.tags.iter().cloned().collect(),
                pipeline: Some(req.pipeline.clone()),
                ..Default::default()
            },
        );
        Ok(SavedPattern {
            name: req.name.clone(),
        })
    }

    async fn save_manual(&self, req: &ManualPatternRequest) -> Result<ManualPatternResponse> {
        self.record("manual".to_string())?;
        self.manual_requests.lock().unwrap().push(req.clone());

        let name = req
            .name
            .clone()
            .unwrap_or_else(|| format!("manual_{}", self.manual_requests.lock().unwrap().len()));
        if req.execute == Some(false) {
            self.patterns.lock().unwrap().insert(
                name.clone(),
                QueryPattern {
                    name: name.clone(),
                    description: req.description.clone(),
                    tags: req.tags.iter().flatten().cloned().collect(),
                    pipeline: Some(req.pipeline.clone()),
                    ..Default::default()
                },
            );
        }

        let warnings = self
            .manual_warnings
            .lock()
            .unwrap()
            .iter()
            .map(|m| serde_json::from_value(json!({ "message": m })).unwrap())
            .collect();
        Ok(ManualPatternResponse {
            name,
            validation_warnings: warnings,
            results: (req.execute == Some(true)).then(|| vec![json!({"minute": 1})]),
            ..Default::default()
        })
    }

    async fn natural_query(&self, req: &NaturalQueryRequest) -> Result<NaturalQueryResult> {
        self.record(format!("natural:{}", req.query))?;
        self.natural_requests.lock().unwrap().push(req.clone());

        if let Some(queued) = self.natural_responses.lock().unwrap().pop_front() {
            return Ok(queued);
        }
        Ok(NaturalQueryResult {
            pipeline: vec![json!({"$match": {"text": req.query}}), json!({"$limit": 50})],
            explanation: format!("Events matching '{}'", req.query),
            confidence: 0.9,
            results: req.execute.then(|| vec![json!({"minute": 5})]),
            ..Default::default()
        })
    }

    async fn delete_pattern(&self, name: &str) -> Result<()> {
        self.record(format!("delete:{}", name))?;
        match self.patterns.lock().unwrap().remove(name) {
            Some(_) => Ok(()),
            None => Err(ClientError::NotFound(format!("Query '{}' not found", name))),
        }
    }

    async fn list_matches(&self) -> Result<Vec<String>> {
        self.record("matches".to_string())?;
        Ok(vec!["3788741".to_string(), "3788742".to_string()])
    }

    async fn get_stats(&self) -> Result<JsonValue> {
        self.record("stats".to_string())?;
        Ok(json!({ "patterns": self.patterns.lock().unwrap().len() }))
    }
}

#[async_trait]
impl UserDirectory for FakeStore {
    async fn login(&self, req: &LoginRequest) -> Result<User> {
        self.record(format!("login:{}", req.email))?;
        Ok(User {
            user_id: "u-1".to_string(),
            email: req.email.clone(),
            name: req.name.clone().unwrap_or_default(),
            provider: "email".to_string(),
            saved_queries: self.collection.lock().unwrap().clone(),
            created_at: None,
            last_login: None,
        })
    }

    async fn user_queries(&self, user_id: &str) -> Result<Vec<QueryPattern>> {
        self.record(format!("user_queries:{}", user_id))?;
        Ok(self
            .collection
            .lock()
            .unwrap()
            .iter()
            .map(|name| pattern(name, &[]))
            .collect())
    }

    async fn add_to_collection(&self, user_id: &str, query_name: &str) -> Result<()> {
        self.record(format!("collect:{}:{}", user_id, query_name))?;
        self.collection.lock().unwrap().push(query_name.to_string());
        Ok(())
    }

    async fn remove_from_collection(&self, user_id: &str, query_name: &str) -> Result<()> {
        self.record(format!("uncollect:{}:{}", user_id, query_name))?;
        self.collection.lock().unwrap().retain(|n| n != query_name);
        Ok(())
    }
}
