//! HTTP-level tests against a stub pattern store

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
};
use scout_client::{ClientError, PatternStoreClient};
use scout_core::dto::natural::NaturalQueryRequest;
use scout_core::dto::pattern::{ExecuteOptions, ManualPatternRequest, SavePattern};
use scout_core::dto::user::LoginRequest;
use scout_core::error::ErrorKind;
use serde_json::{Value as JsonValue, json};
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};

type Reply = Result<Json<JsonValue>, (StatusCode, Json<JsonValue>)>;

#[derive(Clone, Default)]
struct Stub {
    patterns: Arc<Mutex<BTreeMap<String, JsonValue>>>,
    collection: Arc<Mutex<Vec<String>>>,
    last_body: Arc<Mutex<Option<JsonValue>>>,
}

fn fail(status: StatusCode, error: &str) -> (StatusCode, Json<JsonValue>) {
    (status, Json(json!({ "error": error })))
}

async fn list_queries(
    State(stub): State<Stub>,
    Query(params): Query<HashMap<String, String>>,
) -> Reply {
    let patterns = stub.patterns.lock().unwrap();
    let listed: Vec<JsonValue> = patterns
        .values()
        .filter(|p| match params.get("tag") {
            Some(tag) => p["tags"].as_array().unwrap().contains(&json!(tag)),
            None => true,
        })
        .map(|p| {
            let mut summary = p.clone();
            summary.as_object_mut().unwrap().remove("pipeline");
            summary
        })
        .collect();
    Ok(Json(JsonValue::Array(listed)))
}

async fn get_query(State(stub): State<Stub>, Path(name): Path<String>) -> Reply {
    stub.patterns
        .lock()
        .unwrap()
        .get(&name)
        .cloned()
        .map(Json)
        .ok_or_else(|| fail(StatusCode::NOT_FOUND, &format!("Query '{}' not found", name)))
}

async fn delete_query(
    State(stub): State<Stub>,
    Path(name): Path<String>,
) -> Result<StatusCode, (StatusCode, Json<JsonValue>)> {
    match stub.patterns.lock().unwrap().remove(&name) {
        Some(_) => Ok(StatusCode::NO_CONTENT),
        None => Err(fail(StatusCode::NOT_FOUND, "Query not found")),
    }
}

async fn execute_query(
    State(stub): State<Stub>,
    Path(name): Path<String>,
    Json(body): Json<JsonValue>,
) -> Reply {
    *stub.last_body.lock().unwrap() = Some(body.clone());

    if name == "broken" {
        return Err((
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({
                "error": "Unrecognized pipeline stage name: '$matc'",
                "details": {"stage": 0}
            })),
        ));
    }
    if !stub.patterns.lock().unwrap().contains_key(&name) {
        return Err(fail(StatusCode::NOT_FOUND, "Query not found"));
    }

    let limit = body["limit"].as_u64().unwrap_or(50) as usize;
    let rows: Vec<JsonValue> = (0..120)
        .take(limit)
        .map(|i| json!({"_id": i, "player": {"name": "Lionel Messi"}, "minute": i}))
        .collect();
    Ok(Json(json!({
        "query_name": name,
        "count": rows.len(),
        "result_count": rows.len(),
        "results": rows,
    })))
}

async fn save_query(State(stub): State<Stub>, Json(body): Json<JsonValue>) -> Reply {
    let name = body["name"].as_str().unwrap_or_default().to_string();
    let mut patterns = stub.patterns.lock().unwrap();
    if patterns.contains_key(&name) {
        return Err(fail(StatusCode::CONFLICT, "Query already exists"));
    }
    patterns.insert(name.clone(), body);
    Ok(Json(json!({ "name": name })))
}

async fn manual_query(State(stub): State<Stub>, Json(body): Json<JsonValue>) -> Reply {
    *stub.last_body.lock().unwrap() = Some(body.clone());
    Ok(Json(json!({
        "name": "manual_1",
        "validation_warnings": [{"message": "No $limit stage"}],
        "results": [{"minute": 12}],
        "count": 1
    })))
}

async fn natural_query(State(stub): State<Stub>, Json(body): Json<JsonValue>) -> Reply {
    *stub.last_body.lock().unwrap() = Some(body);
    Ok(Json(json!({
        "pipeline": [{"$match": {"player.name": "Lionel Messi", "shot.outcome.name": "Goal"}}],
        "explanation": "Goals scored by Messi",
        "confidence": 0.9,
        "mock": false,
        "results": [{"minute": 10}]
    })))
}

async fn login(Json(body): Json<JsonValue>) -> Reply {
    Ok(Json(json!({
        "user_id": "u-1",
        "email": body["email"],
        "name": body.get("name").cloned().unwrap_or(json!("")),
        "provider": "email",
        "saved_queries": [],
        "created_at": "2024-05-01T09:00:00.000000"
    })))
}

async fn user_queries(State(stub): State<Stub>, Path(_user): Path<String>) -> Reply {
    let names = stub.collection.lock().unwrap().clone();
    Ok(Json(JsonValue::Array(
        names.into_iter().map(|n| json!({"name": n})).collect(),
    )))
}

async fn add_user_query(
    State(stub): State<Stub>,
    Path(_user): Path<String>,
    Json(body): Json<JsonValue>,
) -> Reply {
    let name = body["query_name"].as_str().unwrap_or_default().to_string();
    stub.collection.lock().unwrap().push(name);
    Ok(Json(json!({"success": true})))
}

async fn remove_user_query(
    State(stub): State<Stub>,
    Path((_user, name)): Path<(String, String)>,
) -> Reply {
    stub.collection.lock().unwrap().retain(|n| n != &name);
    Ok(Json(json!({"success": true})))
}

async fn spawn_stub() -> (PatternStoreClient, Stub) {
    let stub = Stub::default();
    stub.patterns.lock().unwrap().insert(
        "messi_goals".to_string(),
        json!({
            "name": "messi_goals",
            "description": "Goals by a player",
            "tags": ["goals", "messi"],
            "parameters": [{"name": "player", "required": true}],
            "pipeline": [{"$match": {"shot.outcome.name": "Goal"}}]
        }),
    );
    stub.patterns.lock().unwrap().insert(
        "long_passes".to_string(),
        json!({
            "name": "long_passes",
            "description": "Passes over 30m",
            "tags": ["passing"],
            "parameters": [],
            "pipeline": []
        }),
    );

    let api = Router::new()
        .route("/queries", get(list_queries).post(save_query))
        .route("/queries/manual", post(manual_query))
        .route("/queries/natural", post(natural_query))
        .route("/queries/{name}", get(get_query).delete(delete_query))
        .route("/queries/{name}/execute", post(execute_query))
        .route("/matches", get(|| async { Json(json!(["3788741", "3788742"])) }))
        .route("/stats", get(|| async { Json(json!({"events": 1200, "matches": 2})) }))
        .route("/auth/login", post(login))
        .route(
            "/users/{user}/queries",
            get(user_queries).post(add_user_query),
        )
        .route(
            "/users/{user}/queries/{name}",
            axum::routing::delete(remove_user_query),
        )
        .with_state(stub.clone());
    let app = Router::new().nest("/api", api);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (PatternStoreClient::new(format!("http://{}/api", addr)), stub)
}

#[tokio::test]
async fn test_list_with_tag_filter() {
    let (client, _stub) = spawn_stub().await;

    let all = client.list_patterns(None).await.unwrap();
    assert_eq!(all.len(), 2);
    assert!(all.iter().all(|p| p.pipeline.is_none()));

    let passing = client.list_patterns(Some("passing")).await.unwrap();
    assert_eq!(passing.len(), 1);
    assert_eq!(passing[0].name, "long_passes");
}

#[tokio::test]
async fn test_get_pattern_and_not_found() {
    let (client, _stub) = spawn_stub().await;

    let pattern = client.get_pattern("messi_goals").await.unwrap();
    assert!(pattern.parameters[0].required);
    assert_eq!(pattern.pipeline.as_ref().map(Vec::len), Some(1));

    let err = client.get_pattern("nope").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert_eq!(err.envelope().message, "Query 'nope' not found");
}

#[tokio::test]
async fn test_execute_sends_limit_and_parameters() {
    let (client, stub) = spawn_stub().await;

    let mut parameters = serde_json::Map::new();
    parameters.insert("player".to_string(), json!("Messi"));
    let result = client
        .execute_pattern(
            "messi_goals",
            &ExecuteOptions {
                parameters: Some(parameters),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(result.query_name, "messi_goals");
    assert_eq!(result.row_count(), 50);
    assert_eq!(result.results.len(), result.row_count());
    assert_eq!(
        stub.last_body.lock().unwrap().clone(),
        Some(json!({"parameters": {"player": "Messi"}, "limit": 50}))
    );
}

#[tokio::test]
async fn test_remote_execution_error_keeps_details() {
    let (client, _stub) = spawn_stub().await;

    let err = client
        .execute_pattern("broken", &ExecuteOptions::default())
        .await
        .unwrap_err();

    let envelope = err.envelope();
    assert_eq!(envelope.kind, ErrorKind::RemoteExecution);
    assert!(envelope.message.contains("$matc"));
    assert_eq!(envelope.details, Some(json!({"stage": 0})));
}

#[tokio::test]
async fn test_save_then_get_and_conflict() {
    let (client, _stub) = spawn_stub().await;
    let req = SavePattern {
        name: "messi_goals_nl".to_string(),
        description: "Show me all goals by Messi".to_string(),
        pipeline: vec![json!({"$match": {"player.name": "Lionel Messi"}})],
        tags: vec!["natural-language".to_string()],
    };

    let saved = client.save_pattern(&req).await.unwrap();
    assert_eq!(saved.name, "messi_goals_nl");

    let fetched = client.get_pattern("messi_goals_nl").await.unwrap();
    assert!(fetched.tags.contains("natural-language"));

    let err = client.save_pattern(&req).await.unwrap_err();
    assert!(matches!(err, ClientError::Conflict(_)));
}

#[tokio::test]
async fn test_delete_removes_from_listing() {
    let (client, _stub) = spawn_stub().await;

    client.delete_pattern("long_passes").await.unwrap();
    let names: Vec<_> = client
        .list_patterns(None)
        .await
        .unwrap()
        .into_iter()
        .map(|p| p.name)
        .collect();
    assert!(!names.contains(&"long_passes".to_string()));

    let err = client.delete_pattern("long_passes").await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_manual_and_natural_bodies() {
    let (client, stub) = spawn_stub().await;

    let response = client
        .save_manual(&ManualPatternRequest {
            description: "Manual query".to_string(),
            pipeline: vec![json!({"$limit": 5})],
            execute: Some(true),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(response.combined_warnings().as_deref(), Some("No $limit stage"));
    assert_eq!(
        stub.last_body.lock().unwrap().clone(),
        Some(json!({"description": "Manual query", "pipeline": [{"$limit": 5}], "execute": true}))
    );

    let result = client
        .natural_query(&NaturalQueryRequest::new("Show me all goals by Messi", true))
        .await
        .unwrap();
    assert_eq!(result.confidence, 0.9);
    assert!(!result.mock);
    assert_eq!(
        stub.last_body.lock().unwrap().clone(),
        Some(json!({"query": "Show me all goals by Messi", "execute": true, "limit": 50}))
    );
}

#[tokio::test]
async fn test_reference_data() {
    let (client, _stub) = spawn_stub().await;

    assert_eq!(client.list_matches().await.unwrap().len(), 2);
    assert_eq!(client.get_stats().await.unwrap()["events"], json!(1200));
}

#[tokio::test]
async fn test_login_and_collection() {
    let (client, _stub) = spawn_stub().await;

    let user = client
        .login(&LoginRequest {
            email: "ana@example.com".to_string(),
            name: None,
        })
        .await
        .unwrap();
    assert_eq!(user.user_id, "u-1");
    assert!(user.created_at.is_some());

    client.add_to_collection("u-1", "messi_goals").await.unwrap();
    assert_eq!(client.user_queries("u-1").await.unwrap().len(), 1);

    client
        .remove_from_collection("u-1", "messi_goals")
        .await
        .unwrap();
    assert!(client.user_queries("u-1").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_unreachable_backend_is_transport_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = PatternStoreClient::new(format!("http://{}/api", addr));
    let err = client.list_matches().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Transport);
}
