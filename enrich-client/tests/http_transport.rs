//! End-to-end tests against a stub orchestrator served by axum on a random
//! local port.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use parking_lot::Mutex;
use serde_json::{json, Value};

use log_enrich_client::api::commands;
use log_enrich_client::logic::enrichment::{LogSource, RiskLevel};
use log_enrich_client::logic::pipeline::{derive_stages, StageStatus};
use log_enrich_client::logic::store::{SubmissionStore, SubmitOutcome};
use log_enrich_client::logic::transport::{
    ClientConfig, EnrichClient, EnrichLogRequest, TransportError,
};

type Recorded = Arc<Mutex<Vec<Value>>>;

/// Picks a response from the submitted raw log
async fn enrich_log(State(recorded): State<Recorded>, Json(body): Json<Value>) -> Response {
    recorded.lock().push(body.clone());
    let raw = body["raw_log"].as_str().unwrap_or_default().to_string();
    let source = body["source"].clone();

    if raw.contains("llm-timeout") {
        let body = Json(json!({ "detail": "LLM timeout" }));
        return (StatusCode::INTERNAL_SERVER_ERROR, body).into_response();
    }
    if raw.contains("invalid") {
        let detail = json!([
            { "loc": ["body", "raw_log"], "msg": "field required", "type": "value_error.missing" },
            { "loc": ["body", "source"], "msg": "invalid source", "type": "value_error" }
        ]);
        let body = Json(json!({ "detail": detail }));
        return (StatusCode::UNPROCESSABLE_ENTITY, body).into_response();
    }
    if raw.contains("garbage") {
        return (StatusCode::OK, "<html>proxy error</html>").into_response();
    }

    Json(json!({
        "correlation_id": "abc-1",
        "raw_log": raw,
        "source": source,
        "normalized": {
            "timestamp": "2024-05-01T10:00:00",
            "source": source,
            "event_type": "logon_failure",
            "user": "admin",
            "raw_log": raw,
            "normalized_fields": { "event_id": 4625 }
        },
        "risk": { "score": 0.82, "level": "high", "factors": { "failed_logons": "5 in 60s" } },
        "errors": ["semantic: LLM timeout"]
    }))
    .into_response()
}

async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "config": { "normalizer": "http://normalizer:8001", "risk": "http://risk:8005" }
    }))
}

async fn spawn_stub() -> (EnrichClient, Recorded) {
    let recorded: Recorded = Arc::default();
    let app = Router::new()
        .route("/enrich_log", post(enrich_log))
        .route("/health", get(health))
        .with_state(recorded.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let client = EnrichClient::new(ClientConfig {
        api_base: format!("http://{}/", addr),
        request_timeout_secs: Some(10),
    })
    .unwrap();
    (client, recorded)
}

#[tokio::test]
async fn test_request_body_shape() {
    let (client, recorded) = spawn_stub().await;
    let request =
        EnrichLogRequest::manual("4625: failed logon for user admin", LogSource::WindowsEventlog);
    client.enrich_log(&request).await.unwrap();

    let bodies = recorded.lock().clone();
    assert_eq!(
        bodies,
        [json!({
            "raw_log": "4625: failed logon for user admin",
            "source": "windows_eventlog",
            "event_type": "manual_submission",
            "metadata": {}
        })]
    );
}

#[tokio::test]
async fn test_success_parses_partial_result() {
    let (client, _) = spawn_stub().await;
    let request = EnrichLogRequest::manual("4625: failed logon", LogSource::WindowsEventlog);
    let result = client.enrich_log(&request).await.unwrap();

    assert_eq!(result.correlation_id, "abc-1");
    assert_eq!(result.risk_level(), Some(RiskLevel::High));
    assert!(result.semantic.is_none());
    assert!(result.has_warnings());
    assert_eq!(result.normalized.unwrap().user.as_deref(), Some("admin"));
}

#[tokio::test]
async fn test_server_error_detail() {
    let (client, _) = spawn_stub().await;
    let err = client
        .enrich_log(&EnrichLogRequest::manual("llm-timeout", LogSource::Unknown))
        .await
        .unwrap_err();

    assert_eq!(
        err,
        TransportError::Status {
            status: 500,
            detail: Some("LLM timeout".to_string()),
        }
    );
    assert_eq!(err.user_message(), "LLM timeout");
}

#[tokio::test]
async fn test_validation_error_list_is_flattened() {
    let (client, _) = spawn_stub().await;
    let err = client
        .enrich_log(&EnrichLogRequest::manual("invalid", LogSource::Unknown))
        .await
        .unwrap_err();

    assert_eq!(err.user_message(), "field required; invalid source");
}

#[tokio::test]
async fn test_malformed_success_body() {
    let (client, _) = spawn_stub().await;
    let err = client
        .enrich_log(&EnrichLogRequest::manual("garbage", LogSource::Unknown))
        .await
        .unwrap_err();

    assert!(matches!(err, TransportError::Malformed(_)));
    assert!(err.user_message().starts_with("Malformed enrichment response"));
}

#[tokio::test]
async fn test_health_check() {
    let (client, _) = spawn_stub().await;
    let health = client.health_check().await.unwrap();
    assert!(health.is_ok());
    assert_eq!(health.config.len(), 2);

    let text = commands::check_health(&client).await.unwrap();
    assert!(text.contains("Status: ok"));
    assert!(text.contains("  normalizer: http://normalizer:8001"));
}

#[tokio::test]
async fn test_store_end_to_end() {
    let (client, recorded) = spawn_stub().await;
    let store = SubmissionStore::new(client);

    let outcome = store
        .submit("4625: failed logon for user admin", Some(LogSource::WindowsEventlog))
        .await;
    let result = match outcome {
        SubmitOutcome::Completed(result) => result,
        other => panic!("expected completion, got {:?}", other),
    };
    let statuses: Vec<StageStatus> = derive_stages(Some(result.as_ref()))
        .iter()
        .map(|s| s.status)
        .collect();
    assert_eq!(
        statuses,
        [
            StageStatus::Success,
            StageStatus::Success,
            StageStatus::Pending,
            StageStatus::Pending,
            StageStatus::Pending,
            StageStatus::Success,
        ]
    );

    let outcome = store.submit("llm-timeout", None).await;
    assert_eq!(outcome.error(), Some("LLM timeout"));
    assert!(store.current().is_none());
    assert_eq!(store.history_len(), 1);
    assert!(!store.is_submitting());

    // Blank input never reaches the server
    store.submit("   ", None).await;
    assert_eq!(recorded.lock().len(), 2);
}
