use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::Value;
use tower::ServiceExt;

use super::common::*;
use crate::workflows::health::{health_router, HealthScoreService, RecomputePolicy, ScoreEngine};

async fn read_json_body(response: axum::response::Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 4096)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

fn request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .expect("request builds")
}

#[tokio::test]
async fn current_score_defaults_to_placeholder() {
    let (service, _, _) = build_service(steady_ledger(), MemoryScores::default());
    let app = health_router(Arc::new(service));

    let response = app
        .oneshot(request("GET", "/api/v1/users/user-42/health-score"))
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    assert_eq!(body["scores"]["overall"], 0);
    assert_eq!(body["band"], "needs_improvement");
    assert!(body.get("calculated_at").is_none());
}

#[tokio::test]
async fn refresh_endpoint_recomputes_missing_score() {
    let (service, _, scores) = build_service(steady_ledger(), MemoryScores::default());
    let app = health_router(Arc::new(service));

    let response = app
        .oneshot(request("POST", "/api/v1/users/user-42/health-score/refresh"))
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    assert_eq!(body["recomputed"], true);
    assert!(body["scores"]["overall"].as_u64().is_some());
    assert_eq!(scores.count(), 1);
}

#[tokio::test]
async fn recalculate_endpoint_reports_created() {
    let (service, _, scores) = build_service(MemoryLedger::default(), MemoryScores::default());
    let app = health_router(Arc::new(service));

    let response = app
        .oneshot(request("POST", "/api/v1/users/user-42/health-score/recalculate"))
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = read_json_body(response).await;
    assert_eq!(body["scores"]["overall"], 55);
    assert_eq!(scores.count(), 1);
}

#[tokio::test]
async fn unavailable_ledger_maps_to_service_unavailable() {
    let service = HealthScoreService::new(
        Arc::new(UnavailableLedger),
        Arc::new(MemoryScores::default()),
        ScoreEngine::default(),
        RecomputePolicy::default(),
    );
    let app = health_router(Arc::new(service));

    let response = app
        .oneshot(request("POST", "/api/v1/users/user-42/health-score/refresh"))
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body = read_json_body(response).await;
    assert_eq!(body["retryable"], true);
}
