use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use fin_health::workflows::budget::{
    budget_router, BudgetAlertService, BudgetRepository, NotificationRepository,
};
use fin_health::workflows::health::{
    health_router, HealthScoreRepository, HealthScoreService, LedgerRepository,
};
use serde_json::json;
use std::sync::Arc;

pub(crate) fn with_domain_routes<L, S, B, N>(
    health: Arc<HealthScoreService<L, S>>,
    budgets: Arc<BudgetAlertService<B, N>>,
) -> axum::Router
where
    L: LedgerRepository + 'static,
    S: HealthScoreRepository + 'static,
    B: BudgetRepository + 'static,
    N: NotificationRepository + 'static,
{
    health_router(health)
        .merge(budget_router(budgets))
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}
