use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use chrono::Utc;
use serde::Serialize;
use serde_json::json;

use super::domain::UserId;
use super::insights::HealthScoreView;
use super::repository::{HealthScoreRepository, LedgerRepository};
use super::service::{HealthScoreService, HealthServiceError};

#[derive(Debug, Serialize)]
struct RefreshResponse {
    recomputed: bool,
    #[serde(flatten)]
    view: HealthScoreView,
}

/// Router builder exposing the current score and both recompute triggers.
pub fn health_router<L, S>(service: Arc<HealthScoreService<L, S>>) -> Router
where
    L: LedgerRepository + 'static,
    S: HealthScoreRepository + 'static,
{
    Router::new()
        .route(
            "/api/v1/users/:user_id/health-score",
            get(current_handler::<L, S>),
        )
        .route(
            "/api/v1/users/:user_id/health-score/refresh",
            post(refresh_handler::<L, S>),
        )
        .route(
            "/api/v1/users/:user_id/health-score/recalculate",
            post(recalculate_handler::<L, S>),
        )
        .with_state(service)
}

pub(crate) async fn current_handler<L, S>(
    State(service): State<Arc<HealthScoreService<L, S>>>,
    Path(user_id): Path<String>,
) -> Response
where
    L: LedgerRepository + 'static,
    S: HealthScoreRepository + 'static,
{
    match service.current(&UserId(user_id)) {
        Ok(view) => (StatusCode::OK, axum::Json(view)).into_response(),
        Err(error) => unavailable(error),
    }
}

pub(crate) async fn refresh_handler<L, S>(
    State(service): State<Arc<HealthScoreService<L, S>>>,
    Path(user_id): Path<String>,
) -> Response
where
    L: LedgerRepository + 'static,
    S: HealthScoreRepository + 'static,
{
    match service.refresh(&UserId(user_id), Utc::now()) {
        Ok(outcome) => {
            let payload = RefreshResponse {
                recomputed: outcome.recomputed(),
                view: HealthScoreView::from_record(outcome.record()),
            };
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(error) => unavailable(error),
    }
}

pub(crate) async fn recalculate_handler<L, S>(
    State(service): State<Arc<HealthScoreService<L, S>>>,
    Path(user_id): Path<String>,
) -> Response
where
    L: LedgerRepository + 'static,
    S: HealthScoreRepository + 'static,
{
    match service.recalculate(&UserId(user_id), Utc::now()) {
        Ok(record) => {
            let payload = RefreshResponse {
                recomputed: true,
                view: HealthScoreView::from_record(Some(&record)),
            };
            (StatusCode::CREATED, axum::Json(payload)).into_response()
        }
        Err(error) => unavailable(error),
    }
}

fn unavailable(error: HealthServiceError) -> Response {
    let payload = json!({
        "error": error.to_string(),
        "retryable": true,
    });
    (StatusCode::SERVICE_UNAVAILABLE, axum::Json(payload)).into_response()
}

