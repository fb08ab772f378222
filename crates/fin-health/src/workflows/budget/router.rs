use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;

use crate::workflows::health::UserId;

use super::alerts::AlertSession;
use super::domain::{BudgetPeriod, InvalidPeriod};
use super::repository::{BudgetRepository, NotificationRepository};
use super::service::{BudgetAlertService, BudgetServiceError};

/// Shared state: the service plus one alert session per user.
pub struct BudgetState<B, N> {
    service: Arc<BudgetAlertService<B, N>>,
    sessions: Mutex<HashMap<UserId, AlertSession>>,
}

#[derive(Debug, Deserialize)]
pub struct PeriodParams {
    pub month: u32,
    pub year: i32,
}

impl PeriodParams {
    fn period(&self) -> Result<BudgetPeriod, InvalidPeriod> {
        BudgetPeriod::new(self.month, self.year)
    }
}

pub fn budget_router<B, N>(service: Arc<BudgetAlertService<B, N>>) -> Router
where
    B: BudgetRepository + 'static,
    N: NotificationRepository + 'static,
{
    let state = Arc::new(BudgetState {
        service,
        sessions: Mutex::new(HashMap::new()),
    });

    Router::new()
        .route(
            "/api/v1/users/:user_id/budget/alerts",
            post(check_alerts_handler::<B, N>),
        )
        .route(
            "/api/v1/users/:user_id/budget/progress",
            get(progress_handler::<B, N>),
        )
        .with_state(state)
}

pub(crate) async fn check_alerts_handler<B, N>(
    State(state): State<Arc<BudgetState<B, N>>>,
    Path(user_id): Path<String>,
    Json(params): Json<PeriodParams>,
) -> Response
where
    B: BudgetRepository + 'static,
    N: NotificationRepository + 'static,
{
    let period = match params.period() {
        Ok(period) => period,
        Err(error) => return invalid_period(error),
    };
    let user = UserId(user_id);

    let mut sessions = match state.sessions.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    };
    let session = sessions.entry(user.clone()).or_default();

    match state.service.check_period(&user, period, Utc::now(), session) {
        Ok(report) => (StatusCode::OK, Json(report)).into_response(),
        Err(error) => unavailable(error),
    }
}

pub(crate) async fn progress_handler<B, N>(
    State(state): State<Arc<BudgetState<B, N>>>,
    Path(user_id): Path<String>,
    Query(params): Query<PeriodParams>,
) -> Response
where
    B: BudgetRepository + 'static,
    N: NotificationRepository + 'static,
{
    let period = match params.period() {
        Ok(period) => period,
        Err(error) => return invalid_period(error),
    };

    match state.service.progress(&UserId(user_id), period) {
        Ok(progress) => (StatusCode::OK, Json(progress)).into_response(),
        Err(error) => unavailable(error),
    }
}

fn invalid_period(error: InvalidPeriod) -> Response {
    let payload = json!({ "error": error.to_string() });
    (StatusCode::BAD_REQUEST, Json(payload)).into_response()
}

fn unavailable(error: BudgetServiceError) -> Response {
    let payload = json!({
        "error": error.to_string(),
        "retryable": true,
    });
    (StatusCode::SERVICE_UNAVAILABLE, Json(payload)).into_response()
}
