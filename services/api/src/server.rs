use crate::cli::ServeArgs;
use crate::infra::{
    AppState, InMemoryBudgetStore, InMemoryLedger, InMemoryNotificationStore, InMemoryScoreStore,
};
use crate::routes::with_domain_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use fin_health::config::AppConfig;
use fin_health::error::AppError;
use fin_health::telemetry;
use fin_health::workflows::budget::{
    import_budget_plans_from_path, BudgetAlertService, CurrencyFormat,
};
use fin_health::workflows::health::{
    import_savings_buckets_from_path, import_transactions_from_path, HealthScoreService,
    RecomputePolicy, ScoreEngine,
};
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let transactions = match args.transactions.take() {
        Some(path) => import_transactions_from_path(path)?,
        None => Vec::new(),
    };
    let buckets = match args.savings.take() {
        Some(path) => import_savings_buckets_from_path(path)?,
        None => Vec::new(),
    };
    let plans = match args.budgets.take() {
        Some(path) => import_budget_plans_from_path(path)?,
        None => Vec::new(),
    };
    info!(
        transactions = transactions.len(),
        savings_buckets = buckets.len(),
        budget_plans = plans.len(),
        "seeded in-memory ledger"
    );

    let ledger = InMemoryLedger::seeded(transactions, buckets);
    let health_service = Arc::new(HealthScoreService::new(
        Arc::new(ledger.clone()),
        Arc::new(InMemoryScoreStore::default()),
        ScoreEngine::default(),
        RecomputePolicy::new(config.scoring.stale_after()),
    ));
    let budget_service = Arc::new(BudgetAlertService::new(
        Arc::new(InMemoryBudgetStore::new(plans, ledger)),
        Arc::new(InMemoryNotificationStore::default()),
        CurrencyFormat::new(config.scoring.currency_symbol.clone()),
        config.scoring.alert_dedup_window(),
    ));

    let app = with_domain_routes(health_service, budget_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "financial health service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
