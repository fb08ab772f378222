use chrono::{DateTime, NaiveDate, Utc};
use fin_health::workflows::budget::{
    category_spending, AlertRecord, AlertRequest, BudgetPeriod, BudgetPlan, BudgetRepository,
    NotificationRepository,
};
use fin_health::workflows::health::{
    HealthScoreRecord, HealthScoreRepository, LedgerRepository, RepositoryError, SavingsBucket,
    Transaction, UserId,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Transactions and savings buckets shared by the score and budget stores.
#[derive(Default, Clone)]
pub(crate) struct InMemoryLedger {
    transactions: Arc<Mutex<Vec<Transaction>>>,
    buckets: Arc<Mutex<Vec<SavingsBucket>>>,
}

impl InMemoryLedger {
    pub(crate) fn seeded(transactions: Vec<Transaction>, buckets: Vec<SavingsBucket>) -> Self {
        Self {
            transactions: Arc::new(Mutex::new(transactions)),
            buckets: Arc::new(Mutex::new(buckets)),
        }
    }
}

impl LedgerRepository for InMemoryLedger {
    fn fetch_transactions(
        &self,
        user: &UserId,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> Result<Vec<Transaction>, RepositoryError> {
        let guard = self.transactions.lock().expect("ledger mutex poisoned");
        Ok(guard
            .iter()
            .filter(|transaction| &transaction.user_id == user)
            .filter(|transaction| from.map_or(true, |from| transaction.date >= from))
            .filter(|transaction| to.map_or(true, |to| transaction.date <= to))
            .cloned()
            .collect())
    }

    fn fetch_savings_buckets(&self, user: &UserId) -> Result<Vec<SavingsBucket>, RepositoryError> {
        let guard = self.buckets.lock().expect("ledger mutex poisoned");
        Ok(guard
            .iter()
            .filter(|bucket| &bucket.user_id == user)
            .cloned()
            .collect())
    }
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryScoreStore {
    records: Arc<Mutex<Vec<HealthScoreRecord>>>,
}

impl HealthScoreRepository for InMemoryScoreStore {
    fn fetch_latest(&self, user: &UserId) -> Result<Option<HealthScoreRecord>, RepositoryError> {
        let guard = self.records.lock().expect("score mutex poisoned");
        Ok(guard
            .iter()
            .filter(|record| &record.user_id == user)
            .max_by_key(|record| record.created_at)
            .cloned())
    }

    fn insert(&self, record: HealthScoreRecord) -> Result<HealthScoreRecord, RepositoryError> {
        let mut guard = self.records.lock().expect("score mutex poisoned");
        if guard.iter().any(|existing| existing.id == record.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.push(record.clone());
        Ok(record)
    }
}

/// Budget plans; category spending is derived from the shared ledger.
#[derive(Clone)]
pub(crate) struct InMemoryBudgetStore {
    plans: Arc<Mutex<Vec<BudgetPlan>>>,
    ledger: InMemoryLedger,
}

impl InMemoryBudgetStore {
    pub(crate) fn new(plans: Vec<BudgetPlan>, ledger: InMemoryLedger) -> Self {
        Self {
            plans: Arc::new(Mutex::new(plans)),
            ledger,
        }
    }
}

impl BudgetRepository for InMemoryBudgetStore {
    fn fetch_budget_plans(
        &self,
        user: &UserId,
        period: BudgetPeriod,
    ) -> Result<Vec<BudgetPlan>, RepositoryError> {
        let guard = self.plans.lock().expect("budget mutex poisoned");
        Ok(guard
            .iter()
            .filter(|plan| &plan.user_id == user && plan.period() == Some(period))
            .cloned()
            .collect())
    }

    fn fetch_category_spending(
        &self,
        user: &UserId,
        period: BudgetPeriod,
    ) -> Result<BTreeMap<String, f64>, RepositoryError> {
        let transactions = self.ledger.fetch_transactions(
            user,
            Some(period.first_day()),
            Some(period.last_day()),
        )?;
        Ok(category_spending(&transactions, period))
    }
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryNotificationStore {
    records: Arc<Mutex<Vec<AlertRecord>>>,
    sequence: Arc<AtomicU64>,
}

impl InMemoryNotificationStore {
    pub(crate) fn alerts(&self) -> Vec<AlertRecord> {
        self.records.lock().expect("alert mutex poisoned").clone()
    }
}

impl NotificationRepository for InMemoryNotificationStore {
    fn find_recent_alert(
        &self,
        user: &UserId,
        message: &str,
        since: DateTime<Utc>,
    ) -> Result<bool, RepositoryError> {
        let guard = self.records.lock().expect("alert mutex poisoned");
        Ok(guard.iter().any(|record| {
            &record.user_id == user && record.message == message && record.created_at >= since
        }))
    }

    fn insert_alert(
        &self,
        user: &UserId,
        request: &AlertRequest,
        now: DateTime<Utc>,
    ) -> Result<AlertRecord, RepositoryError> {
        let id = self.sequence.fetch_add(1, Ordering::Relaxed) + 1;
        let record = AlertRecord {
            id: format!("alert-{id:06}"),
            user_id: user.clone(),
            title: request.title.clone(),
            message: request.message.clone(),
            kind: request.kind.clone(),
            created_at: now,
        };
        self.records
            .lock()
            .expect("alert mutex poisoned")
            .push(record.clone());
        Ok(record)
    }
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

pub(crate) fn parse_month(raw: &str) -> Result<BudgetPeriod, String> {
    let date = NaiveDate::parse_from_str(&format!("{}-01", raw.trim()), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM ({err})"))?;
    Ok(BudgetPeriod::containing(date))
}
