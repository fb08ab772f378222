use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};

use crate::workflows::budget::domain::{AlertRecord, AlertRequest, BudgetPeriod, BudgetPlan};
use crate::workflows::budget::repository::{BudgetRepository, NotificationRepository};
use crate::workflows::budget::spending::category_spending;
use crate::workflows::budget::{BudgetAlertService, CurrencyFormat};
use crate::workflows::health::{RepositoryError, Transaction, TransactionKind, UserId};

pub(super) fn user() -> UserId {
    UserId("user-7".to_string())
}

pub(super) fn june() -> BudgetPeriod {
    BudgetPeriod::new(6, 2024).expect("valid period")
}

pub(super) fn july() -> BudgetPeriod {
    BudgetPeriod::new(7, 2024).expect("valid period")
}

pub(super) fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 20, 9, 0, 0)
        .single()
        .expect("valid timestamp")
}

pub(super) fn plan(category: &str, monthly_limit: f64, period: BudgetPeriod) -> BudgetPlan {
    BudgetPlan {
        id: format!("plan-{category}-{}", period.month()),
        user_id: user(),
        category: category.to_string(),
        monthly_limit,
        month: period.month(),
        year: period.year(),
    }
}

pub(super) fn spending(entries: &[(&str, f64)]) -> BTreeMap<String, f64> {
    entries
        .iter()
        .map(|(category, total)| (category.to_string(), *total))
        .collect()
}

pub(super) fn expense(category: &str, amount: f64, on: NaiveDate) -> Transaction {
    Transaction {
        id: format!("{category}-{on}-{amount}"),
        user_id: user(),
        title: category.to_string(),
        amount,
        kind: TransactionKind::Expense,
        category: category.to_string(),
        date: on,
        created_at: now(),
    }
}

pub(super) fn june_day(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, day).expect("valid date")
}

/// Plans plus raw transactions; spending is derived per calendar month.
#[derive(Default)]
pub(super) struct MemoryBudgets {
    pub(super) plans: Mutex<Vec<BudgetPlan>>,
    pub(super) transactions: Mutex<Vec<Transaction>>,
}

impl MemoryBudgets {
    pub(super) fn with(plans: Vec<BudgetPlan>, transactions: Vec<Transaction>) -> Self {
        Self {
            plans: Mutex::new(plans),
            transactions: Mutex::new(transactions),
        }
    }

    pub(super) fn spend(&self, transaction: Transaction) {
        self.transactions
            .lock()
            .expect("budget mutex poisoned")
            .push(transaction);
    }
}

impl BudgetRepository for MemoryBudgets {
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
        let guard = self.transactions.lock().expect("budget mutex poisoned");
        let owned: Vec<Transaction> = guard
            .iter()
            .filter(|transaction| &transaction.user_id == user)
            .cloned()
            .collect();
        Ok(category_spending(&owned, period))
    }
}

#[derive(Default)]
pub(super) struct MemoryNotifications {
    pub(super) records: Mutex<Vec<AlertRecord>>,
    pub(super) fail_inserts: AtomicBool,
    sequence: AtomicU64,
}

impl MemoryNotifications {
    pub(super) fn seeded(record: AlertRecord) -> Self {
        Self {
            records: Mutex::new(vec![record]),
            ..Self::default()
        }
    }

    pub(super) fn count(&self) -> usize {
        self.records.lock().expect("alert mutex poisoned").len()
    }

    pub(super) fn messages(&self) -> Vec<String> {
        self.records
            .lock()
            .expect("alert mutex poisoned")
            .iter()
            .map(|record| record.message.clone())
            .collect()
    }

    pub(super) fn set_failing(&self, failing: bool) {
        self.fail_inserts.store(failing, Ordering::SeqCst);
    }
}

impl NotificationRepository for MemoryNotifications {
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
        if self.fail_inserts.load(Ordering::SeqCst) {
            return Err(RepositoryError::Unavailable("notifications offline".to_string()));
        }
        let id = self.sequence.fetch_add(1, Ordering::SeqCst) + 1;
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

pub(super) fn stored_alert(message: &str, created_at: DateTime<Utc>) -> AlertRecord {
    AlertRecord {
        id: "alert-seeded".to_string(),
        user_id: user(),
        title: "Budget Alert!".to_string(),
        message: message.to_string(),
        kind: "budget_alert".to_string(),
        created_at,
    }
}

pub(super) fn hours_ago(hours: i64) -> DateTime<Utc> {
    now() - Duration::hours(hours)
}

pub(super) fn build_service(
    budgets: MemoryBudgets,
    notifications: MemoryNotifications,
) -> (
    BudgetAlertService<MemoryBudgets, MemoryNotifications>,
    Arc<MemoryBudgets>,
    Arc<MemoryNotifications>,
) {
    let budgets = Arc::new(budgets);
    let notifications = Arc::new(notifications);
    let service = BudgetAlertService::new(
        budgets.clone(),
        notifications.clone(),
        CurrencyFormat::default(),
        Duration::hours(24),
    );
    (service, budgets, notifications)
}
