use std::sync::{Arc, Mutex};

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};

use crate::workflows::health::domain::{
    HealthScoreRecord, HealthScores, SavingsBucket, Transaction, TransactionKind, UserId,
};
use crate::workflows::health::repository::{
    HealthScoreRepository, LedgerRepository, RepositoryError,
};
use crate::workflows::health::{HealthScoreService, RecomputePolicy, ScoreEngine};

pub(super) fn user() -> UserId {
    UserId("user-42".to_string())
}

pub(super) fn as_of() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 15).expect("valid date")
}

pub(super) fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0)
        .single()
        .expect("valid timestamp")
}

pub(super) fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

pub(super) fn transaction(
    id: &str,
    kind: TransactionKind,
    amount: f64,
    on: NaiveDate,
) -> Transaction {
    Transaction {
        id: id.to_string(),
        user_id: user(),
        title: format!("{} {id}", kind.label()),
        amount,
        kind,
        category: "General".to_string(),
        date: on,
        created_at: now(),
    }
}

pub(super) fn income(id: &str, amount: f64, on: NaiveDate) -> Transaction {
    transaction(id, TransactionKind::Income, amount, on)
}

pub(super) fn expense(id: &str, amount: f64, on: NaiveDate) -> Transaction {
    transaction(id, TransactionKind::Expense, amount, on)
}

pub(super) fn bucket(id: &str, current_amount: f64) -> SavingsBucket {
    SavingsBucket {
        id: id.to_string(),
        user_id: user(),
        name: format!("Bucket {id}"),
        current_amount,
        target_amount: current_amount * 2.0,
    }
}

pub(super) fn record_at(created_at: DateTime<Utc>) -> HealthScoreRecord {
    HealthScoreRecord::new(
        "hs-seeded".to_string(),
        user(),
        HealthScores {
            overall: 61,
            income_vs_expense: 70,
            spending_habits: 50,
            savings: 60,
        },
        created_at,
    )
}

pub(super) fn minutes_ago(minutes: i64) -> DateTime<Utc> {
    now() - Duration::minutes(minutes)
}

#[derive(Default, Clone)]
pub(super) struct MemoryLedger {
    pub(super) transactions: Arc<Mutex<Vec<Transaction>>>,
    pub(super) buckets: Arc<Mutex<Vec<SavingsBucket>>>,
}

impl MemoryLedger {
    pub(super) fn with(transactions: Vec<Transaction>, buckets: Vec<SavingsBucket>) -> Self {
        Self {
            transactions: Arc::new(Mutex::new(transactions)),
            buckets: Arc::new(Mutex::new(buckets)),
        }
    }
}

impl LedgerRepository for MemoryLedger {
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
pub(super) struct MemoryScores {
    pub(super) records: Arc<Mutex<Vec<HealthScoreRecord>>>,
}

impl MemoryScores {
    pub(super) fn seeded(record: HealthScoreRecord) -> Self {
        Self {
            records: Arc::new(Mutex::new(vec![record])),
        }
    }

    pub(super) fn count(&self) -> usize {
        self.records.lock().expect("score mutex poisoned").len()
    }
}

impl HealthScoreRepository for MemoryScores {
    fn fetch_latest(&self, user: &UserId) -> Result<Option<HealthScoreRecord>, RepositoryError> {
        let guard = self.records.lock().expect("score mutex poisoned");
        Ok(guard
            .iter()
            .filter(|record| &record.user_id == user)
            .max_by_key(|record| record.created_at)
            .cloned())
    }

    fn insert(&self, record: HealthScoreRecord) -> Result<HealthScoreRecord, RepositoryError> {
        self.records
            .lock()
            .expect("score mutex poisoned")
            .push(record.clone());
        Ok(record)
    }
}

/// Score store whose reads lag behind writes: `fetch_latest` keeps returning the snapshot
/// taken at construction, as a second tab would before the first insert becomes visible.
#[derive(Clone)]
pub(super) struct LaggingScores {
    pub(super) written: MemoryScores,
    snapshot: Option<HealthScoreRecord>,
}

impl LaggingScores {
    pub(super) fn seeded(record: HealthScoreRecord) -> Self {
        Self {
            written: MemoryScores::seeded(record.clone()),
            snapshot: Some(record),
        }
    }
}

impl HealthScoreRepository for LaggingScores {
    fn fetch_latest(&self, _user: &UserId) -> Result<Option<HealthScoreRecord>, RepositoryError> {
        Ok(self.snapshot.clone())
    }

    fn insert(&self, record: HealthScoreRecord) -> Result<HealthScoreRecord, RepositoryError> {
        self.written.insert(record)
    }
}

pub(super) struct UnavailableLedger;

impl LedgerRepository for UnavailableLedger {
    fn fetch_transactions(
        &self,
        _user: &UserId,
        _from: Option<NaiveDate>,
        _to: Option<NaiveDate>,
    ) -> Result<Vec<Transaction>, RepositoryError> {
        Err(RepositoryError::Unavailable("ledger offline".to_string()))
    }

    fn fetch_savings_buckets(&self, _user: &UserId) -> Result<Vec<SavingsBucket>, RepositoryError> {
        Err(RepositoryError::Unavailable("ledger offline".to_string()))
    }
}

pub(super) struct ReadOnlyScores;

impl HealthScoreRepository for ReadOnlyScores {
    fn fetch_latest(&self, _user: &UserId) -> Result<Option<HealthScoreRecord>, RepositoryError> {
        Ok(None)
    }

    fn insert(&self, _record: HealthScoreRecord) -> Result<HealthScoreRecord, RepositoryError> {
        Err(RepositoryError::Unavailable("read only".to_string()))
    }
}

pub(super) fn build_service(
    ledger: MemoryLedger,
    scores: MemoryScores,
) -> (
    HealthScoreService<MemoryLedger, MemoryScores>,
    Arc<MemoryLedger>,
    Arc<MemoryScores>,
) {
    let ledger = Arc::new(ledger);
    let scores = Arc::new(scores);
    let service = HealthScoreService::new(
        ledger.clone(),
        scores.clone(),
        ScoreEngine::default(),
        RecomputePolicy::default(),
    );
    (service, ledger, scores)
}

/// Income and expenses in each of the three scored months plus one savings bucket.
pub(super) fn steady_ledger() -> MemoryLedger {
    MemoryLedger::with(
        vec![
            income("i-jun", 1000.0, date(2024, 6, 1)),
            income("i-may", 1000.0, date(2024, 5, 1)),
            income("i-apr", 1000.0, date(2024, 4, 1)),
            expense("e-jun", 400.0, date(2024, 6, 3)),
            expense("e-may", 400.0, date(2024, 5, 3)),
            expense("e-apr", 400.0, date(2024, 4, 3)),
        ],
        vec![bucket("b-1", 1500.0)],
    )
}
