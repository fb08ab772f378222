use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use tracing::{debug, info};

use super::domain::{HealthScoreRecord, SavingsBucket, Transaction, UserId};
use super::insights::HealthScoreView;
use super::policy::RecomputePolicy;
use super::repository::{HealthScoreRepository, LedgerRepository, RepositoryError};
use super::scoring::{ScoreBreakdown, ScoreEngine};

/// Service composing the ledger, the score store, the engine, and the recompute policy.
pub struct HealthScoreService<L, S> {
    ledger: Arc<L>,
    scores: Arc<S>,
    engine: ScoreEngine,
    policy: RecomputePolicy,
}

static SCORE_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_score_id() -> String {
    let id = SCORE_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    format!("hs-{id:06}")
}

/// Result of an automatic refresh.
#[derive(Debug, Clone, PartialEq)]
pub enum RecomputeOutcome {
    /// The latest record is recent enough to keep.
    Fresh(HealthScoreRecord),
    /// No transactions or savings buckets exist; nothing was scored.
    NoData(Option<HealthScoreRecord>),
    Recomputed(HealthScoreRecord),
}

impl RecomputeOutcome {
    pub fn record(&self) -> Option<&HealthScoreRecord> {
        match self {
            RecomputeOutcome::Fresh(record) | RecomputeOutcome::Recomputed(record) => Some(record),
            RecomputeOutcome::NoData(record) => record.as_ref(),
        }
    }

    pub fn recomputed(&self) -> bool {
        matches!(self, RecomputeOutcome::Recomputed(_))
    }
}

impl<L, S> HealthScoreService<L, S>
where
    L: LedgerRepository + 'static,
    S: HealthScoreRepository + 'static,
{
    pub fn new(
        ledger: Arc<L>,
        scores: Arc<S>,
        engine: ScoreEngine,
        policy: RecomputePolicy,
    ) -> Self {
        Self {
            ledger,
            scores,
            engine,
            policy,
        }
    }

    pub fn policy(&self) -> &RecomputePolicy {
        &self.policy
    }

    /// Recompute only when the policy says the persisted score is missing or stale.
    pub fn refresh(
        &self,
        user: &UserId,
        now: DateTime<Utc>,
    ) -> Result<RecomputeOutcome, HealthServiceError> {
        let latest = self.scores.fetch_latest(user)?;
        if let Some(record) = &latest {
            if !self.policy.is_stale(record, now) {
                debug!(%user, record_id = %record.id, "health score still fresh");
                return Ok(RecomputeOutcome::Fresh(record.clone()));
            }
        }

        let as_of = now.date_naive();
        let (transactions, buckets) = self.load_ledger(user, as_of)?;
        let has_any_data = !transactions.is_empty()
            || !buckets.is_empty()
            || !self.ledger.fetch_transactions(user, None, None)?.is_empty();

        if !self
            .policy
            .should_recompute(latest.as_ref(), has_any_data, now)
        {
            debug!(%user, "no ledger data to score");
            return Ok(RecomputeOutcome::NoData(latest));
        }

        let breakdown = self.engine.compute(&transactions, &buckets, as_of);
        let record = self.persist(user, &breakdown, now)?;
        Ok(RecomputeOutcome::Recomputed(record))
    }

    /// Explicit user request: bypasses freshness and always runs the engine.
    pub fn recalculate(
        &self,
        user: &UserId,
        now: DateTime<Utc>,
    ) -> Result<HealthScoreRecord, HealthServiceError> {
        let breakdown = self.score_ledger(user, now)?;
        self.persist(user, &breakdown, now)
    }

    pub fn current(&self, user: &UserId) -> Result<HealthScoreView, HealthServiceError> {
        let latest = self.scores.fetch_latest(user)?;
        Ok(HealthScoreView::from_record(latest.as_ref()))
    }

    /// Runs the engine over the user's data without persisting anything.
    pub fn preview(
        &self,
        user: &UserId,
        now: DateTime<Utc>,
    ) -> Result<ScoreBreakdown, HealthServiceError> {
        self.score_ledger(user, now)
    }

    fn score_ledger(
        &self,
        user: &UserId,
        now: DateTime<Utc>,
    ) -> Result<ScoreBreakdown, HealthServiceError> {
        let as_of = now.date_naive();
        let (transactions, buckets) = self.load_ledger(user, as_of)?;
        Ok(self.engine.compute(&transactions, &buckets, as_of))
    }

    fn load_ledger(
        &self,
        user: &UserId,
        as_of: NaiveDate,
    ) -> Result<(Vec<Transaction>, Vec<SavingsBucket>), HealthServiceError> {
        let since = self.engine.window_start(as_of);
        let transactions = self.ledger.fetch_transactions(user, Some(since), None)?;
        let buckets = self.ledger.fetch_savings_buckets(user)?;
        Ok((transactions, buckets))
    }

    fn persist(
        &self,
        user: &UserId,
        breakdown: &ScoreBreakdown,
        now: DateTime<Utc>,
    ) -> Result<HealthScoreRecord, HealthServiceError> {
        let record = HealthScoreRecord::new(next_score_id(), user.clone(), breakdown.scores, now);
        let stored = self.scores.insert(record)?;
        info!(
            %user,
            record_id = %stored.id,
            score = stored.score,
            income_vs_expense = stored.income_vs_expense_score,
            spending_habits = stored.spending_habits_score,
            savings = stored.savings_score,
            "health score recorded"
        );
        Ok(stored)
    }
}

/// Error raised by the health score service. Fetch failures mean the data is unavailable;
/// insert failures are persistence failures the caller may retry.
#[derive(Debug, thiserror::Error)]
pub enum HealthServiceError {
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
