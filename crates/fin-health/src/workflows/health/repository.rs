use chrono::NaiveDate;

use super::domain::{HealthScoreRecord, SavingsBucket, Transaction, UserId};

/// Read access to a user's ledger, filtered by the data store.
pub trait LedgerRepository: Send + Sync {
    /// Transactions dated within `[from, to]`; open bounds are unbounded.
    fn fetch_transactions(
        &self,
        user: &UserId,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> Result<Vec<Transaction>, RepositoryError>;

    fn fetch_savings_buckets(&self, user: &UserId) -> Result<Vec<SavingsBucket>, RepositoryError>;
}

/// Append-only store of computed health scores.
pub trait HealthScoreRepository: Send + Sync {
    fn fetch_latest(&self, user: &UserId) -> Result<Option<HealthScoreRecord>, RepositoryError>;
    fn insert(&self, record: HealthScoreRecord) -> Result<HealthScoreRecord, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}
