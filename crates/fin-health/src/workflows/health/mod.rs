//! Financial health scoring: the pure score engine, its recompute schedule, and the
//! service that persists results through a score store.

pub mod domain;
pub mod import;
pub mod insights;
pub mod policy;
pub mod repository;
pub mod router;
pub mod scoring;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{
    HealthScoreRecord, HealthScores, SavingsBucket, Transaction, TransactionKind, UserId,
};
pub use import::{
    import_savings_buckets, import_savings_buckets_from_path, import_transactions,
    import_transactions_from_path, ImportError,
};
pub use insights::{recommendations, HealthScoreView, Recommendation, ScoreBand};
pub use policy::{should_recompute, RecomputePolicy};
pub use repository::{HealthScoreRepository, LedgerRepository, RepositoryError};
pub use router::health_router;
pub use scoring::{compute_health_scores, ScoreBreakdown, ScoreEngine, ScoreSignals, ScoringConfig};
pub use service::{HealthScoreService, HealthServiceError, RecomputeOutcome};
