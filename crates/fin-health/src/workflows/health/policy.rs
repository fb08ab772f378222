use chrono::{DateTime, Duration, Utc};

use super::domain::HealthScoreRecord;

/// Staleness rule deciding when a persisted score should be replaced.
///
/// Best effort only: two callers racing past the check before either write lands will both
/// recompute. Readers always take the newest record, so duplicates are harmless.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecomputePolicy {
    stale_after: Duration,
}

impl RecomputePolicy {
    pub fn new(stale_after: Duration) -> Self {
        Self { stale_after }
    }

    pub fn stale_after(&self) -> Duration {
        self.stale_after
    }

    pub fn is_stale(&self, record: &HealthScoreRecord, now: DateTime<Utc>) -> bool {
        record.created_at < now - self.stale_after
    }

    pub fn should_recompute(
        &self,
        last_record: Option<&HealthScoreRecord>,
        has_any_data: bool,
        now: DateTime<Utc>,
    ) -> bool {
        if !has_any_data {
            return false;
        }

        match last_record {
            None => true,
            Some(record) => self.is_stale(record, now),
        }
    }
}

impl Default for RecomputePolicy {
    fn default() -> Self {
        Self::new(Duration::hours(1))
    }
}

/// [`RecomputePolicy::should_recompute`] with the one hour default.
pub fn should_recompute(
    last_record: Option<&HealthScoreRecord>,
    has_any_data: bool,
    now: DateTime<Utc>,
) -> bool {
    RecomputePolicy::default().should_recompute(last_record, has_any_data, now)
}
