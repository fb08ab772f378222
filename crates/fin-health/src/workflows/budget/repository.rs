use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use crate::workflows::health::{RepositoryError, UserId};

use super::domain::{AlertRecord, AlertRequest, BudgetPeriod, BudgetPlan};

pub trait BudgetRepository: Send + Sync {
    fn fetch_budget_plans(
        &self,
        user: &UserId,
        period: BudgetPeriod,
    ) -> Result<Vec<BudgetPlan>, RepositoryError>;

    /// Expense totals keyed by category for the calendar month.
    fn fetch_category_spending(
        &self,
        user: &UserId,
        period: BudgetPeriod,
    ) -> Result<BTreeMap<String, f64>, RepositoryError>;
}

/// Notification store. Duplicate suppression is a read-before-write check, not a constraint.
pub trait NotificationRepository: Send + Sync {
    fn find_recent_alert(
        &self,
        user: &UserId,
        message: &str,
        since: DateTime<Utc>,
    ) -> Result<bool, RepositoryError>;

    fn insert_alert(
        &self,
        user: &UserId,
        request: &AlertRequest,
        now: DateTime<Utc>,
    ) -> Result<AlertRecord, RepositoryError>;
}
