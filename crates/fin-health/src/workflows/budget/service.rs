use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::workflows::health::{RepositoryError, UserId};

use super::alerts::{evaluate_budget_alerts, AlertSession};
use super::domain::{AlertRecord, AlertRequest, BudgetPeriod, BudgetProgress, CurrencyFormat};
use super::repository::{BudgetRepository, NotificationRepository};
use super::spending::budget_progress;

/// What one alert check did: alerts written, and requests skipped because the same
/// message was already stored inside the dedup window.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AlertDispatchReport {
    pub created: Vec<AlertRecord>,
    pub suppressed: Vec<AlertRequest>,
}

pub struct BudgetAlertService<B, N> {
    budgets: Arc<B>,
    notifications: Arc<N>,
    currency: CurrencyFormat,
    dedup_window: Duration,
}

impl<B, N> BudgetAlertService<B, N>
where
    B: BudgetRepository + 'static,
    N: NotificationRepository + 'static,
{
    pub fn new(
        budgets: Arc<B>,
        notifications: Arc<N>,
        currency: CurrencyFormat,
        dedup_window: Duration,
    ) -> Self {
        Self {
            budgets,
            notifications,
            currency,
            dedup_window,
        }
    }

    pub fn dedup_window(&self) -> Duration {
        self.dedup_window
    }

    /// Evaluates the period's plans against spending and persists new alerts. A key is
    /// marked in the session only after its insert-or-skip decision succeeds.
    pub fn check_period(
        &self,
        user: &UserId,
        period: BudgetPeriod,
        now: DateTime<Utc>,
        session: &mut AlertSession,
    ) -> Result<AlertDispatchReport, BudgetServiceError> {
        session.select_period(period);

        let plans = self.budgets.fetch_budget_plans(user, period)?;
        if plans.is_empty() {
            debug!(%user, %period, "no budget plans for period");
            return Ok(AlertDispatchReport::default());
        }
        let spending = self.budgets.fetch_category_spending(user, period)?;
        if spending.is_empty() {
            debug!(%user, %period, "no category spending for period");
            return Ok(AlertDispatchReport::default());
        }

        let requests =
            evaluate_budget_alerts(&plans, &spending, period, session.processed(), &self.currency);
        let since = now - self.dedup_window;
        let mut report = AlertDispatchReport::default();

        for request in requests {
            if self
                .notifications
                .find_recent_alert(user, &request.message, since)?
            {
                debug!(%user, key = %request.dedup_key, "alert already sent inside dedup window");
                session.mark_processed(request.dedup_key.clone());
                report.suppressed.push(request);
                continue;
            }

            let record = match self.notifications.insert_alert(user, &request, now) {
                Ok(record) => record,
                Err(error) => {
                    warn!(%user, key = %request.dedup_key, %error, "budget alert insert failed");
                    return Err(error.into());
                }
            };
            info!(
                %user,
                alert_id = %record.id,
                key = %request.dedup_key,
                "budget alert created"
            );
            session.mark_processed(request.dedup_key);
            report.created.push(record);
        }

        Ok(report)
    }

    pub fn progress(
        &self,
        user: &UserId,
        period: BudgetPeriod,
    ) -> Result<Vec<BudgetProgress>, BudgetServiceError> {
        let plans = self.budgets.fetch_budget_plans(user, period)?;
        if plans.is_empty() {
            return Ok(Vec::new());
        }
        let spending = self.budgets.fetch_category_spending(user, period)?;
        Ok(plans
            .iter()
            .map(|plan| budget_progress(plan, spending.get(&plan.category).copied()))
            .collect())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum BudgetServiceError {
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
