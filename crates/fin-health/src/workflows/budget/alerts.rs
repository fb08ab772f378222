use std::collections::{BTreeMap, HashSet};

use super::domain::{
    AlertRequest, AlertThreshold, BudgetPeriod, BudgetPlan, CurrencyFormat, BUDGET_ALERT_KIND,
};

/// `category-month-year-(100|80)`.
pub fn dedup_key(category: &str, period: BudgetPeriod, threshold: AlertThreshold) -> String {
    format!("{category}-{}-{}", period.key(), threshold.key_suffix())
}

/// Alert requests for every plan whose category spending reached 80% of its limit and whose
/// dedup key has not been processed yet. Pure: the caller marks keys once it has decided
/// what to persist.
pub fn evaluate_budget_alerts(
    plans: &[BudgetPlan],
    spending: &BTreeMap<String, f64>,
    period: BudgetPeriod,
    already_notified: &HashSet<String>,
    currency: &CurrencyFormat,
) -> Vec<AlertRequest> {
    plans
        .iter()
        .filter(|plan| plan.monthly_limit > 0.0 && plan.monthly_limit.is_finite())
        .filter_map(|plan| {
            let total = *spending.get(&plan.category)?;
            let spent_percentage = total / plan.monthly_limit * 100.0;
            let threshold = AlertThreshold::for_percentage(spent_percentage)?;
            let key = dedup_key(&plan.category, period, threshold);
            if already_notified.contains(&key) {
                return None;
            }

            let message = match threshold {
                AlertThreshold::Exceeded => format!(
                    "You've exceeded your budget for {} by {}",
                    plan.category,
                    currency.format(total - plan.monthly_limit)
                ),
                // Half percentages round up, matching messages already stored by web clients.
                AlertThreshold::NearLimit => format!(
                    "You've used {:.0}% of your {} budget",
                    spent_percentage.round(),
                    plan.category
                ),
            };

            Some(AlertRequest {
                title: threshold.title().to_string(),
                message,
                kind: BUDGET_ALERT_KIND.to_string(),
                dedup_key: key,
                threshold,
            })
        })
        .collect()
}

/// Process-local record of dedup keys already handled for one period. Switching to another
/// period forgets everything; the persisted 24h check stays authoritative.
#[derive(Debug, Clone, Default)]
pub struct AlertSession {
    period: Option<BudgetPeriod>,
    processed: HashSet<String>,
}

impl AlertSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn period(&self) -> Option<BudgetPeriod> {
        self.period
    }

    /// Selects the period, clearing processed keys when it differs from the current one.
    pub fn select_period(&mut self, period: BudgetPeriod) {
        if self.period != Some(period) {
            self.processed.clear();
            self.period = Some(period);
        }
    }

    pub fn processed(&self) -> &HashSet<String> {
        &self.processed
    }

    pub fn is_processed(&self, key: &str) -> bool {
        self.processed.contains(key)
    }

    pub fn mark_processed(&mut self, key: impl Into<String>) {
        self.processed.insert(key.into());
    }
}
