mod config;
mod rules;

pub use config::ScoringConfig;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::domain::{HealthScores, SavingsBucket, Transaction, TransactionKind};

/// Stateless scorer applying a [`ScoringConfig`] to ledger data. Total on any input.
#[derive(Debug, Clone, Default)]
pub struct ScoreEngine {
    config: ScoringConfig,
}

impl ScoreEngine {
    pub fn new(config: ScoringConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    /// First calendar date considered recent for `as_of`.
    pub fn window_start(&self, as_of: NaiveDate) -> NaiveDate {
        rules::window_start(as_of, self.config.lookback_months)
    }

    pub fn compute(
        &self,
        transactions: &[Transaction],
        savings_buckets: &[SavingsBucket],
        as_of: NaiveDate,
    ) -> ScoreBreakdown {
        let config = &self.config;
        let recent = rules::recent_transactions(transactions, self.window_start(as_of));

        let total_income = rules::total_for(&recent, TransactionKind::Income);
        let total_expenses = rules::total_for(&recent, TransactionKind::Expense);
        let total_savings: f64 = savings_buckets
            .iter()
            .map(|bucket| rules::sanitize(bucket.current_amount))
            .sum();
        let monthly_expenses = rules::monthly_expenses(&recent, as_of, config.lookback_months);

        let income_vs_expense = rules::income_vs_expense_score(total_income, total_expenses, config);
        let spending_habits = rules::spending_habits_score(recent.len(), &monthly_expenses, config);
        let savings = rules::savings_score(total_income, total_savings, config);
        let overall = rules::overall_score(income_vs_expense, spending_habits, savings, config);

        ScoreBreakdown {
            scores: HealthScores {
                overall,
                income_vs_expense,
                spending_habits,
                savings,
            },
            signals: ScoreSignals {
                total_income,
                total_expenses,
                total_savings,
                recent_transactions: recent.len(),
                monthly_expenses,
            },
        }
    }
}

/// Aggregates the scores were derived from, kept for audit output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreSignals {
    pub total_income: f64,
    pub total_expenses: f64,
    pub total_savings: f64,
    pub recent_transactions: usize,
    /// Current calendar month first.
    pub monthly_expenses: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub scores: HealthScores,
    pub signals: ScoreSignals,
}

/// Scores `transactions` and `savings_buckets` with the default weights.
pub fn compute_health_scores(
    transactions: &[Transaction],
    savings_buckets: &[SavingsBucket],
    as_of: NaiveDate,
) -> HealthScores {
    ScoreEngine::default()
        .compute(transactions, savings_buckets, as_of)
        .scores
}
