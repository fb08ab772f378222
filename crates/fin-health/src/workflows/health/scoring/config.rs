use serde::{Deserialize, Serialize};

/// Weights and scale factors for the three sub-scores.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringConfig {
    pub lookback_months: u32,
    pub income_vs_expense_weight: f64,
    pub spending_habits_weight: f64,
    pub savings_weight: f64,
    /// Applied to the savings rate, so a 50% rate earns a perfect score at `2.0`.
    pub income_rate_multiplier: f64,
    pub savings_income_months: f64,
    pub savings_multiplier: f64,
    pub habits_base: u8,
    pub habits_floor: u8,
    pub savings_without_income: u8,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            lookback_months: 3,
            income_vs_expense_weight: 0.40,
            spending_habits_weight: 0.30,
            savings_weight: 0.30,
            income_rate_multiplier: 2.0,
            savings_income_months: 3.0,
            savings_multiplier: 3.0,
            habits_base: 50,
            habits_floor: 20,
            savings_without_income: 75,
        }
    }
}
