use std::collections::BTreeMap;

use crate::workflows::health::Transaction;

use super::domain::{BudgetPeriod, BudgetPlan, BudgetProgress, CategorySpending};

/// Expense totals per category for the calendar month, ordered by category.
pub fn category_spending(
    transactions: &[Transaction],
    period: BudgetPeriod,
) -> BTreeMap<String, f64> {
    let mut totals = BTreeMap::new();
    for transaction in transactions
        .iter()
        .filter(|transaction| transaction.is_expense() && period.contains(transaction.date))
    {
        let amount = if transaction.amount.is_finite() {
            transaction.amount
        } else {
            0.0
        };
        *totals.entry(transaction.category.clone()).or_insert(0.0) += amount;
    }
    totals
}

pub fn spending_rows(totals: &BTreeMap<String, f64>) -> Vec<CategorySpending> {
    totals
        .iter()
        .map(|(category, total)| CategorySpending {
            category: category.clone(),
            total: *total,
        })
        .collect()
}

pub fn budget_progress(plan: &BudgetPlan, spent: Option<f64>) -> BudgetProgress {
    let spent = spent.unwrap_or(0.0);
    let percentage = if plan.monthly_limit > 0.0 {
        (spent / plan.monthly_limit * 100.0).min(100.0)
    } else {
        0.0
    };

    BudgetProgress {
        category: plan.category.clone(),
        monthly_limit: plan.monthly_limit,
        spent,
        percentage,
        remaining: (plan.monthly_limit - spent).max(0.0),
    }
}
