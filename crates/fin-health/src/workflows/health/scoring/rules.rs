use chrono::{Datelike, Months, NaiveDate};

use super::super::domain::{Transaction, TransactionKind};
use super::config::ScoringConfig;

/// First day (inclusive) of the recent window, using calendar-month subtraction.
pub(crate) fn window_start(as_of: NaiveDate, months: u32) -> NaiveDate {
    as_of
        .checked_sub_months(Months::new(months))
        .unwrap_or(NaiveDate::MIN)
}

pub(crate) fn recent_transactions(
    transactions: &[Transaction],
    since: NaiveDate,
) -> Vec<&Transaction> {
    transactions
        .iter()
        .filter(|transaction| transaction.date >= since)
        .collect()
}

pub(crate) fn total_for(transactions: &[&Transaction], kind: TransactionKind) -> f64 {
    transactions
        .iter()
        .filter(|transaction| transaction.kind == kind)
        .map(|transaction| sanitize(transaction.amount))
        .sum()
}

/// Expense totals per calendar month, current month first.
pub(crate) fn monthly_expenses(
    transactions: &[&Transaction],
    as_of: NaiveDate,
    months: u32,
) -> Vec<f64> {
    let Some(current_month) = NaiveDate::from_ymd_opt(as_of.year(), as_of.month(), 1) else {
        return vec![0.0; months as usize];
    };

    (0..months)
        .map(|offset| {
            let Some(month_start) = current_month.checked_sub_months(Months::new(offset)) else {
                return 0.0;
            };
            transactions
                .iter()
                .filter(|transaction| {
                    transaction.is_expense()
                        && transaction.date.year() == month_start.year()
                        && transaction.date.month() == month_start.month()
                })
                .map(|transaction| sanitize(transaction.amount))
                .sum()
        })
        .collect()
}

pub(crate) fn income_vs_expense_score(
    total_income: f64,
    total_expenses: f64,
    config: &ScoringConfig,
) -> u8 {
    if total_income > 0.0 {
        let savings_rate = ((total_income - total_expenses) / total_income).max(0.0);
        to_score(savings_rate * 100.0 * config.income_rate_multiplier)
    } else if total_expenses == 0.0 {
        100
    } else {
        0
    }
}

pub(crate) fn spending_habits_score(
    recent_count: usize,
    monthly: &[f64],
    config: &ScoringConfig,
) -> u8 {
    if recent_count == 0 || monthly.is_empty() {
        return config.habits_base;
    }

    let active_months = monthly.iter().filter(|total| **total != 0.0).count();
    if active_months < 2 {
        return config.habits_base;
    }

    let count = monthly.len() as f64;
    let avg = monthly.iter().sum::<f64>() / count;
    if !avg.is_finite() || avg <= 0.0 {
        return config.habits_base;
    }

    let variance = monthly
        .iter()
        .map(|total| (total - avg).powi(2))
        .sum::<f64>()
        / count;
    let consistency = (100.0 - (variance / avg) * 100.0).max(0.0);

    to_score(consistency.clamp(f64::from(config.habits_floor), 100.0))
}

pub(crate) fn savings_score(total_income: f64, total_savings: f64, config: &ScoringConfig) -> u8 {
    if total_income > 0.0 {
        let ratio = total_savings / (total_income * config.savings_income_months);
        to_score(ratio * 100.0 * config.savings_multiplier)
    } else if total_savings > 0.0 {
        config.savings_without_income
    } else {
        0
    }
}

/// Weighted blend of the rounded sub-scores.
pub(crate) fn overall_score(
    income_vs_expense: u8,
    spending_habits: u8,
    savings: u8,
    config: &ScoringConfig,
) -> u8 {
    to_score(
        f64::from(income_vs_expense) * config.income_vs_expense_weight
            + f64::from(spending_habits) * config.spending_habits_weight
            + f64::from(savings) * config.savings_weight,
    )
}

pub(crate) fn sanitize(amount: f64) -> f64 {
    if amount.is_finite() {
        amount
    } else {
        0.0
    }
}

/// Rounds half away from zero and clamps into `[0, 100]`; non-finite input scores zero.
pub(crate) fn to_score(value: f64) -> u8 {
    if !value.is_finite() {
        return 0;
    }
    value.round().clamp(0.0, 100.0) as u8
}
