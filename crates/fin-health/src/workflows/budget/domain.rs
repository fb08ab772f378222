use std::fmt;

use chrono::{DateTime, Datelike, Months, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::workflows::health::UserId;

/// Monthly spending cap for one category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetPlan {
    pub id: String,
    pub user_id: UserId,
    pub category: String,
    pub monthly_limit: f64,
    pub month: u32,
    pub year: i32,
}

impl BudgetPlan {
    pub fn period(&self) -> Option<BudgetPeriod> {
        BudgetPeriod::new(self.month, self.year).ok()
    }
}

/// A calendar month, bounded by its first and last day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BudgetPeriod {
    month: u32,
    year: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("month {month} of {year} is not a valid calendar month")]
pub struct InvalidPeriod {
    pub month: u32,
    pub year: i32,
}

impl BudgetPeriod {
    pub fn new(month: u32, year: i32) -> Result<Self, InvalidPeriod> {
        if NaiveDate::from_ymd_opt(year, month, 1).is_some() {
            Ok(Self { month, year })
        } else {
            Err(InvalidPeriod { month, year })
        }
    }

    pub fn containing(date: NaiveDate) -> Self {
        Self {
            month: date.month(),
            year: date.year(),
        }
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn first_day(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap_or(NaiveDate::MIN)
    }

    pub fn last_day(&self) -> NaiveDate {
        self.first_day()
            .checked_add_months(Months::new(1))
            .and_then(|next| next.pred_opt())
            .unwrap_or(NaiveDate::MAX)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date.month() == self.month && date.year() == self.year
    }

    /// `month-year`, the form used inside alert dedup keys.
    pub fn key(&self) -> String {
        format!("{}-{}", self.month, self.year)
    }
}

impl fmt::Display for BudgetPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

/// Sum of expense transactions in one category for a period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategorySpending {
    pub category: String,
    pub total: f64,
}

/// Spend against a plan. Percentage is capped at 100 and remaining floored at 0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetProgress {
    pub category: String,
    pub monthly_limit: f64,
    pub spent: f64,
    pub percentage: f64,
    pub remaining: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertThreshold {
    /// At least 80% but under 100% of the limit.
    NearLimit,
    Exceeded,
}

impl AlertThreshold {
    pub fn for_percentage(spent_percentage: f64) -> Option<Self> {
        if spent_percentage >= 100.0 {
            Some(Self::Exceeded)
        } else if spent_percentage >= 80.0 {
            Some(Self::NearLimit)
        } else {
            None
        }
    }

    pub fn key_suffix(&self) -> &'static str {
        match self {
            AlertThreshold::NearLimit => "80",
            AlertThreshold::Exceeded => "100",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            AlertThreshold::NearLimit => "Budget Alert!",
            AlertThreshold::Exceeded => "Budget Exceeded!",
        }
    }
}

pub const BUDGET_ALERT_KIND: &str = "budget_alert";

/// Notification the caller should try to persist, subject to the recent-duplicate check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertRequest {
    pub title: String,
    pub message: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub dedup_key: String,
    pub threshold: AlertThreshold,
}

/// Persisted notification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertRecord {
    pub id: String,
    pub user_id: UserId,
    pub title: String,
    pub message: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub created_at: DateTime<Utc>,
}

/// Renders amounts as `{symbol}{amount:.2}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrencyFormat {
    symbol: String,
}

impl CurrencyFormat {
    pub fn new(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
        }
    }

    pub fn format(&self, amount: f64) -> String {
        format!("{}{:.2}", self.symbol, amount)
    }
}

impl Default for CurrencyFormat {
    fn default() -> Self {
        Self::new("$")
    }
}
