//! Budget threshold alerts with two layers of duplicate suppression: a per-period session
//! of processed keys and a persisted check for the same message inside a rolling window.

pub mod alerts;
pub mod domain;
pub mod import;
pub mod repository;
pub mod router;
pub mod service;
pub mod spending;

#[cfg(test)]
mod tests;

pub use alerts::{dedup_key, evaluate_budget_alerts, AlertSession};
pub use domain::{
    AlertRecord, AlertRequest, AlertThreshold, BudgetPeriod, BudgetPlan, BudgetProgress,
    CategorySpending, CurrencyFormat, InvalidPeriod, BUDGET_ALERT_KIND,
};
pub use import::{import_budget_plans, import_budget_plans_from_path};
pub use repository::{BudgetRepository, NotificationRepository};
pub use router::budget_router;
pub use service::{AlertDispatchReport, BudgetAlertService, BudgetServiceError};
pub use spending::{budget_progress, category_spending, spending_rows};
