use crate::infra::{
    InMemoryBudgetStore, InMemoryLedger, InMemoryNotificationStore, InMemoryScoreStore,
};
use chrono::{DateTime, Local, NaiveDate, Utc};
use clap::Args;
use fin_health::config::AppConfig;
use fin_health::error::AppError;
use fin_health::workflows::budget::{
    import_budget_plans_from_path, AlertDispatchReport, AlertSession, BudgetAlertService,
    BudgetPeriod, BudgetProgress, CurrencyFormat,
};
use fin_health::workflows::health::{
    import_savings_buckets_from_path, import_transactions_from_path, recommendations,
    HealthScoreService, HealthScores, RecomputePolicy, ScoreBand, ScoreBreakdown, ScoreEngine,
    UserId,
};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct ScoreReportArgs {
    /// Transactions CSV (id,user_id,title,amount,type,category,date[,created_at])
    #[arg(long)]
    pub(crate) transactions: PathBuf,
    /// Savings buckets CSV (id,user_id,name,current_amount,target_amount)
    #[arg(long)]
    pub(crate) savings: Option<PathBuf>,
    /// User whose ledger is scored
    #[arg(long)]
    pub(crate) user: String,
    /// Scoring date (YYYY-MM-DD). Defaults to today.
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) as_of: Option<NaiveDate>,
    /// Print the breakdown as JSON
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug)]
pub(crate) struct AlertCheckArgs {
    /// Budget plans CSV (id,user_id,category,monthly_limit,month,year)
    #[arg(long)]
    pub(crate) budgets: PathBuf,
    /// Transactions CSV used to derive category spending
    #[arg(long)]
    pub(crate) transactions: PathBuf,
    /// User whose plans are checked
    #[arg(long)]
    pub(crate) user: String,
    /// Budget month (YYYY-MM)
    #[arg(long, value_parser = crate::infra::parse_month)]
    pub(crate) month: BudgetPeriod,
    /// Print the dispatch report as JSON
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Debug, Serialize)]
struct ScoreReport {
    user: UserId,
    as_of: NaiveDate,
    band: ScoreBand,
    #[serde(flatten)]
    breakdown: ScoreBreakdown,
    recommendations: Vec<RecommendationLine>,
}

#[derive(Debug, PartialEq, Serialize)]
struct RecommendationLine {
    headline: &'static str,
    detail: &'static str,
}

fn recommendation_lines(scores: &HealthScores) -> Vec<RecommendationLine> {
    recommendations(scores)
        .iter()
        .map(|tip| RecommendationLine {
            headline: tip.headline(),
            detail: tip.detail(),
        })
        .collect()
}

#[derive(Debug, Serialize)]
struct AlertCheckReport {
    period: BudgetPeriod,
    progress: Vec<BudgetProgress>,
    #[serde(flatten)]
    dispatch: AlertDispatchReport,
}

fn scoring_instant(as_of: NaiveDate) -> DateTime<Utc> {
    as_of
        .and_hms_opt(12, 0, 0)
        .map(|naive| naive.and_utc())
        .unwrap_or_else(Utc::now)
}

pub(crate) fn run_score_report(args: ScoreReportArgs) -> Result<(), AppError> {
    let ScoreReportArgs {
        transactions,
        savings,
        user,
        as_of,
        json,
    } = args;

    let config = AppConfig::load()?;
    let as_of = as_of.unwrap_or_else(|| Local::now().date_naive());
    let transactions = import_transactions_from_path(transactions)?;
    let buckets = match savings {
        Some(path) => import_savings_buckets_from_path(path)?,
        None => Vec::new(),
    };

    let service = HealthScoreService::new(
        Arc::new(InMemoryLedger::seeded(transactions, buckets)),
        Arc::new(InMemoryScoreStore::default()),
        ScoreEngine::default(),
        RecomputePolicy::new(config.scoring.stale_after()),
    );
    let user = UserId(user);
    let breakdown = service.preview(&user, scoring_instant(as_of))?;
    let report = ScoreReport {
        band: ScoreBand::for_score(breakdown.scores.overall),
        recommendations: recommendation_lines(&breakdown.scores),
        user,
        as_of,
        breakdown,
    };

    if json {
        print_json(&report);
    } else {
        render_score_report(&report);
    }
    Ok(())
}

pub(crate) fn run_alert_check(args: AlertCheckArgs) -> Result<(), AppError> {
    let AlertCheckArgs {
        budgets,
        transactions,
        user,
        month,
        json,
    } = args;

    let config = AppConfig::load()?;
    let ledger = InMemoryLedger::seeded(import_transactions_from_path(transactions)?, Vec::new());
    let plans = import_budget_plans_from_path(budgets)?;
    let notifications = Arc::new(InMemoryNotificationStore::default());
    let service = BudgetAlertService::new(
        Arc::new(InMemoryBudgetStore::new(plans, ledger)),
        notifications.clone(),
        CurrencyFormat::new(config.scoring.currency_symbol.clone()),
        config.scoring.alert_dedup_window(),
    );

    let user = UserId(user);
    let mut session = AlertSession::new();
    let dispatch = service.check_period(&user, month, Utc::now(), &mut session)?;
    let report = AlertCheckReport {
        period: month,
        progress: service.progress(&user, month)?,
        dispatch,
    };

    if json {
        print_json(&report);
    } else {
        render_alert_check(&report, notifications.alerts().len());
    }
    Ok(())
}

fn print_json<T: Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(rendered) => println!("{rendered}"),
        Err(err) => eprintln!("failed to render report: {err}"),
    }
}

fn render_score_report(report: &ScoreReport) {
    let scores = &report.breakdown.scores;
    let signals = &report.breakdown.signals;

    println!("Financial health for {} as of {}", report.user, report.as_of);
    println!("Overall: {}/100 ({})", scores.overall, report.band.label());
    println!("- Income vs expense: {}", scores.income_vs_expense);
    println!("- Spending habits:   {}", scores.spending_habits);
    println!("- Savings:           {}", scores.savings);
    println!(
        "Window: {} transactions | income {:.2} | expenses {:.2} | savings {:.2}",
        signals.recent_transactions,
        signals.total_income,
        signals.total_expenses,
        signals.total_savings
    );
    let months: Vec<String> = signals
        .monthly_expenses
        .iter()
        .map(|total| format!("{total:.2}"))
        .collect();
    println!("Monthly expenses (latest first): {}", months.join(" | "));
    if !report.recommendations.is_empty() {
        println!("Recommendations:");
        for line in &report.recommendations {
            println!("  - {}: {}", line.headline, line.detail);
        }
    }
}

fn render_alert_check(report: &AlertCheckReport, stored: usize) {
    println!("Budget check for {}", report.period);
    if report.progress.is_empty() {
        println!("No budget plans for this month.");
        return;
    }
    for entry in &report.progress {
        println!(
            "- {}: {:.2} of {:.2} ({:.0}%) | {:.2} remaining",
            entry.category, entry.spent, entry.monthly_limit, entry.percentage, entry.remaining
        );
    }
    if report.dispatch.created.is_empty() {
        println!("No new alerts.");
    } else {
        println!("Alerts ({stored} stored):");
        for alert in &report.dispatch.created {
            println!("  - {} {}", alert.title, alert.message);
        }
    }
}
