use crate::report::{run_alert_check, run_score_report, AlertCheckArgs, ScoreReportArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use fin_health::error::AppError;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "Financial Health Service",
    about = "Score ledgers and check budget alerts over HTTP or from the command line",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Score a ledger export and print the breakdown
    Score(ScoreReportArgs),
    /// Evaluate budget plans against a ledger export for one month
    Alerts(AlertCheckArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    /// Seed the in-memory ledger from a transactions CSV
    #[arg(long)]
    pub(crate) transactions: Option<PathBuf>,
    /// Seed savings buckets from a CSV
    #[arg(long)]
    pub(crate) savings: Option<PathBuf>,
    /// Seed budget plans from a CSV
    #[arg(long)]
    pub(crate) budgets: Option<PathBuf>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Score(args) => run_score_report(args),
        Command::Alerts(args) => run_alert_check(args),
    }
}
