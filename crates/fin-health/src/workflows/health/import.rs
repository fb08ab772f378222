use std::io::Read;
use std::path::Path;

use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;

use super::domain::{coerce_amount, SavingsBucket, Transaction, TransactionKind, UserId};

#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("failed to read ledger export: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid ledger CSV data: {0}")]
    Csv(#[from] csv::Error),
    #[error("row {row}: '{value}' is not a YYYY-MM-DD date")]
    InvalidDate { row: usize, value: String },
    #[error("row {row}: month {month} of {year} is not a valid budget period")]
    InvalidPeriod { row: usize, month: u32, year: i32 },
}

#[derive(Debug, Deserialize)]
struct TransactionRow {
    id: String,
    user_id: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    amount: String,
    #[serde(rename = "type", default)]
    kind: String,
    #[serde(default)]
    category: String,
    date: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    created_at: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SavingsBucketRow {
    id: String,
    user_id: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    current_amount: String,
    #[serde(default)]
    target_amount: String,
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}

fn parse_created_at(value: &str) -> Option<DateTime<Utc>> {
    let trimmed = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.with_timezone(&Utc));
    }

    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

pub(crate) fn csv_reader<R: Read>(reader: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader)
}

/// Reads `id,user_id,title,amount,type,category,date[,created_at]` rows.
///
/// Unparseable amounts become `0` and unknown types become expenses; only dates are strict.
pub fn import_transactions<R: Read>(reader: R) -> Result<Vec<Transaction>, ImportError> {
    let mut transactions = Vec::new();

    for (index, record) in csv_reader(reader).deserialize::<TransactionRow>().enumerate() {
        let row = record?;
        let date = NaiveDate::parse_from_str(row.date.trim(), "%Y-%m-%d").map_err(|_| {
            ImportError::InvalidDate {
                row: index + 1,
                value: row.date.clone(),
            }
        })?;
        let created_at = row
            .created_at
            .as_deref()
            .and_then(parse_created_at)
            .or_else(|| date.and_hms_opt(0, 0, 0).map(|naive| naive.and_utc()))
            .unwrap_or_else(Utc::now);

        transactions.push(Transaction {
            id: row.id,
            user_id: UserId(row.user_id),
            title: row.title,
            amount: coerce_amount(&row.amount),
            kind: TransactionKind::from_label(&row.kind),
            category: row.category,
            date,
            created_at,
        });
    }

    Ok(transactions)
}

/// Reads `id,user_id,name,current_amount,target_amount` rows.
pub fn import_savings_buckets<R: Read>(reader: R) -> Result<Vec<SavingsBucket>, ImportError> {
    let mut buckets = Vec::new();

    for record in csv_reader(reader).deserialize::<SavingsBucketRow>() {
        let row = record?;
        buckets.push(SavingsBucket {
            id: row.id,
            user_id: UserId(row.user_id),
            name: row.name,
            current_amount: coerce_amount(&row.current_amount),
            target_amount: coerce_amount(&row.target_amount),
        });
    }

    Ok(buckets)
}

pub fn import_transactions_from_path<P: AsRef<Path>>(
    path: P,
) -> Result<Vec<Transaction>, ImportError> {
    let file = std::fs::File::open(path)?;
    import_transactions(file)
}

pub fn import_savings_buckets_from_path<P: AsRef<Path>>(
    path: P,
) -> Result<Vec<SavingsBucket>, ImportError> {
    let file = std::fs::File::open(path)?;
    import_savings_buckets(file)
}
