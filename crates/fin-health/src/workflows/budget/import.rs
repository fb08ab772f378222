use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use crate::workflows::health::domain::coerce_amount;
use crate::workflows::health::import::csv_reader;
use crate::workflows::health::{ImportError, UserId};

use super::domain::{BudgetPeriod, BudgetPlan};

#[derive(Debug, Deserialize)]
struct BudgetPlanRow {
    id: String,
    user_id: String,
    category: String,
    #[serde(default)]
    monthly_limit: String,
    month: u32,
    year: i32,
}

/// Reads `id,user_id,category,monthly_limit,month,year` rows.
pub fn import_budget_plans<R: Read>(reader: R) -> Result<Vec<BudgetPlan>, ImportError> {
    let mut plans = Vec::new();

    for (index, record) in csv_reader(reader).deserialize::<BudgetPlanRow>().enumerate() {
        let row = record?;
        if BudgetPeriod::new(row.month, row.year).is_err() {
            return Err(ImportError::InvalidPeriod {
                row: index + 1,
                month: row.month,
                year: row.year,
            });
        }

        plans.push(BudgetPlan {
            id: row.id,
            user_id: UserId(row.user_id),
            category: row.category,
            monthly_limit: coerce_amount(&row.monthly_limit),
            month: row.month,
            year: row.year,
        });
    }

    Ok(plans)
}

pub fn import_budget_plans_from_path<P: AsRef<Path>>(
    path: P,
) -> Result<Vec<BudgetPlan>, ImportError> {
    let file = std::fs::File::open(path)?;
    import_budget_plans(file)
}
