use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::domain::{HealthScoreRecord, HealthScores};

const ATTENTION_THRESHOLD: u8 = 60;

/// Qualitative band for an overall score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreBand {
    Excellent,
    Good,
    Fair,
    NeedsImprovement,
}

impl ScoreBand {
    pub fn for_score(score: u8) -> Self {
        match score {
            80.. => Self::Excellent,
            60..=79 => Self::Good,
            40..=59 => Self::Fair,
            _ => Self::NeedsImprovement,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ScoreBand::Excellent => "Excellent",
            ScoreBand::Good => "Good",
            ScoreBand::Fair => "Fair",
            ScoreBand::NeedsImprovement => "Needs Improvement",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Recommendation {
    ImproveIncomeVsExpenses,
    StabilizeSpending,
    BoostSavings,
    KeepItUp,
    GetStarted,
}

impl Recommendation {
    pub fn headline(&self) -> &'static str {
        match self {
            Recommendation::ImproveIncomeVsExpenses => "Improve Income vs Expenses",
            Recommendation::StabilizeSpending => "Stabilize Spending",
            Recommendation::BoostSavings => "Boost Savings",
            Recommendation::KeepItUp => "Excellent Work!",
            Recommendation::GetStarted => "Get Started",
        }
    }

    pub fn detail(&self) -> &'static str {
        match self {
            Recommendation::ImproveIncomeVsExpenses => {
                "Increase income or reduce expenses to create a positive savings rate."
            }
            Recommendation::StabilizeSpending => {
                "Keep monthly spending consistent and budgeted to improve predictability."
            }
            Recommendation::BoostSavings => {
                "Set up automatic transfers to savings and build an emergency fund."
            }
            Recommendation::KeepItUp => "Financial health is strong. Keep up the good habits.",
            Recommendation::GetStarted => {
                "Add transactions and savings goals to see a financial health score."
            }
        }
    }
}

pub fn recommendations(scores: &HealthScores) -> Vec<Recommendation> {
    let mut tips = Vec::new();
    if scores.income_vs_expense < ATTENTION_THRESHOLD {
        tips.push(Recommendation::ImproveIncomeVsExpenses);
    }
    if scores.spending_habits < ATTENTION_THRESHOLD {
        tips.push(Recommendation::StabilizeSpending);
    }
    if scores.savings < ATTENTION_THRESHOLD {
        tips.push(Recommendation::BoostSavings);
    }
    if scores.overall >= 80 {
        tips.push(Recommendation::KeepItUp);
    }
    if scores.overall == 0 {
        tips.push(Recommendation::GetStarted);
    }
    tips
}

/// Presentation of the current score. Users without a record see zeros and no timestamp.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HealthScoreView {
    pub scores: HealthScores,
    pub band: ScoreBand,
    pub band_label: &'static str,
    pub recommendations: Vec<Recommendation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub calculated_at: Option<DateTime<Utc>>,
}

impl HealthScoreView {
    pub fn from_record(record: Option<&HealthScoreRecord>) -> Self {
        let scores = record.map(HealthScoreRecord::scores).unwrap_or_default();
        let band = ScoreBand::for_score(scores.overall);
        Self {
            scores,
            band,
            band_label: band.label(),
            recommendations: recommendations(&scores),
            calculated_at: record.map(|record| record.created_at),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bands_follow_score_thresholds() {
        assert_eq!(ScoreBand::for_score(100), ScoreBand::Excellent);
        assert_eq!(ScoreBand::for_score(80), ScoreBand::Excellent);
        assert_eq!(ScoreBand::for_score(79), ScoreBand::Good);
        assert_eq!(ScoreBand::for_score(40), ScoreBand::Fair);
        assert_eq!(ScoreBand::for_score(39), ScoreBand::NeedsImprovement);
    }

    #[test]
    fn placeholder_view_asks_user_to_get_started() {
        let view = HealthScoreView::from_record(None);
        assert_eq!(view.scores, HealthScores::default());
        assert!(view.calculated_at.is_none());
        assert!(view.recommendations.contains(&Recommendation::GetStarted));
        assert_eq!(view.band_label, "Needs Improvement");
    }

    #[test]
    fn strong_scores_only_get_encouragement() {
        let scores = HealthScores {
            overall: 92,
            income_vs_expense: 100,
            spending_habits: 85,
            savings: 88,
        };
        assert_eq!(recommendations(&scores), vec![Recommendation::KeepItUp]);
    }
}
