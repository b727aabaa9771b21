use serde::Serialize;

use crate::knowledge::{SpreadRate, TempRange};

/// Points and explanation contributed by one scoring component.
#[derive(Debug, Clone, PartialEq)]
pub struct ComponentScore {
    pub points: f64,
    pub reason: String,
}

impl ComponentScore {
    pub fn new(points: f64, reason: impl Into<String>) -> Self {
        Self {
            points,
            reason: reason.into(),
        }
    }
}

/// One ranked disease candidate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchResult {
    pub disease_id: String,
    pub name: String,
    pub scientific_name: String,
    /// 0–100, rounded to one decimal place.
    pub match_score: f64,
    pub growth_stages_vulnerable: Vec<String>,
    /// Range actually scored against, after default substitution.
    pub optimal_temp_range: TempRange,
    /// Minimum actually scored against, after default substitution.
    pub optimal_humidity_min: f64,
    pub symptoms: Vec<String>,
    pub treatment: String,
    /// One entry per evaluated component, in scoring order.
    pub match_reasoning: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cost_per_acre: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub yield_loss_min: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub yield_loss_max: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spread_rate: Option<SpreadRate>,
}

/// Ranked matches for a query.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchReport {
    pub matching_diseases: Vec<MatchResult>,
    /// Length of `matching_diseases` (after truncation).
    pub total_matches: usize,
}

impl MatchReport {
    pub fn new(matching_diseases: Vec<MatchResult>) -> Self {
        Self {
            total_matches: matching_diseases.len(),
            matching_diseases,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.matching_diseases.is_empty()
    }

    pub fn top(&self) -> Option<&MatchResult> {
        self.matching_diseases.first()
    }
}
