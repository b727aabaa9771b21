use std::cmp::Ordering;
use std::collections::HashSet;

use tracing::{debug, info, warn};

use super::query::Query;
use super::types::{ComponentScore, MatchResult};
use crate::constants::{
    DEFAULT_HUMIDITY_MIN, DEFAULT_MAX_RESULTS, HUMIDITY_NEAR_MARGIN, HUMIDITY_WEIGHT,
    NEAR_MATCH_POINTS, SYMPTOM_WEIGHT, TEMPERATURE_NEAR_MARGIN, TEMPERATURE_WEIGHT,
};
use crate::knowledge::{DiseaseRecord, RecordField, TempRange};

/// Filters, scores and ranks disease records against a [`Query`].
///
/// Scoring is pure: the same records and query always produce the same
/// ordered results. Equal scores keep the order the records were given in.
#[derive(Debug, Clone)]
pub struct MatchEngine {
    max_results: usize,
}

impl Default for MatchEngine {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_RESULTS)
    }
}

impl MatchEngine {
    pub fn new(max_results: usize) -> Self {
        Self { max_results }
    }

    pub fn max_results(&self) -> usize {
        self.max_results
    }

    /// Returns the top-scoring records for the query's crop, best first.
    ///
    /// An unknown crop yields an empty list.
    pub fn find_matches(&self, records: &[DiseaseRecord], query: &Query) -> Vec<MatchResult> {
        let candidates = filter_by_crop(records, query.crop_type());

        debug!(
            crop = query.crop_type(),
            candidates = candidates.len(),
            "Filtered knowledge base by crop"
        );

        if candidates.is_empty() {
            return Vec::new();
        }

        let total = candidates.len();
        let mut scored: Vec<MatchResult> = candidates
            .into_iter()
            .map(|record| self.score_record(record, query))
            .collect();

        // Stable: ties keep backend order.
        scored.sort_by(|a, b| {
            b.match_score
                .partial_cmp(&a.match_score)
                .unwrap_or(Ordering::Equal)
        });
        scored.truncate(self.max_results);

        for result in &scored {
            debug!(
                disease = %result.name,
                score = result.match_score,
                "Ranked disease match"
            );
        }

        info!(
            crop = query.crop_type(),
            candidates = total,
            returned = scored.len(),
            top_score = scored.first().map(|r| r.match_score),
            "Disease matching complete"
        );

        scored
    }

    /// Scores a single record. Does not check the crop.
    pub fn score_record(&self, record: &DiseaseRecord, query: &Query) -> MatchResult {
        let temp_range = effective_temp_range(record);
        let humidity_min = effective_humidity_min(record);

        let mut components = vec![
            score_temperature(temp_range, query.temperature()),
            score_humidity(humidity_min, query.humidity()),
        ];
        components.extend(score_symptoms(query.symptoms(), &record.symptoms));

        let total: f64 = components.iter().map(|c| c.points).sum();

        MatchResult {
            disease_id: record.disease_id.clone(),
            name: record.name.clone(),
            scientific_name: record.scientific_name.clone(),
            match_score: round_score(total),
            growth_stages_vulnerable: record.growth_stages_vulnerable.clone(),
            optimal_temp_range: temp_range,
            optimal_humidity_min: humidity_min,
            symptoms: record.symptoms.clone(),
            treatment: record.treatment.clone(),
            match_reasoning: components.into_iter().map(|c| c.reason).collect(),
            cost_per_acre: record.cost_per_acre,
            yield_loss_min: record.yield_loss_min,
            yield_loss_max: record.yield_loss_max,
            spread_rate: record.spread_rate.clone(),
        }
    }
}

/// Records whose crop equals `crop_type`, ignoring case, in input order.
pub fn filter_by_crop<'a>(records: &'a [DiseaseRecord], crop_type: &str) -> Vec<&'a DiseaseRecord> {
    let wanted = crop_type.trim().to_lowercase();
    records
        .iter()
        .filter(|r| r.crop_type.to_lowercase() == wanted)
        .collect()
}

/// Full points inside `[tmin, tmax]`, partial within the near margin.
pub fn score_temperature(range: TempRange, temperature: f64) -> ComponentScore {
    let bounds = format!("[{}-{}°F]", range.min(), range.max());

    if range.contains(temperature) {
        ComponentScore::new(
            TEMPERATURE_WEIGHT,
            format!("Temperature {temperature}°F in optimal range {bounds}"),
        )
    } else if range.widened(TEMPERATURE_NEAR_MARGIN).contains(temperature) {
        ComponentScore::new(
            NEAR_MATCH_POINTS,
            format!("Temperature {temperature}°F near optimal range {bounds}"),
        )
    } else {
        ComponentScore::new(
            0.0,
            format!("Temperature {temperature}°F outside optimal range {bounds}"),
        )
    }
}

/// Full points at or above `humidity_min`, partial within the near margin.
pub fn score_humidity(humidity_min: f64, humidity: f64) -> ComponentScore {
    if humidity >= humidity_min {
        ComponentScore::new(
            HUMIDITY_WEIGHT,
            format!("Humidity {humidity}% above minimum {humidity_min}%"),
        )
    } else if humidity >= humidity_min - HUMIDITY_NEAR_MARGIN {
        ComponentScore::new(
            NEAR_MATCH_POINTS,
            format!("Humidity {humidity}% near minimum threshold {humidity_min}%"),
        )
    } else {
        ComponentScore::new(
            0.0,
            format!("Humidity {humidity}% below optimal minimum {humidity_min}%"),
        )
    }
}

/// Share of the query's symptoms the record exhibits, scaled to the symptom weight.
///
/// Returns `None` when the query has no symptoms: the component is skipped.
pub fn score_symptoms(query_symptoms: &[String], record_symptoms: &[String]) -> Option<ComponentScore> {
    if query_symptoms.is_empty() {
        return None;
    }

    let known: HashSet<&str> = record_symptoms.iter().map(String::as_str).collect();
    let matched: Vec<&str> = query_symptoms
        .iter()
        .map(String::as_str)
        .filter(|s| known.contains(s))
        .collect();

    if matched.is_empty() {
        return Some(ComponentScore::new(0.0, "No symptom matches found"));
    }

    let points = matched.len() as f64 / query_symptoms.len() as f64 * SYMPTOM_WEIGHT;
    Some(ComponentScore::new(
        points,
        format!(
            "Symptoms match ({}/{}): {}",
            matched.len(),
            query_symptoms.len(),
            matched.join(", ")
        ),
    ))
}

/// Rounds to one decimal place, halves to even (`81.25` becomes `81.2`).
#[inline]
pub fn round_score(score: f64) -> f64 {
    (score * 10.0).round_ties_even() / 10.0
}

fn effective_temp_range(record: &DiseaseRecord) -> TempRange {
    if let RecordField::Malformed(raw) = &record.optimal_temp_range {
        warn!(
            disease_id = %record.disease_id,
            disease = %record.name,
            raw = %raw,
            "Invalid temperature range, scoring with default"
        );
    }
    record.optimal_temp_range.value_or(TempRange::DEFAULT)
}

fn effective_humidity_min(record: &DiseaseRecord) -> f64 {
    if let RecordField::Malformed(raw) = &record.optimal_humidity_min {
        warn!(
            disease_id = %record.disease_id,
            disease = %record.name,
            raw = %raw,
            "Invalid humidity minimum, scoring with default"
        );
    }
    record.optimal_humidity_min.value_or(DEFAULT_HUMIDITY_MIN)
}
