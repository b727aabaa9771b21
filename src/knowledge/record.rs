//! Disease records built from normalized knowledge-base items.
//!
//! Parsing is lenient: display fields fall back to placeholders, and the two
//! scored thresholds keep track of whether they were missing or malformed so the
//! engine can substitute its defaults and flag the record.

use serde::Serialize;
use serde_json::{Map, Value, json};
use tracing::warn;

use crate::constants::DEFAULT_TEMP_RANGE;

/// Closed temperature interval `[min, max]` with `min <= max`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(into = "[f64; 2]")]
pub struct TempRange {
    min: f64,
    max: f64,
}

impl TempRange {
    /// The permissive range used when a record has no usable one.
    pub const DEFAULT: TempRange = TempRange {
        min: DEFAULT_TEMP_RANGE.0,
        max: DEFAULT_TEMP_RANGE.1,
    };

    /// Returns `None` unless both bounds are finite and ordered.
    pub fn new(min: f64, max: f64) -> Option<Self> {
        (min.is_finite() && max.is_finite() && min <= max).then_some(Self { min, max })
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    /// Inclusive on both ends.
    pub fn contains(&self, value: f64) -> bool {
        self.min <= value && value <= self.max
    }

    /// Returns the range grown by `margin` on each side.
    pub fn widened(&self, margin: f64) -> Self {
        Self {
            min: self.min - margin,
            max: self.max + margin,
        }
    }
}

impl From<TempRange> for [f64; 2] {
    fn from(range: TempRange) -> Self {
        [range.min, range.max]
    }
}

/// A scored record attribute, remembering why it is unusable when it is.
#[derive(Debug, Clone, PartialEq)]
pub enum RecordField<T> {
    Present(T),
    Missing,
    /// Present in the source but unusable; holds the raw value for diagnostics.
    Malformed(Value),
}

impl<T: Copy> RecordField<T> {
    /// Returns the present value or `default`.
    pub fn value_or(&self, default: T) -> T {
        match self {
            RecordField::Present(v) => *v,
            RecordField::Missing | RecordField::Malformed(_) => default,
        }
    }
}

impl<T> RecordField<T> {
    pub fn is_present(&self) -> bool {
        matches!(self, RecordField::Present(_))
    }

    pub fn is_malformed(&self) -> bool {
        matches!(self, RecordField::Malformed(_))
    }
}

/// How fast a disease spreads, as carried by the source record.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SpreadRate {
    /// Qualitative label such as `"moderate"`.
    Label(String),
    Rate(f64),
}

/// One disease in the knowledge base.
#[derive(Debug, Clone, PartialEq)]
pub struct DiseaseRecord {
    pub disease_id: String,
    pub name: String,
    pub scientific_name: String,
    /// Lowercased crop name used as the match key.
    pub crop_type: String,
    pub optimal_temp_range: RecordField<TempRange>,
    pub optimal_humidity_min: RecordField<f64>,
    /// Display order is preserved; matching treats this as a set.
    pub symptoms: Vec<String>,
    pub growth_stages_vulnerable: Vec<String>,
    pub treatment: String,
    pub cost_per_acre: Option<f64>,
    pub yield_loss_min: Option<f64>,
    pub yield_loss_max: Option<f64>,
    pub spread_rate: Option<SpreadRate>,
}

impl DiseaseRecord {
    pub const UNKNOWN_ID: &'static str = "UNKNOWN";
    pub const UNKNOWN_NAME: &'static str = "Unknown Disease";
    pub const UNKNOWN_SCIENTIFIC_NAME: &'static str = "Unknown";
    pub const NO_TREATMENT: &'static str = "No treatment specified";

    /// Creates a record with no thresholds, symptoms or optional fields.
    pub fn new(
        disease_id: impl Into<String>,
        name: impl Into<String>,
        crop_type: impl AsRef<str>,
    ) -> Self {
        Self {
            disease_id: disease_id.into(),
            name: name.into(),
            scientific_name: Self::UNKNOWN_SCIENTIFIC_NAME.to_string(),
            crop_type: normalize_crop(crop_type.as_ref()),
            optimal_temp_range: RecordField::Missing,
            optimal_humidity_min: RecordField::Missing,
            symptoms: Vec::new(),
            growth_stages_vulnerable: Vec::new(),
            treatment: Self::NO_TREATMENT.to_string(),
            cost_per_acre: None,
            yield_loss_min: None,
            yield_loss_max: None,
            spread_rate: None,
        }
    }

    /// Sets the temperature range; an unordered pair is recorded as malformed.
    pub fn with_temp_range(mut self, min: f64, max: f64) -> Self {
        self.optimal_temp_range = parse_temp_range(&json!([min, max]));
        self
    }

    pub fn with_humidity_min(mut self, humidity_min: f64) -> Self {
        self.optimal_humidity_min = RecordField::Present(humidity_min);
        self
    }

    pub fn with_symptoms<I, T>(mut self, symptoms: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.symptoms = symptoms.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_treatment(mut self, treatment: impl Into<String>) -> Self {
        self.treatment = treatment.into();
        self
    }

    /// Builds a record from a normalized item, substituting defaults for
    /// missing display fields. Never fails.
    pub fn from_item(item: &Map<String, Value>) -> Self {
        let disease_id = string_field(item, "disease_id", Self::UNKNOWN_ID);

        let optimal_temp_range = match item.get("optimal_temp_range") {
            None | Some(Value::Null) => RecordField::Missing,
            Some(raw) => parse_temp_range(raw),
        };

        let optimal_humidity_min = match item.get("optimal_humidity_min") {
            None | Some(Value::Null) => RecordField::Missing,
            Some(raw) => match as_number(raw) {
                Some(v) => RecordField::Present(v),
                None => RecordField::Malformed(raw.clone()),
            },
        };

        Self {
            name: string_field(item, "name", Self::UNKNOWN_NAME),
            scientific_name: string_field(item, "scientific_name", Self::UNKNOWN_SCIENTIFIC_NAME),
            crop_type: normalize_crop(&string_field(item, "crop_type", "")),
            optimal_temp_range,
            optimal_humidity_min,
            symptoms: string_list(item, "symptoms"),
            growth_stages_vulnerable: string_list(item, "growth_stages_vulnerable"),
            treatment: string_field(item, "treatment", Self::NO_TREATMENT),
            cost_per_acre: optional_number(item, "cost_per_acre", &disease_id),
            yield_loss_min: optional_number(item, "yield_loss_min", &disease_id),
            yield_loss_max: optional_number(item, "yield_loss_max", &disease_id),
            spread_rate: spread_rate(item, &disease_id),
            disease_id,
        }
    }

    /// Returns `true` if any scored threshold is present but unusable.
    pub fn has_malformed_thresholds(&self) -> bool {
        self.optimal_temp_range.is_malformed() || self.optimal_humidity_min.is_malformed()
    }
}

/// Parses a `[min, max]` pair. Anything other than two ordered numbers is malformed.
pub fn parse_temp_range(raw: &Value) -> RecordField<TempRange> {
    let parsed = match raw.as_array().map(Vec::as_slice) {
        Some([min, max]) => as_number(min)
            .zip(as_number(max))
            .and_then(|(min, max)| TempRange::new(min, max)),
        _ => None,
    };

    match parsed {
        Some(range) => RecordField::Present(range),
        None => RecordField::Malformed(raw.clone()),
    }
}

fn normalize_crop(crop: &str) -> String {
    crop.trim().to_lowercase()
}

/// Accepts JSON numbers and numeric strings.
fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|v| v.is_finite())
}

fn string_field(item: &Map<String, Value>, key: &str, default: &str) -> String {
    match item.get(key) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => default.to_string(),
    }
}

fn string_list(item: &Map<String, Value>, key: &str) -> Vec<String> {
    match item.get(key) {
        Some(Value::Array(values)) => values
            .iter()
            .filter_map(|v| v.as_str().map(str::to_string))
            .collect(),
        _ => Vec::new(),
    }
}

fn optional_number(item: &Map<String, Value>, key: &str, disease_id: &str) -> Option<f64> {
    let raw = item.get(key)?;
    let value = as_number(raw);
    if value.is_none() && !raw.is_null() {
        warn!(disease_id = %disease_id, field = key, raw = %raw, "Ignoring non-numeric field");
    }
    value
}

fn spread_rate(item: &Map<String, Value>, disease_id: &str) -> Option<SpreadRate> {
    match item.get("spread_rate")? {
        Value::String(label) => Some(SpreadRate::Label(label.clone())),
        Value::Number(n) => n.as_f64().map(SpreadRate::Rate),
        Value::Null => None,
        other => {
            warn!(disease_id = %disease_id, raw = %other, "Ignoring unrecognised spread_rate");
            None
        }
    }
}
