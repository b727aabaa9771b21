//! Query values and the coercion boundary for caller-supplied parameters.

use serde::Deserialize;
use tracing::debug;

use super::error::QueryError;

/// Validated field conditions to match against the knowledge base.
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    crop_type: String,
    temperature: f64,
    humidity: f64,
    symptoms: Vec<String>,
}

impl Query {
    /// Validates and builds a query.
    ///
    /// `crop_type` must be non-blank and both readings finite. Symptoms are
    /// trimmed; blanks and repeats are dropped, keeping first-seen order.
    pub fn new<I, T>(
        crop_type: impl AsRef<str>,
        temperature: f64,
        humidity: f64,
        symptoms: I,
    ) -> Result<Self, QueryError>
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        let crop_type = crop_type.as_ref().trim();
        if crop_type.is_empty() {
            return Err(QueryError::MissingCropType);
        }

        let temperature = finite("temperature", temperature)?;
        let humidity = finite("humidity", humidity)?;

        let mut unique: Vec<String> = Vec::new();
        for symptom in symptoms {
            let symptom = symptom.as_ref().trim();
            if !symptom.is_empty() && !unique.iter().any(|s| s == symptom) {
                unique.push(symptom.to_string());
            }
        }

        Ok(Self {
            crop_type: crop_type.to_string(),
            temperature,
            humidity,
            symptoms: unique,
        })
    }

    pub fn crop_type(&self) -> &str {
        &self.crop_type
    }

    pub fn temperature(&self) -> f64 {
        self.temperature
    }

    pub fn humidity(&self) -> f64 {
        self.humidity
    }

    pub fn symptoms(&self) -> &[String] {
        &self.symptoms
    }

    pub fn has_symptoms(&self) -> bool {
        !self.symptoms.is_empty()
    }
}

fn finite(field: &'static str, value: f64) -> Result<f64, QueryError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(QueryError::NonFinite { field })
    }
}

/// A numeric parameter as a caller may send it: a number or numeric text.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum NumericParam {
    Number(f64),
    Text(String),
}

impl NumericParam {
    pub fn coerce(&self, field: &'static str) -> Result<f64, QueryError> {
        let value = match self {
            NumericParam::Number(n) => *n,
            NumericParam::Text(text) => {
                text.trim()
                    .parse::<f64>()
                    .map_err(|_| QueryError::NotNumeric {
                        field,
                        value: text.clone(),
                    })?
            }
        };
        finite(field, value)
    }
}

impl From<f64> for NumericParam {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

/// Symptom list, either as an array or a comma-separated string.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum SymptomsParam {
    List(Vec<String>),
    Csv(String),
}

impl SymptomsParam {
    pub fn into_list(self) -> Vec<String> {
        match self {
            SymptomsParam::List(list) => list,
            SymptomsParam::Csv(csv) => csv.split(',').map(str::to_string).collect(),
        }
    }
}

/// Loosely typed query as received from a caller.
///
/// Absent readings default to `0`; present ones must coerce to a finite number.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct QueryParams {
    #[serde(default)]
    pub crop_type: Option<String>,
    #[serde(default)]
    pub temperature: Option<NumericParam>,
    #[serde(default)]
    pub humidity: Option<NumericParam>,
    #[serde(default)]
    pub symptoms: Option<SymptomsParam>,
}

impl TryFrom<QueryParams> for Query {
    type Error = QueryError;

    fn try_from(params: QueryParams) -> Result<Self, Self::Error> {
        let crop_type = params
            .crop_type
            .filter(|c| !c.trim().is_empty())
            .ok_or(QueryError::MissingCropType)?;

        let temperature = coerce_or_zero(params.temperature.as_ref(), "temperature")?;
        let humidity = coerce_or_zero(params.humidity.as_ref(), "humidity")?;
        let symptoms = params
            .symptoms
            .map(SymptomsParam::into_list)
            .unwrap_or_default();

        Query::new(crop_type, temperature, humidity, symptoms)
    }
}

fn coerce_or_zero(param: Option<&NumericParam>, field: &'static str) -> Result<f64, QueryError> {
    match param {
        Some(param) => param.coerce(field),
        None => {
            debug!(field, "Reading not supplied, defaulting to 0");
            Ok(0.0)
        }
    }
}
