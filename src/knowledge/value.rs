//! Store-typed attribute values and numeric normalization.
//!
//! Items arrive in DynamoDB's typed-JSON shape, where every number is a
//! fixed-point decimal carried as a string (`{"N": "72.5"}`). Normalization
//! turns an item into plain [`serde_json::Value`]s, mapping each decimal to an
//! integer when it has no fractional part and to a float otherwise.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

use super::error::{StoreError, StoreResult};

/// One raw record as returned by a scan.
pub type Item = BTreeMap<String, AttributeValue>;

/// Largest magnitude at which every integer is exactly representable as `f64`.
const MAX_EXACT_INTEGER: f64 = 9_007_199_254_740_992.0;

/// A single typed attribute value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AttributeValue {
    #[serde(rename = "S")]
    String(String),
    /// Fixed-point decimal in string form.
    #[serde(rename = "N")]
    Number(String),
    #[serde(rename = "BOOL")]
    Bool(bool),
    #[serde(rename = "NULL")]
    Null(bool),
    #[serde(rename = "L")]
    List(Vec<AttributeValue>),
    #[serde(rename = "M")]
    Map(BTreeMap<String, AttributeValue>),
    #[serde(rename = "SS")]
    StringSet(Vec<String>),
    #[serde(rename = "NS")]
    NumberSet(Vec<String>),
}

impl AttributeValue {
    pub fn s(value: impl Into<String>) -> Self {
        Self::String(value.into())
    }

    pub fn n(value: impl ToString) -> Self {
        Self::Number(value.to_string())
    }

    pub fn string_list<I, T>(values: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        Self::List(values.into_iter().map(|v| Self::String(v.into())).collect())
    }

    /// Normalizes this value (recursively) into plain JSON.
    pub fn normalize(&self) -> StoreResult<Value> {
        Ok(match self {
            AttributeValue::String(s) => Value::String(s.clone()),
            AttributeValue::Number(n) => Value::Number(normalize_decimal(n)?),
            AttributeValue::Bool(b) => Value::Bool(*b),
            AttributeValue::Null(_) => Value::Null,
            AttributeValue::List(items) => Value::Array(
                items
                    .iter()
                    .map(AttributeValue::normalize)
                    .collect::<StoreResult<_>>()?,
            ),
            AttributeValue::Map(map) => Value::Object(normalize_map(map)?),
            AttributeValue::StringSet(items) => {
                Value::Array(items.iter().cloned().map(Value::String).collect())
            }
            AttributeValue::NumberSet(items) => Value::Array(
                items
                    .iter()
                    .map(|n| normalize_decimal(n).map(Value::Number))
                    .collect::<StoreResult<_>>()?,
            ),
        })
    }
}

/// Converts a decimal string to an integer when it has no fractional part,
/// otherwise to a float.
///
/// `"75"`, `"75.0"` and `"7.5e1"` all become the integer `75`; `"72.5"` becomes
/// `72.5`. Strings that are not finite decimals are rejected.
pub fn normalize_decimal(raw: &str) -> StoreResult<Number> {
    let trimmed = raw.trim();

    if let Ok(int) = trimmed.parse::<i64>() {
        return Ok(Number::from(int));
    }

    let malformed = || StoreError::MalformedNumber {
        value: raw.to_string(),
    };

    let float: f64 = trimmed.parse().map_err(|_| malformed())?;
    if !float.is_finite() {
        return Err(malformed());
    }

    if float.fract() == 0.0 && float.abs() < MAX_EXACT_INTEGER {
        return Ok(Number::from(float as i64));
    }

    Number::from_f64(float).ok_or_else(malformed)
}

/// Normalizes every attribute of an item.
pub fn normalize_item(item: &Item) -> StoreResult<Map<String, Value>> {
    normalize_map(item)
}

fn normalize_map(map: &BTreeMap<String, AttributeValue>) -> StoreResult<Map<String, Value>> {
    map.iter()
        .map(|(key, value)| Ok((key.clone(), value.normalize()?)))
        .collect()
}
