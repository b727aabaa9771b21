//! Cross-cutting, shared constants.
//!
//! The scoring weights are fixed: temperature and humidity are worth
//! [`TEMPERATURE_WEIGHT`] and [`HUMIDITY_WEIGHT`] each, symptoms [`SYMPTOM_WEIGHT`],
//! for a maximum of [`MAX_MATCH_SCORE`].

/// Seconds a knowledge-base snapshot may be served before it is reloaded.
pub const DEFAULT_CACHE_TTL_SECS: u64 = 300;

/// Number of ranked matches returned per query.
pub const DEFAULT_MAX_RESULTS: usize = 5;

/// Items per page when scanning the file-backed store.
pub const DEFAULT_PAGE_SIZE: usize = 100;

/// Default location of the knowledge-base export.
pub const DEFAULT_KB_PATH: &str = "./data/disease_kb.json";

pub const TEMPERATURE_WEIGHT: f64 = 40.0;
pub const HUMIDITY_WEIGHT: f64 = 40.0;
pub const SYMPTOM_WEIGHT: f64 = 20.0;
pub const MAX_MATCH_SCORE: f64 = TEMPERATURE_WEIGHT + HUMIDITY_WEIGHT + SYMPTOM_WEIGHT;

/// Partial credit awarded when a reading is near, but outside, the favorable range.
pub const NEAR_MATCH_POINTS: f64 = 20.0;

/// Degrees outside `[tmin, tmax]` still considered "near" the optimal range.
pub const TEMPERATURE_NEAR_MARGIN: f64 = 5.0;

/// Percentage points below `hmin` still considered "near" the threshold.
pub const HUMIDITY_NEAR_MARGIN: f64 = 10.0;

/// Permissive range substituted for a missing or malformed temperature range.
pub const DEFAULT_TEMP_RANGE: (f64, f64) = (0.0, 100.0);

/// Humidity minimum used when a record does not carry a usable one.
pub const DEFAULT_HUMIDITY_MIN: f64 = 0.0;

/// Primary key attribute of a knowledge-base item.
pub const PRIMARY_KEY_ATTRIBUTE: &str = "disease_id";
