//! Condition-based disease matching.
//!
//! The [`MatchEngine`] ranks knowledge-base records against a [`Query`] with an
//! additive score out of 100:
//!
//! | Component   | Full | Near | Condition for "near"                 |
//! |-------------|------|------|--------------------------------------|
//! | Temperature | 40   | 20   | within 5 degrees of `[tmin, tmax]`   |
//! | Humidity    | 40   | 20   | within 10 points below `hmin`        |
//! | Symptoms    | 20   | -    | proportional; skipped with no symptoms |
//!
//! Every evaluated component contributes a reasoning string, including ones
//! that score zero. [`DiseaseMatcher`] pairs the engine with the knowledge-base
//! cache.

pub mod engine;
pub mod error;
pub mod query;
pub mod service;
pub mod types;


pub use engine::{
    MatchEngine, filter_by_crop, round_score, score_humidity, score_symptoms, score_temperature,
};
pub use error::{MatchError, QueryError};
pub use query::{NumericParam, Query, QueryParams, SymptomsParam};
pub use service::DiseaseMatcher;
pub use types::{ComponentScore, MatchReport, MatchResult};
