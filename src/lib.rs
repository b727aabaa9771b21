//! Pestmatch library crate (used by the CLI binary and integration tests).
//!
//! # Public API Surface
//!
//! The exports are organized by module:
//!
//! ## Knowledge Base
//! - [`KnowledgeStore`], [`JsonFileStore`] - Paginated sources of typed items
//! - [`AttributeValue`], [`normalize_item`] - Typed-JSON decoding and number normalization
//! - [`DiseaseRecord`], [`TempRange`] - Parsed disease entries
//!
//! ## Cache
//! - [`KnowledgeBaseCache`], [`KnowledgeSnapshot`] - Time-to-live snapshot cache
//! - [`Clock`], [`SystemClock`] - Injectable time source
//!
//! ## Matching
//! - [`MatchEngine`] - Crop filter, additive scoring and ranking
//! - [`Query`], [`QueryParams`] - Validated and raw query input
//! - [`DiseaseMatcher`], [`MatchReport`] - Cache plus engine
//!
//! ## Test/Mock Support
//! Mock implementations are available behind `#[cfg(any(test, feature = "mock"))]`.

pub mod cache;
pub mod config;
pub mod constants;
pub mod knowledge;
pub mod matching;

#[cfg(any(test, feature = "mock"))]
pub use cache::MockClock;
pub use cache::{
    CacheError, CacheResult, Clock, KnowledgeBaseCache, KnowledgeSnapshot, SystemClock,
};

pub use config::{Config, ConfigError};

#[cfg(any(test, feature = "mock"))]
pub use knowledge::{MockKnowledgeStore, disease_item};
pub use knowledge::{
    AttributeValue, DiseaseRecord, FullScan, Item, JsonFileStore, KnowledgeStore, PageKey,
    RecordField, ScanPage, SpreadRate, StoreError, StoreResult, TempRange, normalize_decimal,
    normalize_item, scan_all,
};

pub use matching::{
    DiseaseMatcher, MatchEngine, MatchError, MatchReport, MatchResult, NumericParam, Query,
    QueryError, QueryParams, SymptomsParam,
};
