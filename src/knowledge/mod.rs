//! Disease knowledge base: raw store items, normalization and records.
//!
//! A [`KnowledgeStore`] hands back pages of typed [`Item`]s. The cache drives
//! [`scan_all`] to collect every page, normalizes each item with
//! [`normalize_item`] and turns it into a [`DiseaseRecord`].

pub mod error;
pub mod file;
#[cfg(any(test, feature = "mock"))]
pub mod mock;
pub mod record;
pub mod store;
pub mod value;

#[cfg(test)]
mod tests;

pub use error::{StoreError, StoreResult};
pub use file::JsonFileStore;
#[cfg(any(test, feature = "mock"))]
pub use mock::{MockKnowledgeStore, disease_item};
pub use record::{DiseaseRecord, RecordField, SpreadRate, TempRange, parse_temp_range};
pub use store::{FullScan, KnowledgeStore, PageKey, ScanPage, scan_all};
pub use value::{AttributeValue, Item, normalize_decimal, normalize_item};
