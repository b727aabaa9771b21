use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::knowledge::DiseaseRecord;

/// Immutable, fully loaded copy of the knowledge base.
#[derive(Debug)]
pub struct KnowledgeSnapshot {
    records: Vec<DiseaseRecord>,
    loaded_at: DateTime<Utc>,
    generation: u64,
    pages: usize,
}

impl KnowledgeSnapshot {
    pub fn new(
        records: Vec<DiseaseRecord>,
        loaded_at: DateTime<Utc>,
        generation: u64,
        pages: usize,
    ) -> Self {
        Self {
            records,
            loaded_at,
            generation,
            pages,
        }
    }

    /// Records in backend scan order.
    #[inline]
    pub fn records(&self) -> &[DiseaseRecord] {
        &self.records
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn loaded_at(&self) -> DateTime<Utc> {
        self.loaded_at
    }

    /// 1 for the first successful load, incremented on every reload.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Scan pages fetched to build this snapshot.
    pub fn pages(&self) -> usize {
        self.pages
    }

    /// Age at `now`, or `None` if `now` precedes the load.
    pub fn age_at(&self, now: DateTime<Utc>) -> Option<Duration> {
        (now - self.loaded_at).to_std().ok()
    }

    /// `true` while the age is strictly below `ttl`. A clock that moved
    /// backwards counts as expired.
    pub fn is_fresh_at(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        self.age_at(now).is_some_and(|age| age < ttl)
    }

    pub fn malformed_count(&self) -> usize {
        self.records
            .iter()
            .filter(|r| r.has_malformed_thresholds())
            .count()
    }
}
