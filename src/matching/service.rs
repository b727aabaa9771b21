use tracing::instrument;

use super::engine::MatchEngine;
use super::error::MatchError;
use super::query::{Query, QueryParams};
use super::types::MatchReport;
use crate::cache::{Clock, KnowledgeBaseCache, SystemClock};
use crate::config::Config;
use crate::knowledge::KnowledgeStore;

/// Answers disease queries from a cached knowledge base.
#[derive(Debug)]
pub struct DiseaseMatcher<S: KnowledgeStore, C: Clock = SystemClock> {
    cache: KnowledgeBaseCache<S, C>,
    engine: MatchEngine,
}

impl<S: KnowledgeStore> DiseaseMatcher<S, SystemClock> {
    /// Builds a matcher with the configured TTL and result limit.
    pub fn from_config(store: S, config: &Config) -> Self {
        Self::new(
            KnowledgeBaseCache::new(store, config.cache_ttl),
            MatchEngine::new(config.max_results),
        )
    }
}

impl<S: KnowledgeStore, C: Clock> DiseaseMatcher<S, C> {
    pub fn new(cache: KnowledgeBaseCache<S, C>, engine: MatchEngine) -> Self {
        Self { cache, engine }
    }

    pub fn cache(&self) -> &KnowledgeBaseCache<S, C> {
        &self.cache
    }

    pub fn engine(&self) -> &MatchEngine {
        &self.engine
    }

    /// Validates raw parameters, then matches. Invalid input never touches the store.
    pub async fn query(&self, params: QueryParams) -> Result<MatchReport, MatchError> {
        let query = Query::try_from(params)?;
        self.find_matches(&query).await
    }

    #[instrument(skip_all, fields(crop = query.crop_type()))]
    pub async fn find_matches(&self, query: &Query) -> Result<MatchReport, MatchError> {
        let snapshot = self.cache.get_snapshot().await?;
        let matches = self.engine.find_matches(snapshot.records(), query);
        Ok(MatchReport::new(matches))
    }
}
