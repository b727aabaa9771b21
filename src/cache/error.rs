use crate::knowledge::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
/// Errors returned by the knowledge-base cache.
pub enum CacheError {
    /// Scanning or normalizing the backing store failed. No snapshot is served.
    #[error("failed to load disease knowledge base from '{table}': {source}")]
    Load {
        /// Table name of the backing store.
        table: String,
        #[source]
        source: StoreError,
    },
}

/// Convenience result type for cache operations.
pub type CacheResult<T> = Result<T, CacheError>;
