//! Time-to-live cache of the disease knowledge base.

pub mod clock;
pub mod error;
pub mod kb_cache;
pub mod snapshot;


#[cfg(any(test, feature = "mock"))]
pub use clock::MockClock;
pub use clock::{Clock, SystemClock};
pub use error::{CacheError, CacheResult};
pub use kb_cache::KnowledgeBaseCache;
pub use snapshot::KnowledgeSnapshot;
