use std::sync::Arc;
use std::time::Duration;

use parking_lot::RwLock;
use tokio::sync::Mutex;
use tracing::{debug, info, instrument, warn};

use super::clock::{Clock, SystemClock};
use super::error::{CacheError, CacheResult};
use super::snapshot::KnowledgeSnapshot;
use crate::knowledge::{
    DiseaseRecord, KnowledgeStore, StoreError, StoreResult, normalize_item, scan_all,
};

#[derive(Default)]
struct Slot {
    snapshot: Option<Arc<KnowledgeSnapshot>>,
    invalidated: bool,
    generation: u64,
}

/// Time-to-live cache over a [`KnowledgeStore`].
///
/// Holds one immutable snapshot. Readers clone the `Arc`; a reload builds a new
/// snapshot and swaps it in whole. Reloads are serialized so concurrent callers
/// that find the snapshot expired trigger a single scan.
pub struct KnowledgeBaseCache<S: KnowledgeStore, C: Clock = SystemClock> {
    store: S,
    clock: C,
    ttl: Duration,
    slot: RwLock<Slot>,
    refresh: Mutex<()>,
}

impl<S: KnowledgeStore, C: Clock> std::fmt::Debug for KnowledgeBaseCache<S, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let slot = self.slot.read();
        f.debug_struct("KnowledgeBaseCache")
            .field("table", &self.store.table_name())
            .field("ttl", &self.ttl)
            .field("generation", &slot.generation)
            .field("records", &slot.snapshot.as_ref().map(|s| s.len()))
            .finish_non_exhaustive()
    }
}

impl<S: KnowledgeStore> KnowledgeBaseCache<S, SystemClock> {
    pub fn new(store: S, ttl: Duration) -> Self {
        Self::with_clock(store, SystemClock, ttl)
    }
}

impl<S: KnowledgeStore, C: Clock> KnowledgeBaseCache<S, C> {
    pub fn with_clock(store: S, clock: C, ttl: Duration) -> Self {
        Self {
            store,
            clock,
            ttl,
            slot: RwLock::new(Slot::default()),
            refresh: Mutex::new(()),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Returns the cached snapshot while it is younger than the TTL, otherwise
    /// reloads every page from the store.
    ///
    /// A failed reload is returned as an error; the previous snapshot stays
    /// available through [`last_snapshot`](Self::last_snapshot) but is not served.
    #[instrument(skip(self), fields(table = self.store.table_name()))]
    pub async fn get_snapshot(&self) -> CacheResult<Arc<KnowledgeSnapshot>> {
        if let Some(snapshot) = self.fresh_snapshot() {
            debug!(
                generation = snapshot.generation(),
                records = snapshot.len(),
                "Using cached disease knowledge base"
            );
            return Ok(snapshot);
        }

        let _guard = self.refresh.lock().await;

        // Another caller may have reloaded while we waited.
        if let Some(snapshot) = self.fresh_snapshot() {
            return Ok(snapshot);
        }

        self.reload().await
    }

    /// Reloads unconditionally.
    pub async fn refresh(&self) -> CacheResult<Arc<KnowledgeSnapshot>> {
        let _guard = self.refresh.lock().await;
        self.reload().await
    }

    /// Marks the current snapshot expired without discarding it.
    pub fn invalidate(&self) {
        self.slot.write().invalidated = true;
    }

    /// The most recent successfully loaded snapshot, regardless of age.
    pub fn last_snapshot(&self) -> Option<Arc<KnowledgeSnapshot>> {
        self.slot.read().snapshot.clone()
    }

    /// Number of successful loads so far.
    pub fn generation(&self) -> u64 {
        self.slot.read().generation
    }

    pub fn is_fresh(&self) -> bool {
        self.fresh_snapshot().is_some()
    }

    fn fresh_snapshot(&self) -> Option<Arc<KnowledgeSnapshot>> {
        let now = self.clock.now();
        let slot = self.slot.read();
        if slot.invalidated {
            return None;
        }
        slot.snapshot
            .as_ref()
            .filter(|s| s.is_fresh_at(now, self.ttl))
            .cloned()
    }

    async fn reload(&self) -> CacheResult<Arc<KnowledgeSnapshot>> {
        let table = self.store.table_name();
        info!(table, "Loading disease knowledge base");

        let load_error = |source: StoreError| {
            warn!(table, error = %source, "Knowledge base load failed");
            CacheError::Load {
                table: table.to_string(),
                source,
            }
        };

        let scan = scan_all(&self.store).await.map_err(load_error)?;
        let records = scan
            .items
            .iter()
            .map(|item| normalize_item(item).map(|map| DiseaseRecord::from_item(&map)))
            .collect::<StoreResult<Vec<_>>>()
            .map_err(load_error)?;

        let loaded_at = self.clock.now();
        let snapshot = {
            let mut slot = self.slot.write();
            slot.generation += 1;
            let snapshot = Arc::new(KnowledgeSnapshot::new(
                records,
                loaded_at,
                slot.generation,
                scan.pages,
            ));
            slot.snapshot = Some(Arc::clone(&snapshot));
            slot.invalidated = false;
            snapshot
        };

        if snapshot.malformed_count() > 0 {
            warn!(
                table,
                malformed = snapshot.malformed_count(),
                "Knowledge base contains records with malformed thresholds"
            );
        }

        info!(
            table,
            records = snapshot.len(),
            pages = snapshot.pages(),
            generation = snapshot.generation(),
            "Loaded disease knowledge base"
        );

        Ok(snapshot)
    }
}
