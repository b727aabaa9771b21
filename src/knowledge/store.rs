use std::collections::HashSet;

use tracing::debug;

use super::error::{StoreError, StoreResult};
use super::value::Item;

/// Opaque continuation key handed back by a paginated scan.
pub type PageKey = Item;

/// One page of a table scan.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScanPage {
    pub items: Vec<Item>,
    /// Key to resume from; `None` on the last page.
    pub last_evaluated_key: Option<PageKey>,
}

impl ScanPage {
    pub fn last(items: Vec<Item>) -> Self {
        Self {
            items,
            last_evaluated_key: None,
        }
    }

    pub fn is_last(&self) -> bool {
        self.last_evaluated_key.is_none()
    }
}

/// Backing store for the disease knowledge base.
///
/// Implementations return raw typed items; normalization happens in the cache.
pub trait KnowledgeStore: Send + Sync {
    /// Table name, used in logs and errors.
    fn table_name(&self) -> &str;

    /// Fetches the page starting after `start_key` (or the first page).
    fn scan_page(
        &self,
        start_key: Option<&PageKey>,
    ) -> impl std::future::Future<Output = StoreResult<ScanPage>> + Send;
}

/// Items collected from every page of a scan.
#[derive(Debug, Clone, Default)]
pub struct FullScan {
    pub items: Vec<Item>,
    pub pages: usize,
}

/// Follows `last_evaluated_key` until the store reports the final page.
///
/// Fails with [`StoreError::PaginationStalled`] if the store hands back any key
/// it has already returned during this scan.
pub async fn scan_all<S: KnowledgeStore + ?Sized>(store: &S) -> StoreResult<FullScan> {
    let mut scan = FullScan::default();
    let mut start_key: Option<PageKey> = None;
    let mut seen: HashSet<PageKey> = HashSet::new();

    loop {
        let page = store.scan_page(start_key.as_ref()).await?;
        scan.pages += 1;
        scan.items.extend(page.items);

        debug!(
            table = store.table_name(),
            page = scan.pages,
            items = scan.items.len(),
            "Scanned knowledge base page"
        );

        match page.last_evaluated_key {
            None => return Ok(scan),
            Some(next) if !seen.insert(next.clone()) => {
                return Err(StoreError::PaginationStalled {
                    table: store.table_name().to_string(),
                    pages: scan.pages,
                });
            }
            Some(next) => start_key = Some(next),
        }
    }
}
