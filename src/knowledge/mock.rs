use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use parking_lot::RwLock;

use super::error::{StoreError, StoreResult};
use super::store::{KnowledgeStore, PageKey, ScanPage};
use super::value::{AttributeValue, Item};

const PAGE_KEY_ATTRIBUTE: &str = "page";

/// In-memory paginated store with scan counting and failure injection.
#[derive(Debug, Default)]
pub struct MockKnowledgeStore {
    pages: RwLock<Vec<Vec<Item>>>,
    failure: RwLock<Option<String>>,
    stall: AtomicBool,
    scans: AtomicUsize,
    page_requests: AtomicUsize,
}

impl MockKnowledgeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serves `items` as a single page.
    pub fn with_items(items: Vec<Item>) -> Self {
        Self::with_pages(vec![items])
    }

    pub fn with_pages(pages: Vec<Vec<Item>>) -> Self {
        let store = Self::new();
        store.set_pages(pages);
        store
    }

    /// Replaces the table contents seen by subsequent scans.
    pub fn set_pages(&self, pages: Vec<Vec<Item>>) {
        *self.pages.write() = pages;
    }

    /// Makes every page request fail with `message` until cleared with `None`.
    pub fn set_failure(&self, message: Option<&str>) {
        *self.failure.write() = message.map(str::to_string);
    }

    /// Makes every page repeat its own start key.
    pub fn set_stall(&self, stall: bool) {
        self.stall.store(stall, Ordering::SeqCst);
    }

    /// Number of scans started (first-page requests).
    pub fn scan_count(&self) -> usize {
        self.scans.load(Ordering::SeqCst)
    }

    pub fn page_request_count(&self) -> usize {
        self.page_requests.load(Ordering::SeqCst)
    }

    fn page_key(index: usize) -> PageKey {
        PageKey::from([(PAGE_KEY_ATTRIBUTE.to_string(), AttributeValue::n(index))])
    }

    fn page_index(&self, start_key: Option<&PageKey>) -> StoreResult<usize> {
        let Some(key) = start_key else {
            return Ok(0);
        };

        match key.get(PAGE_KEY_ATTRIBUTE) {
            Some(AttributeValue::Number(n)) => n.parse().map_err(|_| StoreError::UnknownStartKey {
                table: self.table_name().to_string(),
            }),
            _ => Err(StoreError::UnknownStartKey {
                table: self.table_name().to_string(),
            }),
        }
    }
}

impl KnowledgeStore for MockKnowledgeStore {
    fn table_name(&self) -> &str {
        "MockDiseaseKB"
    }

    async fn scan_page(&self, start_key: Option<&PageKey>) -> StoreResult<ScanPage> {
        if start_key.is_none() {
            self.scans.fetch_add(1, Ordering::SeqCst);
        }
        self.page_requests.fetch_add(1, Ordering::SeqCst);

        if let Some(message) = self.failure.read().clone() {
            return Err(StoreError::ScanFailed {
                table: self.table_name().to_string(),
                message,
            });
        }

        let index = self.page_index(start_key)?;
        let pages = self.pages.read();

        let items = pages.get(index).cloned().unwrap_or_default();
        let last_evaluated_key = if self.stall.load(Ordering::SeqCst) {
            Some(start_key.cloned().unwrap_or_else(|| Self::page_key(0)))
        } else if index + 1 < pages.len() {
            Some(Self::page_key(index + 1))
        } else {
            None
        };

        Ok(ScanPage {
            items,
            last_evaluated_key,
        })
    }
}

/// Builds a typed item shaped like a knowledge-base export row.
pub fn disease_item(
    disease_id: &str,
    crop_type: &str,
    temp_range: (f64, f64),
    humidity_min: f64,
    symptoms: &[&str],
) -> Item {
    Item::from([
        ("disease_id".to_string(), AttributeValue::s(disease_id)),
        ("name".to_string(), AttributeValue::s(format!("Disease {disease_id}"))),
        ("crop_type".to_string(), AttributeValue::s(crop_type)),
        (
            "optimal_temp_range".to_string(),
            AttributeValue::List(vec![
                AttributeValue::n(temp_range.0),
                AttributeValue::n(temp_range.1),
            ]),
        ),
        (
            "optimal_humidity_min".to_string(),
            AttributeValue::n(humidity_min),
        ),
        (
            "symptoms".to_string(),
            AttributeValue::string_list(symptoms.iter().copied()),
        ),
    ])
}
