use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use super::error::{StoreError, StoreResult};
use super::store::{KnowledgeStore, PageKey, ScanPage};
use super::value::Item;
use crate::constants::PRIMARY_KEY_ATTRIBUTE;

/// Scan-response-shaped export: `{"Items": [ ... typed items ... ]}`.
#[derive(Debug, Deserialize)]
struct ExportFile {
    #[serde(rename = "Items")]
    items: Vec<Item>,
}

/// Knowledge-base store backed by a typed-JSON export on disk.
///
/// The file is re-read for every page, so each full scan observes the file as
/// it is at that moment. Pages are keyed by `disease_id`, like a table scan.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
    table_name: String,
    page_size: usize,
}

impl JsonFileStore {
    pub const DEFAULT_TABLE_NAME: &'static str = "PestDiseaseKB";

    pub fn new(path: impl Into<PathBuf>, page_size: usize) -> Self {
        Self {
            path: path.into(),
            table_name: Self::DEFAULT_TABLE_NAME.to_string(),
            page_size: page_size.max(1),
        }
    }

    pub fn with_table_name(mut self, table_name: impl Into<String>) -> Self {
        self.table_name = table_name.into();
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    async fn read_items(&self) -> StoreResult<Vec<Item>> {
        let raw = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|source| StoreError::Io {
                path: self.path.clone(),
                source,
            })?;

        let export: ExportFile =
            serde_json::from_str(&raw).map_err(|source| StoreError::Parse {
                path: self.path.clone(),
                source,
            })?;

        self.check_unique_keys(&export.items)?;
        Ok(export.items)
    }

    /// Page keys must identify exactly one item, or a scan could cycle.
    fn check_unique_keys(&self, items: &[Item]) -> StoreResult<()> {
        let mut seen = HashSet::with_capacity(items.len());
        for (index, item) in items.iter().enumerate() {
            let Some(key) = item.get(PRIMARY_KEY_ATTRIBUTE) else {
                continue;
            };
            if !seen.insert(key) {
                return Err(StoreError::DuplicatePrimaryKey {
                    table: self.table_name.clone(),
                    index,
                    attribute: PRIMARY_KEY_ATTRIBUTE,
                    value: key.clone(),
                });
            }
        }
        Ok(())
    }

    fn key_of(&self, items: &[Item], index: usize) -> StoreResult<PageKey> {
        let value = items[index].get(PRIMARY_KEY_ATTRIBUTE).ok_or_else(|| {
            StoreError::MissingPrimaryKey {
                table: self.table_name.clone(),
                index,
                attribute: PRIMARY_KEY_ATTRIBUTE,
            }
        })?;

        Ok(PageKey::from([(
            PRIMARY_KEY_ATTRIBUTE.to_string(),
            value.clone(),
        )]))
    }
}

impl KnowledgeStore for JsonFileStore {
    fn table_name(&self) -> &str {
        &self.table_name
    }

    async fn scan_page(&self, start_key: Option<&PageKey>) -> StoreResult<ScanPage> {
        let mut items = self.read_items().await?;

        let start = match start_key.and_then(|k| k.get(PRIMARY_KEY_ATTRIBUTE)) {
            None if start_key.is_none() => 0,
            None => {
                return Err(StoreError::UnknownStartKey {
                    table: self.table_name.clone(),
                });
            }
            Some(key) => {
                let position = items
                    .iter()
                    .position(|item| item.get(PRIMARY_KEY_ATTRIBUTE) == Some(key))
                    .ok_or_else(|| StoreError::UnknownStartKey {
                        table: self.table_name.clone(),
                    })?;
                position + 1
            }
        };

        let end = (start + self.page_size).min(items.len());
        let last_evaluated_key = if end < items.len() {
            Some(self.key_of(&items, end - 1)?)
        } else {
            None
        };

        debug!(
            path = %self.path.display(),
            start,
            end,
            "Read knowledge base export page"
        );

        let page_items = if start < end {
            items.drain(start..end).collect()
        } else {
            Vec::new()
        };

        Ok(ScanPage {
            items: page_items,
            last_evaluated_key,
        })
    }
}
