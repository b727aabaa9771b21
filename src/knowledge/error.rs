use std::path::PathBuf;
use thiserror::Error;

use super::value::AttributeValue;

#[derive(Debug, Error)]
/// Errors returned while scanning a knowledge-base store.
pub enum StoreError {
    /// The export file could not be read.
    #[error("failed to read knowledge base export {path}: {source}")]
    Io {
        /// File path.
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The export file is not valid typed JSON.
    #[error("failed to parse knowledge base export {path}: {source}")]
    Parse {
        /// File path.
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The backend rejected or failed the scan.
    #[error("scan of '{table}' failed: {message}")]
    ScanFailed {
        /// Table name.
        table: String,
        /// Error message.
        message: String,
    },

    /// A numeric attribute was not a finite decimal.
    #[error("malformed decimal value '{value}'")]
    MalformedNumber {
        /// Raw attribute text.
        value: String,
    },

    /// An item lacks the primary key needed to continue paging.
    #[error("item {index} in '{table}' has no '{attribute}' attribute")]
    MissingPrimaryKey {
        /// Table name.
        table: String,
        /// Position of the item in the table.
        index: usize,
        /// Key attribute name.
        attribute: &'static str,
    },

    /// Two items in the export share a primary key, so paging is ambiguous.
    #[error("duplicate {attribute} {value:?} in '{table}' at item {index}")]
    DuplicatePrimaryKey {
        /// Table name.
        table: String,
        /// Position of the second occurrence.
        index: usize,
        /// Key attribute name.
        attribute: &'static str,
        /// The repeated key value.
        value: AttributeValue,
    },

    /// The start key does not identify any item.
    #[error("start key does not match any item in '{table}'")]
    UnknownStartKey {
        /// Table name.
        table: String,
    },

    /// The store returned a page key it had already returned during the scan.
    #[error("scan of '{table}' stalled after {pages} pages: page key repeated")]
    PaginationStalled {
        /// Table name.
        table: String,
        /// Pages fetched before the repeat.
        pages: usize,
    },
}

/// Convenience result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
