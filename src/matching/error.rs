use thiserror::Error;

use crate::cache::CacheError;

#[derive(Debug, Error, PartialEq)]
/// Caller errors detected while building a [`Query`](super::Query).
pub enum QueryError {
    #[error("crop_type parameter is required")]
    MissingCropType,

    #[error("{field} must be numeric, got '{value}'")]
    NotNumeric { field: &'static str, value: String },

    #[error("{field} must be a finite number")]
    NonFinite { field: &'static str },
}

#[derive(Debug, Error)]
pub enum MatchError {
    #[error("invalid query: {0}")]
    Query(#[from] QueryError),

    #[error(transparent)]
    KnowledgeBase(#[from] CacheError),
}
