//! Error types for document model operations

use crate::{BlockId, PageId};
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum DocModelError {
    #[error("Page not found: {0}")]
    PageNotFound(PageId),

    #[error("Block not found: {0}")]
    BlockNotFound(BlockId),

    #[error("Page index {index} out of range (document has {len} pages)")]
    PageIndexOutOfRange { index: usize, len: usize },

    #[error("Invalid geometry: {0}")]
    InvalidGeometry(String),

    #[error("Unknown month code: {0}")]
    UnknownMonth(String),

    #[error("Unknown start day: {0}")]
    UnknownStartDay(String),

    #[error("Duplicate id: {0}")]
    DuplicateId(String),

    #[error("A document must contain at least one page")]
    EmptyDocument,
}

pub type Result<T> = std::result::Result<T, DocModelError>;
