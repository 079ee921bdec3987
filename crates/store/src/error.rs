//! Error types for storage operations

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Document model error: {0}")]
    DocModel(#[from] doc_model::DocModelError),

    #[error("Invalid settings: {0}")]
    InvalidSettings(String),
}

pub type Result<T> = std::result::Result<T, StoreError>;
