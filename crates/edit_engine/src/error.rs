//! Error types for editing operations

use doc_model::BlockId;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum EditError {
    #[error("Invalid command: {0}")]
    InvalidCommand(String),

    #[error("Document model error: {0}")]
    DocModel(#[from] doc_model::DocModelError),

    #[error("Block {0} is locked")]
    BlockLocked(BlockId),

    #[error("The current page is the last page; there is no next page to receive the layout")]
    NoNextPage,

    #[error("Page {page} is a month page; its calendar grid cannot be removed or unlocked")]
    CalendarGridProtected { page: usize },

    #[error("Command requires confirmation: {0}")]
    ConfirmationRequired(String),

    #[error("Editing session is closed")]
    SessionClosed,
}

pub type Result<T> = std::result::Result<T, EditError>;
