//! Error type for the export pipeline

use super::surface::SurfaceError;
use crate::pdf::PdfError;
use crate::StoreError;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Export cancelled")]
    Cancelled,

    #[error("Render surface error: {0}")]
    Surface(#[from] SurfaceError),

    #[error("Render surface did not settle within {0:?}")]
    SettleTimeout(Duration),

    #[error("Captured frame is not a usable JPEG: {0}")]
    InvalidCapture(String),

    #[error("Page {page} failed after {attempts} attempts: {reason}")]
    PageFailed {
        page: usize,
        attempts: u32,
        reason: String,
    },

    #[error("PDF error: {0}")]
    Pdf(#[from] PdfError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Settings error: {0}")]
    Settings(#[from] StoreError),
}

impl ExportError {
    /// Whether another attempt at the same page may succeed
    pub fn is_retryable(&self) -> bool {
        match self {
            ExportError::Surface(SurfaceError::Closed) => false,
            ExportError::Surface(_)
            | ExportError::SettleTimeout(_)
            | ExportError::InvalidCapture(_) => true,
            _ => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, ExportError>;
