//! Store - settings, PDF writing and planner export
//!
//! This crate turns a planner document into its output artifact: it loads
//! and saves the application settings, renders pages through a render
//! surface, and writes them as a PDF with month-tab and day-grid links.

mod error;
mod settings;
pub mod export;
pub mod pdf;

pub use error::*;
pub use settings::*;

pub use export::{
    CancelToken, DirAssetStore, ExportError, ExportLayout, ExportPipeline, ExportReport,
    LinkPlan, LinkRegion, RasterSurface, RenderScene, RenderSurface,
};
