//! Planner export: link geometry, link planning, render surfaces and the
//! pipeline that turns a document into a navigable PDF.

mod error;
mod layout;
mod links;
mod pipeline;
mod raster;
mod surface;

pub use error::{ExportError, Result};
pub use layout::{DayGrid, ExportLayout, TabStrip};
pub use links::{find_first_day_page, find_month_page, LinkPlan, LinkRegion};
pub use pipeline::{CancelToken, ExportPipeline, ExportReport, STAGING_SUFFIX};
pub use raster::{DirAssetStore, RasterSurface};
pub use surface::{
    AssetStatus, AssetStore, CaptureRequest, RenderScene, RenderSurface, SceneItem, SurfaceError,
};
