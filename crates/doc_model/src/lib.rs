//! Document Model - Planner pages, blocks and calendar classification
//!
//! This crate provides the value types for the planner editor: blocks
//! (positioned asset references), pages (ordered block lists with a
//! background and a month/role classification), the document with its
//! editing cursor, and the deterministic month-bundle generator.

mod asset;
mod block;
pub mod bundle;
mod calendar;
mod document;
mod error;
mod geometry;
mod ids;
mod page;
pub mod sizing;

pub use asset::*;
pub use block::*;
pub use bundle::{generate_month_bundle, BUNDLE_DAYS, BUNDLE_LEN, BUNDLE_WEEKS};
pub use calendar::*;
pub use document::*;
pub use error::*;
pub use geometry::*;
pub use ids::*;
pub use page::*;
pub use sizing::{Placement, SizeProfile};
