//! The render surface the export pipeline drives, and the asset store that
//! backs it.

use doc_model::{AssetRef, BlockId, CanvasSize, Page, Rect};
use std::sync::Arc;
use thiserror::Error;

/// Failure reported by a render surface
#[derive(Debug, Clone, Error, PartialEq)]
pub enum SurfaceError {
    #[error("Render failed: {0}")]
    Render(String),

    #[error("Capture failed: {0}")]
    Capture(String),

    #[error("Render surface is no longer available")]
    Closed,
}

/// One positioned asset to draw
#[derive(Debug, Clone, PartialEq)]
pub struct SceneItem {
    /// `None` for the page background
    pub block_id: Option<BlockId>,
    pub asset: AssetRef,
    pub rect: Rect,
    pub locked: bool,
}

/// Everything needed to draw one page
#[derive(Debug, Clone, PartialEq)]
pub struct RenderScene {
    pub page_index: usize,
    pub canvas: CanvasSize,
    /// Full-bleed background, drawn first
    pub background: SceneItem,
    /// Blocks in z-order, later items on top
    pub items: Vec<SceneItem>,
}

impl RenderScene {
    pub fn from_page(page: &Page, page_index: usize, canvas: CanvasSize) -> Self {
        let background = SceneItem {
            block_id: None,
            asset: page.background.clone(),
            rect: canvas.bounds(),
            locked: true,
        };
        let items = page
            .blocks()
            .iter()
            .map(|block| SceneItem {
                block_id: Some(block.id()),
                asset: block.asset.clone(),
                rect: block.rect(),
                locked: block.locked,
            })
            .collect();
        Self {
            page_index,
            canvas,
            background,
            items,
        }
    }

    /// Background then blocks, in paint order
    pub fn paint_order(&self) -> impl Iterator<Item = &SceneItem> {
        std::iter::once(&self.background).chain(self.items.iter())
    }
}

/// How to rasterize the settled frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CaptureRequest {
    /// Raster pixels per canvas unit
    pub pixel_density: f64,
    /// JPEG quality, 1-100
    pub quality: u8,
}

/// A surface that draws one page at a time and captures it as JPEG.
///
/// The pipeline calls `set_target`, then awaits `settled` (bounded by a
/// timeout), then `capture`; it never overlaps calls.
#[trait_variant::make(Send)]
pub trait RenderSurface: Send {
    /// Switch the surface to a new page
    async fn set_target(&mut self, scene: RenderScene) -> Result<(), SurfaceError>;

    /// Resolve once the current target is fully drawn
    async fn settled(&mut self) -> Result<(), SurfaceError>;

    /// Rasterize the settled frame into JPEG bytes
    async fn capture(&mut self, request: CaptureRequest) -> Result<Vec<u8>, SurfaceError>;
}

/// Whether an asset can be drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetStatus {
    Ready,
    Failed,
}

/// Flat namespace of decoded assets.
///
/// A failed asset is not an error for the page: the block is skipped and
/// the rest of the page still renders.
pub trait AssetStore: Send + Sync {
    /// Decoded pixels, or `None` when the asset is missing or undecodable
    fn load(&self, asset: &AssetRef) -> Option<Arc<image::RgbaImage>>;

    fn status(&self, asset: &AssetRef) -> AssetStatus {
        match self.load(asset) {
            Some(_) => AssetStatus::Ready,
            None => AssetStatus::Failed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use doc_model::Block;

    #[test]
    fn test_scene_from_page_keeps_z_order() {
        let page = Page::new("p", "paper.png").with_blocks([
            Block::new("a.png", Rect::new(0.0, 0.0, 10.0, 10.0), false).unwrap(),
            Block::new("b.png", Rect::new(5.0, 5.0, 10.0, 10.0), true).unwrap(),
        ]);
        let scene = RenderScene::from_page(&page, 3, CanvasSize::PLANNER);

        let assets: Vec<_> = scene.paint_order().map(|i| i.asset.as_str()).collect();
        assert_eq!(assets, vec!["paper.png", "a.png", "b.png"]);
        assert_eq!(scene.background.rect, CanvasSize::PLANNER.bounds());
        assert_eq!(scene.page_index, 3);
        assert!(scene.items[1].locked);
    }
}
