//! Software render surface: composites a page from decoded assets and
//! encodes it as JPEG, all on blocking threads.

use super::surface::{
    AssetStore, CaptureRequest, RenderScene, RenderSurface, SceneItem, SurfaceError,
};
use crate::MAX_RASTER_DIMENSION;
use doc_model::{AssetRef, CanvasSize, Rect};
use image::codecs::jpeg::JpegEncoder;
use image::imageops::{self, FilterType};
use image::{DynamicImage, ExtendedColorType, ImageEncoder, Rgba, RgbaImage};
use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};
use std::sync::{Arc, RwLock};
use tracing::{debug, warn};

/// Largest multiple of the frame size a single layer may be scaled to
const MAX_LAYER_SCALE: u32 = 4;

/// Assets decoded from files in one directory, cached by name.
///
/// Anything `image` cannot decode (SVG artwork included) is reported as
/// failed and remembered, so each file is attempted once.
pub struct DirAssetStore {
    root: PathBuf,
    cache: RwLock<HashMap<AssetRef, Option<Arc<RgbaImage>>>>,
}

impl DirAssetStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            cache: RwLock::new(HashMap::new()),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn decode(&self, asset: &AssetRef) -> Option<RgbaImage> {
        let relative = Path::new(asset.as_str());
        if !relative.components().all(|c| matches!(c, Component::Normal(_))) {
            warn!(asset = %asset, "asset name escapes the asset directory");
            return None;
        }
        match image::open(self.root.join(relative)) {
            Ok(img) => Some(img.to_rgba8()),
            Err(e) => {
                warn!(asset = %asset, error = %e, "asset failed to load");
                None
            }
        }
    }
}

impl AssetStore for DirAssetStore {
    fn load(&self, asset: &AssetRef) -> Option<Arc<RgbaImage>> {
        {
            let cache = self.cache.read().unwrap_or_else(|e| e.into_inner());
            if let Some(entry) = cache.get(asset) {
                return entry.clone();
            }
        }
        let decoded = self.decode(asset).map(Arc::new);
        self.cache
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .insert(asset.clone(), decoded.clone());
        decoded
    }
}

type Layer = (Rect, Arc<RgbaImage>);

/// Render surface backed by an [`AssetStore`] and the `image` crate
pub struct RasterSurface {
    assets: Arc<dyn AssetStore>,
    scene: Option<RenderScene>,
    /// Decoded layers of the current scene, filled by `settled`
    layers: Option<Vec<Layer>>,
    paper: Rgba<u8>,
}

impl RasterSurface {
    pub fn new(assets: Arc<dyn AssetStore>) -> Self {
        Self {
            assets,
            scene: None,
            layers: None,
            paper: Rgba([255, 255, 255, 255]),
        }
    }

    /// Colour shown where no asset covers the page
    pub fn with_paper(mut self, paper: Rgba<u8>) -> Self {
        self.paper = paper;
        self
    }
}

impl RenderSurface for RasterSurface {
    async fn set_target(&mut self, scene: RenderScene) -> Result<(), SurfaceError> {
        self.scene = Some(scene);
        self.layers = None;
        Ok(())
    }

    async fn settled(&mut self) -> Result<(), SurfaceError> {
        let scene = self
            .scene
            .clone()
            .ok_or_else(|| SurfaceError::Render("no render target set".to_string()))?;
        let assets = Arc::clone(&self.assets);

        let layers = tokio::task::spawn_blocking(move || load_layers(assets.as_ref(), &scene))
            .await
            .map_err(|e| SurfaceError::Render(e.to_string()))?;
        self.layers = Some(layers);
        Ok(())
    }

    async fn capture(&mut self, request: CaptureRequest) -> Result<Vec<u8>, SurfaceError> {
        let canvas = self
            .scene
            .as_ref()
            .map(|s| s.canvas)
            .ok_or_else(|| SurfaceError::Capture("no render target set".to_string()))?;
        let layers = self
            .layers
            .clone()
            .ok_or_else(|| SurfaceError::Capture("frame has not settled".to_string()))?;
        let paper = self.paper;

        tokio::task::spawn_blocking(move || compose_jpeg(canvas, &layers, paper, request))
            .await
            .map_err(|e| SurfaceError::Capture(e.to_string()))?
    }
}

fn load_layers(assets: &dyn AssetStore, scene: &RenderScene) -> Vec<Layer> {
    scene
        .paint_order()
        .filter_map(|item: &SceneItem| match assets.load(&item.asset) {
            Some(img) => Some((item.rect, img)),
            None => {
                debug!(page = scene.page_index, asset = %item.asset, "skipping failed asset");
                None
            }
        })
        .collect()
}

fn compose_jpeg(
    canvas: CanvasSize,
    layers: &[Layer],
    paper: Rgba<u8>,
    request: CaptureRequest,
) -> Result<Vec<u8>, SurfaceError> {
    let density = request.pixel_density;
    let (width, height) = canvas.pixel_size(density);
    if width > MAX_RASTER_DIMENSION || height > MAX_RASTER_DIMENSION {
        return Err(SurfaceError::Capture(format!(
            "{width} x {height} frame exceeds {MAX_RASTER_DIMENSION} pixels per side"
        )));
    }
    let mut frame = RgbaImage::from_pixel(width, height, paper);

    for (rect, img) in layers {
        let w = (rect.width * density).round().max(1.0) as u32;
        let h = (rect.height * density).round().max(1.0) as u32;
        if w > width.saturating_mul(MAX_LAYER_SCALE) || h > height.saturating_mul(MAX_LAYER_SCALE) {
            warn!(width = w, height = h, "layer too large to composite, skipping");
            continue;
        }
        let scaled = imageops::resize(img.as_ref(), w, h, FilterType::Triangle);
        let x = (rect.x * density).round() as i64;
        let y = (rect.y * density).round() as i64;
        imageops::overlay(&mut frame, &scaled, x, y);
    }

    let rgb = DynamicImage::ImageRgba8(frame).to_rgb8();
    let mut out = Vec::new();
    JpegEncoder::new_with_quality(&mut out, request.quality)
        .write_image(rgb.as_raw(), width, height, ExtendedColorType::Rgb8)
        .map_err(|e| SurfaceError::Capture(e.to_string()))?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::surface::AssetStatus;
    use doc_model::{Block, Page};
    use tempfile::TempDir;

    fn asset_dir() -> TempDir {
        let dir = TempDir::new().unwrap();
        RgbaImage::from_pixel(4, 4, Rgba([220, 20, 20, 255]))
            .save(dir.path().join("red.png"))
            .unwrap();
        RgbaImage::from_pixel(4, 4, Rgba([20, 20, 220, 255]))
            .save(dir.path().join("blue.png"))
            .unwrap();
        std::fs::write(dir.path().join("janheader.svg"), "<svg/>").unwrap();
        dir
    }

    #[test]
    fn test_store_reports_status() {
        let dir = asset_dir();
        let store = DirAssetStore::new(dir.path());
        assert_eq!(store.status(&AssetRef::new("red.png")), AssetStatus::Ready);
        assert_eq!(store.status(&AssetRef::new("janheader.svg")), AssetStatus::Failed);
        assert_eq!(store.status(&AssetRef::new("missing.png")), AssetStatus::Failed);
        assert_eq!(store.status(&AssetRef::new("../red.png")), AssetStatus::Failed);
    }

    #[test]
    fn test_store_caches_decoded_assets() {
        let dir = asset_dir();
        let store = DirAssetStore::new(dir.path());
        let first = store.load(&AssetRef::new("red.png")).unwrap();
        std::fs::remove_file(dir.path().join("red.png")).unwrap();
        let second = store.load(&AssetRef::new("red.png")).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }

    fn pixel(jpeg: &[u8], x: u32, y: u32) -> [u8; 3] {
        let img = image::load_from_memory(jpeg).unwrap().to_rgb8();
        img.get_pixel(x, y).0
    }

    #[tokio::test]
    async fn test_capture_composites_background_and_blocks() {
        let dir = asset_dir();
        let mut surface = RasterSurface::new(Arc::new(DirAssetStore::new(dir.path())));

        let page = Page::new("p", "red.png").with_blocks([
            Block::new("blue.png", Rect::new(0.0, 0.0, 768.0, 1024.0), false).unwrap(),
            Block::new("janheader.svg", Rect::new(768.0, 1024.0, 768.0, 1024.0), false).unwrap(),
        ]);
        surface
            .set_target(RenderScene::from_page(&page, 0, CanvasSize::PLANNER))
            .await
            .unwrap();
        surface.settled().await.unwrap();

        let request = CaptureRequest {
            pixel_density: 0.02,
            quality: 90,
        };
        let jpeg = surface.capture(request).await.unwrap();
        let decoded = image::load_from_memory(&jpeg).unwrap();
        assert_eq!((decoded.width(), decoded.height()), CanvasSize::PLANNER.pixel_size(0.02));

        let [r, _, b] = pixel(&jpeg, 2, 2);
        assert!(b > r, "top-left quadrant should be the blue block");
        let [r, _, b] = pixel(&jpeg, 25, 35);
        assert!(r > b, "bottom-right shows the background behind the failed svg");
    }

    #[tokio::test]
    async fn test_capture_refuses_oversized_frame() {
        let dir = asset_dir();
        let mut surface = RasterSurface::new(Arc::new(DirAssetStore::new(dir.path())));
        let page = Page::new("p", "red.png");
        surface
            .set_target(RenderScene::from_page(&page, 0, CanvasSize::PLANNER))
            .await
            .unwrap();
        surface.settled().await.unwrap();

        let request = CaptureRequest {
            pixel_density: 64.0,
            quality: 80,
        };
        assert!(matches!(
            surface.capture(request).await,
            Err(SurfaceError::Capture(_))
        ));
    }

    #[tokio::test]
    async fn test_capture_requires_settle() {
        let dir = asset_dir();
        let mut surface = RasterSurface::new(Arc::new(DirAssetStore::new(dir.path())));
        let page = Page::new("p", "red.png");
        surface
            .set_target(RenderScene::from_page(&page, 0, CanvasSize::PLANNER))
            .await
            .unwrap();
        let request = CaptureRequest {
            pixel_density: 0.01,
            quality: 80,
        };
        assert!(matches!(
            surface.capture(request).await,
            Err(SurfaceError::Capture(_))
        ));
    }
}
