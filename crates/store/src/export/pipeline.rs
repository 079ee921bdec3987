//! Export pipeline: renders every page through a [`RenderSurface`], writes
//! each capture as a full-bleed PDF page and stamps the navigation links.
//!
//! Pages are processed strictly one after another on a single surface:
//! target, settle, capture, then links. Capturing is retried per page; a
//! page that keeps failing aborts the whole export.

use super::error::{ExportError, Result};
use super::layout::ExportLayout;
use super::links::LinkPlan;
use super::surface::{CaptureRequest, RenderScene, RenderSurface};
use crate::pdf::{DocumentWriter, JpegImage, PlannerPdfWriter};
use crate::settings::ExportSettings;
use doc_model::PlannerDocument;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, info, warn};

/// Suffix of the staging file written before the final rename
pub const STAGING_SUFFIX: &str = ".partial";

/// Cooperative cancellation flag shared with the running export
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    /// Clear a previous cancellation so the pipeline can run again
    pub fn reset(&self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// Summary of a finished export
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportReport {
    pub pages: usize,
    pub links: usize,
    /// Attempts beyond the first, summed over all pages
    pub retries: u32,
    /// Final artifact, when exported to a file
    pub output: Option<PathBuf>,
}

pub struct ExportPipeline<S: RenderSurface> {
    surface: S,
    settings: ExportSettings,
    layout: ExportLayout,
    cancel: CancelToken,
    progress: watch::Sender<Option<u8>>,
}

impl<S: RenderSurface> ExportPipeline<S> {
    pub fn new(surface: S, settings: ExportSettings) -> Result<Self> {
        settings.validate()?;
        let (progress, _) = watch::channel(None);
        Ok(Self {
            surface,
            settings,
            layout: ExportLayout::default(),
            cancel: CancelToken::new(),
            progress,
        })
    }

    pub fn with_layout(mut self, layout: ExportLayout) -> Self {
        self.layout = layout;
        self
    }

    /// Share a cancellation token created by the caller
    pub fn with_cancel_token(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn settings(&self) -> &ExportSettings {
        &self.settings
    }

    /// Token that aborts the export before the next page or capture.
    ///
    /// A cancellation applies to one run: the token is cleared whenever
    /// [`ExportPipeline::render`] returns, so the pipeline can export again.
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// Percentage after each page; `None` when no export is running
    pub fn progress(&self) -> watch::Receiver<Option<u8>> {
        self.progress.subscribe()
    }

    pub fn into_surface(self) -> S {
        self.surface
    }

    /// Render every page of `document` into `writer`, in page order.
    ///
    /// Links are computed from the document as it is at the start of the
    /// call. Progress and any cancellation are cleared when this returns,
    /// whether or not it succeeded.
    pub async fn render<D>(&mut self, document: &PlannerDocument, writer: &mut D) -> Result<ExportReport>
    where
        D: DocumentWriter + Send,
    {
        let result = self.render_pages(document, writer).await;
        self.progress.send_replace(None);
        self.cancel.reset();
        result
    }

    async fn render_pages<D>(&mut self, document: &PlannerDocument, writer: &mut D) -> Result<ExportReport>
    where
        D: DocumentWriter + Send,
    {
        let pages = document.pages();
        let canvas = document.canvas();
        self.settings.validate_for_canvas(canvas)?;
        let plan = LinkPlan::new(document, self.layout);
        let total = pages.len();
        let mut report = ExportReport::default();

        info!(pages = total, "export started");
        for (index, page) in pages.iter().enumerate() {
            self.check_cancelled(index)?;

            let scene = RenderScene::from_page(page, index, canvas);
            let (image, retries) = self.capture_page(scene).await?;
            report.retries += retries;

            writer.add_page(canvas.width, canvas.height)?;
            writer.add_page_image(image, canvas.bounds())?;
            let links = plan.links_for(pages, index);
            for link in &links {
                writer.add_link(link.rect, link.destination)?;
            }
            report.links += links.len();
            report.pages += 1;

            let percent = (100.0 * (index + 1) as f64 / total as f64).round() as u8;
            self.progress.send_replace(Some(percent));
            debug!(page = index + 1, links = links.len(), percent, "page exported");
        }

        info!(pages = report.pages, links = report.links, retries = report.retries, "export finished");
        Ok(report)
    }

    /// Capture one page, retrying up to the configured attempt count.
    /// Returns the decoded image and how many retries it took.
    async fn capture_page(&mut self, scene: RenderScene) -> Result<(JpegImage, u32)> {
        let page = scene.page_index + 1;
        let attempts = self.settings.attempts_per_page();
        let mut reason = String::new();

        for attempt in 1..=attempts {
            match self.attempt(scene.clone()).await {
                Ok(image) => return Ok((image, attempt - 1)),
                Err(e) if e.is_retryable() => {
                    warn!(page, attempt, attempts, error = %e, "page capture failed");
                    reason = e.to_string();
                }
                Err(e) => return Err(e),
            }
        }

        Err(ExportError::PageFailed {
            page,
            attempts,
            reason,
        })
    }

    async fn attempt(&mut self, scene: RenderScene) -> Result<JpegImage> {
        let index = scene.page_index;
        self.check_cancelled(index)?;
        self.surface.set_target(scene).await?;

        let timeout = self.settings.settle_timeout();
        tokio::time::timeout(timeout, self.surface.settled())
            .await
            .map_err(|_| ExportError::SettleTimeout(timeout))??;

        self.check_cancelled(index)?;
        let request = CaptureRequest {
            pixel_density: self.settings.pixel_density,
            quality: self.settings.jpeg_quality,
        };
        let bytes = self.surface.capture(request).await?;
        JpegImage::parse(bytes).map_err(|e| ExportError::InvalidCapture(e.to_string()))
    }

    fn check_cancelled(&self, index: usize) -> Result<()> {
        if self.cancel.is_cancelled() {
            info!(page = index + 1, "export cancelled");
            return Err(ExportError::Cancelled);
        }
        Ok(())
    }

    /// Render `document` to a PDF in memory
    pub async fn export_bytes(&mut self, document: &PlannerDocument) -> Result<(Vec<u8>, ExportReport)> {
        let mut writer = PlannerPdfWriter::new(Vec::new(), self.settings.pdf.clone())?;
        let report = self.render(document, &mut writer).await?;
        let bytes = writer.finish()?;
        Ok((bytes, report))
    }

    /// Export `document` to the configured file name inside `dir`.
    ///
    /// The PDF is written to a staging file and renamed into place only on
    /// success; on any failure the staging file is removed and an existing
    /// artifact with the final name is left as it was.
    pub async fn export_to_file(&mut self, document: &PlannerDocument, dir: impl AsRef<Path>) -> Result<ExportReport> {
        let dir = dir.as_ref();
        let file_name = self.settings.output_file_name.trim().to_string();
        let final_path = dir.join(&file_name);
        let staging_path = dir.join(format!("{file_name}{STAGING_SUFFIX}"));

        let (bytes, mut report) = self.export_bytes(document).await?;

        if let Err(e) = write_staged(&staging_path, &final_path, &bytes).await {
            warn!(path = %staging_path.display(), error = %e, "discarding staged export");
            if let Err(cleanup) = tokio::fs::remove_file(&staging_path).await {
                if cleanup.kind() != std::io::ErrorKind::NotFound {
                    warn!(error = %cleanup, "failed to remove staging file");
                }
            }
            return Err(e.into());
        }

        info!(path = %final_path.display(), bytes = bytes.len(), "export written");
        report.output = Some(final_path);
        Ok(report)
    }
}

async fn write_staged(staging: &Path, final_path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    tokio::fs::write(staging, bytes).await?;
    tokio::fs::rename(staging, final_path).await
}
