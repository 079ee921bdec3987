//! Planner settings management
//!
//! Settings are loaded once by the host and injected into the document
//! (`DocumentConfig`) and the export pipeline (`ExportSettings`); nothing in
//! the workspace reads them from ambient state.

use crate::pdf::PdfOptions;
use crate::{Result, StoreError};
use doc_model::{CanvasSize, DocumentConfig};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Largest raster width or height a capture may have; JPEG cannot encode
/// larger frames
pub const MAX_RASTER_DIMENSION: u32 = 65_535;

/// Name of the settings file inside the app data directory
pub const SETTINGS_FILE_NAME: &str = "planner_settings.json";

/// Everything the planner host can configure
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PlannerSettings {
    /// Canvas, default background, start day and first page name
    #[serde(default)]
    pub document: DocumentConfig,
    /// Export parameters
    #[serde(default)]
    pub export: ExportSettings,
}

impl PlannerSettings {
    /// Reject values the document or the pipeline cannot work with
    pub fn validate(&self) -> Result<()> {
        let canvas = self.document.canvas;
        if !(canvas.width.is_finite() && canvas.height.is_finite())
            || canvas.width <= 0.0
            || canvas.height <= 0.0
        {
            return Err(StoreError::InvalidSettings(format!(
                "canvas must be positive, got {} x {}",
                canvas.width, canvas.height
            )));
        }
        self.export.validate()?;
        self.export.validate_for_canvas(canvas)
    }

    /// Configuration for a new document
    pub fn document_config(&self) -> DocumentConfig {
        self.document.clone()
    }
}

/// Parameters of one export run
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ExportSettings {
    /// Raster pixels per canvas unit
    #[serde(default = "default_pixel_density")]
    pub pixel_density: f64,
    /// JPEG quality, 1-100
    #[serde(default = "default_jpeg_quality")]
    pub jpeg_quality: u8,
    /// Upper bound on waiting for the render surface to settle
    #[serde(default = "default_settle_timeout_ms")]
    pub settle_timeout_ms: u64,
    /// Extra attempts per page after a failed render or capture
    #[serde(default = "default_retries_per_page")]
    pub retries_per_page: u32,
    /// Final artifact name inside the output directory
    #[serde(default = "default_output_file_name")]
    pub output_file_name: String,
    /// PDF metadata and stream options
    #[serde(default)]
    pub pdf: PdfOptions,
}

fn default_pixel_density() -> f64 {
    1.5
}

fn default_jpeg_quality() -> u8 {
    85
}

fn default_settle_timeout_ms() -> u64 {
    5_000
}

fn default_retries_per_page() -> u32 {
    1
}

fn default_output_file_name() -> String {
    "Therapist_Planner_2026.pdf".to_string()
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            pixel_density: default_pixel_density(),
            jpeg_quality: default_jpeg_quality(),
            settle_timeout_ms: default_settle_timeout_ms(),
            retries_per_page: default_retries_per_page(),
            output_file_name: default_output_file_name(),
            pdf: PdfOptions::default(),
        }
    }
}

impl ExportSettings {
    pub fn settle_timeout(&self) -> Duration {
        Duration::from_millis(self.settle_timeout_ms)
    }

    /// Total attempts allowed per page
    pub fn attempts_per_page(&self) -> u32 {
        self.retries_per_page.saturating_add(1)
    }

    /// Reject a density whose capture of `canvas` would exceed
    /// [`MAX_RASTER_DIMENSION`] on either axis
    pub fn validate_for_canvas(&self, canvas: CanvasSize) -> Result<()> {
        let (width, height) = canvas.pixel_size(self.pixel_density);
        if width > MAX_RASTER_DIMENSION || height > MAX_RASTER_DIMENSION {
            return Err(StoreError::InvalidSettings(format!(
                "pixel density {} gives a {} x {} capture, larger than {} pixels per side",
                self.pixel_density, width, height, MAX_RASTER_DIMENSION
            )));
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if !self.pixel_density.is_finite() || self.pixel_density <= 0.0 {
            return Err(StoreError::InvalidSettings(format!(
                "pixel density must be positive, got {}",
                self.pixel_density
            )));
        }
        if !(1..=100).contains(&self.jpeg_quality) {
            return Err(StoreError::InvalidSettings(format!(
                "JPEG quality must be 1-100, got {}",
                self.jpeg_quality
            )));
        }
        let name = self.output_file_name.trim();
        if name.is_empty() || name.contains(['/', '\\']) {
            return Err(StoreError::InvalidSettings(format!(
                "output file name must be a bare file name, got {:?}",
                self.output_file_name
            )));
        }
        Ok(())
    }
}

/// Settings manager for loading, saving, and updating planner settings
pub struct SettingsManager {
    /// Path to the settings file
    settings_path: PathBuf,
    /// Current settings (cached)
    current: PlannerSettings,
}

impl SettingsManager {
    /// Create a new settings manager with the given app data directory
    pub fn new(app_data_dir: impl AsRef<Path>) -> Self {
        Self {
            settings_path: app_data_dir.as_ref().join(SETTINGS_FILE_NAME),
            current: PlannerSettings::default(),
        }
    }

    pub fn settings_path(&self) -> &Path {
        &self.settings_path
    }

    /// Load settings from disk, or fall back to defaults when the file is
    /// missing, unreadable as JSON, or holds invalid values
    pub async fn load(&mut self) -> Result<&PlannerSettings> {
        self.current = if tokio::fs::try_exists(&self.settings_path).await? {
            let content = tokio::fs::read_to_string(&self.settings_path).await?;
            parse_or_default(&content)
        } else {
            PlannerSettings::default()
        };
        Ok(&self.current)
    }

    /// Load settings synchronously (for use during host startup)
    pub fn load_sync(&mut self) -> Result<&PlannerSettings> {
        self.current = if self.settings_path.exists() {
            let content = std::fs::read_to_string(&self.settings_path)?;
            parse_or_default(&content)
        } else {
            PlannerSettings::default()
        };
        Ok(&self.current)
    }

    /// Save current settings to disk
    pub async fn save(&self) -> Result<()> {
        if let Some(parent) = self.settings_path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let content = serde_json::to_string_pretty(&self.current)?;
        tokio::fs::write(&self.settings_path, content).await?;
        Ok(())
    }

    /// Save settings synchronously
    pub fn save_sync(&self) -> Result<()> {
        if let Some(parent) = self.settings_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(&self.current)?;
        std::fs::write(&self.settings_path, content)?;
        Ok(())
    }

    pub fn get(&self) -> &PlannerSettings {
        &self.current
    }

    /// Validate, replace and save
    pub async fn update(&mut self, settings: PlannerSettings) -> Result<()> {
        settings.validate()?;
        self.current = settings;
        self.save().await
    }

    /// Validate, replace and save synchronously
    pub fn update_sync(&mut self, settings: PlannerSettings) -> Result<()> {
        settings.validate()?;
        self.current = settings;
        self.save_sync()
    }

    /// Reset settings to defaults and save
    pub async fn reset(&mut self) -> Result<&PlannerSettings> {
        self.current = PlannerSettings::default();
        self.save().await?;
        Ok(&self.current)
    }
}

fn parse_or_default(content: &str) -> PlannerSettings {
    match serde_json::from_str::<PlannerSettings>(content) {
        Ok(settings) => match settings.validate() {
            Ok(()) => settings,
            Err(e) => {
                tracing::warn!("Settings file holds invalid values, using defaults: {}", e);
                PlannerSettings::default()
            }
        },
        Err(e) => {
            tracing::warn!("Failed to parse settings file, using defaults: {}", e);
            PlannerSettings::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use doc_model::StartDay;
    use tempfile::TempDir;

    #[test]
    fn test_default_settings() {
        let settings = PlannerSettings::default();

        assert_eq!(settings.document.canvas.width, 1536.0);
        assert_eq!(settings.document.canvas.height, 2048.0);
        assert_eq!(settings.document.default_background.as_str(), "backgroundwithtabs.png");
        assert_eq!(settings.document.start_day, StartDay::Sunday);

        assert_eq!(settings.export.pixel_density, 1.5);
        assert_eq!(settings.export.jpeg_quality, 85);
        assert_eq!(settings.export.attempts_per_page(), 2);
        assert_eq!(settings.export.output_file_name, "Therapist_Planner_2026.pdf");
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let parsed = parse_or_default(r#"{ "export": { "jpegQuality": 70 } }"#);
        assert_eq!(parsed.export.jpeg_quality, 70);
        assert_eq!(parsed.export.pixel_density, 1.5);
        assert_eq!(parsed.document, DocumentConfig::default());
    }

    #[test]
    fn test_malformed_file_falls_back() {
        assert_eq!(parse_or_default("{ not json"), PlannerSettings::default());
        assert_eq!(
            parse_or_default(r#"{ "export": { "jpegQuality": 0 } }"#),
            PlannerSettings::default()
        );
    }

    #[test]
    fn test_validate_rejects_path_in_output_name() {
        let mut settings = PlannerSettings::default();
        settings.export.output_file_name = "../escape.pdf".to_string();
        assert!(matches!(settings.validate(), Err(StoreError::InvalidSettings(_))));
    }

    #[test]
    fn test_validate_bounds_capture_size() {
        let mut settings = PlannerSettings::default();
        settings.export.pixel_density = 64.0;
        assert!(matches!(settings.validate(), Err(StoreError::InvalidSettings(_))));

        // 2048 * 32 is one pixel past the limit
        settings.export.pixel_density = 32.0;
        assert!(settings.validate().is_err());
        settings.export.pixel_density = 31.0;
        assert!(settings.validate().is_ok());

        // The bound follows the canvas
        settings.document.canvas = CanvasSize::new(100.0, 100.0);
        settings.export.pixel_density = 64.0;
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_settings_manager_load_save_sync() {
        let temp_dir = TempDir::new().unwrap();
        let mut manager = SettingsManager::new(temp_dir.path());

        let settings = manager.load_sync().unwrap();
        assert_eq!(settings, &PlannerSettings::default());

        let mut new_settings = PlannerSettings::default();
        new_settings.document.start_day = StartDay::Monday;
        new_settings.export.retries_per_page = 3;
        manager.update_sync(new_settings).unwrap();

        let mut manager2 = SettingsManager::new(temp_dir.path());
        let loaded = manager2.load_sync().unwrap();
        assert_eq!(loaded.document.start_day, StartDay::Monday);
        assert_eq!(loaded.export.retries_per_page, 3);
    }

    #[test]
    fn test_update_rejects_invalid() {
        let temp_dir = TempDir::new().unwrap();
        let mut manager = SettingsManager::new(temp_dir.path());

        let mut bad = PlannerSettings::default();
        bad.export.pixel_density = 0.0;
        assert!(manager.update_sync(bad).is_err());
        assert!(!manager.settings_path().exists());
    }

    #[tokio::test]
    async fn test_settings_manager_async() {
        let temp_dir = TempDir::new().unwrap();
        let mut manager = SettingsManager::new(temp_dir.path());
        manager.load().await.unwrap();

        let mut new_settings = PlannerSettings::default();
        new_settings.export.settle_timeout_ms = 250;
        manager.update(new_settings).await.unwrap();

        let mut manager2 = SettingsManager::new(temp_dir.path());
        let loaded = manager2.load().await.unwrap();
        assert_eq!(loaded.export.settle_timeout(), Duration::from_millis(250));

        let reset = manager2.reset().await.unwrap();
        assert_eq!(reset, &PlannerSettings::default());
    }
}
