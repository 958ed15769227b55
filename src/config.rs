//! Configuration types and validation for the redactor
//! Author: kartik4091
//! Created: 2025-06-03

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Top-level configuration, passed once at start-up
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RedactorConfig {
    pub grid: GridConfig,
    pub text_layout: TextLayoutConfig,
    pub render: RenderConfig,
    pub oracle: OracleConfig,
    pub export: ExportConfig,
}

/// Grid used by the random region selector
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    pub rows: u32,
    pub cols: u32,
    /// Total jitter span as a fraction of the cell size (±half in each axis)
    pub jitter_fraction: f64,
    /// Scale applied to each selected cell so neighbours overlap
    pub inflate: f64,
}

/// Page geometry and monospace metrics for raw text input
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TextLayoutConfig {
    pub page_width: u32,
    pub page_height: u32,
    pub margin: f64,
    pub font_size: f64,
    /// Horizontal advance of one character cell
    pub char_advance: f64,
    pub first_baseline: f64,
    pub wrap_line_step: f64,
    pub paragraph_step: f64,
    pub redaction_lead: f64,
    pub redaction_ascent: f64,
    pub redaction_band: f64,
    pub frame_inset: f64,
    pub frame_width: f64,
}

/// Document rendering collaborator settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Location of the `pdftoppm` binary
    pub pdftoppm_path: PathBuf,
    /// Render scale relative to 72 DPI
    pub scale: f64,
    pub frame_inset: f64,
    pub frame_width: f64,
}

/// Sensitive-phrase oracle settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OracleConfig {
    pub endpoint: String,
    pub model: String,
    /// Falls back to `GEMINI_API_KEY`, then `API_KEY`
    pub api_key: Option<String>,
    pub timeout_secs: u64,
}

/// Output artifact settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    pub pdf_file_name: String,
    pub pdf_jpeg_quality: u8,
    pub image_jpeg_quality: u8,
    pub image_name_prefix: String,
}

// Defaults
impl Default for GridConfig {
    fn default() -> Self {
        Self {
            rows: 40,
            cols: 30,
            jitter_fraction: 0.2,
            inflate: 1.1,
        }
    }
}

impl Default for TextLayoutConfig {
    fn default() -> Self {
        Self {
            page_width: 800,
            page_height: 1100,
            margin: 50.0,
            font_size: 16.0,
            char_advance: 9.6,
            first_baseline: 50.0,
            wrap_line_step: 25.0,
            paragraph_step: 30.0,
            redaction_lead: 2.0,
            redaction_ascent: 18.0,
            redaction_band: 22.0,
            frame_inset: 10.0,
            frame_width: 10.0,
        }
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            pdftoppm_path: PathBuf::from("pdftoppm"),
            scale: 2.0,
            frame_inset: 5.0,
            frame_width: 10.0,
        }
    }
}

impl Default for OracleConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://generativelanguage.googleapis.com".into(),
            model: "gemini-3-flash-preview".into(),
            api_key: None,
            timeout_secs: 60,
        }
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            pdf_file_name: "redacted_document.pdf".into(),
            pdf_jpeg_quality: 85,
            image_jpeg_quality: 90,
            image_name_prefix: "redacted_page_".into(),
        }
    }
}

impl TextLayoutConfig {
    /// Widest line the pen may reach before wrapping
    pub fn max_line_width(&self) -> f64 {
        self.page_width as f64 - self.margin * 2.0
    }
}

impl OracleConfig {
    /// Explicit key first, then the environment
    pub fn resolve_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .or_else(|| std::env::var("GEMINI_API_KEY").ok())
            .or_else(|| std::env::var("API_KEY").ok())
            .filter(|key| !key.trim().is_empty())
    }
}

impl RedactorConfig {
    /// Loads a configuration file, trying JSON first and then YAML
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let config: Self = serde_json::from_str(&content)
            .or_else(|_| serde_yaml::from_str(&content))
            .map_err(|e| Error::ConfigError(format!("Config parsing error: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.grid.rows == 0 || self.grid.cols == 0 {
            return Err(Error::ConfigError("Grid needs at least one row and column".into()));
        }
        if !(0.0..=1.0).contains(&self.grid.jitter_fraction) {
            return Err(Error::ConfigError("Jitter fraction must be within 0..=1".into()));
        }
        if self.grid.inflate < 1.0 {
            return Err(Error::ConfigError("Inflate factor must be at least 1.0".into()));
        }
        if self.text_layout.char_advance <= 0.0 || self.text_layout.font_size <= 0.0 {
            return Err(Error::ConfigError("Font metrics must be positive".into()));
        }
        if self.text_layout.page_width == 0 || self.text_layout.page_height == 0 {
            return Err(Error::ConfigError("Text page must have a non-zero size".into()));
        }
        if self.text_layout.max_line_width() <= self.text_layout.margin {
            return Err(Error::ConfigError("Margin leaves no room for text".into()));
        }
        if self.render.scale <= 0.0 {
            return Err(Error::ConfigError("Render scale must be positive".into()));
        }
        for quality in [self.export.pdf_jpeg_quality, self.export.image_jpeg_quality] {
            if !(1..=100).contains(&quality) {
                return Err(Error::ConfigError(format!("JPEG quality {} out of range", quality)));
            }
        }
        Ok(())
    }
}
