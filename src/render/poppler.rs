//! Poppler-backed renderer.
//!
//! Pages are counted by decoding the document with `lopdf`. The document is
//! then staged once in a temporary directory and each page is rasterised
//! from that copy with the `pdftoppm` binary from poppler-utils.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use image::RgbImage;
use tempfile::TempDir;
use tokio::process::Command;
use tracing::{debug, instrument};

use super::{DocumentRenderer, RenderedDocument};
use crate::error::{DecodeError, RenderError, Result};

/// DPI at scale 1.0
const BASE_DPI: f64 = 72.0;

#[derive(Debug, Clone)]
pub struct PopplerRenderer {
    pdftoppm: PathBuf,
}

impl PopplerRenderer {
    /// `pdftoppm` is the binary location, resolved once at start-up
    pub fn new(pdftoppm: impl Into<PathBuf>) -> Self {
        Self {
            pdftoppm: pdftoppm.into(),
        }
    }

    pub fn binary(&self) -> &Path {
        &self.pdftoppm
    }

    /// Decodes the document and counts its pages
    pub fn count_pages(document: &[u8]) -> std::result::Result<u32, DecodeError> {
        if document.is_empty() {
            return Err(DecodeError::Empty);
        }
        let doc = lopdf::Document::load_mem(document)
            .map_err(|e| DecodeError::Malformed(e.to_string()))?;
        Ok(doc.get_pages().len() as u32)
    }

    /// Decodes the document and writes it to a fresh staging directory
    pub async fn stage(&self, document: &[u8]) -> Result<PopplerDocument> {
        let pages = Self::count_pages(document)?;

        let staging = TempDir::new()?;
        let pdf_path = staging.path().join("source.pdf");
        tokio::fs::write(&pdf_path, document).await?;
        debug!("Decoded document with {} pages, staged at {}", pages, pdf_path.display());

        Ok(PopplerDocument {
            pdftoppm: self.pdftoppm.clone(),
            pages,
            pdf_path,
            staging,
        })
    }
}

impl Default for PopplerRenderer {
    fn default() -> Self {
        Self::new("pdftoppm")
    }
}

#[async_trait]
impl DocumentRenderer for PopplerRenderer {
    async fn open(&self, document: &[u8]) -> Result<Box<dyn RenderedDocument>> {
        Ok(Box::new(self.stage(document).await?))
    }
}

/// A document written to disk once and rendered page by page.
/// The staging directory is removed when the handle drops.
#[derive(Debug)]
pub struct PopplerDocument {
    pdftoppm: PathBuf,
    pages: u32,
    pdf_path: PathBuf,
    staging: TempDir,
}

impl PopplerDocument {
    pub fn path(&self) -> &Path {
        &self.pdf_path
    }

    async fn rasterize(&self, page: u32, dpi: u32) -> Result<PathBuf> {
        let page_str = page.to_string();
        let output_prefix = self.staging.path().join(format!("page-{}", page));

        let output = Command::new(&self.pdftoppm)
            .args(["-png", "-singlefile", "-r", &dpi.to_string()])
            .args(["-f", &page_str, "-l", &page_str])
            .arg(&self.pdf_path)
            .arg(&output_prefix)
            .output()
            .await;

        match output {
            Ok(out) if out.status.success() => {
                let image_path = output_prefix.with_extension("png");
                if image_path.exists() {
                    Ok(image_path)
                } else {
                    Err(DecodeError::PageUnrenderable {
                        page,
                        reason: "no image generated".into(),
                    }
                    .into())
                }
            }
            Ok(out) => Err(DecodeError::PageUnrenderable {
                page,
                reason: format!(
                    "pdftoppm exited with {}: {}",
                    out.status,
                    String::from_utf8_lossy(&out.stderr).trim()
                ),
            }
            .into()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(RenderError::BackendNotAvailable(
                format!("{} not found (install poppler-utils)", self.pdftoppm.display()),
            )
            .into()),
            Err(e) => Err(e.into()),
        }
    }
}

#[async_trait]
impl RenderedDocument for PopplerDocument {
    fn page_count(&self) -> u32 {
        self.pages
    }

    #[instrument(skip(self))]
    async fn render_page(&self, page: u32, scale: f64) -> Result<RgbImage> {
        if page == 0 || page > self.pages {
            return Err(DecodeError::PageOutOfRange(page).into());
        }

        let dpi = (BASE_DPI * scale).round().max(1.0) as u32;
        let image_path = self.rasterize(page, dpi).await?;

        let raster = image::open(&image_path)
            .map_err(|e| RenderError::Image(e.to_string()))?
            .to_rgb8();
        if let Err(e) = tokio::fs::remove_file(&image_path).await {
            debug!("Could not remove {}: {}", image_path.display(), e);
        }
        debug!("Rendered page {} at {} DPI: {}x{}", page, dpi, raster.width(), raster.height());
        Ok(raster)
    }
}
