//! Document rendering collaborator
//! Author: kartik4091
//! Created: 2025-06-06
//!
//! Rasterisation of PDF pages is delegated to an external renderer. A
//! document is decoded once by `open`; the returned handle then renders
//! its pages one at a time.

pub mod poppler;

pub use poppler::{PopplerDocument, PopplerRenderer};

use async_trait::async_trait;
use image::RgbImage;

use crate::error::Result;

#[async_trait]
pub trait DocumentRenderer: Send + Sync {
    /// Decodes `document` and prepares it for page rendering
    async fn open(&self, document: &[u8]) -> Result<Box<dyn RenderedDocument>>;
}

/// A decoded document held by the renderer for the length of one action
#[async_trait]
pub trait RenderedDocument: Send + Sync {
    fn page_count(&self) -> u32;

    /// Rasterises one page (1-based) at `scale` relative to 72 DPI
    async fn render_page(&self, page: u32, scale: f64) -> Result<RgbImage>;
}
