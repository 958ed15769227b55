//! Redaction pipeline: one generate-action from input to redacted pages
//! Author: kartik4091
//! Created: 2025-06-05
//!
//! Pages are processed strictly in order on the calling task. The only
//! suspension points are the renderer's per-page work and the oracle's
//! round trip; progress is reported synchronously between them.

pub mod guard;

pub use guard::TaskGuard;

use std::fmt;
use std::sync::Arc;

use rand::Rng;
use tracing::{debug, info, instrument, warn};

use crate::compositor::Compositor;
use crate::config::RedactorConfig;
use crate::error::{Error, Result};
use crate::oracle::PhraseOracle;
use crate::render::{DocumentRenderer, RenderedDocument};
use crate::surface::Surface;
use crate::types::{
    RedactedPage, RedactionIntensity, RedactionMode, RedactionResult, RedactionStats,
};

/// What is being redacted
#[derive(Clone, PartialEq, Eq)]
pub enum RedactionInput {
    Text(String),
    Document { name: String, bytes: Vec<u8> },
}

impl RedactionInput {
    pub fn is_document(&self) -> bool {
        matches!(self, RedactionInput::Document { .. })
    }
}

impl fmt::Debug for RedactionInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RedactionInput::Text(text) => write!(f, "Text({} chars)", text.chars().count()),
            RedactionInput::Document { name, bytes } => {
                write!(f, "Document({}, {} bytes)", name, bytes.len())
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct RedactionRequest {
    pub input: RedactionInput,
    pub intensity: RedactionIntensity,
    /// Ignored for documents, which always use grid redaction
    pub mode: RedactionMode,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressUpdate {
    pub completed: u32,
    pub total: u32,
    pub percent: u8,
}

impl ProgressUpdate {
    pub fn new(completed: u32, total: u32) -> Self {
        let percent = if total == 0 {
            100
        } else {
            (completed as f64 / total as f64 * 100.0).round().min(100.0) as u8
        };
        Self {
            completed,
            total,
            percent,
        }
    }
}

/// Runs generate-actions against a renderer and an oracle
pub struct Redactor {
    config: RedactorConfig,
    compositor: Compositor,
    renderer: Arc<dyn DocumentRenderer>,
    oracle: Arc<dyn PhraseOracle>,
    guard: TaskGuard,
}

impl Redactor {
    pub fn new(
        config: RedactorConfig,
        renderer: Arc<dyn DocumentRenderer>,
        oracle: Arc<dyn PhraseOracle>,
    ) -> Self {
        Self {
            compositor: Compositor::new(&config),
            config,
            renderer,
            oracle,
            guard: TaskGuard::new(),
        }
    }

    pub fn config(&self) -> &RedactorConfig {
        &self.config
    }

    pub fn guard(&self) -> &TaskGuard {
        &self.guard
    }

    /// Produces the redacted pages for `request`.
    ///
    /// Fails with `Error::Busy` while another action holds the guard, with
    /// `Error::InvalidInput` for blank text and with `Error::DecodeError`
    /// when the document cannot be opened.
    #[instrument(skip_all, fields(input = ?request.input, intensity = %request.intensity))]
    pub async fn generate<R: Rng + ?Sized>(
        &self,
        request: &RedactionRequest,
        rng: &mut R,
        progress: &mut dyn FnMut(ProgressUpdate),
    ) -> Result<RedactionResult> {
        let _permit = self.guard.try_begin()?;
        info!("🚦 Starting redaction at {}", request.intensity);

        let result = match &request.input {
            RedactionInput::Text(text) => {
                self.redact_text(text, request.intensity, request.mode, rng, progress)
                    .await?
            }
            RedactionInput::Document { bytes, .. } => {
                self.redact_document(bytes, request.intensity, rng, progress)
                    .await?
            }
        };

        info!(
            "✅ Redaction finished: {} pages, {} skipped",
            result.stats.pages_rendered, result.stats.pages_skipped
        );
        Ok(result)
    }

    async fn redact_text<R: Rng + ?Sized>(
        &self,
        text: &str,
        intensity: RedactionIntensity,
        mode: RedactionMode,
        rng: &mut R,
        progress: &mut dyn FnMut(ProgressUpdate),
    ) -> Result<RedactionResult> {
        if text.trim().is_empty() {
            return Err(Error::InvalidInput("text input is blank".into()));
        }
        progress(ProgressUpdate::new(0, 1));

        let consult_oracle = mode == RedactionMode::AiSensitive
            && !intensity.is_pass_through()
            && !intensity.is_full_blackout();
        let phrases = if consult_oracle {
            self.oracle.detect(text).await
        } else {
            Vec::new()
        };
        debug!("{} phrases to redact", phrases.len());

        let composite = self
            .compositor
            .composite_text(text, intensity, mode, &phrases, rng)?;
        progress(ProgressUpdate::new(1, 1));

        Ok(RedactionResult {
            pages: vec![RedactedPage {
                page_number: 1,
                surface: composite.surface,
            }],
            original_text: Some(text.to_string()),
            redacted_text: Some(composite.redacted_text),
            stats: RedactionStats {
                pages_rendered: 1,
                tokens_total: composite.tokens_total,
                tokens_redacted: composite.tokens_redacted,
                phrases_detected: phrases.len(),
                full_blackout: composite.full_blackout,
                ..RedactionStats::default()
            },
        })
    }

    async fn redact_document<R: Rng + ?Sized>(
        &self,
        bytes: &[u8],
        intensity: RedactionIntensity,
        rng: &mut R,
        progress: &mut dyn FnMut(ProgressUpdate),
    ) -> Result<RedactionResult> {
        let document = self.renderer.open(bytes).await?;
        let total = document.page_count();
        progress(ProgressUpdate::new(0, total));

        let mut pages = Vec::with_capacity(total as usize);
        let mut stats = RedactionStats {
            full_blackout: intensity.is_full_blackout(),
            ..RedactionStats::default()
        };

        for page_number in 1..=total {
            let raster = document
                .render_page(page_number, self.config.render.scale)
                .await?;

            match Surface::from_raster(raster) {
                Ok(mut surface) => {
                    stats.regions_filled +=
                        self.compositor
                            .composite_document_page(&mut surface, intensity, rng);
                    stats.pages_rendered += 1;
                    pages.push(RedactedPage {
                        page_number,
                        surface,
                    });
                }
                Err(e) => {
                    warn!("⚠️ Skipping page {}: {}", page_number, e);
                    stats.pages_skipped += 1;
                }
            }

            let update = ProgressUpdate::new(page_number, total);
            debug!("Page {}/{} done ({}%)", page_number, total, update.percent);
            progress(update);
        }

        Ok(RedactionResult {
            pages,
            original_text: None,
            redacted_text: None,
            stats,
        })
    }
}
