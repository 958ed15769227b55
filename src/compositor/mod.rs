//! Page compositor
//! Author: kartik4091
//! Created: 2025-06-06
//!
//! Draws base content and overlays the redaction decisions made by the
//! selectors. Raw text goes through word layout and is redacted per word;
//! rendered document pages are redacted per grid cell.

pub mod layout;

use rand::Rng;
use tracing::debug;

use crate::config::{RedactorConfig, TextLayoutConfig};
use crate::error::SurfaceError;
use crate::selector::{sample_unit, GridSelector, PhraseMatcher};
use crate::surface::{Color, Surface, TextStyle};
use crate::types::{RedactionIntensity, RedactionMode, Rect};

pub use layout::{layout_text, measure, LayoutToken};

/// Glyph drawn in place of each character of a redacted word
pub const REDACTION_GLYPH: char = '█';

/// White frame painted over a fully blacked-out page
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlackoutFrame {
    pub inset: f64,
    pub line_width: f64,
}

/// Result of compositing raw text
#[derive(Debug, Clone)]
pub struct TextComposite {
    pub surface: Surface,
    pub redacted_text: String,
    pub tokens_total: usize,
    pub tokens_redacted: usize,
    pub full_blackout: bool,
}

#[derive(Debug, Clone)]
pub struct Compositor {
    grid: GridSelector,
    layout: TextLayoutConfig,
    text_frame: BlackoutFrame,
    page_frame: BlackoutFrame,
}

impl Compositor {
    pub fn new(config: &RedactorConfig) -> Self {
        Self {
            grid: GridSelector::from_config(&config.grid),
            layout: config.text_layout.clone(),
            text_frame: BlackoutFrame {
                inset: config.text_layout.frame_inset,
                line_width: config.text_layout.frame_width,
            },
            page_frame: BlackoutFrame {
                inset: config.render.frame_inset,
                line_width: config.render.frame_width,
            },
        }
    }

    pub fn grid(&self) -> &GridSelector {
        &self.grid
    }

    /// Solid black page with a white inset frame
    pub fn apply_full_blackout(surface: &mut Surface, frame: BlackoutFrame) {
        surface.fill_rect(surface.bounds(), Color::Black);
        surface.stroke_rect(surface.bounds().inset(frame.inset), frame.line_width, Color::White);
    }

    /// Lays out `text` on a fresh page and redacts it word by word.
    ///
    /// `Random` runs one independent trial per word; `AiSensitive` redacts
    /// words containing any of `phrases`. Intensity 0 draws everything and
    /// intensity 100 blacks the page out whatever the mode.
    pub fn composite_text<R: Rng + ?Sized>(
        &self,
        text: &str,
        intensity: RedactionIntensity,
        mode: RedactionMode,
        phrases: &[String],
        rng: &mut R,
    ) -> Result<TextComposite, SurfaceError> {
        let mut surface = Surface::new(self.layout.page_width, self.layout.page_height)?;
        let tokens = layout_text(text, &self.layout);
        let tokens_total = tokens.iter().filter(|t| !t.is_blank()).count();

        if intensity.is_full_blackout() {
            Self::apply_full_blackout(&mut surface, self.text_frame);
            let decisions = vec![true; tokens.len()];
            return Ok(TextComposite {
                surface,
                redacted_text: echo_redacted(&tokens, &decisions),
                tokens_total,
                tokens_redacted: tokens_total,
                full_blackout: true,
            });
        }

        let matcher = PhraseMatcher::new(phrases);
        let style = TextStyle {
            font_size: self.layout.font_size,
            advance: self.layout.char_advance,
        };
        let mut decisions = Vec::with_capacity(tokens.len());

        for token in &tokens {
            if token.is_blank() {
                decisions.push(false);
                continue;
            }

            let redact = !intensity.is_pass_through()
                && match mode {
                    RedactionMode::Random => sample_unit(intensity, rng),
                    RedactionMode::AiSensitive => matcher.is_target(token.text),
                };

            if redact {
                surface.fill_rect(
                    Rect::new(
                        token.x - self.layout.redaction_lead,
                        token.baseline - self.layout.redaction_ascent,
                        token.width,
                        self.layout.redaction_band,
                    ),
                    Color::Black,
                );
            } else {
                surface.draw_text(&format!("{} ", token.text), token.x, token.baseline, style);
            }
            decisions.push(redact);
        }

        let tokens_redacted = decisions.iter().filter(|d| **d).count();
        debug!(
            "Composited text: {}/{} words redacted ({}, {})",
            tokens_redacted, tokens_total, mode, intensity
        );

        Ok(TextComposite {
            surface,
            redacted_text: echo_redacted(&tokens, &decisions),
            tokens_total,
            tokens_redacted,
            full_blackout: false,
        })
    }

    /// Blackens grid regions on top of an already rendered page, in place.
    /// Returns the number of rectangles filled.
    pub fn composite_document_page<R: Rng + ?Sized>(
        &self,
        surface: &mut Surface,
        intensity: RedactionIntensity,
        rng: &mut R,
    ) -> usize {
        if intensity.is_full_blackout() {
            Self::apply_full_blackout(surface, self.page_frame);
            return 1;
        }

        let regions = self.grid.select_regions(
            surface.width() as f64,
            surface.height() as f64,
            intensity,
            rng,
        );
        for region in &regions {
            surface.fill_rect(*region, Color::Black);
        }
        regions.len()
    }
}

impl Default for Compositor {
    fn default() -> Self {
        Self::new(&RedactorConfig::default())
    }
}

/// Source text with every redacted word masked, spacing preserved
fn echo_redacted(tokens: &[LayoutToken<'_>], decisions: &[bool]) -> String {
    let mut lines: Vec<Vec<String>> = Vec::new();
    for (token, redacted) in tokens.iter().zip(decisions) {
        if lines.len() <= token.line {
            lines.resize_with(token.line + 1, Vec::new);
        }
        let word = if *redacted && !token.is_blank() {
            REDACTION_GLYPH.to_string().repeat(token.text.chars().count())
        } else {
            token.text.to_string()
        };
        lines[token.line].push(word);
    }
    lines
        .iter()
        .map(|words| words.join(" "))
        .collect::<Vec<_>>()
        .join("\n")
}
