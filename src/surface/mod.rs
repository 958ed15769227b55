//! Raster drawing surface
//! Author: kartik4091
//! Created: 2025-06-06
//!
//! A `Surface` owns an RGB pixel buffer and records every primitive drawn on
//! it, so callers can inspect what was composited without re-analysing
//! pixels.

pub mod glyphs;

use image::codecs::jpeg::JpegEncoder;
use image::{ExtendedColorType, Rgb, RgbImage};

use crate::error::{ExportError, SurfaceError};
use crate::types::Rect;

use glyphs::{GLYPH_COLUMNS, GLYPH_ROWS};

/// Largest edge a surface may have, in pixels
pub const MAX_DIMENSION: u32 = 16_384;

/// Paint colours used by the compositor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    Black,
    White,
}

impl Color {
    fn rgb(self) -> Rgb<u8> {
        match self {
            Color::Black => Rgb([0, 0, 0]),
            Color::White => Rgb([255, 255, 255]),
        }
    }
}

/// A primitive recorded on the surface
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    FillRect { rect: Rect, color: Color },
    StrokeRect { rect: Rect, line_width: f64, color: Color },
    Text { text: String, x: f64, baseline: f64 },
}

/// Monospace text style: font size and per-character advance
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    pub font_size: f64,
    pub advance: f64,
}

#[derive(Debug, Clone)]
pub struct Surface {
    raster: RgbImage,
    ops: Vec<DrawOp>,
}

impl Surface {
    /// Blank white surface
    pub fn new(width: u32, height: u32) -> Result<Self, SurfaceError> {
        Self::check_size(width, height)?;
        Ok(Self {
            raster: RgbImage::from_pixel(width, height, Color::White.rgb()),
            ops: Vec::new(),
        })
    }

    /// Surface over an already rendered page
    pub fn from_raster(raster: RgbImage) -> Result<Self, SurfaceError> {
        Self::check_size(raster.width(), raster.height())?;
        Ok(Self {
            raster,
            ops: Vec::new(),
        })
    }

    fn check_size(width: u32, height: u32) -> Result<(), SurfaceError> {
        if width == 0 || height == 0 || width > MAX_DIMENSION || height > MAX_DIMENSION {
            return Err(SurfaceError::ContextUnavailable { width, height });
        }
        Ok(())
    }

    pub fn width(&self) -> u32 {
        self.raster.width()
    }

    pub fn height(&self) -> u32 {
        self.raster.height()
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(0.0, 0.0, self.width() as f64, self.height() as f64)
    }

    pub fn raster(&self) -> &RgbImage {
        &self.raster
    }

    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    pub fn pixel(&self, x: u32, y: u32) -> [u8; 3] {
        self.raster.get_pixel(x, y).0
    }

    pub fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.paint(rect, color);
        self.ops.push(DrawOp::FillRect { rect, color });
    }

    /// Outline centred on the rectangle's edges
    pub fn stroke_rect(&mut self, rect: Rect, line_width: f64, color: Color) {
        let half = line_width / 2.0;
        let outer = rect.inset(-half);
        let inner = rect.inset(half);

        self.paint(Rect::new(outer.x, outer.y, outer.width, line_width), color);
        self.paint(Rect::new(outer.x, inner.bottom(), outer.width, line_width), color);
        self.paint(Rect::new(outer.x, inner.y, line_width, inner.height), color);
        self.paint(Rect::new(inner.right(), inner.y, line_width, inner.height), color);

        self.ops.push(DrawOp::StrokeRect { rect, line_width, color });
    }

    /// Draws `text` in black with its baseline at `baseline`
    pub fn draw_text(&mut self, text: &str, x: f64, baseline: f64, style: TextStyle) {
        let dot_width = style.advance / (GLYPH_COLUMNS + 1) as f64;
        let dot_height = style.font_size / (GLYPH_ROWS + 1) as f64;
        let top = baseline - dot_height * GLYPH_ROWS as f64;

        for (index, ch) in text.chars().enumerate() {
            let origin = x + index as f64 * style.advance;
            for (column, bits) in glyphs::glyph(ch).iter().enumerate() {
                for row in 0..GLYPH_ROWS {
                    if bits & (1 << row) != 0 {
                        self.paint(
                            Rect::new(
                                origin + column as f64 * dot_width,
                                top + row as f64 * dot_height,
                                dot_width,
                                dot_height,
                            ),
                            Color::Black,
                        );
                    }
                }
            }
        }

        self.ops.push(DrawOp::Text {
            text: text.to_string(),
            x,
            baseline,
        });
    }

    fn paint(&mut self, rect: Rect, color: Color) {
        let Some(bounds) = rect.clip_to(self.width(), self.height()) else {
            return;
        };
        let rgb = color.rgb();
        for y in bounds.y0..bounds.y1 {
            for x in bounds.x0..bounds.x1 {
                self.raster.put_pixel(x, y, rgb);
            }
        }
    }

    /// Recorded text runs, in drawing order
    pub fn text_runs(&self) -> Vec<&str> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn filled_rects(&self, color: Color) -> Vec<Rect> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::FillRect { rect, color: c } if *c == color => Some(*rect),
                _ => None,
            })
            .collect()
    }

    /// Lossy encoding; `quality` is 1-100
    pub fn encode_jpeg(&self, quality: u8) -> Result<Vec<u8>, ExportError> {
        let mut buffer = Vec::new();
        let mut encoder = JpegEncoder::new_with_quality(&mut buffer, quality.clamp(1, 100));
        encoder
            .encode(
                self.raster.as_raw(),
                self.width(),
                self.height(),
                ExtendedColorType::Rgb8,
            )
            .map_err(|e| ExportError::Encoding(e.to_string()))?;
        Ok(buffer)
    }
}
