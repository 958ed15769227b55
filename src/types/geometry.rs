//! Geometry primitives shared by selectors, compositor and exporter

use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle in surface pixel space
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Integer pixel span `[x0, x1) x [y0, y1)` after clipping
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelBounds {
    pub x0: u32,
    pub y0: u32,
    pub x1: u32,
    pub y1: u32,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Same rectangle shrunk by `amount` on every side
    pub fn inset(&self, amount: f64) -> Self {
        Self::new(
            self.x + amount,
            self.y + amount,
            self.width - amount * 2.0,
            self.height - amount * 2.0,
        )
    }

    /// Covered pixels on a `width x height` raster, or `None` when the
    /// rectangle falls entirely outside it or is degenerate.
    pub fn clip_to(&self, width: u32, height: u32) -> Option<PixelBounds> {
        if !(self.width > 0.0 && self.height > 0.0) {
            return None;
        }
        let x0 = self.x.round().max(0.0);
        let y0 = self.y.round().max(0.0);
        let x1 = self.right().round().min(width as f64);
        let y1 = self.bottom().round().min(height as f64);
        if x1 <= x0 || y1 <= y0 {
            return None;
        }
        Some(PixelBounds {
            x0: x0 as u32,
            y0: y0 as u32,
            x1: x1 as u32,
            y1: y1 as u32,
        })
    }
}

/// Page orientation derived from a surface's own aspect ratio
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PageOrientation {
    Portrait,
    Landscape,
}

impl PageOrientation {
    pub fn from_size(width: u32, height: u32) -> Self {
        if width > height {
            PageOrientation::Landscape
        } else {
            PageOrientation::Portrait
        }
    }
}
