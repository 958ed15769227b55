//! Grid redaction selector
//! Created: 2025-06-05 09:12:40 UTC
//! Author: kartik4091

use rand::Rng;
use tracing::debug;

use crate::config::GridConfig;
use crate::types::{RedactionIntensity, Rect};

use super::sample_unit;

/// Splits a surface into `rows x cols` cells and picks each cell
/// independently with probability `intensity / 100`.
///
/// Selected cells are jittered and inflated so neighbouring boxes overlap
/// and leave no seams. Selection is only reproducible when the caller
/// supplies a seeded generator.
#[derive(Debug, Clone, PartialEq)]
pub struct GridSelector {
    rows: u32,
    cols: u32,
    jitter_fraction: f64,
    inflate: f64,
}

impl GridSelector {
    pub fn new(rows: u32, cols: u32) -> Self {
        Self::from_config(&GridConfig {
            rows,
            cols,
            ..GridConfig::default()
        })
    }

    pub fn from_config(config: &GridConfig) -> Self {
        Self {
            rows: config.rows.max(1),
            cols: config.cols.max(1),
            jitter_fraction: config.jitter_fraction,
            inflate: config.inflate,
        }
    }

    pub fn cell_count(&self) -> usize {
        self.rows as usize * self.cols as usize
    }

    /// Cell size for a `width x height` surface
    pub fn cell_size(&self, width: f64, height: f64) -> (f64, f64) {
        (width / self.cols as f64, height / self.rows as f64)
    }

    pub fn select_regions<R: Rng + ?Sized>(
        &self,
        width: f64,
        height: f64,
        intensity: RedactionIntensity,
        rng: &mut R,
    ) -> Vec<Rect> {
        if intensity.is_pass_through() {
            return Vec::new();
        }

        let (cell_w, cell_h) = self.cell_size(width, height);
        let mut regions = Vec::new();

        for row in 0..self.rows {
            for col in 0..self.cols {
                if !sample_unit(intensity, rng) {
                    continue;
                }
                let jitter_x = (rng.gen::<f64>() - 0.5) * (cell_w * self.jitter_fraction);
                let jitter_y = (rng.gen::<f64>() - 0.5) * (cell_h * self.jitter_fraction);
                regions.push(Rect::new(
                    col as f64 * cell_w + jitter_x,
                    row as f64 * cell_h + jitter_y,
                    cell_w * self.inflate,
                    cell_h * self.inflate,
                ));
            }
        }

        debug!(
            "Grid selected {}/{} cells at {}",
            regions.len(),
            self.cell_count(),
            intensity
        );
        regions
    }
}

impl Default for GridSelector {
    fn default() -> Self {
        Self::from_config(&GridConfig::default())
    }
}
