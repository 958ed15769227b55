//! Redaction selectors
//! Author: kartik4091
//! Created: 2025-06-05
//!
//! A selector decides what gets blackened: `grid` picks rectangles on a
//! page-sized surface, `phrase` flags individual text tokens.

pub mod grid;
pub mod phrase;

pub use grid::GridSelector;
pub use phrase::{select_flags, PhraseMatcher};

use rand::Rng;

use crate::types::RedactionIntensity;

/// One independent trial: a uniform draw in `[0, 100)` below `intensity`
pub fn sample_unit<R: Rng + ?Sized>(intensity: RedactionIntensity, rng: &mut R) -> bool {
    intensity.admits(rng.gen_range(0.0..100.0))
}
