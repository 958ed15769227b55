//! Word layout for raw text input
//! Created: 2025-06-06 14:02:11 UTC
//! Author: kartik4091

use crate::config::TextLayoutConfig;

/// A word placed on the page
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutToken<'a> {
    pub text: &'a str,
    /// Source line, 0-based
    pub line: usize,
    pub x: f64,
    pub baseline: f64,
    /// Measured width including the trailing space
    pub width: f64,
}

impl LayoutToken<'_> {
    /// Runs of spaces leave empty tokens that only move the pen
    pub fn is_blank(&self) -> bool {
        self.text.is_empty()
    }
}

/// Fixed-advance metric model
pub fn measure(token: &str, config: &TextLayoutConfig) -> f64 {
    (token.chars().count() + 1) as f64 * config.char_advance
}

/// Lays words out left to right, wrapping at the margin-constrained width.
///
/// Lines are split on `'\n'` (a trailing `'\r'` is dropped) and words on
/// single spaces. A word wraps to a new row when `x + width` would pass
/// `page_width - 2 * margin`; every source line ends with a paragraph step.
pub fn layout_text<'a>(text: &'a str, config: &TextLayoutConfig) -> Vec<LayoutToken<'a>> {
    let max_width = config.max_line_width();
    let mut tokens = Vec::new();
    let mut baseline = config.first_baseline;

    for (line, content) in text.split('\n').enumerate() {
        let content = content.strip_suffix('\r').unwrap_or(content);
        let mut x = config.margin;
        for word in content.split(' ') {
            let width = measure(word, config);
            if x + width > max_width {
                x = config.margin;
                baseline += config.wrap_line_step;
            }
            tokens.push(LayoutToken {
                text: word,
                line,
                x,
                baseline,
                width,
            });
            x += width;
        }
        baseline += config.paragraph_step;
    }

    tokens
}
