//! Redaction request and result types

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::surface::Surface;

/// Percentage of content to obscure, 0 to 100 inclusive.
///
/// 0 is a pass-through, 100 is a full-page blackout, anything in between
/// is the per-unit probability of a region or word being redacted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct RedactionIntensity(u8);

impl RedactionIntensity {
    pub const NONE: RedactionIntensity = RedactionIntensity(0);
    pub const FULL: RedactionIntensity = RedactionIntensity(100);

    pub fn new(value: u8) -> Result<Self> {
        if value > 100 {
            return Err(Error::InvalidInput(format!(
                "Redaction intensity must be within 0..=100, got {}",
                value
            )));
        }
        Ok(Self(value))
    }

    pub fn value(self) -> u8 {
        self.0
    }

    pub fn is_pass_through(self) -> bool {
        self.0 == 0
    }

    pub fn is_full_blackout(self) -> bool {
        self.0 == 100
    }

    /// Bernoulli trial against a uniform draw in `[0, 100)`
    pub fn admits(self, draw: f64) -> bool {
        draw < self.0 as f64
    }
}

impl Default for RedactionIntensity {
    fn default() -> Self {
        Self(30)
    }
}

impl TryFrom<u8> for RedactionIntensity {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self> {
        Self::new(value)
    }
}

impl From<RedactionIntensity> for u8 {
    fn from(intensity: RedactionIntensity) -> Self {
        intensity.0
    }
}

impl fmt::Display for RedactionIntensity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}

/// Which selector decides what gets redacted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RedactionMode {
    #[default]
    Random,
    AiSensitive,
}

impl fmt::Display for RedactionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RedactionMode::Random => write!(f, "random"),
            RedactionMode::AiSensitive => write!(f, "ai-sensitive"),
        }
    }
}

impl FromStr for RedactionMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().replace('_', "-").as_str() {
            "random" => Ok(RedactionMode::Random),
            "ai-sensitive" | "ai" => Ok(RedactionMode::AiSensitive),
            other => Err(Error::InvalidInput(format!("Unknown redaction mode: {}", other))),
        }
    }
}

/// One composited page, numbered from 1
#[derive(Debug, Clone)]
pub struct RedactedPage {
    pub page_number: u32,
    pub surface: Surface,
}

/// Counters collected while producing a result
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RedactionStats {
    pub pages_rendered: usize,
    pub pages_skipped: usize,
    pub regions_filled: usize,
    pub tokens_total: usize,
    pub tokens_redacted: usize,
    pub phrases_detected: usize,
    pub full_blackout: bool,
}

/// Output of one generate-action
#[derive(Debug, Clone, Default)]
pub struct RedactionResult {
    pub pages: Vec<RedactedPage>,
    pub original_text: Option<String>,
    pub redacted_text: Option<String>,
    pub stats: RedactionStats,
}

impl RedactionResult {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    pub fn surfaces(&self) -> impl Iterator<Item = &Surface> {
        self.pages.iter().map(|page| &page.surface)
    }
}
