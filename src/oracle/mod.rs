//! Sensitive-phrase oracle
//!
//! The oracle names phrases in a text that should be hidden. It is an
//! external collaborator: any failure resolves to "no phrases known" and
//! never aborts a redaction.

pub mod gemini;

pub use gemini::GeminiOracle;

use async_trait::async_trait;

/// Instruction sent ahead of the user's text
pub const DETECTION_PROMPT: &str = "Identify all sensitive information in the following text. \
Sensitive information includes Names, Addresses, Phone Numbers, Email Addresses, SSNs, \
Credit Card Numbers, or any other Personally Identifiable Information (PII).
Return only a JSON array of strings containing the specific words or phrases to redact.";

/// Full request text for `text`
pub fn build_prompt(text: &str) -> String {
    format!("{}\n\nText: \"{}\"", DETECTION_PROMPT, text)
}

/// Parses a JSON array of strings, dropping blank entries
pub fn parse_phrases(body: &str) -> Result<Vec<String>, serde_json::Error> {
    let phrases: Vec<String> = serde_json::from_str(body.trim())?;
    Ok(phrases
        .into_iter()
        .map(|phrase| phrase.trim().to_string())
        .filter(|phrase| !phrase.is_empty())
        .collect())
}

#[async_trait]
pub trait PhraseOracle: Send + Sync {
    /// Phrases to redact in `text`; empty when unknown or on failure
    async fn detect(&self, text: &str) -> Vec<String>;
}

/// Never finds anything
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopOracle;

#[async_trait]
impl PhraseOracle for NoopOracle {
    async fn detect(&self, _text: &str) -> Vec<String> {
        Vec::new()
    }
}

/// Returns a fixed phrase list for any non-blank text
#[derive(Debug, Clone, Default)]
pub struct StaticOracle {
    phrases: Vec<String>,
}

impl StaticOracle {
    pub fn new<I, S>(phrases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            phrases: phrases.into_iter().map(Into::into).collect(),
        }
    }
}

#[async_trait]
impl PhraseOracle for StaticOracle {
    async fn detect(&self, text: &str) -> Vec<String> {
        if text.trim().is_empty() {
            return Vec::new();
        }
        self.phrases.clone()
    }
}
