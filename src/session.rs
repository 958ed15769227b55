//! User-facing redaction session
//!
//! Holds the settings a user adjusts between runs, the selected input and
//! the latest result. Text and document input are mutually exclusive.

use rand::Rng;
use tracing::debug;

use crate::error::{Error, Result};
use crate::pipeline::{ProgressUpdate, RedactionInput, RedactionRequest, Redactor};
use crate::types::{RedactionIntensity, RedactionMode, RedactionResult};

#[derive(Debug, Default)]
pub struct Session {
    intensity: RedactionIntensity,
    mode: RedactionMode,
    input: Option<RedactionInput>,
    result: Option<RedactionResult>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn intensity(&self) -> RedactionIntensity {
        self.intensity
    }

    pub fn set_intensity(&mut self, value: u8) -> Result<()> {
        self.intensity = RedactionIntensity::new(value)?;
        Ok(())
    }

    pub fn mode(&self) -> RedactionMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: RedactionMode) {
        self.mode = mode;
    }

    pub fn input(&self) -> Option<&RedactionInput> {
        self.input.as_ref()
    }

    /// Replaces any selected document with `text`
    pub fn set_text(&mut self, text: impl Into<String>) {
        let text = text.into();
        if !matches!(&self.input, Some(RedactionInput::Text(current)) if *current == text) {
            self.result = None;
        }
        self.input = Some(RedactionInput::Text(text));
    }

    /// Replaces any typed text with a document
    pub fn select_document(&mut self, name: impl Into<String>, bytes: Vec<u8>) {
        let name = name.into();
        debug!("Selected document {} ({} bytes)", name, bytes.len());
        self.result = None;
        self.input = Some(RedactionInput::Document { name, bytes });
    }

    pub fn clear_input(&mut self) {
        self.input = None;
        self.result = None;
    }

    pub fn result(&self) -> Option<&RedactionResult> {
        self.result.as_ref()
    }

    pub fn take_result(&mut self) -> Option<RedactionResult> {
        self.result.take()
    }

    /// Runs one generate-action on the current input. Once the action has
    /// started the previous result is gone, so a failed run leaves nothing
    /// behind. An action turned away as busy keeps the previous result.
    pub async fn generate<R: Rng + ?Sized>(
        &mut self,
        redactor: &Redactor,
        rng: &mut R,
        progress: &mut dyn FnMut(ProgressUpdate),
    ) -> Result<&RedactionResult> {
        let input = self
            .input
            .clone()
            .ok_or_else(|| Error::InvalidInput("no text or document selected".into()))?;
        let request = RedactionRequest {
            input,
            intensity: self.intensity,
            mode: self.mode,
        };

        let previous = self.result.take();
        match redactor.generate(&request, rng, progress).await {
            Ok(result) => Ok(self.result.insert(result)),
            Err(Error::Busy) => {
                self.result = previous;
                Err(Error::Busy)
            }
            Err(e) => Err(e),
        }
    }
}
