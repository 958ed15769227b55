//! Google Gemini phrase oracle.
//!
//! Sends the text with a fixed instruction to `generateContent`, asking for
//! a JSON array of strings. Requires an API key from configuration or the
//! `GEMINI_API_KEY` / `API_KEY` environment variables.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use super::{build_prompt, parse_phrases, PhraseOracle};
use crate::config::OracleConfig;
use crate::error::{Error, OracleError, Result};

pub struct GeminiOracle {
    client: Client,
    endpoint: String,
    model: String,
    api_key: Option<String>,
}

#[derive(Debug, Serialize)]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
    #[serde(rename = "generationConfig")]
    generation_config: GeminiGenerationConfig,
}

#[derive(Debug, Serialize)]
struct GeminiContent {
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize)]
struct GeminiPart {
    text: String,
}

#[derive(Debug, Serialize)]
struct GeminiGenerationConfig {
    #[serde(rename = "responseMimeType")]
    response_mime_type: &'static str,
    #[serde(rename = "responseSchema")]
    response_schema: GeminiSchema,
}

#[derive(Debug, Serialize)]
struct GeminiSchema {
    #[serde(rename = "type")]
    kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    items: Option<Box<GeminiSchema>>,
}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    candidates: Option<Vec<GeminiCandidate>>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidate {
    content: Option<GeminiResponseContent>,
}

#[derive(Debug, Deserialize)]
struct GeminiResponseContent {
    #[serde(default)]
    parts: Vec<GeminiResponsePart>,
}

#[derive(Debug, Deserialize)]
struct GeminiResponsePart {
    text: Option<String>,
}

impl GeminiOracle {
    pub fn new(config: &OracleConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| Error::ConfigError(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            api_key: config.resolve_api_key(),
        })
    }

    /// Set the API key.
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Set the base URL (scheme and host, no path).
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into().trim_end_matches('/').to_string();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn request_url(&self, api_key: &str) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent?key={}",
            self.endpoint, self.model, api_key
        )
    }

    fn build_request(text: &str) -> GeminiRequest {
        GeminiRequest {
            contents: vec![GeminiContent {
                parts: vec![GeminiPart {
                    text: build_prompt(text),
                }],
            }],
            generation_config: GeminiGenerationConfig {
                response_mime_type: "application/json",
                response_schema: GeminiSchema {
                    kind: "ARRAY",
                    items: Some(Box::new(GeminiSchema {
                        kind: "STRING",
                        items: None,
                    })),
                },
            },
        }
    }

    /// One round trip; every failure is reported as an `OracleError`
    pub async fn try_detect(&self, text: &str) -> std::result::Result<Vec<String>, OracleError> {
        if text.trim().is_empty() {
            return Ok(Vec::new());
        }
        let api_key = self.api_key.as_deref().ok_or(OracleError::MissingApiKey)?;

        let response = self
            .client
            .post(self.request_url(api_key))
            .json(&Self::build_request(text))
            .send()
            .await
            .map_err(|e| OracleError::Transport(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| OracleError::Transport(e.to_string()))?;

        if !status.is_success() {
            return Err(OracleError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: GeminiResponse = serde_json::from_str(&body)
            .map_err(|e| OracleError::MalformedResponse(e.to_string()))?;

        let answer: String = parsed
            .candidates
            .and_then(|candidates| candidates.into_iter().next())
            .and_then(|candidate| candidate.content)
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .filter_map(|part| part.text)
                    .collect()
            })
            .filter(|answer: &String| !answer.trim().is_empty())
            .ok_or(OracleError::EmptyResponse)?;

        parse_phrases(&answer).map_err(|e| OracleError::MalformedResponse(e.to_string()))
    }
}

#[async_trait]
impl PhraseOracle for GeminiOracle {
    #[instrument(skip(self, text), fields(model = %self.model, chars = text.len()))]
    async fn detect(&self, text: &str) -> Vec<String> {
        match self.try_detect(text).await {
            Ok(phrases) => {
                debug!("Gemini returned {} phrases", phrases.len());
                phrases
            }
            Err(e) => {
                warn!("Gemini phrase detection failed, continuing without phrases: {}", e);
                Vec::new()
            }
        }
    }
}
