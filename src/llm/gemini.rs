// ABOUTME: Google Gemini completion provider via the Generative Language REST API
// ABOUTME: Single-prompt generateContent calls with typed request/response structures
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

//! # Gemini Provider
//!
//! Implementation of [`CompletionProvider`] for Google's Gemini models through
//! the `generateContent` endpoint.
//!
//! ## Configuration
//!
//! The API key comes from `GEMINI_API_KEY` (via [`crate::config`]); the model
//! defaults to `gemini-2.5-flash` and can be overridden with `GEMINI_MODEL`.

use super::CompletionProvider;
use crate::errors::UpstreamError;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

/// Default model to use
const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Base URL for the Gemini API
const API_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

// ============================================================================
// API Request/Response Types
// ============================================================================

/// Gemini API request structure
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

/// Content structure for the Gemini API
#[derive(Debug, Serialize, Deserialize)]
struct GeminiContent {
    parts: Vec<ContentPart>,
}

/// Text part of content
#[derive(Debug, Serialize, Deserialize)]
struct ContentPart {
    text: String,
}

/// Generation configuration
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_output_tokens: Option<u32>,
}

/// Gemini API response structure
#[derive(Debug, Deserialize)]
struct GeminiResponse {
    candidates: Option<Vec<Candidate>>,
    error: Option<GeminiError>,
}

/// Response candidate
#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<GeminiContent>,
}

/// API error response from Gemini
#[derive(Debug, Deserialize)]
struct GeminiError {
    message: String,
}

// ============================================================================
// Provider Implementation
// ============================================================================

/// Google Gemini completion provider
pub struct GeminiCompletions {
    api_key: String,
    model: String,
    client: Client,
}

impl GeminiCompletions {
    /// Create a new Gemini provider with an API key and the default model
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_owned(),
            client: Client::new(),
        }
    }

    /// Set a custom model
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Build the API URL for the configured model
    fn build_url(&self) -> String {
        format!(
            "{API_BASE_URL}/models/{}:generateContent?key={}",
            self.model, self.api_key
        )
    }
}

#[async_trait]
impl CompletionProvider for GeminiCompletions {
    async fn complete(&self, prompt: &str) -> Result<String, UpstreamError> {
        let request = GeminiRequest {
            contents: vec![GeminiContent {
                parts: vec![ContentPart {
                    text: prompt.to_owned(),
                }],
            }],
            generation_config: Some(GenerationConfig {
                temperature: Some(0.4),
                max_output_tokens: Some(256),
            }),
        };

        debug!(model = %self.model, "Sending request to Gemini API");

        let response = self
            .client
            .post(self.build_url())
            .json(&request)
            .send()
            .await
            .map_err(|e| UpstreamError::ModelUnavailable(format!("HTTP request failed: {e}")))?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            UpstreamError::ModelUnavailable(format!("failed to read response: {e}"))
        })?;

        if !status.is_success() {
            error!(status = %status, "Gemini API error");
            return Err(UpstreamError::ModelUnavailable(format!(
                "Gemini API returned status {status}"
            )));
        }

        let parsed: GeminiResponse = serde_json::from_str(&body).map_err(|e| {
            error!(error = %e, "Failed to parse Gemini response");
            UpstreamError::ModelUnavailable(format!("unparseable Gemini response: {e}"))
        })?;

        if let Some(error) = parsed.error {
            return Err(UpstreamError::ModelUnavailable(format!(
                "Gemini API error: {}",
                error.message
            )));
        }

        parsed
            .candidates
            .and_then(|mut c| c.pop())
            .and_then(|c| c.content)
            .and_then(|c| c.parts.into_iter().next())
            .map(|part| part.text)
            .ok_or_else(|| UpstreamError::ModelUnavailable("no content in Gemini response".into()))
    }

    fn name(&self) -> &str {
        "gemini"
    }
}
