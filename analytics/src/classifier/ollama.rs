//! Ollama-backed classification
//!
//! Sends the classification prompt to a local Ollama server's
//! `/api/generate` endpoint with streaming disabled and returns the raw
//! completion text as the token.

use super::{ClassificationBackend, ClassificationRequest, ClassifierError};
use crate::config::ClassifierConfig;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: String,
    stream: bool,
    options: GenerateOptions,
}

#[derive(Debug, Serialize)]
struct GenerateOptions {
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    response: String,
}

/// Ollama generate-API backend
pub struct OllamaBackend {
    client: reqwest::Client,
    endpoint: String,
    model: String,
    temperature: f32,
}

impl OllamaBackend {
    pub fn new(config: &ClassifierConfig) -> Result<Self, ClassifierError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| ClassifierError::RequestFailed(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            endpoint: Self::generate_url(&config.base_url),
            model: config.model.clone(),
            temperature: config.temperature,
        })
    }

    fn generate_url(base_url: &str) -> String {
        format!("{}/api/generate", base_url.trim_end_matches('/'))
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn body(&self, request: &ClassificationRequest<'_>) -> GenerateRequest<'_> {
        GenerateRequest {
            model: &self.model,
            prompt: request.prompt(),
            stream: false,
            options: GenerateOptions {
                temperature: self.temperature,
            },
        }
    }
}

#[async_trait]
impl ClassificationBackend for OllamaBackend {
    fn name(&self) -> &str {
        "ollama"
    }

    async fn label(&self, request: &ClassificationRequest<'_>) -> Result<String, ClassifierError> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(&self.body(request))
            .send()
            .await
            .map_err(|e| ClassifierError::RequestFailed(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(ClassifierError::Status { status, body });
        }

        let parsed: GenerateResponse = response
            .json()
            .await
            .map_err(|e| ClassifierError::ParseError(e.to_string()))?;

        Ok(parsed.response)
    }
}
