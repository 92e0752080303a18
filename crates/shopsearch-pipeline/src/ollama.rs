//! Ollama text-generation client.
//!
//! Posts to `/api/generate` with streaming disabled; the completion comes
//! back as one response body. Errors propagate — a failed generation fails
//! the pipeline run, and presenting that is the caller's job.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use shopsearch_core::traits::TextGenerator;

pub const DEFAULT_BASE_URL: &str = "http://localhost:11434";
pub const DEFAULT_MODEL: &str = "mistral";
const DEFAULT_TIMEOUT_SECS: u64 = 120;

pub struct OllamaGenerator {
    client: reqwest::Client,
    base_url: String,
    model: String,
}

impl OllamaGenerator {
    pub fn new(base_url: &str, model: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .context("failed to build generation HTTP client")?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
        })
    }
}

#[derive(Deserialize)]
struct GenerateResponse {
    response: String,
}

#[async_trait]
impl TextGenerator for OllamaGenerator {
    async fn generate(&self, prompt: &str) -> Result<String> {
        let url = format!("{}/api/generate", self.base_url);
        let body = json!({
            "model": self.model,
            "prompt": prompt,
            "stream": false,
        });
        debug!(model = %self.model, "sending generation request");
        let resp = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .context("generation request failed")?;
        anyhow::ensure!(
            resp.status().is_success(),
            "generation endpoint returned {}",
            resp.status()
        );
        let parsed: GenerateResponse = resp
            .json()
            .await
            .context("failed to parse generation response")?;
        Ok(parsed.response)
    }
}
