//! OpenAI-compatible embeddings client.
//!
//! The embedder contract is synchronous, so this client uses the blocking
//! reqwest API. The embedding dimension is discovered from the first
//! response unless configured up front.

use std::sync::OnceLock;
use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::blocking::Client;
use reqwest::header::{HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde::{Deserialize, Serialize};

use shopsearch_core::traits::Embedder;

const DEFAULT_TIMEOUT_SECS: u64 = 30;

pub struct RemoteEmbedder {
    client: Client,
    endpoint: String,
    model: String,
    configured_dim: Option<usize>,
    discovered_dim: OnceLock<usize>,
}

impl RemoteEmbedder {
    pub fn new(
        base_url: &str,
        model: &str,
        api_key: &str,
        configured_dim: Option<usize>,
    ) -> Result<Self> {
        anyhow::ensure!(!model.trim().is_empty(), "missing embedding model name");
        let mut headers = reqwest::header::HeaderMap::new();
        if !api_key.trim().is_empty() {
            let auth = format!("Bearer {}", api_key.trim());
            headers.insert(
                AUTHORIZATION,
                HeaderValue::from_str(&auth).context("invalid embedding API key")?,
            );
        }
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let client = Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .default_headers(headers)
            .build()
            .context("failed to build embedding HTTP client")?;
        let endpoint = format!("{}/embeddings", base_url.trim_end_matches('/'));
        Ok(Self { client, endpoint, model: model.to_string(), configured_dim, discovered_dim: OnceLock::new() })
    }

    /// Build from `APP_EMBED_ENDPOINT`, `APP_EMBED_MODEL`, `APP_EMBED_API_KEY`
    /// and optional `APP_EMBED_DIM`.
    pub fn from_env() -> Result<Self> {
        let base_url = std::env::var("APP_EMBED_ENDPOINT")
            .context("APP_EMBED_ENDPOINT is required for the remote embedder")?;
        let model = std::env::var("APP_EMBED_MODEL")
            .context("APP_EMBED_MODEL is required for the remote embedder")?;
        let api_key = std::env::var("APP_EMBED_API_KEY").unwrap_or_default();
        let dim = std::env::var("APP_EMBED_DIM").ok().and_then(|d| d.parse().ok());
        Self::new(&base_url, &model, &api_key, dim)
    }
}

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a [String],
    #[serde(skip_serializing_if = "Option::is_none")]
    dimensions: Option<usize>,
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingRow>,
}

#[derive(Deserialize)]
struct EmbeddingRow {
    embedding: Vec<f32>,
}

impl Embedder for RemoteEmbedder {
    /// Configured dimension, or the one discovered from the first response.
    /// Zero until the first successful call when nothing was configured.
    fn dim(&self) -> usize {
        self.configured_dim
            .or_else(|| self.discovered_dim.get().copied())
            .unwrap_or(0)
    }

    fn embed_batch(&self, texts: &[String]) -> anyhow::Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        let request = EmbeddingRequest {
            model: &self.model,
            input: texts,
            dimensions: self.configured_dim,
        };
        let resp = self
            .client
            .post(&self.endpoint)
            .json(&request)
            .send()
            .context("embedding request failed")?;
        anyhow::ensure!(
            resp.status().is_success(),
            "embedding endpoint returned {}",
            resp.status()
        );
        let parsed: EmbeddingResponse =
            resp.json().context("failed to parse embedding response")?;
        anyhow::ensure!(
            parsed.data.len() == texts.len(),
            "embedding endpoint returned {} vectors for {} inputs",
            parsed.data.len(),
            texts.len()
        );
        let vectors: Vec<Vec<f32>> = parsed.data.into_iter().map(|r| r.embedding).collect();
        if let Some(first) = vectors.first() {
            let _ = self.discovered_dim.set(first.len());
        }
        Ok(vectors)
    }
}
