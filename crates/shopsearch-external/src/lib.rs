//! External web search client used as the catalog fallback.
//!
//! Talks to an Exa-style search API: the query is sent with autoprompt
//! reformulation delegated to the service and a rolling 30-day recency
//! window computed at call time. Raw hits normalize into the uniform
//! [`SearchResult`] contract with a hard 200-character snippet cut.
//!
//! Transport, quota and parse failures surface as errors from
//! `fallback_search`; the hybrid engine recovers them by degrading to local
//! results. External search is best-effort enrichment, not an availability
//! dependency.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, info};

use shopsearch_core::traits::ExternalSearch;
use shopsearch_core::types::{ExternalHit, SearchResult};

/// Hard character cut applied to external result bodies.
pub const SNIPPET_MAX_CHARS: usize = 200;
/// Marker appended to every normalized snippet, truncated or not.
pub const SNIPPET_MARKER: &str = "...";
/// External hits must have been published within this many days.
pub const RECENCY_WINDOW_DAYS: i64 = 30;

pub const DEFAULT_ENDPOINT: &str = "https://api.exa.ai/search";
const DEFAULT_TIMEOUT_SECS: u64 = 10;

pub struct ExaSearchClient {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
}

impl ExaSearchClient {
    pub fn new(endpoint: &str, api_key: &str) -> Result<Self> {
        anyhow::ensure!(!api_key.trim().is_empty(), "missing external search API key");
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .context("failed to build external search HTTP client")?;
        Ok(Self {
            client,
            endpoint: endpoint.to_string(),
            api_key: api_key.trim().to_string(),
        })
    }

    async fn request(&self, query: &str) -> Result<Vec<RawHit>> {
        let body = json!({
            "query": query,
            "useAutoprompt": true,
            "startPublishedDate": recency_floor(Utc::now()),
            "contents": { "text": true },
        });
        debug!(%query, "sending external search request");
        let resp = self
            .client
            .post(&self.endpoint)
            .header("x-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .context("external search request failed")?;
        anyhow::ensure!(
            resp.status().is_success(),
            "external search endpoint returned {}",
            resp.status()
        );
        let parsed: SearchResponse = resp
            .json()
            .await
            .context("failed to parse external search response")?;
        Ok(parsed.results)
    }
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<RawHit>,
}

#[derive(Debug, Deserialize)]
struct RawHit {
    #[serde(default)]
    title: String,
    #[serde(default)]
    text: String,
    #[serde(default)]
    url: String,
}

#[async_trait]
impl ExternalSearch for ExaSearchClient {
    async fn fallback_search(&self, query: &str) -> Result<Vec<SearchResult>> {
        let hits = self.request(query).await?;
        info!(count = hits.len(), "external search returned");
        Ok(hits
            .into_iter()
            .map(|h| normalize_hit(&h.title, &h.text, &h.url))
            .collect())
    }
}

/// Oldest publication date accepted, formatted for the search API.
/// A rolling window relative to `now`, not a fixed date.
pub fn recency_floor(now: DateTime<Utc>) -> String {
    (now - chrono::Duration::days(RECENCY_WINDOW_DAYS))
        .format("%Y-%m-%d")
        .to_string()
}

/// Normalize one raw external hit into the uniform result contract.
///
/// The snippet is the first [`SNIPPET_MAX_CHARS`] characters of the body
/// with [`SNIPPET_MARKER`] appended — a hard character cut, not word-aware,
/// and the marker is appended even when the body was short enough to pass
/// through unmodified.
pub fn normalize_hit(title: &str, body: &str, url: &str) -> SearchResult {
    let cut: String = body.chars().take(SNIPPET_MAX_CHARS).collect();
    SearchResult::External(ExternalHit {
        name: title.to_string(),
        description: format!("{cut}{SNIPPET_MARKER}"),
        source: url.to_string(),
    })
}
