//! Relevance gate + hybrid local/external search engine.
//!
//! Local catalog results win when at least one of them is strictly closer
//! than the gate threshold; otherwise the external fallback runs (when
//! configured and enabled). An erroring external capability degrades back
//! to the local results, whatever their relevance — the engine never fails
//! because the web was unreachable.

use std::sync::Arc;

use anyhow::Result;
use tracing::{debug, warn};

use shopsearch_core::traits::{Embedder, ExternalSearch};
use shopsearch_core::types::{CatalogItem, LocalHit, SearchResult};
use shopsearch_vector::FlatIndex;

/// Squared L2 distance below which the local catalog is considered
/// relevant enough. One global knob; it does not vary by query.
pub const DEFAULT_RELEVANCE_THRESHOLD: f32 = 1.5;

/// Policy deciding whether vector index output is good enough.
#[derive(Debug, Clone, Copy)]
pub struct RelevanceGate {
    pub threshold: f32,
}

impl Default for RelevanceGate {
    fn default() -> Self {
        Self { threshold: DEFAULT_RELEVANCE_THRESHOLD }
    }
}

impl RelevanceGate {
    pub fn new(threshold: f32) -> Self {
        Self { threshold }
    }

    /// True when the hit list is non-empty and its minimum distance is
    /// strictly below the threshold.
    pub fn accepts(&self, hits: &[(f32, &CatalogItem)]) -> bool {
        hits.iter().any(|(dist, _)| *dist < self.threshold)
    }
}

pub struct HybridSearchEngine {
    index: Arc<FlatIndex>,
    embedder: Box<dyn Embedder>,
    external: Option<Box<dyn ExternalSearch>>,
    gate: RelevanceGate,
}

impl HybridSearchEngine {
    pub fn new(index: Arc<FlatIndex>, embedder: Box<dyn Embedder>) -> Self {
        Self { index, embedder, external: None, gate: RelevanceGate::default() }
    }

    pub fn with_external(mut self, external: Box<dyn ExternalSearch>) -> Self {
        self.external = Some(external);
        self
    }

    pub fn with_gate(mut self, gate: RelevanceGate) -> Self {
        self.gate = gate;
        self
    }

    pub fn has_external(&self) -> bool {
        self.external.is_some()
    }

    /// Search with the external fallback enabled.
    pub async fn search(&self, query: &str, top_k: usize) -> Result<Vec<SearchResult>> {
        self.search_with_options(query, top_k, true).await
    }

    /// Full decision logic:
    /// 1. embed the query and take the `top_k` nearest catalog entries;
    /// 2. if the gate accepts them, return them (ascending distance);
    /// 3. otherwise run the external fallback when configured and enabled,
    ///    returning its normalized output as-is;
    /// 4. on fallback error, or with no fallback available, return the
    ///    unfiltered local results — possibly an empty list, never an error.
    pub async fn search_with_options(
        &self,
        query: &str,
        top_k: usize,
        use_fallback: bool,
    ) -> Result<Vec<SearchResult>> {
        let query_vec = self.embedder.embed(query)?;
        let hits = self.index.query(&query_vec, top_k)?;

        if self.gate.accepts(&hits) {
            debug!(count = hits.len(), "local results pass the relevance gate");
            return Ok(to_local_results(&hits));
        }

        if use_fallback {
            if let Some(external) = &self.external {
                match external.fallback_search(query).await {
                    Ok(results) => {
                        debug!(count = results.len(), "serving external fallback results");
                        return Ok(results);
                    }
                    Err(e) => {
                        warn!("external search failed, degrading to local results: {e:#}");
                    }
                }
            }
        }

        Ok(to_local_results(&hits))
    }
}

fn to_local_results(hits: &[(f32, &CatalogItem)]) -> Vec<SearchResult> {
    hits.iter()
        .map(|(distance, item)| {
            SearchResult::Local(LocalHit {
                name: item.name.clone(),
                description: item.description.clone(),
                price: item.price,
                distance: *distance,
            })
        })
        .collect()
}
