//! Capability seams between the engine and its collaborators.
//!
//! The embedder is a synchronous CPU-bound call; the external search and
//! generation capabilities are network-bound and async.

use async_trait::async_trait;

use crate::types::SearchResult;

/// Deterministic text-to-vector capability. Identical text must yield the
/// identical vector within one process lifetime; batch embedding must be
/// elementwise-equivalent to repeated single calls.
pub trait Embedder: Send + Sync {
    /// Embedding dimensionality (D).
    fn dim(&self) -> usize;

    /// Compute embeddings for a batch of input texts.
    fn embed_batch(&self, texts: &[String]) -> anyhow::Result<Vec<Vec<f32>>>;

    /// Embed a single text. Provided for convenience; semantically a batch
    /// of one.
    fn embed(&self, text: &str) -> anyhow::Result<Vec<f32>> {
        let batch = [text.to_string()];
        let mut out = self.embed_batch(&batch)?;
        anyhow::ensure!(!out.is_empty(), "embedder returned no vector");
        Ok(out.remove(0))
    }
}

/// Best-effort external web search, invoked only when the local catalog has
/// nothing close enough. Transport and quota failures surface as errors here
/// and are recovered by the caller, which degrades to local results.
#[async_trait]
pub trait ExternalSearch: Send + Sync {
    async fn fallback_search(&self, query: &str) -> anyhow::Result<Vec<SearchResult>>;
}

/// Opaque text-completion capability used by the generation stage.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> anyhow::Result<String>;
}
