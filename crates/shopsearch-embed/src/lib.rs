//! Embedding providers.
//!
//! Two implementations of the [`Embedder`] contract:
//! - [`HashedEmbedder`]: deterministic feature hashing over whitespace
//!   tokens. Fully offline, fixed dimension, identical text always yields
//!   the identical vector. The default.
//! - [`remote::RemoteEmbedder`]: OpenAI-compatible `/embeddings` HTTP client
//!   for deployments with a real embedding service.
//!
//! Select with `APP_EMBEDDER=hashed|remote`.

use std::hash::{Hash, Hasher};

use tracing::info;
use twox_hash::XxHash64;

pub use shopsearch_core::traits::Embedder;

pub mod remote;

/// Dimension of the default hashed embedder.
pub const DEFAULT_DIM: usize = 384;

/// Deterministic feature-hashed embedder.
///
/// Each whitespace token is hashed into a bucket; the vector is then
/// L2-normalized. Not semantically meaningful like a learned model, but
/// deterministic, dimension-stable, and cheap — which is all the index
/// contract requires.
pub struct HashedEmbedder {
    dim: usize,
}

impl HashedEmbedder {
    pub fn new(dim: usize) -> Self {
        Self { dim }
    }
}

impl Default for HashedEmbedder {
    fn default() -> Self {
        Self::new(DEFAULT_DIM)
    }
}

impl Embedder for HashedEmbedder {
    fn dim(&self) -> usize {
        self.dim
    }

    fn embed_batch(&self, texts: &[String]) -> anyhow::Result<Vec<Vec<f32>>> {
        texts.iter().map(|t| Ok(self.embed_one(t))).collect()
    }
}

impl HashedEmbedder {
    fn embed_one(&self, text: &str) -> Vec<f32> {
        let mut v = vec![0f32; self.dim];
        for (i, token) in text.split_whitespace().enumerate() {
            let mut hasher = XxHash64::with_seed(0);
            token.hash(&mut hasher);
            let h = hasher.finish();
            let idx = (h as usize) % self.dim;
            let val = (((h >> 32) as u32) as f32) / (u32::MAX as f32);
            v[idx] += val + (i as f32 % 3.0) * 0.01;
        }
        let norm = (v.iter().map(|x| x * x).sum::<f32>()).sqrt().max(1e-6);
        for x in &mut v {
            *x /= norm;
        }
        v
    }
}

/// Pick an embedder from the environment.
///
/// `APP_EMBEDDER=remote` selects the HTTP provider (configured via
/// `APP_EMBED_ENDPOINT` / `APP_EMBED_MODEL` / `APP_EMBED_API_KEY`); anything
/// else selects the hashed embedder.
pub fn default_embedder() -> anyhow::Result<Box<dyn Embedder>> {
    let choice = std::env::var("APP_EMBEDDER").unwrap_or_default();
    if choice.eq_ignore_ascii_case("remote") {
        info!("using remote embedder");
        return Ok(Box::new(remote::RemoteEmbedder::from_env()?));
    }
    info!(dim = DEFAULT_DIM, "using hashed embedder");
    Ok(Box::new(HashedEmbedder::default()))
}
