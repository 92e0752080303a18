//! In-memory flat nearest-neighbor index over catalog embeddings.
//!
//! Distances are squared L2 (the relevance threshold downstream is
//! calibrated against squared distances). The index is built eagerly once at
//! startup and is read-only afterwards; entry positions are stable for its
//! lifetime. There is no incremental insert or delete.

use tracing::debug;

use shopsearch_core::error::{Error, Result};
use shopsearch_core::types::CatalogItem;

#[derive(Debug)]
struct IndexEntry {
    item: CatalogItem,
    vector: Vec<f32>,
}

#[derive(Debug)]
pub struct FlatIndex {
    dim: usize,
    entries: Vec<IndexEntry>,
}

impl FlatIndex {
    /// Build the index from catalog items and their embeddings.
    ///
    /// All vectors must share one dimension. An empty entry list yields a
    /// valid index that answers every query with an empty result list.
    pub fn build(entries: Vec<(CatalogItem, Vec<f32>)>) -> Result<Self> {
        let dim = entries.first().map(|(_, v)| v.len()).unwrap_or(0);
        for (_, vector) in &entries {
            if vector.len() != dim {
                return Err(Error::DimensionMismatch { expected: dim, got: vector.len() });
            }
        }
        let entries = entries
            .into_iter()
            .map(|(item, vector)| IndexEntry { item, vector })
            .collect::<Vec<_>>();
        debug!(size = entries.len(), dim, "flat index built");
        Ok(Self { dim, entries })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Dimension of the indexed vectors; 0 for an empty index.
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Return up to `k` entries ordered by ascending squared L2 distance.
    ///
    /// `k` larger than the index size is clamped. Equal distances keep index
    /// order (stable, not re-sorted). A query vector of the wrong dimension
    /// is a configuration error, except against an empty index, which is a
    /// valid degenerate state answering with an empty list.
    pub fn query(&self, vector: &[f32], k: usize) -> Result<Vec<(f32, &CatalogItem)>> {
        if self.entries.is_empty() {
            return Ok(Vec::new());
        }
        if vector.len() != self.dim {
            return Err(Error::DimensionMismatch { expected: self.dim, got: vector.len() });
        }
        let mut scored: Vec<(f32, usize)> = self
            .entries
            .iter()
            .enumerate()
            .map(|(pos, e)| (squared_l2(&e.vector, vector), pos))
            .collect();
        scored.sort_by(|a, b| {
            a.0.partial_cmp(&b.0)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.1.cmp(&b.1))
        });
        scored.truncate(k.min(self.entries.len()));
        Ok(scored
            .into_iter()
            .map(|(dist, pos)| (dist, &self.entries[pos].item))
            .collect())
    }
}

fn squared_l2(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b).map(|(x, y)| (x - y) * (x - y)).sum()
}
