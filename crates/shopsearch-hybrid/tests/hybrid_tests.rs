use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;

use shopsearch_core::traits::{Embedder, ExternalSearch};
use shopsearch_core::types::{CatalogItem, ExternalHit, SearchResult};
use shopsearch_hybrid::{HybridSearchEngine, RelevanceGate};
use shopsearch_vector::FlatIndex;

/// Embedder with hand-picked vectors so distances are exact.
struct StubEmbedder {
    map: HashMap<String, Vec<f32>>,
    dim: usize,
}

impl StubEmbedder {
    fn new(pairs: &[(&str, &[f32])]) -> Self {
        let dim = pairs.first().map(|(_, v)| v.len()).unwrap_or(2);
        let map = pairs
            .iter()
            .map(|(t, v)| ((*t).to_string(), v.to_vec()))
            .collect();
        Self { map, dim }
    }
}

impl Embedder for StubEmbedder {
    fn dim(&self) -> usize {
        self.dim
    }

    fn embed_batch(&self, texts: &[String]) -> anyhow::Result<Vec<Vec<f32>>> {
        Ok(texts
            .iter()
            .map(|t| self.map.get(t).cloned().unwrap_or_else(|| vec![0.0; self.dim]))
            .collect())
    }
}

/// External capability that counts invocations and returns a fixed answer.
struct CountingExternal {
    calls: Arc<AtomicUsize>,
    outcome: Outcome,
}

enum Outcome {
    Hits(usize),
    Error,
}

impl CountingExternal {
    fn hits(n: usize) -> (Self, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        (Self { calls: calls.clone(), outcome: Outcome::Hits(n) }, calls)
    }

    fn failing() -> (Self, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        (Self { calls: calls.clone(), outcome: Outcome::Error }, calls)
    }
}

#[async_trait]
impl ExternalSearch for CountingExternal {
    async fn fallback_search(&self, query: &str) -> anyhow::Result<Vec<SearchResult>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.outcome {
            Outcome::Hits(n) => Ok((0..n)
                .map(|i| {
                    SearchResult::External(ExternalHit {
                        name: format!("web hit {i} for {query}"),
                        description: "an external snippet...".to_string(),
                        source: format!("https://example.com/{i}"),
                    })
                })
                .collect()),
            Outcome::Error => anyhow::bail!("quota exhausted"),
        }
    }
}

fn shoe_catalog_engine(embedder: StubEmbedder) -> HybridSearchEngine {
    let index = FlatIndex::build(vec![(
        CatalogItem::new("Red Shoes", "Comfortable running shoes", 50.0),
        vec![1.0, 0.0],
    )])
    .expect("build");
    HybridSearchEngine::new(Arc::new(index), Box::new(embedder))
}

#[tokio::test]
async fn close_local_match_returns_local_and_skips_external() {
    let embedder = StubEmbedder::new(&[("running shoes", &[0.9, 0.1])]);
    let (external, calls) = CountingExternal::hits(3);
    let engine = shoe_catalog_engine(embedder).with_external(Box::new(external));

    let results = engine.search("running shoes", 5).await.expect("search");

    assert_eq!(results.len(), 1);
    match &results[0] {
        SearchResult::Local(hit) => {
            assert_eq!(hit.name, "Red Shoes");
            assert!((hit.price - 50.0).abs() < f64::EPSILON);
            assert!(hit.distance < 1.5);
        }
        other => panic!("expected local result, got {other:?}"),
    }
    assert_eq!(calls.load(Ordering::SeqCst), 0, "external capability never invoked");
}

#[tokio::test]
async fn distant_local_results_trigger_external_fallback() {
    // Squared distance to the only catalog vector is 8.0, well over the gate.
    let embedder = StubEmbedder::new(&[("quantum lawnmower", &[-1.0, 2.0])]);
    let (external, calls) = CountingExternal::hits(2);
    let engine = shoe_catalog_engine(embedder).with_external(Box::new(external));

    let results = engine.search("quantum lawnmower", 5).await.expect("search");

    assert_eq!(results.len(), 2);
    assert!(results.iter().all(SearchResult::is_external));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn external_error_degrades_to_local_results() {
    let embedder = StubEmbedder::new(&[("quantum lawnmower", &[-1.0, 2.0])]);
    let (external, calls) = CountingExternal::failing();
    let engine = shoe_catalog_engine(embedder).with_external(Box::new(external));

    let results = engine.search("quantum lawnmower", 5).await.expect("never raises");

    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(results.len(), 1, "falls back to the local results it already computed");
    assert!(!results[0].is_external());
}

#[tokio::test]
async fn disabled_fallback_returns_unfiltered_local_results() {
    let embedder = StubEmbedder::new(&[("quantum lawnmower", &[-1.0, 2.0])]);
    let (external, calls) = CountingExternal::hits(2);
    let engine = shoe_catalog_engine(embedder).with_external(Box::new(external));

    let results = engine
        .search_with_options("quantum lawnmower", 5, false)
        .await
        .expect("search");

    assert_eq!(calls.load(Ordering::SeqCst), 0);
    assert_eq!(results.len(), 1, "degrades gracefully rather than returning nothing");
    assert!(!results[0].is_external());
}

#[tokio::test]
async fn empty_catalog_with_external_serves_external_hit() {
    let index = FlatIndex::build(Vec::new()).expect("empty");
    let embedder = StubEmbedder::new(&[("anything", &[1.0, 0.0])]);
    let (external, _) = CountingExternal::hits(1);
    let engine = HybridSearchEngine::new(Arc::new(index), Box::new(embedder))
        .with_external(Box::new(external));

    let results = engine.search("anything", 5).await.expect("search");

    assert_eq!(results.len(), 1);
    assert!(results[0].is_external());
    assert_eq!(results[0].price_display(), "External Result");
}

#[tokio::test]
async fn empty_catalog_without_external_returns_empty_list() {
    let index = FlatIndex::build(Vec::new()).expect("empty");
    let embedder = StubEmbedder::new(&[("anything", &[1.0, 0.0])]);
    let engine = HybridSearchEngine::new(Arc::new(index), Box::new(embedder));

    let results = engine.search("anything", 5).await.expect("no error");
    assert!(results.is_empty());
}

#[tokio::test]
async fn results_respect_top_k_and_distance_order() {
    let index = FlatIndex::build(vec![
        (CatalogItem::new("A", "alpha", 1.0), vec![1.0, 0.0]),
        (CatalogItem::new("B", "bravo", 2.0), vec![0.8, 0.2]),
        (CatalogItem::new("C", "charlie", 3.0), vec![0.0, 1.0]),
    ])
    .expect("build");
    let embedder = StubEmbedder::new(&[("query", &[1.0, 0.0])]);
    let engine = HybridSearchEngine::new(Arc::new(index), Box::new(embedder));

    let results = engine.search("query", 2).await.expect("search");
    assert_eq!(results.len(), 2);
    let names: Vec<&str> = results.iter().map(SearchResult::name).collect();
    assert_eq!(names, vec!["A", "B"]);
}

#[tokio::test]
async fn gate_threshold_is_strict_less_than() {
    // Distance exactly at the threshold must NOT pass the gate.
    let index = FlatIndex::build(vec![(
        CatalogItem::new("Edge", "boundary product", 9.0),
        vec![0.0, 0.0],
    )])
    .expect("build");
    // Squared distance = 1.5^2 = 2.25, exactly representable in f32.
    let embedder = StubEmbedder::new(&[("edge case", &[1.5, 0.0])]);
    let (external, calls) = CountingExternal::hits(1);
    let engine = HybridSearchEngine::new(Arc::new(index), Box::new(embedder))
        .with_external(Box::new(external))
        .with_gate(RelevanceGate::new(2.25));

    let results = engine.search("edge case", 5).await.expect("search");
    assert_eq!(calls.load(Ordering::SeqCst), 1, "distance == threshold falls through");
    assert!(results[0].is_external());
}
