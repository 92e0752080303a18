//! Shared startup for the shopsearch binaries: config, catalog, index,
//! engine assembly.

use std::sync::Arc;

use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;
use tracing_subscriber::EnvFilter;

use shopsearch_core::catalog::load_catalog;
use shopsearch_core::config::{expand_path, Config};
use shopsearch_core::traits::Embedder;
use shopsearch_embed::default_embedder;
use shopsearch_external::{ExaSearchClient, DEFAULT_ENDPOINT};
use shopsearch_hybrid::{HybridSearchEngine, RelevanceGate, DEFAULT_RELEVANCE_THRESHOLD};
use shopsearch_vector::FlatIndex;

pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();
}

/// Load the catalog, embed it, build the index and assemble the engine.
/// The external fallback is attached only when an API key is configured.
pub fn build_engine(config: &Config) -> Result<Arc<HybridSearchEngine>> {
    let catalog_path = expand_path(
        config.get_or::<String>("catalog_path", "data/products.json".to_string()),
    );
    let items = load_catalog(&catalog_path)?;

    let embedder = default_embedder()?;
    let index = Arc::new(build_index(&items, embedder.as_ref())?);
    info!(size = index.len(), dim = index.dim(), "index ready");

    let threshold = config.get_or("relevance_threshold", DEFAULT_RELEVANCE_THRESHOLD);
    let mut engine = HybridSearchEngine::new(index, embedder)
        .with_gate(RelevanceGate::new(threshold));

    if let Ok(api_key) = config.get::<String>("exa_api_key") {
        if !api_key.trim().is_empty() {
            let endpoint =
                config.get_or::<String>("exa_endpoint", DEFAULT_ENDPOINT.to_string());
            engine = engine.with_external(Box::new(ExaSearchClient::new(&endpoint, &api_key)?));
            info!("external search fallback configured");
        }
    }

    Ok(Arc::new(engine))
}

fn build_index(
    items: &[shopsearch_core::types::CatalogItem],
    embedder: &dyn Embedder,
) -> Result<FlatIndex> {
    let pb = ProgressBar::new(items.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} products {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-"),
    );

    let mut entries = Vec::with_capacity(items.len());
    for item in items {
        let vector = embedder.embed(&item.combined_text)?;
        entries.push((item.clone(), vector));
        pb.inc(1);
    }
    pb.finish_and_clear();
    Ok(FlatIndex::build(entries)?)
}
