//! Two-stage SEARCH → GENERATE pipeline orchestrator.
//!
//! A fixed linear sequence, not a general graph: the search stage writes
//! `search_results` into the state, the generation stage reads them and
//! appends one assistant turn. After each stage the caller-registered
//! observer receives a snapshot of the full current state, so a consuming
//! layer can render partial results as they appear.

use std::sync::Arc;

use anyhow::Result;
use tracing::{debug, info};

use shopsearch_core::traits::TextGenerator;
use shopsearch_core::Error;
use shopsearch_core::types::{PipelineState, SearchResult, Turn};
use shopsearch_hybrid::HybridSearchEngine;

pub mod ollama;

/// Fixed number of nearest catalog entries the search stage requests.
pub const SEARCH_TOP_K: usize = 5;

/// Instruction prepended to the generation prompt.
const ASSISTANT_INSTRUCTION: &str = "You are a helpful shopping assistant. \
Based on the search results, help the user find the right product.";

const ASSISTANT_FORMAT_HINT: &str = "Please format your response in a clear, \
concise way highlighting key product features and prices.";

/// The stage that just completed when the observer fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Search,
    Generate,
}

pub struct Pipeline {
    engine: Arc<HybridSearchEngine>,
    generator: Box<dyn TextGenerator>,
}

impl Pipeline {
    pub fn new(engine: Arc<HybridSearchEngine>, generator: Box<dyn TextGenerator>) -> Self {
        Self { engine, generator }
    }

    /// Run the pipeline, discarding intermediate snapshots.
    pub async fn run(&self, query: &str) -> Result<PipelineState> {
        self.run_with_observer(query, |_, _| {}).await
    }

    /// Run the pipeline, invoking `observe` with a snapshot of the full
    /// state after each stage completes. Stages run strictly in sequence;
    /// once a stage begins it runs to completion or failure. Generation
    /// failures propagate to the caller; there is no retry.
    pub async fn run_with_observer<F>(&self, query: &str, mut observe: F) -> Result<PipelineState>
    where
        F: FnMut(Stage, &PipelineState),
    {
        let mut state = PipelineState::new(query);

        // SEARCH
        let text = state
            .latest_user_text()
            .map(str::to_owned)
            .unwrap_or_default();
        state.search_results = self.engine.search(&text, SEARCH_TOP_K).await?;
        debug!(count = state.search_results.len(), "search stage complete");
        observe(Stage::Search, &state);

        // GENERATE
        let prompt = build_prompt(&state.search_results);
        let reply = self
            .generator
            .generate(&prompt)
            .await
            .map_err(|e| Error::Generation(format!("{e:#}")))?;
        state.push_turn(Turn::assistant(reply));
        info!("pipeline run complete");
        observe(Stage::Generate, &state);

        Ok(state)
    }
}

/// Render the fixed shopping-assistant prompt around the result list.
pub fn build_prompt(results: &[SearchResult]) -> String {
    let rendered = serde_json::to_string_pretty(results).unwrap_or_else(|_| "[]".to_string());
    format!("{ASSISTANT_INSTRUCTION}\nSearch Results: {rendered}\n\n{ASSISTANT_FORMAT_HINT}")
}
