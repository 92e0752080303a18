//! Domain types shared by the retrieval engine and the pipeline.

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

/// Price string reported for results that did not come from the catalog.
pub const EXTERNAL_PRICE_SENTINEL: &str = "External Result";

/// A single product in the local catalog.
///
/// `combined_text` is derived as `name + " " + description` at construction
/// time and is the only field fed to the embedder. Items are read-only once
/// the catalog is loaded.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogItem {
    pub name: String,
    pub description: String,
    pub price: f64,
    pub combined_text: String,
}

impl CatalogItem {
    pub fn new(name: impl Into<String>, description: impl Into<String>, price: f64) -> Self {
        let name = name.into();
        let description = description.into();
        let combined_text = format!("{} {}", name, description);
        Self { name, description, price, combined_text }
    }
}

/// A catalog entry returned by the vector index, carrying its distance.
#[derive(Debug, Clone, PartialEq)]
pub struct LocalHit {
    pub name: String,
    pub description: String,
    pub price: f64,
    /// Squared L2 distance to the query embedding; lower is closer.
    pub distance: f32,
}

/// A normalized hit from the external web search capability.
#[derive(Debug, Clone, PartialEq)]
pub struct ExternalHit {
    pub name: String,
    pub description: String,
    pub source: String,
}

/// The uniform result contract over both retrieval origins.
///
/// Internally a tagged union; on the wire both variants flatten into one
/// shape: `{ name, description, is_external, price, source? }` where a local
/// result carries a numeric `price` and no `source`, and an external result
/// carries the literal price sentinel plus a populated `source` URL.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchResult {
    Local(LocalHit),
    External(ExternalHit),
}

impl SearchResult {
    pub fn name(&self) -> &str {
        match self {
            SearchResult::Local(h) => &h.name,
            SearchResult::External(h) => &h.name,
        }
    }

    pub fn description(&self) -> &str {
        match self {
            SearchResult::Local(h) => &h.description,
            SearchResult::External(h) => &h.description,
        }
    }

    pub fn is_external(&self) -> bool {
        matches!(self, SearchResult::External(_))
    }

    pub fn source(&self) -> Option<&str> {
        match self {
            SearchResult::Local(_) => None,
            SearchResult::External(h) => Some(&h.source),
        }
    }

    /// Price as rendered to the user: numeric for catalog results, the
    /// sentinel string for external ones.
    pub fn price_display(&self) -> String {
        match self {
            SearchResult::Local(h) => format!("{}", h.price),
            SearchResult::External(_) => EXTERNAL_PRICE_SENTINEL.to_string(),
        }
    }
}

impl Serialize for SearchResult {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            SearchResult::Local(h) => {
                let mut map = serializer.serialize_map(Some(4))?;
                map.serialize_entry("name", &h.name)?;
                map.serialize_entry("description", &h.description)?;
                map.serialize_entry("price", &h.price)?;
                map.serialize_entry("is_external", &false)?;
                map.end()
            }
            SearchResult::External(h) => {
                let mut map = serializer.serialize_map(Some(5))?;
                map.serialize_entry("name", &h.name)?;
                map.serialize_entry("description", &h.description)?;
                map.serialize_entry("price", EXTERNAL_PRICE_SENTINEL)?;
                map.serialize_entry("source", &h.source)?;
                map.serialize_entry("is_external", &true)?;
                map.end()
            }
        }
    }
}

/// Who authored a conversation turn.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// One conversation turn.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Turn {
    pub role: Role,
    pub content: String,
}

impl Turn {
    pub fn user(content: impl Into<String>) -> Self {
        Self { role: Role::User, content: content.into() }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self { role: Role::Assistant, content: content.into() }
    }
}

/// Mutable state threaded through one pipeline run.
///
/// `messages` is append-only: stages add turns, never rewrite history.
/// `search_results` is written wholesale by the search stage and read-only
/// afterwards. One instance lives per incoming query.
#[derive(Debug, Clone, Serialize, Default)]
pub struct PipelineState {
    pub messages: Vec<Turn>,
    pub search_results: Vec<SearchResult>,
}

impl PipelineState {
    pub fn new(query: impl Into<String>) -> Self {
        Self { messages: vec![Turn::user(query)], search_results: Vec::new() }
    }

    pub fn push_turn(&mut self, turn: Turn) {
        self.messages.push(turn);
    }

    /// Text of the most recent user turn, if any.
    pub fn latest_user_text(&self) -> Option<&str> {
        self.messages
            .iter()
            .rev()
            .find(|t| t.role == Role::User)
            .map(|t| t.content.as_str())
    }
}
