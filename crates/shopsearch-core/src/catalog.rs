//! Catalog loading and validation.
//!
//! The catalog is a JSON array of `{ name, description, price }` records.
//! All three fields must be present and non-null per record; violations are
//! fatal configuration errors surfaced immediately at startup. An empty
//! catalog is valid and yields an empty index.

use std::fs;
use std::path::Path;

use serde::Deserialize;
use tracing::info;

use crate::error::{Error, Result};
use crate::types::CatalogItem;

#[derive(Debug, Deserialize)]
struct CatalogRecord {
    name: Option<String>,
    description: Option<String>,
    price: Option<f64>,
}

/// Load and validate the product catalog from a JSON file.
pub fn load_catalog(path: &Path) -> Result<Vec<CatalogItem>> {
    let raw = fs::read_to_string(path)
        .map_err(|e| Error::InvalidConfig(format!("cannot read catalog {}: {e}", path.display())))?;
    let records: Vec<CatalogRecord> = serde_json::from_str(&raw)
        .map_err(|e| Error::InvalidConfig(format!("malformed catalog {}: {e}", path.display())))?;
    let items = validate_records(records)?;
    info!(count = items.len(), path = %path.display(), "catalog loaded");
    Ok(items)
}

fn validate_records(records: Vec<CatalogRecord>) -> Result<Vec<CatalogItem>> {
    records
        .into_iter()
        .enumerate()
        .map(|(index, r)| {
            let name = r
                .name
                .filter(|n| !n.trim().is_empty())
                .ok_or_else(|| missing(index, "name"))?;
            let description = r
                .description
                .filter(|d| !d.trim().is_empty())
                .ok_or_else(|| missing(index, "description"))?;
            let price = r.price.ok_or_else(|| missing(index, "price"))?;
            if !price.is_finite() {
                return Err(Error::InvalidCatalog {
                    index,
                    reason: "price is not a finite number".to_string(),
                });
            }
            Ok(CatalogItem::new(name, description, price))
        })
        .collect()
}

fn missing(index: usize, field: &str) -> Error {
    Error::InvalidCatalog { index, reason: format!("missing or empty field '{field}'") }
}
