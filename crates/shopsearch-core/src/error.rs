//! Typed errors for configuration and pipeline failures.
//!
//! External search failures are deliberately absent here: they are recovered
//! at the client boundary and never surface as errors (see the hybrid engine).

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid catalog record {index}: {reason}")]
    InvalidCatalog { index: usize, reason: String },

    #[error("Embedding dimension mismatch: index has {expected}, query has {got}")]
    DimensionMismatch { expected: usize, got: usize },

    #[error("Generation failed: {0}")]
    Generation(String),
}

pub type Result<T> = std::result::Result<T, Error>;
