//! Error types for distree

use thiserror::Error;

/// Result type alias for distree operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building or committing to a distribution
#[derive(Error, Debug)]
pub enum Error {
    /// A serialized distribution or amount could not be parsed
    #[error("Malformed input: {0}")]
    MalformedInput(String),

    /// An amount cannot be packed into a 256-bit leaf
    #[error("Encoding error: {0}")]
    Encoding(String),

    /// A merkle tree could not be built from its leaves
    #[error("Tree construction error: {0}")]
    TreeConstruction(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
