//! Product catalog: immutable in-memory index with substring search, plus
//! the YAML/JSON file loader that builds it at startup.

pub mod index;
pub mod loader;

pub use index::{CatalogIndex, ProductHit};
pub use loader::{load_catalog, CatalogFile};

use thiserror::Error;

/// Errors raised while loading the catalog file.
///
/// All of these abort startup; the attendant does not run without its
/// catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("catalog file not found: {0}")]
    FileNotFound(String),

    #[error("failed to read catalog: {0}")]
    Io(#[from] std::io::Error),

    #[error("catalog parse error in {path}: {message}")]
    Parse { path: String, message: String },

    #[error("unsupported catalog format: {0} (expected yaml, yml or json)")]
    UnsupportedFormat(String),
}
