//! The catalog listing boundary.
//!
//! The controller only ever reads the catalog through [`Lister`]: given a
//! resolved pattern and an optional filter, return every matching resource in
//! catalog order. [`MemoryCatalog`] is the bundled implementation, backed by a
//! snapshot file or built up in tests.

mod filter;
mod memory;

use std::path::PathBuf;

use thiserror::Error;

use crate::resource::Resource;

pub use filter::{Expr, Field, Filter, FilterError, StringOp};
pub use memory::MemoryCatalog;

/// Errors returned by a catalog listing.
#[derive(Debug, Error)]
pub enum ListError {
  /// The pattern is not a listable resource pattern.
  #[error("invalid pattern '{pattern}': {reason}")]
  InvalidPattern { pattern: String, reason: String },

  #[error("invalid filter '{filter}': {source}")]
  InvalidFilter {
    filter: String,
    #[source]
    source: FilterError,
  },

  #[error("failed to read catalog {path}: {source}")]
  Io {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("failed to parse catalog {path}: {message}")]
  Parse { path: PathBuf, message: String },

  /// Failure reported by a remote catalog backend.
  #[error("catalog request failed: {0}")]
  Backend(String),
}

/// Source of catalog resources.
///
/// Implementations return a fully materialized listing that preserves catalog
/// order. Both collection patterns (`.../specs/-`) and singleton patterns
/// (`.../specs/openapi.yaml`) must be supported.
pub trait Lister {
  fn list(&self, pattern: &str, filter: Option<&str>) -> Result<Vec<Resource>, ListError>;
}

impl<L: Lister + ?Sized> Lister for &L {
  fn list(&self, pattern: &str, filter: Option<&str>) -> Result<Vec<Resource>, ListError> {
    (**self).list(pattern, filter)
  }
}

/// Parse an optional filter string, treating `None` and blank text alike.
pub fn parse_filter(filter: Option<&str>) -> Result<Filter, ListError> {
  let text = filter.unwrap_or("");
  Filter::parse(text).map_err(|source| ListError::InvalidFilter {
    filter: text.to_string(),
    source,
  })
}
