//! Manifest types for regctl.
//!
//! # Structure
//!
//! ```yaml
//! id: lint
//! project: demo
//! manifest:
//!   - resource: apis/-/versions/-/specs/-/artifacts/lint-gnostic
//!     dependencies:
//!       - source: $resource.spec
//!         filter: mime_type.contains('openapi')
//!     action: compute lint $source0 --linter gnostic
//! ```
//!
//! Resource patterns are relative to `projects/<project>` unless they already
//! start with `projects/`.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::pattern;

/// Errors that can occur while loading a manifest.
#[derive(Debug, Error)]
pub enum ManifestError {
  #[error("failed to read manifest {path}: {source}")]
  Io {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("failed to parse manifest: {0}")]
  Yaml(#[from] serde_yaml::Error),

  #[error("invalid manifest: {}", .0.join("; "))]
  Invalid(Vec<String>),
}

/// The complete controller manifest.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Manifest {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub id: Option<String>,
  /// Project id every relative pattern is resolved under.
  pub project: String,
  #[serde(rename = "manifest", default)]
  pub entries: Vec<ManifestEntry>,
}

/// One generated resource pattern and the rule that regenerates it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ManifestEntry {
  #[serde(rename = "resource")]
  pub resource_pattern: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub filter: Option<String>,
  #[serde(default)]
  pub dependencies: Vec<Dependency>,
  /// Command template with `$sourceN[.entity]` tokens.
  #[serde(rename = "action")]
  pub action_template: String,
}

/// A source resource pattern a generated resource depends on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Dependency {
  /// Source pattern, optionally containing one `$resource.<entity>` token.
  #[serde(rename = "source")]
  pub source_pattern: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub filter: Option<String>,
}

impl Manifest {
  pub fn from_yaml(content: &str) -> Result<Self, ManifestError> {
    Ok(serde_yaml::from_str(content)?)
  }

  pub fn load(path: &Path) -> Result<Self, ManifestError> {
    let content = fs::read_to_string(path).map_err(|source| ManifestError::Io {
      path: path.to_path_buf(),
      source,
    })?;
    Self::from_yaml(&content)
  }

  /// Fully-qualified target pattern for `entry`.
  pub fn target_pattern(&self, entry: &ManifestEntry) -> String {
    entry.target_pattern(&self.project)
  }
}

impl ManifestEntry {
  pub fn target_pattern(&self, project: &str) -> String {
    pattern::qualify(project, &self.resource_pattern)
  }
}

impl Dependency {
  pub fn new(source_pattern: impl Into<String>) -> Self {
    Self {
      source_pattern: source_pattern.into(),
      filter: None,
    }
  }

  pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
    self.filter = Some(filter.into());
    self
  }
}
