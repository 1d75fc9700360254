//! In-memory catalog backed by a resource snapshot.
//!
//! # Snapshot Format
//!
//! ```yaml
//! resources:
//!   - name: projects/demo/apis/petstore/versions/1.0.0/specs/openapi.yaml
//!     update_time: 2021-06-01T12:00:00Z
//!     mime_type: application/x.openapi+gzip;version=3.0.0
//!   - name: projects/demo/apis/petstore/versions/1.0.0/specs/openapi.yaml/artifacts/lint-gnostic
//!     update_time: 2021-06-02T08:30:00Z
//! ```
//!
//! Files ending in `.json` are read as JSON, everything else as YAML.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{ListError, Lister, parse_filter};
use crate::pattern::{self, RESOURCE_TOKEN};
use crate::resource::{PROJECTS_COLLECTION, Resource};

/// An ordered set of resources, unique by name.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryCatalog {
  resources: Vec<Resource>,
}

impl MemoryCatalog {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn from_resources(resources: impl IntoIterator<Item = Resource>) -> Self {
    let mut catalog = Self::new();
    for resource in resources {
      catalog.insert(resource);
    }
    catalog
  }

  /// Add a resource, replacing any existing resource with the same name in place.
  pub fn insert(&mut self, resource: Resource) {
    match self.resources.iter_mut().find(|r| r.name == resource.name) {
      Some(existing) => *existing = resource,
      None => self.resources.push(resource),
    }
  }

  pub fn remove(&mut self, name: &str) -> Option<Resource> {
    let index = self.resources.iter().position(|r| r.name() == name)?;
    Some(self.resources.remove(index))
  }

  pub fn resources(&self) -> &[Resource] {
    &self.resources
  }

  pub fn len(&self) -> usize {
    self.resources.len()
  }

  pub fn is_empty(&self) -> bool {
    self.resources.is_empty()
  }

  /// Load a snapshot file.
  pub fn load(path: &Path) -> Result<Self, ListError> {
    let content = fs::read_to_string(path).map_err(|source| ListError::Io {
      path: path.to_path_buf(),
      source,
    })?;

    let parsed: Result<Self, String> = if path.extension().is_some_and(|ext| ext == "json") {
      serde_json::from_str(&content).map_err(|e| e.to_string())
    } else {
      serde_yaml::from_str(&content).map_err(|e| e.to_string())
    };

    let catalog = parsed.map_err(|message| ListError::Parse {
      path: path.to_path_buf(),
      message,
    })?;
    debug!(path = ?path, resources = catalog.len(), "loaded catalog snapshot");
    Ok(Self::from_resources(catalog.resources))
  }

  pub fn from_yaml(content: &str) -> Result<Self, serde_yaml::Error> {
    let catalog: Self = serde_yaml::from_str(content)?;
    Ok(Self::from_resources(catalog.resources))
  }
}

/// Reject patterns no catalog could list.
fn check_pattern(pattern: &str) -> Result<(), ListError> {
  let invalid = |reason: &str| ListError::InvalidPattern {
    pattern: pattern.to_string(),
    reason: reason.to_string(),
  };

  if pattern.contains(RESOURCE_TOKEN) {
    return Err(invalid("unresolved $resource token"));
  }
  if !pattern::is_qualified(pattern) {
    return Err(invalid(&format!("must start with '{PROJECTS_COLLECTION}/'")));
  }
  let segments: Vec<&str> = pattern.split('/').collect();
  if segments.len() < 4 || segments.len() % 2 != 0 || segments.iter().any(|s| s.is_empty()) {
    return Err(invalid("expected collection/id pairs below a project"));
  }
  Ok(())
}

impl Lister for MemoryCatalog {
  fn list(&self, pattern: &str, filter: Option<&str>) -> Result<Vec<Resource>, ListError> {
    check_pattern(pattern)?;
    let filter = parse_filter(filter)?;

    Ok(
      self
        .resources
        .iter()
        .filter(|r| pattern::matches(pattern, r.name()) && filter.matches(r))
        .cloned()
        .collect(),
    )
  }
}
