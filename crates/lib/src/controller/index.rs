//! Dependency indexing.
//!
//! Each dependency's listed resources are grouped by the entity named in its
//! source pattern. A group records the newest update time among its members,
//! which is what staleness is judged against.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use tracing::debug;

use super::types::ControllerError;
use crate::catalog::Lister;
use crate::manifest::Dependency;
use crate::pattern;
use crate::resource::{Entity, Resource};

/// Group key shared by every resource when a pattern has no entity token.
pub const GLOBAL_GROUP: &str = "";

/// The group key of `resource` under `attribute`.
pub fn group_key(attribute: Option<Entity>, resource: &Resource) -> &str {
  match attribute {
    Some(entity) => resource.entity(entity),
    None => GLOBAL_GROUP,
  }
}

/// Freshness witness for one group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceCollection {
  max_update_time: DateTime<Utc>,
  members: Vec<Resource>,
}

impl ResourceCollection {
  fn new(first: Resource) -> Self {
    Self {
      max_update_time: first.update_time,
      members: vec![first],
    }
  }

  fn push(&mut self, resource: Resource) {
    self.max_update_time = self.max_update_time.max(resource.update_time);
    self.members.push(resource);
  }

  /// Newest update time among the members.
  pub fn max_update_time(&self) -> DateTime<Utc> {
    self.max_update_time
  }

  /// Members in listing order.
  pub fn members(&self) -> &[Resource] {
    &self.members
  }

  /// The first listed member.
  pub fn representative(&self) -> &Resource {
    &self.members[0]
  }
}

/// Listed dependency resources grouped by key.
///
/// Uses [`BTreeMap`] so creation actions come out in a deterministic order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DependencyMap {
  attribute: Option<Entity>,
  groups: BTreeMap<String, ResourceCollection>,
}

impl DependencyMap {
  pub fn new(attribute: Option<Entity>) -> Self {
    Self {
      attribute,
      groups: BTreeMap::new(),
    }
  }

  /// The entity resources are grouped by, `None` for the global group.
  pub fn attribute(&self) -> Option<Entity> {
    self.attribute
  }

  /// Add a resource to its group, creating the group on first use.
  pub fn insert(&mut self, resource: Resource) {
    let key = group_key(self.attribute, &resource);
    match self.groups.get_mut(key) {
      Some(collection) => collection.push(resource),
      None => {
        let key = key.to_string();
        self.groups.insert(key, ResourceCollection::new(resource));
      }
    }
  }

  pub fn get(&self, key: &str) -> Option<&ResourceCollection> {
    self.groups.get(key)
  }

  /// The group `resource` would join under this map's attribute.
  pub fn group_for(&self, resource: &Resource) -> Option<&ResourceCollection> {
    self.get(group_key(self.attribute, resource))
  }

  pub fn iter(&self) -> impl Iterator<Item = (&str, &ResourceCollection)> {
    self.groups.iter().map(|(k, v)| (k.as_str(), v))
  }

  pub fn len(&self) -> usize {
    self.groups.len()
  }

  pub fn is_empty(&self) -> bool {
    self.groups.is_empty()
  }
}

impl Extend<Resource> for DependencyMap {
  fn extend<T: IntoIterator<Item = Resource>>(&mut self, iter: T) {
    for resource in iter {
      self.insert(resource);
    }
  }
}

/// Resolve, list and group the resources of one dependency.
///
/// Source patterns that are relative after resolution are qualified with the
/// target pattern's project.
///
/// # Errors
///
/// Fails if the entity token cannot be resolved against `target_pattern` or
/// the listing fails.
pub fn build_map(
  dependency: &Dependency,
  target_pattern: &str,
  lister: &impl Lister,
) -> Result<DependencyMap, ControllerError> {
  let mut source = pattern::resolve(target_pattern, &dependency.source_pattern)?;
  if let Some(project) = pattern::project_of(target_pattern) {
    source = pattern::qualify(project, &source);
  }

  let attribute = pattern::group_attribute(&dependency.source_pattern);
  let mut map = DependencyMap::new(attribute);
  map.extend(lister.list(&source, dependency.filter.as_deref())?);

  debug!(
    source = %source,
    attribute = ?attribute,
    groups = map.len(),
    "built dependency map"
  );
  Ok(map)
}
