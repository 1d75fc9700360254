//! Staleness evaluation for one manifest entry.
//!
//! # Passes
//!
//! 1. **Existing targets.** Every listed target is joined against each
//!    dependency map by group key. A target is refreshed when all of its
//!    groups exist and at least one was updated strictly after it.
//! 2. **Missing targets.** Every dependency-0 group that no existing target
//!    matched, and that every other dependency also has, gets a creation
//!    action.
//!
//! Missing groups and up-to-date targets are not errors; they produce no
//! action.

use std::collections::HashSet;

use tracing::debug;

use super::index::{DependencyMap, group_key};
use super::types::{Action, ControllerError};
use crate::catalog::Lister;
use crate::manifest::ManifestEntry;
use crate::placeholder;
use crate::resource::Resource;

/// Track matched groups per dependency index instead of in one shared set.
///
/// With one shared set, a group key matched through any dependency suppresses
/// creation for dependency 0's group of the same key.
pub const VISITED_KEYED_BY_DEPENDENCY: bool = false;

/// Group keys matched by an existing target.
#[derive(Debug, Default)]
struct VisitedGroups {
  keys: HashSet<(Option<usize>, String)>,
}

impl VisitedGroups {
  fn slot(dependency: usize) -> Option<usize> {
    VISITED_KEYED_BY_DEPENDENCY.then_some(dependency)
  }

  fn mark(&mut self, dependency: usize, key: &str) {
    self.keys.insert((Self::slot(dependency), key.to_string()));
  }

  fn contains(&self, dependency: usize, key: &str) -> bool {
    self.keys.contains(&(Self::slot(dependency), key.to_string()))
  }
}

/// Evaluate one entry against its prebuilt dependency maps.
///
/// `maps[i]` must be the map built for `entry.dependencies[i]`.
///
/// # Errors
///
/// Fails only if listing the entry's targets fails.
pub fn evaluate_entry(
  entry: &ManifestEntry,
  target_pattern: &str,
  maps: &[DependencyMap],
  lister: &impl Lister,
) -> Result<Vec<Action>, ControllerError> {
  let targets = lister.list(target_pattern, entry.filter.as_deref())?;
  let mut visited = VisitedGroups::default();
  let mut actions = Vec::new();

  for target in &targets {
    if let Some(action) = refresh_target(entry, target, maps, &mut visited) {
      actions.push(action);
    }
  }

  let refreshed = actions.len();
  actions.extend(create_missing(entry, maps, &visited));
  debug!(
    pattern = target_pattern,
    targets = targets.len(),
    refreshed,
    created = actions.len() - refreshed,
    "evaluated entry"
  );

  Ok(actions)
}

fn refresh_target(
  entry: &ManifestEntry,
  target: &Resource,
  maps: &[DependencyMap],
  visited: &mut VisitedGroups,
) -> Option<Action> {
  let mut stale = false;
  let mut representatives = Vec::with_capacity(maps.len());

  for (index, map) in maps.iter().enumerate() {
    let key = group_key(map.attribute(), target);
    let Some(collection) = map.get(key) else {
      debug!(
        resource = target.name(),
        dependency = index,
        group = key,
        "target is missing a dependency group"
      );
      return None;
    };
    if collection.max_update_time() > target.update_time {
      stale = true;
    }
    visited.mark(index, key);
    representatives.push(collection.representative());
  }

  if !stale {
    debug!(resource = target.name(), "target is up to date");
    return None;
  }

  let command = placeholder::render(&entry.action_template, &representatives);
  Some(Action::refresh(command, target.name()))
}

fn create_missing(entry: &ManifestEntry, maps: &[DependencyMap], visited: &VisitedGroups) -> Vec<Action> {
  let Some((first, rest)) = maps.split_first() else {
    return Vec::new();
  };

  let mut actions = Vec::new();
  'groups: for (key, collection) in first.iter() {
    if visited.contains(0, key) {
      continue;
    }

    let mut representatives = vec![collection.representative()];
    for (index, map) in rest.iter().enumerate() {
      match map.get(key) {
        Some(collection) => representatives.push(collection.representative()),
        None => {
          debug!(group = key, dependency = index + 1, "dependency group not ready");
          continue 'groups;
        }
      }
    }

    let command = placeholder::render(&entry.action_template, &representatives);
    actions.push(Action::create(command, key));
  }
  actions
}
