//! Manifest evaluation.
//!
//! Entries are processed one at a time. For each entry the target pattern is
//! qualified with the manifest's project, one [`DependencyMap`] is built per
//! dependency, and the entry is evaluated against those maps.
//!
//! [`process_manifest`] stops at the first error and returns no commands.
//! [`evaluate_entries`] evaluates every entry independently and reports one
//! [`EntryOutcome`] per entry.

mod evaluate;
mod index;
mod types;

pub use evaluate::{VISITED_KEYED_BY_DEPENDENCY, evaluate_entry};
pub use index::{DependencyMap, GLOBAL_GROUP, ResourceCollection, build_map, group_key};
pub use types::*;

use tracing::{info, warn};

use crate::catalog::Lister;
use crate::manifest::{Manifest, ManifestEntry};

/// Evaluate a single entry under `project`.
pub fn process_entry(project: &str, entry: &ManifestEntry, lister: &impl Lister) -> Result<Vec<Action>, ControllerError> {
  let target_pattern = entry.target_pattern(project);
  let maps = entry
    .dependencies
    .iter()
    .map(|dependency| build_map(dependency, &target_pattern, lister))
    .collect::<Result<Vec<_>, _>>()?;

  let actions = evaluate_entry(entry, &target_pattern, &maps, lister)?;
  info!(
    pattern = %target_pattern,
    dependencies = maps.len(),
    actions = actions.len(),
    "processed entry"
  );
  Ok(actions)
}

/// Evaluate every entry, stopping at the first error.
pub fn plan_manifest(manifest: &Manifest, lister: &impl Lister) -> Result<Vec<Action>, ControllerError> {
  let mut actions = Vec::new();
  for entry in &manifest.entries {
    actions.extend(process_entry(&manifest.project, entry, lister)?);
  }
  Ok(actions)
}

/// Commands for every stale or missing target in `manifest`, in entry order.
///
/// # Errors
///
/// Any pattern or listing error aborts the whole call; no partial command
/// list is returned.
pub fn process_manifest(manifest: &Manifest, lister: &impl Lister) -> Result<Vec<String>, ControllerError> {
  Ok(
    plan_manifest(manifest, lister)?
      .into_iter()
      .map(|action| action.command)
      .collect(),
  )
}

/// Evaluate every entry independently, continuing past failures.
pub fn evaluate_entries(manifest: &Manifest, lister: &impl Lister) -> Vec<EntryOutcome> {
  manifest
    .entries
    .iter()
    .enumerate()
    .map(|(index, entry)| {
      let result = process_entry(&manifest.project, entry, lister);
      if let Err(e) = &result {
        warn!(entry = index, error = %e, "entry failed");
      }
      EntryOutcome {
        index,
        target_pattern: manifest.target_pattern(entry),
        result,
      }
    })
    .collect()
}
