//! Types for controller evaluation.
//!
//! This module defines the error type, the generated actions, and the
//! per-entry outcome used when entries are evaluated independently.

use serde::Serialize;
use thiserror::Error;

use crate::catalog::ListError;
use crate::pattern::PatternError;

/// Errors that abort a controller run.
#[derive(Debug, Error)]
pub enum ControllerError {
  /// A dependency's entity token could not be resolved against its target.
  #[error("pattern error: {0}")]
  Pattern(#[from] PatternError),

  /// The catalog listing failed.
  #[error("listing failed: {0}")]
  Listing(#[from] ListError),
}

/// Why an action was generated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ActionKind {
  /// An existing target is older than one of its dependency groups.
  Refresh { target: String },

  /// Every dependency has a group with no target yet.
  ///
  /// `group` is the dependency-0 group key the target will be generated from.
  Create { group: String },
}

/// A command that regenerates or creates one target resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Action {
  pub command: String,
  #[serde(flatten)]
  pub kind: ActionKind,
}

impl Action {
  pub fn refresh(command: String, target: impl Into<String>) -> Self {
    Self {
      command,
      kind: ActionKind::Refresh { target: target.into() },
    }
  }

  pub fn create(command: String, group: impl Into<String>) -> Self {
    Self {
      command,
      kind: ActionKind::Create { group: group.into() },
    }
  }

  pub fn is_create(&self) -> bool {
    matches!(self.kind, ActionKind::Create { .. })
  }
}

/// The result of evaluating a single manifest entry.
#[derive(Debug)]
pub struct EntryOutcome {
  /// Position of the entry in the manifest.
  pub index: usize,
  /// The entry's fully-qualified target pattern.
  pub target_pattern: String,
  pub result: Result<Vec<Action>, ControllerError>,
}

impl EntryOutcome {
  pub fn is_success(&self) -> bool {
    self.result.is_ok()
  }
}
