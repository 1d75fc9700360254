//! Resource patterns and entity-token resolution.
//!
//! A pattern is a resource name in which any id segment may be `-`, meaning
//! "match any". Dependency source patterns may additionally contain a single
//! entity token, `$resource.<entity>`, which stands for the part of the
//! enclosing target pattern that addresses that entity.
//!
//! # Example
//!
//! ```
//! use regctl_lib::pattern::resolve;
//!
//! let target = "projects/demo/apis/-/versions/-/specs/-/artifacts/lint-gnostic";
//! assert_eq!(
//!   resolve(target, "$resource.spec").unwrap(),
//!   "projects/demo/apis/-/versions/-/specs/-",
//! );
//! ```

use thiserror::Error;

use crate::resource::{Entity, PROJECTS_COLLECTION};

/// Marker that introduces an entity token in a source pattern.
pub const RESOURCE_TOKEN: &str = "$resource.";

/// Segment value that matches any id.
pub const WILDCARD: &str = "-";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PatternError {
  /// The target pattern has no segment addressing the token's entity.
  #[error("cannot resolve $resource.{entity} against target pattern '{target}'")]
  InvalidPattern { entity: Entity, target: String },

  #[error("pattern '{0}' contains more than one $resource token")]
  MultipleTokens(String),

  #[error("pattern '{0}' references an unknown entity after $resource.")]
  UnknownEntity(String),
}

/// The location of an entity token inside a pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntityToken {
  pub entity: Entity,
  /// Byte offset of the `$`.
  pub start: usize,
  /// Byte offset one past the entity name.
  pub end: usize,
}

/// Find the first well-formed `$resource.<entity>` token in `pattern`.
pub fn find_token(pattern: &str) -> Option<EntityToken> {
  pattern.match_indices(RESOURCE_TOKEN).find_map(|(start, _)| {
    let after = start + RESOURCE_TOKEN.len();
    Entity::match_prefix(&pattern[after..]).map(|entity| EntityToken {
      entity,
      start,
      end: after + entity.as_str().len(),
    })
  })
}

/// Check that `pattern` carries at most one token and that it names a known entity.
pub fn check_tokens(pattern: &str) -> Result<(), PatternError> {
  let markers = pattern.matches(RESOURCE_TOKEN).count();
  if markers > 1 {
    return Err(PatternError::MultipleTokens(pattern.to_string()));
  }
  if markers == 1 && find_token(pattern).is_none() {
    return Err(PatternError::UnknownEntity(pattern.to_string()));
  }
  Ok(())
}

/// The entity whose accessor groups resources listed with `pattern`.
///
/// `None` means every match falls into the single global group.
pub fn group_attribute(pattern: &str) -> Option<Entity> {
  find_token(pattern).map(|token| token.entity)
}

/// The longest prefix of `target` that ends in `/<collection>/<id>` for `entity`.
fn entity_prefix(target: &str, entity: Entity) -> Option<String> {
  let segments: Vec<&str> = target.split('/').collect();
  (0..segments.len().saturating_sub(1))
    .rev()
    .find(|&i| i % 2 == 0 && segments[i] == entity.collection() && !segments[i + 1].is_empty())
    .map(|i| segments[..i + 2].join("/"))
}

/// Resolve the entity token of `source` against `target`.
///
/// Patterns without a token are returned unchanged. Only the first token is
/// replaced.
///
/// # Errors
///
/// Returns [`PatternError::InvalidPattern`] when `target` has no segment for
/// the token's entity.
pub fn resolve(target: &str, source: &str) -> Result<String, PatternError> {
  let Some(token) = find_token(source) else {
    return Ok(source.to_string());
  };

  let prefix = entity_prefix(target, token.entity).ok_or_else(|| PatternError::InvalidPattern {
    entity: token.entity,
    target: target.to_string(),
  })?;

  Ok(format!("{}{}{}", &source[..token.start], prefix, &source[token.end..]))
}

/// Qualify a project-relative pattern with `projects/<project>`.
pub fn qualify(project: &str, pattern: &str) -> String {
  if is_qualified(pattern) {
    pattern.to_string()
  } else {
    format!("{PROJECTS_COLLECTION}/{project}/{pattern}")
  }
}

pub fn is_qualified(pattern: &str) -> bool {
  pattern
    .strip_prefix(PROJECTS_COLLECTION)
    .is_some_and(|rest| rest.starts_with('/'))
}

/// The project id of a qualified pattern.
pub fn project_of(pattern: &str) -> Option<&str> {
  if !is_qualified(pattern) {
    return None;
  }
  pattern.split('/').nth(1).filter(|p| !p.is_empty())
}

/// Segment-wise match of `name` against `pattern`.
///
/// Both must have the same number of segments; a `-` segment in the pattern
/// matches any value.
pub fn matches(pattern: &str, name: &str) -> bool {
  let mut pattern_segments = pattern.split('/');
  let mut name_segments = name.split('/');
  loop {
    match (pattern_segments.next(), name_segments.next()) {
      (None, None) => return true,
      (Some(p), Some(n)) if p == WILDCARD || p == n => continue,
      _ => return false,
    }
  }
}
