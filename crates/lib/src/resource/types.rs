//! Resource names and records.
//!
//! # Name Layout
//!
//! ```text
//! projects/<p>[/apis/<a>[/versions/<v>[/specs/<s>]]][/artifacts/<x>]
//! ```
//!
//! Artifacts may be attached to a project, an api, a version or a spec, and are
//! always the last pair in a name. Every other resource kind is named by the
//! pair that ends its name.
//!
//! # Entity Accessors
//!
//! [`Resource::entity`] returns the prefix of a name up to and including the id
//! of the requested entity. For `projects/p/apis/a/versions/v/specs/s/artifacts/lint`:
//!
//! | Entity     | Value                                                  |
//! |------------|--------------------------------------------------------|
//! | `api`      | `projects/p/apis/a`                                    |
//! | `version`  | `projects/p/apis/a/versions/v`                         |
//! | `spec`     | `projects/p/apis/a/versions/v/specs/s`                 |
//! | `artifact` | `projects/p/apis/a/versions/v/specs/s/artifacts/lint`  |
//!
//! Entities that do not appear in a name yield an empty string.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Leading collection of every resource name.
pub const PROJECTS_COLLECTION: &str = "projects";

/// The kinds of catalog entity a name can address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Entity {
  Api,
  Version,
  Spec,
  Artifact,
}

impl Entity {
  /// All entities, in hierarchy order.
  pub const ALL: [Entity; 4] = [Entity::Api, Entity::Version, Entity::Spec, Entity::Artifact];

  /// The entity name used in `$resource.<entity>` and `$sourceN.<entity>` tokens.
  pub fn as_str(self) -> &'static str {
    match self {
      Entity::Api => "api",
      Entity::Version => "version",
      Entity::Spec => "spec",
      Entity::Artifact => "artifact",
    }
  }

  /// The plural collection segment that precedes this entity's id in a name.
  pub fn collection(self) -> &'static str {
    match self {
      Entity::Api => "apis",
      Entity::Version => "versions",
      Entity::Spec => "specs",
      Entity::Artifact => "artifacts",
    }
  }

  pub fn from_collection(collection: &str) -> Option<Entity> {
    Entity::ALL.into_iter().find(|e| e.collection() == collection)
  }

  fn index(self) -> usize {
    self as usize
  }

  /// Match an entity name at the start of `text`.
  ///
  /// The name must not be followed by another identifier character, so
  /// `spec/x` matches [`Entity::Spec`] but `specs` does not.
  pub fn match_prefix(text: &str) -> Option<Entity> {
    Entity::ALL.into_iter().find(|e| {
      text.strip_prefix(e.as_str()).is_some_and(|rest| {
        !rest
          .chars()
          .next()
          .is_some_and(|c| c.is_ascii_alphanumeric() || c == '_')
      })
    })
  }
}

impl fmt::Display for Entity {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for Entity {
  type Err = NameError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    Entity::ALL
      .into_iter()
      .find(|e| e.as_str() == s)
      .ok_or_else(|| NameError::UnknownEntity(s.to_string()))
  }
}

/// Errors produced while parsing resource names.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NameError {
  #[error("unknown entity: {0}")]
  UnknownEntity(String),

  #[error("invalid resource name '{name}': {reason}")]
  Invalid { name: String, reason: String },
}

/// A parsed, fully-qualified resource name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ResourceName {
  full: String,
  kind: Entity,
  /// Byte offset where each entity's prefix ends, indexed by [`Entity`] order.
  ends: [Option<usize>; 4],
  /// Byte offset where the `projects/<p>` prefix ends.
  project_end: usize,
}

impl ResourceName {
  pub fn parse(name: &str) -> Result<Self, NameError> {
    let invalid = |reason: &str| NameError::Invalid {
      name: name.to_string(),
      reason: reason.to_string(),
    };

    let segments: Vec<&str> = name.split('/').collect();
    if segments.len() < 4 || segments.len() % 2 != 0 {
      return Err(invalid("expected collection/id pairs below a project"));
    }
    if segments.iter().any(|s| s.is_empty()) {
      return Err(invalid("empty segment"));
    }
    if segments[0] != PROJECTS_COLLECTION {
      return Err(invalid("must start with 'projects/'"));
    }

    let mut ends = [None; 4];
    let mut offset = segments[0].len() + 1 + segments[1].len();
    let project_end = offset;
    let mut previous: Option<Entity> = None;
    let mut kind = None;

    for pair in segments[2..].chunks(2) {
      let entity = Entity::from_collection(pair[0])
        .ok_or_else(|| invalid(&format!("unknown collection '{}'", pair[0])))?;

      let allowed = match entity {
        Entity::Api => previous.is_none(),
        Entity::Version => previous == Some(Entity::Api),
        Entity::Spec => previous == Some(Entity::Version),
        Entity::Artifact => previous != Some(Entity::Artifact),
      };
      if !allowed {
        return Err(invalid(&format!("'{}' cannot appear here", pair[0])));
      }

      offset += 1 + pair[0].len() + 1 + pair[1].len();
      ends[entity.index()] = Some(offset);
      previous = Some(entity);
      kind = Some(entity);
    }

    Ok(Self {
      full: name.to_string(),
      kind: kind.ok_or_else(|| invalid("a bare project is not a catalog resource"))?,
      ends,
      project_end,
    })
  }

  pub fn as_str(&self) -> &str {
    &self.full
  }

  /// The entity this name addresses.
  pub fn kind(&self) -> Entity {
    self.kind
  }

  /// The name prefix through `entity`, or `""` when the name has no such entity.
  pub fn entity(&self, entity: Entity) -> &str {
    match self.ends[entity.index()] {
      Some(end) => &self.full[..end],
      None => "",
    }
  }

  /// The id segment of `entity`, if present.
  pub fn id(&self, entity: Entity) -> Option<&str> {
    self.ends[entity.index()].and_then(|end| self.full[..end].rsplit('/').next())
  }

  /// `projects/<p>`
  pub fn project(&self) -> &str {
    &self.full[..self.project_end]
  }

  pub fn project_id(&self) -> &str {
    &self.full[PROJECTS_COLLECTION.len() + 1..self.project_end]
  }
}

impl fmt::Display for ResourceName {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.full)
  }
}

impl FromStr for ResourceName {
  type Err = NameError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    Self::parse(s)
  }
}

impl TryFrom<String> for ResourceName {
  type Error = NameError;

  fn try_from(value: String) -> Result<Self, Self::Error> {
    Self::parse(&value)
  }
}

impl From<ResourceName> for String {
  fn from(name: ResourceName) -> Self {
    name.full
  }
}

/// A catalog resource as returned by a listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resource {
  pub name: ResourceName,
  pub update_time: DateTime<Utc>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub mime_type: Option<String>,
}

impl Resource {
  pub fn new(name: &str, update_time: DateTime<Utc>) -> Result<Self, NameError> {
    Ok(Self {
      name: ResourceName::parse(name)?,
      update_time,
      mime_type: None,
    })
  }

  pub fn with_mime_type(mut self, mime_type: impl Into<String>) -> Self {
    self.mime_type = Some(mime_type.into());
    self
  }

  pub fn name(&self) -> &str {
    self.name.as_str()
  }

  pub fn kind(&self) -> Entity {
    self.name.kind()
  }

  /// Accessor dispatch: the name prefix through `entity`, or `""`.
  pub fn entity(&self, entity: Entity) -> &str {
    self.name.entity(entity)
  }

  pub fn api(&self) -> &str {
    self.entity(Entity::Api)
  }

  pub fn version(&self) -> &str {
    self.entity(Entity::Version)
  }

  pub fn spec(&self) -> &str {
    self.entity(Entity::Spec)
  }

  pub fn artifact(&self) -> &str {
    self.entity(Entity::Artifact)
  }
}
