//! Action template parsing and command synthesis.
//!
//! Action templates reference the representative resource of each dependency
//! with `$source<N>` tokens, where `N` is the 0-based dependency index.
//!
//! # Token Formats
//!
//! - `$source0` - the representative's full resource name
//! - `$source0.spec` - the representative's `spec` accessor (also `api`,
//!   `version` and `artifact`)
//!
//! The index is the full run of digits after `$source`, so `$source1` never
//! matches a prefix of `$source10`. A `.` followed by anything other than an
//! entity name is left as literal text.
//!
//! # Example
//!
//! ```
//! use regctl_lib::placeholder::synthesize;
//!
//! let command = synthesize(
//!   "compute lint $source0 --linter gnostic",
//!   &["projects/demo/apis/a/versions/v/specs/s".to_string()],
//! );
//! assert_eq!(command, "compute lint projects/demo/apis/a/versions/v/specs/s --linter gnostic");
//! ```

use crate::resource::{Entity, Resource};

/// Marker that introduces a source token in an action template.
pub const SOURCE_TOKEN: &str = "$source";

/// A parsed `$sourceN[.entity]` reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceRef {
  pub index: usize,
  pub entity: Option<Entity>,
}

/// A segment of a parsed template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment<'a> {
  /// Literal text (no tokens)
  Literal(&'a str),

  /// A source token and its exact text in the template
  Source { source: SourceRef, text: &'a str },
}

/// Parse a template into literal and token segments.
pub fn parse(template: &str) -> Vec<Segment<'_>> {
  let mut segments = Vec::new();
  let mut literal_start = 0;
  let mut cursor = 0;

  while let Some(found) = template[cursor..].find(SOURCE_TOKEN) {
    let start = cursor + found;
    let digits_start = start + SOURCE_TOKEN.len();
    let digits_len = template[digits_start..]
      .bytes()
      .take_while(u8::is_ascii_digit)
      .count();

    let index = match template[digits_start..digits_start + digits_len].parse::<usize>() {
      Ok(index) => index,
      Err(_) => {
        // "$source" with no digits (or an absurd index) stays literal
        cursor = digits_start;
        continue;
      }
    };

    let mut end = digits_start + digits_len;
    let entity = template[end..]
      .strip_prefix('.')
      .and_then(Entity::match_prefix);
    if let Some(entity) = entity {
      end += 1 + entity.as_str().len();
    }

    if literal_start < start {
      segments.push(Segment::Literal(&template[literal_start..start]));
    }
    segments.push(Segment::Source {
      source: SourceRef { index, entity },
      text: &template[start..end],
    });
    literal_start = end;
    cursor = end;
  }

  if literal_start < template.len() {
    segments.push(Segment::Literal(&template[literal_start..]));
  }

  segments
}

/// Every source token in `template`, in order of appearance.
pub fn source_refs(template: &str) -> Vec<SourceRef> {
  parse(template)
    .into_iter()
    .filter_map(|segment| match segment {
      Segment::Source { source, .. } => Some(source),
      Segment::Literal(_) => None,
    })
    .collect()
}

/// The first token in `template` that references dependency `index`.
pub fn source_ref(template: &str, index: usize) -> Option<SourceRef> {
  source_refs(template).into_iter().find(|s| s.index == index)
}

/// Derive the substitution value for dependency `index`.
///
/// Uses the accessor named by the first `$source<index>` token's suffix, or
/// the representative's full name when that token has no suffix.
pub fn derive_arg(index: usize, representative: &Resource, template: &str) -> String {
  match source_ref(template, index).and_then(|s| s.entity) {
    Some(entity) => representative.entity(entity).to_string(),
    None => representative.name().to_string(),
  }
}

/// Substitute `args` into `template`.
///
/// For each index `i < args.len()`, every occurrence of the exact token text
/// of the first `$source<i>` token is replaced by `args[i]`. Tokens with other
/// indices, or with a different suffix than the first occurrence, are left as
/// written.
pub fn synthesize(template: &str, args: &[String]) -> String {
  let segments = parse(template);

  let mut first_text: Vec<Option<&str>> = vec![None; args.len()];
  for segment in &segments {
    if let Segment::Source { source, text } = segment
      && let Some(slot) = first_text.get_mut(source.index)
      && slot.is_none()
    {
      *slot = Some(*text);
    }
  }

  let mut command = String::with_capacity(template.len());
  for segment in &segments {
    match segment {
      Segment::Literal(s) => command.push_str(s),
      Segment::Source { source, text } => match first_text.get(source.index) {
        Some(Some(first)) if first == text => command.push_str(&args[source.index]),
        _ => command.push_str(text),
      },
    }
  }
  command
}

/// Render `template` using one representative resource per dependency.
pub fn render(template: &str, representatives: &[&Resource]) -> String {
  let args: Vec<String> = representatives
    .iter()
    .enumerate()
    .map(|(index, representative)| derive_arg(index, representative, template))
    .collect();
  synthesize(template, &args)
}
