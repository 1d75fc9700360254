//! Static manifest validation.
//!
//! Validation catches problems that would otherwise only show up part way
//! through a controller run: unresolvable entity tokens, action tokens that
//! reference dependencies that do not exist, and unparsable filters. All
//! problems are collected and reported together.

use std::collections::HashMap;

use super::types::{Manifest, ManifestError};
use crate::catalog::Filter;
use crate::pattern;
use crate::placeholder::{self, Segment};

impl Manifest {
  /// Validate the manifest, returning every problem found.
  pub fn problems(&self) -> Vec<String> {
    let mut problems = Vec::new();

    if self.project.trim().is_empty() {
      problems.push("project must not be empty".to_string());
    } else if self.project.contains('/') {
      problems.push(format!("project '{}' must be a bare id", self.project));
    }

    for (index, entry) in self.entries.iter().enumerate() {
      let mut report = |message: String| problems.push(format!("entry {index}: {message}"));

      if entry.resource_pattern.trim().is_empty() {
        report("resource pattern must not be empty".to_string());
        continue;
      }
      if entry.action_template.trim().is_empty() {
        report("action must not be empty".to_string());
      }
      if let Some(message) = filter_problem(entry.filter.as_deref()) {
        report(format!("filter: {message}"));
      }

      let target = self.target_pattern(entry);
      for (dep_index, dependency) in entry.dependencies.iter().enumerate() {
        let source = &dependency.source_pattern;
        if let Err(e) = pattern::check_tokens(source) {
          report(format!("dependency {dep_index}: {e}"));
        } else if let Err(e) = pattern::resolve(&target, source) {
          report(format!("dependency {dep_index}: {e}"));
        }
        if let Some(message) = filter_problem(dependency.filter.as_deref()) {
          report(format!("dependency {dep_index} filter: {message}"));
        }
      }

      let mut first_form: HashMap<usize, &str> = HashMap::new();
      for segment in placeholder::parse(&entry.action_template) {
        let Segment::Source { source, text } = segment else {
          continue;
        };
        if source.index >= entry.dependencies.len() {
          report(format!(
            "action references {text} but only {} dependencies are declared",
            entry.dependencies.len()
          ));
          continue;
        }
        match first_form.get(&source.index) {
          Some(first) if *first != text => {
            report(format!("action uses both {first} and {text}; only {first} is substituted"));
          }
          Some(_) => {}
          None => {
            first_form.insert(source.index, text);
          }
        }
      }
    }

    problems
  }

  /// Validate the manifest.
  ///
  /// # Errors
  ///
  /// Returns [`ManifestError::Invalid`] listing every problem found.
  pub fn validate(&self) -> Result<(), ManifestError> {
    let problems = self.problems();
    if problems.is_empty() {
      Ok(())
    } else {
      Err(ManifestError::Invalid(problems))
    }
  }
}

fn filter_problem(filter: Option<&str>) -> Option<String> {
  filter.and_then(|f| Filter::parse(f).err()).map(|e| e.to_string())
}
