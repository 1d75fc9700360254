//! Implementation of the `regctl validate` command.

use std::path::Path;

use anyhow::{Context, Result, bail};

use regctl_lib::manifest::Manifest;

use crate::output::{print_error, print_success};

pub fn cmd_validate(path: &Path) -> Result<()> {
  let manifest = Manifest::load(path).with_context(|| format!("Failed to load manifest: {}", path.display()))?;

  let problems = manifest.problems();
  if problems.is_empty() {
    print_success(&format!(
      "{} is valid ({} entries)",
      path.display(),
      manifest.entries.len()
    ));
    return Ok(());
  }

  for problem in &problems {
    print_error(problem);
  }
  bail!("{} problem(s) found in {}", problems.len(), path.display())
}
