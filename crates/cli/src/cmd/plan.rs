//! Implementation of the `regctl plan` command.
//!
//! Loads and validates a manifest, lists the catalog snapshot, and prints one
//! command per stale or missing target. Only commands go to stdout.

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use tracing::debug;

use regctl_lib::catalog::MemoryCatalog;
use regctl_lib::consts::CATALOG_ENV;
use regctl_lib::controller::{Action, ActionKind, evaluate_entries, plan_manifest};
use regctl_lib::manifest::Manifest;
use regctl_lib::platform::paths::catalog_path;

use crate::output::{print_error, print_info, print_json, symbols};

pub struct PlanOptions {
  pub manifest: PathBuf,
  pub catalog: Option<PathBuf>,
  pub json: bool,
  pub keep_going: bool,
  pub verbose: bool,
}

pub fn cmd_plan(options: &PlanOptions) -> Result<()> {
  let path = &options.manifest;
  let manifest = Manifest::load(path).with_context(|| format!("Failed to load manifest: {}", path.display()))?;
  manifest
    .validate()
    .with_context(|| format!("Manifest failed validation: {}", path.display()))?;

  let catalog_path = catalog_path(options.catalog.as_deref())
    .with_context(|| format!("Cannot locate a catalog; pass --catalog or set {CATALOG_ENV}"))?;
  let catalog = MemoryCatalog::load(&catalog_path)
    .with_context(|| format!("Failed to load catalog: {}", catalog_path.display()))?;
  debug!(path = %catalog_path.display(), resources = catalog.len(), "loaded catalog");

  if !options.keep_going {
    let actions = plan_manifest(&manifest, &catalog).context("Failed to evaluate manifest")?;
    return emit(&actions, options);
  }

  let outcomes = evaluate_entries(&manifest, &catalog);
  let total = outcomes.len();
  let mut actions = Vec::new();
  let mut failed = 0;
  for outcome in outcomes {
    match outcome.result {
      Ok(entry_actions) => actions.extend(entry_actions),
      Err(e) => {
        failed += 1;
        print_error(&format!("entry {} ({}): {}", outcome.index, outcome.target_pattern, e));
      }
    }
  }

  emit(&actions, options)?;
  if failed > 0 {
    bail!("{} of {} entries failed", failed, total);
  }
  Ok(())
}

fn emit(actions: &[Action], options: &PlanOptions) -> Result<()> {
  if options.json {
    return print_json(&actions);
  }

  for action in actions {
    if options.verbose {
      match &action.kind {
        ActionKind::Refresh { target } => print_info(&format!("{} {}", symbols::MODIFY, target)),
        ActionKind::Create { group } => print_info(&format!("{} {}", symbols::ADD, group)),
      }
    }
    println!("{}", action.command);
  }

  if actions.is_empty() {
    print_info("Everything is up to date");
  }
  Ok(())
}
