//! End-to-end controller scenarios against an in-memory catalog.

use std::collections::BTreeSet;

use regctl_lib::controller::{ActionKind, ControllerError, evaluate_entries, plan_manifest, process_manifest};
use regctl_lib::manifest::Manifest;

use super::common::*;

// =============================================================================
// Lint manifest
// =============================================================================

#[test]
fn single_spec_yields_one_lint_command() {
  let petstore = spec("petstore", "1.0.0", "openapi.yaml");
  let catalog = catalog([openapi(&petstore, 10)]);

  let commands = process_manifest(&lint_manifest(), &catalog).unwrap();

  assert_eq!(
    commands,
    vec!["compute lint projects/demo/apis/petstore/versions/1.0.0/specs/openapi.yaml --linter gnostic"]
  );
}

#[test]
fn one_command_per_version_spec() {
  let specs = [
    spec("petstore", "1.0.0", "openapi.yaml"),
    spec("petstore", "1.0.1", "openapi.yaml"),
    spec("petstore", "1.1.0", "openapi.yaml"),
  ];
  let catalog = catalog(specs.iter().map(|s| openapi(s, 10)));

  let commands: BTreeSet<String> = process_manifest(&lint_manifest(), &catalog).unwrap().into_iter().collect();

  let expected: BTreeSet<String> = specs
    .iter()
    .map(|s| format!("compute lint {s} --linter gnostic"))
    .collect();
  assert_eq!(commands, expected);
}

#[test]
fn filtered_out_specs_are_ignored() {
  let proto = spec("library", "v1", "protos.zip");
  let catalog = catalog([resource(&proto, 10).with_mime_type("application/x.protobuf+zip")]);

  assert!(process_manifest(&lint_manifest(), &catalog).unwrap().is_empty());
}

#[test]
fn target_without_dependency_group_is_skipped() {
  // lint report exists for a spec that is not an openapi spec
  let proto = spec("library", "v1", "protos.zip");
  let catalog = catalog([
    resource(&proto, 30).with_mime_type("application/x.protobuf+zip"),
    resource(&format!("{proto}/artifacts/lint-gnostic"), 10),
  ]);

  assert!(process_manifest(&lint_manifest(), &catalog).unwrap().is_empty());
}

#[test]
fn fresh_target_is_skipped() {
  let petstore = spec("petstore", "1.0.0", "openapi.yaml");
  let catalog = catalog([
    openapi(&petstore, 10),
    resource(&format!("{petstore}/artifacts/lint-gnostic"), 20),
  ]);

  assert!(process_manifest(&lint_manifest(), &catalog).unwrap().is_empty());
}

#[test]
fn stale_target_is_refreshed_once() {
  let petstore = spec("petstore", "1.0.0", "openapi.yaml");
  let lint = format!("{petstore}/artifacts/lint-gnostic");
  let catalog = catalog([openapi(&petstore, 30), resource(&lint, 20)]);

  let actions = plan_manifest(&lint_manifest(), &catalog).unwrap();

  assert_eq!(actions.len(), 1);
  assert_eq!(actions[0].kind, ActionKind::Refresh { target: lint });
  assert_eq!(actions[0].command, format!("compute lint {petstore} --linter gnostic"));
}

// =============================================================================
// Multi-dependency entries
// =============================================================================

const SCORE_MANIFEST: &str = r#"
project: demo
manifest:
  - resource: apis/-/versions/-/specs/-/artifacts/score
    dependencies:
      - source: $resource.spec/artifacts/lint-gnostic
      - source: $resource.spec/artifacts/complexity
    action: compute score $source0 $source1
"#;

#[test]
fn score_waits_for_every_dependency() {
  let a = spec("a", "1", "openapi.yaml");
  let b = spec("b", "1", "openapi.yaml");
  let catalog = catalog([
    resource(&format!("{a}/artifacts/lint-gnostic"), 1),
    resource(&format!("{a}/artifacts/complexity"), 2),
    resource(&format!("{b}/artifacts/lint-gnostic"), 1),
  ]);
  let manifest = Manifest::from_yaml(SCORE_MANIFEST).unwrap();

  let actions = plan_manifest(&manifest, &catalog).unwrap();

  assert_eq!(actions.len(), 1);
  assert_eq!(actions[0].kind, ActionKind::Create { group: a.clone() });
  assert_eq!(
    actions[0].command,
    format!("compute score {a}/artifacts/lint-gnostic {a}/artifacts/complexity")
  );
}

#[test]
fn score_refreshed_when_any_dependency_is_newer() {
  let a = spec("a", "1", "openapi.yaml");
  let catalog = catalog([
    resource(&format!("{a}/artifacts/lint-gnostic"), 5),
    resource(&format!("{a}/artifacts/complexity"), 50),
    resource(&format!("{a}/artifacts/score"), 10),
  ]);
  let manifest = Manifest::from_yaml(SCORE_MANIFEST).unwrap();

  let actions = plan_manifest(&manifest, &catalog).unwrap();

  assert_eq!(actions.len(), 1);
  assert!(!actions[0].is_create());
}

#[test]
fn accessor_suffix_selects_parent_name() {
  let manifest = Manifest::from_yaml(
    r#"
project: demo
manifest:
  - resource: apis/-/versions/-/artifacts/summary
    dependencies:
      - source: $resource.version/specs/-/artifacts/lint-gnostic
    action: summarize $source0.version
"#,
  )
  .unwrap();
  let a = spec("a", "1", "openapi.yaml");
  let catalog = catalog([resource(&format!("{a}/artifacts/lint-gnostic"), 1)]);

  let commands = process_manifest(&manifest, &catalog).unwrap();

  assert_eq!(commands, vec!["summarize projects/demo/apis/a/versions/1"]);
}

// =============================================================================
// Failure handling
// =============================================================================

const TWO_ENTRIES: &str = r#"
project: demo
manifest:
  - resource: apis/-/versions/-/specs/-/artifacts/lint-gnostic
    dependencies:
      - source: $resource.spec
    action: compute lint $source0
  - resource: apis/-/artifacts/summary
    dependencies:
      - source: $resource.spec
    action: summarize $source0
"#;

#[test]
fn unresolvable_entry_aborts_manifest() {
  let catalog = catalog([openapi(&spec("a", "1", "openapi.yaml"), 1)]);
  let manifest = Manifest::from_yaml(TWO_ENTRIES).unwrap();

  let err = process_manifest(&manifest, &catalog).unwrap_err();
  assert!(matches!(err, ControllerError::Pattern(_)));
}

#[test]
fn evaluate_entries_keeps_healthy_results() {
  let catalog = catalog([openapi(&spec("a", "1", "openapi.yaml"), 1)]);
  let manifest = Manifest::from_yaml(TWO_ENTRIES).unwrap();

  let outcomes = evaluate_entries(&manifest, &catalog);

  assert_eq!(outcomes.len(), 2);
  assert_eq!(outcomes[0].result.as_ref().unwrap().len(), 1);
  assert!(matches!(outcomes[1].result, Err(ControllerError::Pattern(_))));
}

#[test]
fn invalid_filter_is_a_listing_failure() {
  let mut manifest = lint_manifest();
  manifest.entries[0].dependencies[0].filter = Some("mime_type ~ 'x'".to_string());
  let catalog = catalog([openapi(&spec("a", "1", "openapi.yaml"), 1)]);

  let err = process_manifest(&manifest, &catalog).unwrap_err();
  assert!(matches!(err, ControllerError::Listing(_)));
}
