use std::fs;

use regctl_lib::catalog::{Lister, MemoryCatalog};
use regctl_lib::controller::process_manifest;
use regctl_lib::manifest::{Manifest, ManifestError};
use tempfile::TempDir;

use super::common::*;

#[test]
fn load_manifest_and_catalog_from_disk() {
  let temp = TempDir::new().unwrap();
  let manifest_path = temp.path().join("lint.yaml");
  let catalog_path = temp.path().join("catalog.yaml");
  fs::write(
    &manifest_path,
    r#"
project: demo
manifest:
  - resource: apis/-/versions/-/specs/-/artifacts/lint-gnostic
    dependencies:
      - source: $resource.spec
    action: compute lint $source0
"#,
  )
  .unwrap();
  fs::write(
    &catalog_path,
    r#"
resources:
  - name: projects/demo/apis/a/versions/1/specs/openapi.yaml
    update_time: 2024-03-01T00:00:00Z
  - name: projects/demo/apis/a/versions/1/specs/openapi.yaml/artifacts/lint-gnostic
    update_time: 2024-02-01T00:00:00Z
"#,
  )
  .unwrap();

  let manifest = Manifest::load(&manifest_path).unwrap();
  manifest.validate().unwrap();
  let catalog = MemoryCatalog::load(&catalog_path).unwrap();

  assert_eq!(catalog.len(), 2);
  assert_eq!(
    process_manifest(&manifest, &catalog).unwrap(),
    vec!["compute lint projects/demo/apis/a/versions/1/specs/openapi.yaml"]
  );
}

#[test]
fn validation_collects_problems() {
  let manifest = Manifest::from_yaml(
    r#"
project: demo
manifest:
  - resource: apis/-
    dependencies:
      - source: $resource.spec
    action: lint $source0 $source1
"#,
  )
  .unwrap();

  let Err(ManifestError::Invalid(problems)) = manifest.validate() else {
    panic!("expected validation failure");
  };
  assert_eq!(problems.len(), 2);
  assert!(problems.iter().all(|p| p.starts_with("entry 0:")));
}

#[test]
fn lint_manifest_is_valid() {
  lint_manifest().validate().unwrap();
}

#[test]
fn listing_is_in_catalog_order() {
  let names = [spec("b", "1", "s"), spec("a", "1", "s"), spec("c", "1", "s")];
  let catalog = catalog(names.iter().map(|n| resource(n, 1)));

  let listed: Vec<String> = catalog
    .list("projects/demo/apis/-/versions/-/specs/-", None)
    .unwrap()
    .into_iter()
    .map(|r| r.name().to_string())
    .collect();
  assert_eq!(listed, names);
}
