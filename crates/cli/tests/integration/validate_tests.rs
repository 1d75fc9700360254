use predicates::prelude::*;

use super::common::{TestEnv, fixture_path};

#[test]
fn valid_manifest() {
  TestEnv::new()
    .cmd()
    .arg("validate")
    .arg(fixture_path("lint.yaml"))
    .assert()
    .success()
    .stdout(predicate::str::contains("is valid (1 entries)"));
}

#[test]
fn invalid_manifest_lists_every_problem() {
  TestEnv::new()
    .cmd()
    .arg("validate")
    .arg(fixture_path("invalid.yaml"))
    .assert()
    .failure()
    .stderr(predicate::str::contains("entry 0: dependency 0: cannot resolve $resource.spec"))
    .stderr(predicate::str::contains("entry 0: action references $source3"))
    .stderr(predicate::str::contains("2 problem(s) found"));
}

#[test]
fn unknown_field_is_a_parse_error() {
  let env = TestEnv::new();
  let manifest = env.write_file("m.yaml", "project: demo\nmanifest: []\nextra: true\n");

  env
    .cmd()
    .arg("validate")
    .arg(&manifest)
    .assert()
    .failure()
    .stderr(predicate::str::contains("Failed to load manifest"));
}
