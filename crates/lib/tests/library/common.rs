//! Shared helpers for library integration tests.

use chrono::{DateTime, Utc};
use regctl_lib::catalog::MemoryCatalog;
use regctl_lib::manifest::Manifest;
use regctl_lib::resource::Resource;

pub const PROJECT: &str = "demo";

pub fn at(secs: i64) -> DateTime<Utc> {
  DateTime::from_timestamp(secs, 0).unwrap()
}

pub fn spec(api: &str, version: &str, spec: &str) -> String {
  format!("projects/{PROJECT}/apis/{api}/versions/{version}/specs/{spec}")
}

pub fn resource(name: &str, secs: i64) -> Resource {
  Resource::new(name, at(secs)).unwrap()
}

pub fn openapi(name: &str, secs: i64) -> Resource {
  resource(name, secs).with_mime_type("application/x.openapi+gzip;version=3.0.0")
}

pub fn catalog(resources: impl IntoIterator<Item = Resource>) -> MemoryCatalog {
  MemoryCatalog::from_resources(resources)
}

/// The lint manifest used by most scenarios.
pub fn lint_manifest() -> Manifest {
  Manifest::from_yaml(
    r#"
id: lint
project: demo
manifest:
  - resource: apis/-/versions/-/specs/-/artifacts/lint-gnostic
    dependencies:
      - source: $resource.spec
        filter: mime_type.contains('openapi')
    action: compute lint $source0 --linter gnostic
"#,
  )
  .unwrap()
}
