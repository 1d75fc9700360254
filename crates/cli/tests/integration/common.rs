//! Shared test helpers for CLI integration tests.

use std::path::PathBuf;

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use tempfile::TempDir;

/// Get path to a fixture file.
pub fn fixture_path(name: &str) -> PathBuf {
  PathBuf::from(env!("CARGO_MANIFEST_DIR"))
    .join("tests")
    .join("fixtures")
    .join(name)
}

/// Read fixture content.
pub fn fixture_content(name: &str) -> String {
  std::fs::read_to_string(fixture_path(name)).unwrap_or_else(|e| panic!("Failed to load fixture {}: {}", name, e))
}

/// Isolated test environment.
///
/// Each test gets its own config directory so the default catalog location
/// never points at the real user config.
pub struct TestEnv {
  pub temp: TempDir,
}

impl TestEnv {
  pub fn new() -> Self {
    Self {
      temp: TempDir::new().unwrap(),
    }
  }

  /// Write a file relative to the temp directory and return its path.
  pub fn write_file(&self, relative_path: &str, content: &str) -> PathBuf {
    let path = self.temp.path().join(relative_path);
    if let Some(parent) = path.parent() {
      std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(&path, content).unwrap();
    path
  }

  /// Config home used as `XDG_CONFIG_HOME`.
  pub fn config_home(&self) -> PathBuf {
    self.temp.path().join("config")
  }

  /// Command with env vars set for isolation.
  pub fn cmd(&self) -> Command {
    let mut cmd = cargo_bin_cmd!("regctl");
    cmd.env("XDG_CONFIG_HOME", self.config_home());
    cmd.env("HOME", self.temp.path());
    cmd.env_remove("REGCTL_CATALOG");
    cmd.env_remove("RUST_LOG");
    cmd
  }
}
