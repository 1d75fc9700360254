use std::path::{Path, PathBuf};

use crate::consts::{APP_NAME, CATALOG_ENV, CATALOG_FILENAME};

/// Returns the user's home directory
#[cfg(windows)]
pub fn home_dir() -> Option<PathBuf> {
  std::env::var_os("USERPROFILE").map(PathBuf::from)
}

/// Returns the user's home directory
#[cfg(not(windows))]
pub fn home_dir() -> Option<PathBuf> {
  std::env::var_os("HOME").map(PathBuf::from)
}

/// Returns the directory for configuration files for the application
#[cfg(windows)]
pub fn config_dir() -> Option<PathBuf> {
  std::env::var_os("APPDATA").map(|appdata| PathBuf::from(appdata).join(APP_NAME))
}

/// Returns the directory for configuration files for the application
#[cfg(not(windows))]
pub fn config_dir() -> Option<PathBuf> {
  let config_home = match std::env::var_os("XDG_CONFIG_HOME") {
    Some(dir) if !dir.is_empty() => PathBuf::from(dir),
    _ => home_dir()?.join(".config"),
  };
  Some(config_home.join(APP_NAME))
}

/// Resolve the catalog snapshot path.
///
/// An explicit path wins, then `REGCTL_CATALOG`, then `catalog.yaml` in the
/// config directory. Returns `None` only when no config directory can be
/// determined.
pub fn catalog_path(explicit: Option<&Path>) -> Option<PathBuf> {
  if let Some(path) = explicit {
    return Some(path.to_path_buf());
  }
  if let Some(path) = std::env::var_os(CATALOG_ENV)
    && !path.is_empty()
  {
    return Some(PathBuf::from(path));
  }
  config_dir().map(|dir| dir.join(CATALOG_FILENAME))
}
