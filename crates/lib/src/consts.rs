/// Application name, used for config directories.
pub const APP_NAME: &str = "regctl";

/// Environment variable naming the catalog snapshot to list from.
pub const CATALOG_ENV: &str = "REGCTL_CATALOG";

/// Catalog snapshot file name inside the config directory.
pub const CATALOG_FILENAME: &str = "catalog.yaml";
