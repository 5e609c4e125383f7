#![allow(clippy::module_name_repetitions)]
//! Canonical file paths for the `DuckDB` data directory.

use std::path::{Path, PathBuf};

/// Environment variable that overrides [`default_db_path`].
pub const DB_PATH_ENV: &str = "SHAMBA_DB_PATH";

/// Returns the `data/` directory, relative to the working directory.
#[must_use]
pub fn data_dir() -> PathBuf {
    PathBuf::from("data")
}

/// Returns the default `DuckDB` file path, `data/shamba.duckdb`.
#[must_use]
pub fn default_db_path() -> PathBuf {
    data_dir().join("shamba.duckdb")
}

/// Returns the database path from `SHAMBA_DB_PATH`, falling back to
/// [`default_db_path`].
#[must_use]
pub fn db_path_from_env() -> PathBuf {
    std::env::var_os(DB_PATH_ENV).map_or_else(default_db_path, PathBuf::from)
}

/// Ensures a directory exists, creating it if necessary.
///
/// # Errors
///
/// Returns an I/O error if the directory cannot be created.
pub fn ensure_dir(path: &Path) -> std::io::Result<()> {
    if !path.as_os_str().is_empty() && !path.exists() {
        std::fs::create_dir_all(path)?;
    }
    Ok(())
}
