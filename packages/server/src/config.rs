//! Server configuration read from the environment.

use std::path::PathBuf;

use shamba_identifier::retry::DEFAULT_MAX_RETRIES;

/// Default bind address.
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1";

/// Default port.
pub const DEFAULT_PORT: u16 = 8080;

/// Runtime settings for [`crate::run_server`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Address to bind (`BIND_ADDR`).
    pub bind_addr: String,
    /// Port to bind (`PORT`).
    pub port: u16,
    /// `DuckDB` file (`SHAMBA_DB_PATH`).
    pub db_path: PathBuf,
    /// Crop table override (`SHAMBA_CROPS_PATH`); the embedded table is
    /// used when unset.
    pub crops_path: Option<PathBuf>,
    /// Retries after an identifier conflict (`SHAMBA_REGISTER_MAX_RETRIES`).
    pub register_max_retries: u32,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            port: DEFAULT_PORT,
            db_path: shamba_database::paths::default_db_path(),
            crops_path: None,
            register_max_retries: DEFAULT_MAX_RETRIES,
        }
    }
}

impl ServerConfig {
    /// Reads the configuration from process environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary variable lookup. Unset or
    /// blank variables fall back to defaults; unparseable numbers are
    /// logged and also fall back.
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Self {
            bind_addr: get("BIND_ADDR").unwrap_or(defaults.bind_addr),
            port: parse_or("PORT", get("PORT"), defaults.port),
            db_path: get(shamba_database::paths::DB_PATH_ENV)
                .map_or(defaults.db_path, PathBuf::from),
            crops_path: get("SHAMBA_CROPS_PATH").map(PathBuf::from),
            register_max_retries: parse_or(
                "SHAMBA_REGISTER_MAX_RETRIES",
                get("SHAMBA_REGISTER_MAX_RETRIES"),
                defaults.register_max_retries,
            ),
        }
    }
}

fn parse_or<T: std::str::FromStr + std::fmt::Display>(
    key: &str,
    value: Option<String>,
    default: T,
) -> T {
    let Some(value) = value else {
        return default;
    };
    value.trim().parse().unwrap_or_else(|_| {
        log::warn!("Ignoring invalid {key}={value:?}, using {default}");
        default
    })
}
