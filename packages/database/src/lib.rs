#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! `DuckDB` storage for Shamba.
//!
//! A single database file (default `data/shamba.duckdb`) holds three
//! tables:
//!
//! * `administrative_units`: the county / sub-county / ward reference
//!   table, seeded from an embedded CSV;
//! * `producers`: registered farmers, unique on `farmer_id`;
//! * `ward_sequences`: the per-ward identifier counter.
//!
//! [`DuckDbRegistry`] wraps a connection and implements the storage traits
//! the identifier generator depends on.

pub mod admin;
pub mod paths;
pub mod producers;

use std::path::Path;

use duckdb::Connection;
use shamba_core_models::ErrorKind;
use shamba_identifier::RegistryError;

pub use admin::{count_units, parse_units_csv, resolve_unit, seed_administrative_units};
pub use producers::{
    DuckDbRegistry, count_producers, get_producer, insert_producer, list_producer_locations,
    next_sequence, remove_producer,
};

/// Errors that can occur during database operations.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    /// `DuckDB` query error.
    #[error("DuckDB error: {0}")]
    DuckDb(#[from] duckdb::Error),

    /// Filesystem error while preparing the data directory.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed administrative unit CSV.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A producer with this farmer identifier is already stored.
    #[error("Duplicate farmer identifier: {farmer_id}")]
    Duplicate {
        /// The identifier that collided.
        farmer_id: String,
    },

    /// Data conversion error.
    #[error("Data conversion error: {message}")]
    Conversion {
        /// Description of what went wrong.
        message: String,
    },

    /// A thread panicked while holding the connection.
    #[error("DuckDB connection mutex poisoned")]
    Poisoned,
}

impl DbError {
    /// Classifies this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Duplicate { .. } => ErrorKind::Conflict,
            Self::DuckDb(_)
            | Self::Io(_)
            | Self::Csv(_)
            | Self::Conversion { .. }
            | Self::Poisoned => ErrorKind::CollaboratorFailure,
        }
    }
}

impl From<DbError> for RegistryError {
    fn from(e: DbError) -> Self {
        match e {
            DbError::Duplicate { farmer_id } => Self::Duplicate { farmer_id },
            other => Self::Backend {
                message: other.to_string(),
            },
        }
    }
}

/// Opens (or creates) the `DuckDB` file at `path`, creates the schema, and
/// seeds the built-in administrative units.
///
/// # Errors
///
/// Returns [`DbError`] if the connection, schema creation, or seeding
/// fails.
pub fn open(path: &Path) -> Result<Connection, DbError> {
    if let Some(parent) = path.parent() {
        paths::ensure_dir(parent)?;
    }

    log::info!("Opening DuckDB database at {}", path.display());
    let conn = Connection::open(path)?;
    prepare(&conn)?;
    Ok(conn)
}

/// Opens the database at `SHAMBA_DB_PATH`, or `data/shamba.duckdb`.
///
/// # Errors
///
/// Returns [`DbError`] if the connection, schema creation, or seeding
/// fails.
pub fn open_default() -> Result<Connection, DbError> {
    open(&paths::db_path_from_env())
}

/// Opens a fresh in-memory database with the schema and built-in
/// administrative units.
///
/// # Errors
///
/// Returns [`DbError`] if schema creation or seeding fails.
pub fn open_in_memory() -> Result<Connection, DbError> {
    let conn = Connection::open_in_memory()?;
    prepare(&conn)?;
    Ok(conn)
}

fn prepare(conn: &Connection) -> Result<(), DbError> {
    create_schema(conn)?;
    let units = parse_units_csv(admin::BUILTIN_UNITS_CSV)?;
    let inserted = seed_administrative_units(conn, &units)?;
    if inserted > 0 {
        log::info!("Seeded {inserted} administrative units");
    }
    Ok(())
}

fn create_schema(conn: &Connection) -> Result<(), DbError> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS administrative_units (
            county_key TEXT NOT NULL,
            sub_county_key TEXT NOT NULL,
            ward_key TEXT NOT NULL,
            county_name TEXT NOT NULL,
            county_code TEXT NOT NULL,
            county_number TEXT NOT NULL,
            sub_county_name TEXT NOT NULL,
            ward_name TEXT NOT NULL,
            ward_number TEXT NOT NULL,
            PRIMARY KEY (county_key, sub_county_key, ward_key)
        );

        CREATE SEQUENCE IF NOT EXISTS producer_ids START 1;

        CREATE TABLE IF NOT EXISTS producers (
            id BIGINT PRIMARY KEY DEFAULT nextval('producer_ids'),
            farmer_id TEXT NOT NULL UNIQUE,
            display_name TEXT NOT NULL,
            user_type TEXT NOT NULL,
            county TEXT NOT NULL,
            sub_county TEXT NOT NULL,
            ward TEXT NOT NULL,
            county_key TEXT NOT NULL,
            sub_county_key TEXT NOT NULL,
            ward_key TEXT NOT NULL,
            latitude DOUBLE,
            longitude DOUBLE,
            crop_name TEXT,
            farm_acreage_acres DOUBLE,
            registered_at TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS ward_sequences (
            county_key TEXT NOT NULL,
            sub_county_key TEXT NOT NULL,
            ward_key TEXT NOT NULL,
            last_sequence BIGINT NOT NULL,
            PRIMARY KEY (county_key, sub_county_key, ward_key)
        );",
    )?;

    Ok(())
}
