//! Administrative unit reference table.
//!
//! Rows are keyed by the lower-cased, trimmed (county, sub-county, ward)
//! triple so lookups ignore case and surrounding whitespace. Ward names
//! repeat across sub-counties (Nakuru has a Biashara ward in both Naivasha
//! and Nakuru Town East), which is why the key is the whole triple.

use duckdb::{Connection, params};
use serde::Deserialize;
use shamba_geography_models::{AdministrativeUnit, WardScope};

use crate::DbError;

/// Built-in reference rows, embedded at compile time.
pub const BUILTIN_UNITS_CSV: &str = include_str!("../administrative_units.csv");

#[derive(Debug, Deserialize)]
struct UnitRow {
    county_name: String,
    county_code: String,
    county_number: String,
    sub_county_name: String,
    ward_name: String,
    ward_number: String,
}

impl From<UnitRow> for AdministrativeUnit {
    fn from(row: UnitRow) -> Self {
        Self {
            county_name: row.county_name.trim().to_string(),
            county_code: row.county_code.trim().to_uppercase(),
            county_number: row.county_number.trim().to_string(),
            sub_county_name: row.sub_county_name.trim().to_string(),
            ward_name: row.ward_name.trim().to_string(),
            ward_number: row.ward_number.trim().to_string(),
        }
    }
}

/// Parses administrative units from CSV with a header row of
/// `county_name,county_code,county_number,sub_county_name,ward_name,ward_number`.
///
/// # Errors
///
/// Returns [`DbError::Csv`] if a row is malformed.
pub fn parse_units_csv(source: &str) -> Result<Vec<AdministrativeUnit>, DbError> {
    let mut reader = csv::Reader::from_reader(source.as_bytes());
    let mut units = Vec::new();
    for row in reader.deserialize::<UnitRow>() {
        units.push(row?.into());
    }
    Ok(units)
}

/// Inserts units that are not already present.
///
/// Returns the number of rows inserted.
///
/// # Errors
///
/// Returns [`DbError`] if an insert fails.
pub fn seed_administrative_units(
    conn: &Connection,
    units: &[AdministrativeUnit],
) -> Result<usize, DbError> {
    let mut stmt = conn.prepare(
        "INSERT INTO administrative_units (
            county_key, sub_county_key, ward_key,
            county_name, county_code, county_number,
            sub_county_name, ward_name, ward_number
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
        ON CONFLICT (county_key, sub_county_key, ward_key) DO NOTHING",
    )?;

    let mut inserted = 0;
    for unit in units {
        let (county_key, sub_county_key, ward_key) = unit.scope().key();
        inserted += stmt.execute(params![
            county_key,
            sub_county_key,
            ward_key,
            unit.county_name,
            unit.county_code,
            unit.county_number,
            unit.sub_county_name,
            unit.ward_name,
            unit.ward_number,
        ])?;
    }

    Ok(inserted)
}

/// Looks up the unit for `scope`.
///
/// # Errors
///
/// Returns [`DbError`] if the query fails.
pub fn resolve_unit(
    conn: &Connection,
    scope: &WardScope,
) -> Result<Option<AdministrativeUnit>, DbError> {
    let (county_key, sub_county_key, ward_key) = scope.key();
    let mut stmt = conn.prepare(
        "SELECT county_name, county_code, county_number,
                sub_county_name, ward_name, ward_number
         FROM administrative_units
         WHERE county_key = ? AND sub_county_key = ? AND ward_key = ?",
    )?;

    let result = stmt.query_row(params![county_key, sub_county_key, ward_key], |row| {
        Ok(AdministrativeUnit {
            county_name: row.get(0)?,
            county_code: row.get(1)?,
            county_number: row.get(2)?,
            sub_county_name: row.get(3)?,
            ward_name: row.get(4)?,
            ward_number: row.get(5)?,
        })
    });

    match result {
        Ok(unit) => Ok(Some(unit)),
        Err(duckdb::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(DbError::DuckDb(e)),
    }
}

/// Returns the number of reference rows.
///
/// # Errors
///
/// Returns [`DbError`] if the query fails.
pub fn count_units(conn: &Connection) -> Result<u64, DbError> {
    let count: i64 = conn.query_row("SELECT COUNT(*) FROM administrative_units", [], |row| {
        row.get(0)
    })?;
    u64::try_from(count).map_err(|e| DbError::Conversion {
        message: format!("negative unit count {count}: {e}"),
    })
}
