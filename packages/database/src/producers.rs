//! Producer storage and per-ward identifier sequences.

use std::str::FromStr;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use duckdb::{Connection, params};
use shamba_geography_models::{AdministrativeUnit, LocationPoint, NearbyCandidate, WardScope};
use shamba_identifier::{AdministrativeDirectory, ProducerRegistry, RegistryError};
use shamba_producer_models::{FarmerIdentifier, NewProducer, ProducerRecord, UserType};

use crate::DbError;

const PRODUCER_COLUMNS: &str = "id, farmer_id, display_name, user_type, county, sub_county, ward,
     latitude, longitude, crop_name, farm_acreage_acres, registered_at";

/// Atomically increments and returns the sequence for `unit`'s ward.
///
/// The first call for a ward starts the counter at the number of producer
/// rows already stored there. The counter only moves forward, so a removed
/// producer's number is never handed out again.
///
/// # Errors
///
/// Returns [`DbError`] if any statement fails; the transaction is rolled
/// back.
pub fn next_sequence(conn: &mut Connection, unit: &AdministrativeUnit) -> Result<u32, DbError> {
    let (county_key, sub_county_key, ward_key) = unit.scope().key();
    let tx = conn.transaction()?;

    let existing: i64 = tx.query_row(
        "SELECT COUNT(*) FROM producers
         WHERE county_key = ? AND sub_county_key = ? AND ward_key = ?",
        params![county_key, sub_county_key, ward_key],
        |row| row.get(0),
    )?;

    tx.execute(
        "INSERT INTO ward_sequences (county_key, sub_county_key, ward_key, last_sequence)
         VALUES (?, ?, ?, ?)
         ON CONFLICT (county_key, sub_county_key, ward_key) DO NOTHING",
        params![county_key, sub_county_key, ward_key, existing],
    )?;

    let sequence: i64 = tx.query_row(
        "UPDATE ward_sequences
         SET last_sequence = last_sequence + 1
         WHERE county_key = ? AND sub_county_key = ? AND ward_key = ?
         RETURNING last_sequence",
        params![county_key, sub_county_key, ward_key],
        |row| row.get(0),
    )?;

    tx.commit()?;

    log::debug!(
        "Allocated sequence {sequence} for ward {}",
        unit.identifier_prefix()
    );

    u32::try_from(sequence).map_err(|e| DbError::Conversion {
        message: format!("ward sequence {sequence} out of range: {e}"),
    })
}

/// Inserts a producer and returns the stored row.
///
/// # Errors
///
/// Returns [`DbError::Duplicate`] if the farmer identifier is taken, or
/// another [`DbError`] if the insert fails.
pub fn insert_producer(conn: &Connection, producer: &NewProducer) -> Result<ProducerRecord, DbError> {
    let registration = &producer.registration;
    let farmer_id = producer.farmer_id.to_string();
    let (county_key, sub_county_key, ward_key) = registration.scope.key();
    let latitude = registration.location.map(|l| l.latitude());
    let longitude = registration.location.map(|l| l.longitude());
    let crop_name = registration.crop_name.as_deref().map(str::trim);

    let result = conn.query_row(
        "INSERT INTO producers (
            farmer_id, display_name, user_type,
            county, sub_county, ward,
            county_key, sub_county_key, ward_key,
            latitude, longitude, crop_name, farm_acreage_acres, registered_at
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        RETURNING id",
        params![
            farmer_id,
            registration.display_name.trim(),
            UserType::Producer.as_ref(),
            registration.scope.county.trim(),
            registration.scope.sub_county.trim(),
            registration.scope.ward.trim(),
            county_key,
            sub_county_key,
            ward_key,
            latitude,
            longitude,
            crop_name,
            registration.farm_acreage_acres,
            Utc::now().to_rfc3339(),
        ],
        |row| row.get::<_, i64>(0),
    );

    let id = match result {
        Ok(id) => id,
        Err(e) if is_unique_violation(&e) => return Err(DbError::Duplicate { farmer_id }),
        Err(e) => return Err(DbError::DuckDb(e)),
    };

    get_producer(conn, id)?.ok_or_else(|| DbError::Conversion {
        message: format!("producer {id} vanished after insert"),
    })
}

// DuckDB surfaces constraint violations only through the message text.
// `duplicate_farmer_id_is_reported` pins the wording.
fn is_unique_violation(e: &duckdb::Error) -> bool {
    let message = e.to_string().to_lowercase();
    message.contains("duplicate key") || message.contains("unique constraint")
}

/// Loads a producer by primary key.
///
/// # Errors
///
/// Returns [`DbError`] if the query fails or a stored value cannot be
/// converted.
pub fn get_producer(conn: &Connection, id: i64) -> Result<Option<ProducerRecord>, DbError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {PRODUCER_COLUMNS} FROM producers WHERE id = ?"
    ))?;
    let mut rows = stmt.query([id])?;

    match rows.next()? {
        Some(row) => Ok(Some(StoredProducer::from_row(row)?.into_record()?)),
        None => Ok(None),
    }
}

/// Loads every producer as a proximity candidate, in registration order.
///
/// Rows without coordinates come back with no location. Rows whose stored
/// coordinates are out of range are logged and also treated as having no
/// location.
///
/// # Errors
///
/// Returns [`DbError`] if the query fails.
pub fn list_producer_locations(conn: &Connection) -> Result<Vec<NearbyCandidate>, DbError> {
    let mut stmt =
        conn.prepare("SELECT id, display_name, latitude, longitude FROM producers ORDER BY id")?;
    let mut rows = stmt.query([])?;

    let mut candidates = Vec::new();
    while let Some(row) = rows.next()? {
        let id: i64 = row.get(0)?;
        let display_name: String = row.get(1)?;
        let latitude: Option<f64> = row.get(2)?;
        let longitude: Option<f64> = row.get(3)?;

        let location = match (latitude, longitude) {
            (Some(lat), Some(lng)) => LocationPoint::new(lat, lng)
                .map_err(|e| log::warn!("Producer {id} has an invalid stored location: {e}"))
                .ok(),
            _ => None,
        };

        candidates.push(NearbyCandidate {
            id: id.to_string(),
            display_name,
            location,
        });
    }

    Ok(candidates)
}

/// Counts producers registered in `scope`'s ward.
///
/// # Errors
///
/// Returns [`DbError`] if the query fails.
pub fn count_producers(conn: &Connection, scope: &WardScope) -> Result<u64, DbError> {
    let (county_key, sub_county_key, ward_key) = scope.key();
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM producers
         WHERE county_key = ? AND sub_county_key = ? AND ward_key = ?",
        params![county_key, sub_county_key, ward_key],
        |row| row.get(0),
    )?;
    u64::try_from(count).map_err(|e| DbError::Conversion {
        message: format!("negative producer count {count}: {e}"),
    })
}

/// Deletes the producer with `farmer_id`. Returns whether a row was
/// removed. The ward sequence is left untouched.
///
/// # Errors
///
/// Returns [`DbError`] if the delete fails.
pub fn remove_producer(conn: &Connection, farmer_id: &str) -> Result<bool, DbError> {
    let removed = conn.execute("DELETE FROM producers WHERE farmer_id = ?", [farmer_id])?;
    if removed > 0 {
        log::info!("Removed producer {farmer_id}");
    }
    Ok(removed > 0)
}

/// Raw column values of a `producers` row.
struct StoredProducer {
    id: i64,
    farmer_id: String,
    display_name: String,
    user_type: String,
    county: String,
    sub_county: String,
    ward: String,
    latitude: Option<f64>,
    longitude: Option<f64>,
    crop_name: Option<String>,
    farm_acreage_acres: Option<f64>,
    registered_at: String,
}

impl StoredProducer {
    fn from_row(row: &duckdb::Row<'_>) -> Result<Self, duckdb::Error> {
        Ok(Self {
            id: row.get(0)?,
            farmer_id: row.get(1)?,
            display_name: row.get(2)?,
            user_type: row.get(3)?,
            county: row.get(4)?,
            sub_county: row.get(5)?,
            ward: row.get(6)?,
            latitude: row.get(7)?,
            longitude: row.get(8)?,
            crop_name: row.get(9)?,
            farm_acreage_acres: row.get(10)?,
            registered_at: row.get(11)?,
        })
    }

    fn into_record(self) -> Result<ProducerRecord, DbError> {
        let conversion = |message: String| DbError::Conversion { message };

        let farmer_id = FarmerIdentifier::from_str(&self.farmer_id)
            .map_err(|e| conversion(format!("producer {}: {e}", self.id)))?;
        let user_type = UserType::from_str(&self.user_type)
            .map_err(|e| conversion(format!("producer {} user type: {e}", self.id)))?;
        let location = match (self.latitude, self.longitude) {
            (Some(lat), Some(lng)) => Some(
                LocationPoint::new(lat, lng)
                    .map_err(|e| conversion(format!("producer {}: {e}", self.id)))?,
            ),
            _ => None,
        };
        let registered_at = DateTime::parse_from_rfc3339(&self.registered_at)
            .map_err(|e| conversion(format!("producer {} timestamp: {e}", self.id)))?
            .with_timezone(&Utc);

        Ok(ProducerRecord {
            id: self.id,
            farmer_id,
            display_name: self.display_name,
            user_type,
            scope: WardScope::new(self.county, self.sub_county, self.ward),
            location,
            crop_name: self.crop_name,
            farm_acreage_acres: self.farm_acreage_acres,
            registered_at,
        })
    }
}

/// `DuckDB`-backed [`AdministrativeDirectory`] and [`ProducerRegistry`].
///
/// `duckdb::Connection` is `Send` but not `Sync`, so the connection sits
/// behind a `Mutex`. Holding the lock for the whole increment-and-read
/// also serializes sequence allocation across tasks.
#[derive(Clone)]
pub struct DuckDbRegistry {
    conn: Arc<Mutex<Connection>>,
}

impl std::fmt::Debug for DuckDbRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DuckDbRegistry").finish_non_exhaustive()
    }
}

impl DuckDbRegistry {
    /// Wraps an open connection.
    #[must_use]
    pub fn new(conn: Connection) -> Self {
        Self {
            conn: Arc::new(Mutex::new(conn)),
        }
    }

    /// Locks the connection for direct queries.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Poisoned`] if a previous holder panicked.
    pub fn connection(&self) -> Result<MutexGuard<'_, Connection>, DbError> {
        self.conn.lock().map_err(|_| DbError::Poisoned)
    }

    /// Loads a producer by primary key.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the lock or query fails.
    pub fn producer(&self, id: i64) -> Result<Option<ProducerRecord>, DbError> {
        get_producer(&*self.connection()?, id)
    }

    /// Loads every producer as a proximity candidate.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the lock or query fails.
    pub fn producer_locations(&self) -> Result<Vec<NearbyCandidate>, DbError> {
        list_producer_locations(&*self.connection()?)
    }
}

#[async_trait]
impl AdministrativeDirectory for DuckDbRegistry {
    async fn resolve(&self, scope: &WardScope) -> Result<Option<AdministrativeUnit>, RegistryError> {
        let conn = self.connection()?;
        Ok(crate::admin::resolve_unit(&conn, scope)?)
    }
}

#[async_trait]
impl ProducerRegistry for DuckDbRegistry {
    async fn next_sequence(&self, unit: &AdministrativeUnit) -> Result<u32, RegistryError> {
        let mut conn = self.connection()?;
        Ok(next_sequence(&mut conn, unit)?)
    }

    async fn insert_producer(&self, producer: &NewProducer) -> Result<ProducerRecord, RegistryError> {
        let conn = self.connection()?;
        Ok(insert_producer(&conn, producer)?)
    }
}
