//! Storage collaborator boundary.
//!
//! The generator never touches a database directly. It resolves wards
//! through an [`AdministrativeDirectory`] and allocates/inserts through a
//! [`ProducerRegistry`]; `shamba_database` provides the `DuckDB`
//! implementation of both.

use async_trait::async_trait;
use shamba_core_models::ErrorKind;
use shamba_geography_models::{AdministrativeUnit, WardScope};
use shamba_producer_models::{NewProducer, ProducerRecord};
use thiserror::Error;

/// Errors reported by storage collaborators.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// A producer with this farmer identifier already exists.
    #[error("Duplicate farmer identifier: {farmer_id}")]
    Duplicate {
        /// The identifier that collided.
        farmer_id: String,
    },

    /// The backing store failed or is unreachable.
    #[error("Registry unavailable: {message}")]
    Backend {
        /// Description of the failure.
        message: String,
    },
}

impl RegistryError {
    /// Classifies this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Duplicate { .. } => ErrorKind::Conflict,
            Self::Backend { .. } => ErrorKind::CollaboratorFailure,
        }
    }
}

/// Resolves ward names to their reference codes.
#[async_trait]
pub trait AdministrativeDirectory: Send + Sync {
    /// Looks up the unit for `scope`, or `None` if the triple is unknown.
    async fn resolve(&self, scope: &WardScope) -> Result<Option<AdministrativeUnit>, RegistryError>;
}

/// Producer storage with per-ward sequence allocation.
#[async_trait]
pub trait ProducerRegistry: Send + Sync {
    /// Atomically increments the ward's producer sequence and returns the
    /// new value.
    ///
    /// The first allocation for a ward starts after the number of producer
    /// rows already stored for it. The sequence never goes backwards, so
    /// numbers are not reissued after a producer is removed.
    async fn next_sequence(&self, unit: &AdministrativeUnit) -> Result<u32, RegistryError>;

    /// Inserts a producer. Must fail with [`RegistryError::Duplicate`] if
    /// the farmer identifier is already taken.
    async fn insert_producer(&self, producer: &NewProducer)
    -> Result<ProducerRecord, RegistryError>;
}
