#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Ward-scoped farmer identifier allocation.
//!
//! An identifier is `<countyCode><countyNumber>-<wardNumber>-<seq>`, where
//! `seq` is the producer's position within its ward. Allocation is a
//! read-then-write against shared storage, so two registrations racing in
//! the same ward could otherwise receive the same number. The generator
//! avoids that in two layers:
//!
//! 1. the [`ProducerRegistry`] hands out sequence numbers with an atomic
//!    increment-and-read, so concurrent callers never see the same value;
//! 2. the registry rejects a duplicate identifier on insert, and
//!    [`FarmerIdentifierGenerator::register`] treats that as a retryable
//!    conflict, backing off and allocating again up to
//!    [`RetryPolicy::max_retries`] times.

pub mod generator;
pub mod retry;
pub mod store;

#[cfg(test)]
mod memory;

use shamba_core_models::ErrorKind;
use shamba_geography_models::WardScope;
use thiserror::Error;

pub use generator::FarmerIdentifierGenerator;
pub use retry::RetryPolicy;
pub use store::{AdministrativeDirectory, ProducerRegistry, RegistryError};

/// Errors that can occur while allocating an identifier or registering a
/// producer.
#[derive(Debug, Error)]
pub enum IdentifierError {
    /// The (county, sub-county, ward) triple is not in the reference table.
    #[error("Unknown administrative unit: {scope}")]
    UnknownUnit {
        /// The scope that failed to resolve.
        scope: WardScope,
    },

    /// The ward has used every three-digit sequence number.
    #[error("Ward {scope} has no sequence numbers left (next would be {sequence})")]
    SequenceExhausted {
        /// The exhausted ward.
        scope: WardScope,
        /// The sequence that did not fit.
        sequence: u32,
    },

    /// Every retry produced a duplicate identifier.
    #[error("Identifier {farmer_id} still conflicts after {attempts} attempts")]
    Conflict {
        /// The last identifier tried.
        farmer_id: String,
        /// Total insert attempts made.
        attempts: u32,
    },

    /// The registration failed validation.
    #[error("Invalid registration: {message}")]
    InvalidRegistration {
        /// What is wrong with it.
        message: String,
    },

    /// Storage failure.
    #[error(transparent)]
    Registry(#[from] RegistryError),
}

impl IdentifierError {
    /// Classifies this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::UnknownUnit { .. } => ErrorKind::NotFound,
            Self::SequenceExhausted { .. } | Self::Conflict { .. } => ErrorKind::Conflict,
            Self::InvalidRegistration { .. } => ErrorKind::InvalidInput,
            Self::Registry(e) => e.kind(),
        }
    }
}
