#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Great-circle distance and radius matching of farm locations.
//!
//! Used by field agents (regulators, service providers) to find producers
//! near their current position. Distances assume a spherical Earth.

pub mod distance;
pub mod proximity;

use shamba_core_models::ErrorKind;
use shamba_geography_models::InvalidCoordinate;
use thiserror::Error;

pub use distance::{EARTH_RADIUS_METERS, haversine_distance};
pub use proximity::find_nearby;

/// Errors that can occur during proximity matching.
#[derive(Debug, Error)]
pub enum GeoError {
    /// A coordinate is outside the valid range.
    #[error(transparent)]
    InvalidCoordinate(#[from] InvalidCoordinate),

    /// The search radius is negative or not finite.
    #[error("Invalid radius: {radius_meters}")]
    InvalidRadius {
        /// The rejected radius.
        radius_meters: f64,
    },
}

impl GeoError {
    /// Classifies this error. Always [`ErrorKind::InvalidInput`].
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidCoordinate(_) | Self::InvalidRadius { .. } => ErrorKind::InvalidInput,
        }
    }
}
