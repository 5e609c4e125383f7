#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Location, administrative unit, and proximity types.
//!
//! Administrative geography is three levels deep: county, sub-county,
//! ward. The ward is the smallest unit and scopes farmer identifiers.

pub mod admin;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use admin::{AdministrativeUnit, WardScope};

/// Returned when a latitude/longitude pair is outside the valid range.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
#[error(
    "Invalid coordinate ({latitude}, {longitude}): latitude must be in [-90, 90] \
     and longitude in [-180, 180]"
)]
pub struct InvalidCoordinate {
    /// The rejected latitude.
    pub latitude: f64,
    /// The rejected longitude.
    pub longitude: f64,
}

/// A validated point on the Earth's surface, in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawLocation", rename_all = "camelCase")]
pub struct LocationPoint {
    latitude: f64,
    longitude: f64,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawLocation {
    latitude: f64,
    longitude: f64,
}

impl TryFrom<RawLocation> for LocationPoint {
    type Error = InvalidCoordinate;

    fn try_from(raw: RawLocation) -> Result<Self, Self::Error> {
        Self::new(raw.latitude, raw.longitude)
    }
}

impl LocationPoint {
    /// Creates a point, rejecting out-of-range or non-finite values.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidCoordinate`] if latitude is outside `[-90, 90]` or
    /// longitude is outside `[-180, 180]`.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, InvalidCoordinate> {
        if (-90.0..=90.0).contains(&latitude) && (-180.0..=180.0).contains(&longitude) {
            Ok(Self {
                latitude,
                longitude,
            })
        } else {
            Err(InvalidCoordinate {
                latitude,
                longitude,
            })
        }
    }

    /// Latitude in decimal degrees.
    #[must_use]
    pub const fn latitude(&self) -> f64 {
        self.latitude
    }

    /// Longitude in decimal degrees.
    #[must_use]
    pub const fn longitude(&self) -> f64 {
        self.longitude
    }
}

/// A record that may be matched by proximity. Its location is optional
/// because producers can register before capturing a farm address.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NearbyCandidate {
    /// Record identifier.
    pub id: String,
    /// Human-readable name.
    pub display_name: String,
    /// Registered location, if any.
    pub location: Option<LocationPoint>,
}

/// A candidate that passed the radius filter, with its distance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProximityCandidate {
    /// Record identifier.
    pub id: String,
    /// Human-readable name.
    pub display_name: String,
    /// Registered location.
    pub location: LocationPoint,
    /// Unrounded great-circle distance from the origin, in meters.
    pub distance_meters: f64,
}

impl ProximityCandidate {
    /// Distance rounded to whole meters for display.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn display_distance_meters(&self) -> u64 {
        self.distance_meters.round() as u64
    }
}
