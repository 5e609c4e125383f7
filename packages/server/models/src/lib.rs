#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! API request and response types for the Shamba server.
//!
//! These types are serialized to JSON for the REST API. They are separate
//! from the storage and calculation types so the API contract can evolve
//! independently.

use serde::{Deserialize, Serialize};
use shamba_core_models::ErrorKind;
use shamba_crop_models::CropProfile;
use shamba_geography_models::{InvalidCoordinate, LocationPoint, ProximityCandidate, WardScope};
use shamba_producer_models::{ProducerRecord, ProducerRegistration};

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiHealth {
    /// Whether the server is healthy.
    pub healthy: bool,
    /// Server version.
    pub version: String,
}

/// Error body returned with every non-2xx response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiErrorBody {
    /// Machine-readable error kind, e.g. `"NOT_FOUND"`.
    pub error: ErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// A crop table row with its derived half-acre volume.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiCrop {
    /// The crop's reference figures.
    #[serde(flatten)]
    pub profile: CropProfile,
    /// Pounds produced by half an acre per season.
    pub volume_lbs_per_half_acre: f64,
}

impl From<&CropProfile> for ApiCrop {
    fn from(profile: &CropProfile) -> Self {
        Self {
            volume_lbs_per_half_acre: profile.volume_lbs_per_half_acre(),
            profile: profile.clone(),
        }
    }
}

/// Body of `POST /api/register`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    /// Farmer or farm name.
    pub display_name: String,
    /// County name.
    pub county: String,
    /// Sub-county name.
    pub sub_county: String,
    /// Ward name.
    pub ward: String,
    /// Farm latitude; must be given together with `longitude`.
    pub latitude: Option<f64>,
    /// Farm longitude; must be given together with `latitude`.
    pub longitude: Option<f64>,
    /// Main crop grown.
    pub crop_name: Option<String>,
    /// Cultivated area in acres.
    pub farm_acreage_acres: Option<f64>,
}

/// Why a [`RegisterRequest`] could not become a registration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RegisterRequestError {
    /// Only one of latitude/longitude was given.
    PartialLocation,
    /// The coordinates are out of range.
    InvalidCoordinate(InvalidCoordinate),
}

impl std::fmt::Display for RegisterRequestError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PartialLocation => f.write_str("latitude and longitude must be given together"),
            Self::InvalidCoordinate(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for RegisterRequestError {}

impl TryFrom<RegisterRequest> for ProducerRegistration {
    type Error = RegisterRequestError;

    fn try_from(request: RegisterRequest) -> Result<Self, Self::Error> {
        let location = match (request.latitude, request.longitude) {
            (Some(lat), Some(lng)) => Some(
                LocationPoint::new(lat, lng).map_err(RegisterRequestError::InvalidCoordinate)?,
            ),
            (None, None) => None,
            _ => return Err(RegisterRequestError::PartialLocation),
        };

        Ok(Self {
            display_name: request.display_name,
            scope: WardScope::new(request.county, request.sub_county, request.ward),
            location,
            crop_name: request.crop_name,
            farm_acreage_acres: request.farm_acreage_acres,
        })
    }
}

/// Response of `POST /api/register`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterResponse {
    /// Storage primary key.
    pub id: i64,
    /// Allocated farmer identifier, e.g. `"NRU32-01-008"`.
    pub farmer_id: String,
}

impl From<&ProducerRecord> for RegisterResponse {
    fn from(record: &ProducerRecord) -> Self {
        Self {
            id: record.id,
            farmer_id: record.farmer_id.to_string(),
        }
    }
}

/// Query parameters for `GET /api/harvest-projection`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HarvestProjectionParams {
    /// Producer primary key.
    pub producer_id: i64,
}

/// Query parameters for `GET /api/nearby-farmers`.
#[derive(Debug, Clone, Deserialize)]
pub struct NearbyFarmersParams {
    /// Origin latitude.
    pub lat: f64,
    /// Origin longitude.
    pub lng: f64,
    /// Search radius in meters.
    pub radius: f64,
}

/// A producer within the search radius.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiNearbyFarmer {
    /// Producer primary key, as a string.
    pub id: String,
    /// Farmer or farm name.
    pub display_name: String,
    /// Farm latitude.
    pub latitude: f64,
    /// Farm longitude.
    pub longitude: f64,
    /// Distance from the origin, rounded to whole meters.
    pub distance_meters: u64,
}

impl From<ProximityCandidate> for ApiNearbyFarmer {
    fn from(candidate: ProximityCandidate) -> Self {
        Self {
            distance_meters: candidate.display_distance_meters(),
            latitude: candidate.location.latitude(),
            longitude: candidate.location.longitude(),
            id: candidate.id,
            display_name: candidate.display_name,
        }
    }
}

/// Body of `POST /api/orders`. Exactly one of `volumeLbs` and `volumeKg`
/// must be set.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRequest {
    /// Crop being ordered.
    pub crop_name: String,
    /// Order volume in pounds.
    pub volume_lbs: Option<f64>,
    /// Order volume in kilograms.
    pub volume_kg: Option<f64>,
    /// Fixed price per pound; the crop table's store price is used when
    /// absent.
    pub price_per_pound: Option<f64>,
}
