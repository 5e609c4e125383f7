#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Farmer identifier and producer registration types.

pub mod identifier;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shamba_geography_models::{LocationPoint, NearbyCandidate, WardScope};
use strum_macros::{AsRefStr, Display, EnumString};

pub use identifier::{FarmerIdentifier, FarmerIdentifierError, MAX_SEQUENCE};

/// Role of a registered user in the supply chain.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum UserType {
    /// Farmer; the only type that receives a farmer identifier.
    Producer,
    /// Government inspector visiting farms.
    Regulator,
    /// Extension officer, input supplier, or transporter.
    ServiceProvider,
    /// Places produce orders.
    Buyer,
}

impl UserType {
    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Producer,
            Self::Regulator,
            Self::ServiceProvider,
            Self::Buyer,
        ]
    }
}

/// Validated input for registering a producer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProducerRegistration {
    /// Farmer or farm name.
    pub display_name: String,
    /// Ward the farm belongs to.
    pub scope: WardScope,
    /// Farm location, if captured at registration.
    pub location: Option<LocationPoint>,
    /// Main crop grown.
    pub crop_name: Option<String>,
    /// Cultivated area in acres.
    pub farm_acreage_acres: Option<f64>,
}

/// A producer row ready to be inserted, identifier already allocated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProducer {
    /// Allocated farmer identifier.
    pub farmer_id: FarmerIdentifier,
    /// Registration details.
    pub registration: ProducerRegistration,
}

/// A persisted producer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProducerRecord {
    /// Storage primary key.
    pub id: i64,
    /// Farmer identifier.
    pub farmer_id: FarmerIdentifier,
    /// Farmer or farm name.
    pub display_name: String,
    /// Always [`UserType::Producer`] for rows with a farmer identifier.
    pub user_type: UserType,
    /// Ward the farm belongs to.
    pub scope: WardScope,
    /// Farm location, if captured.
    pub location: Option<LocationPoint>,
    /// Main crop grown.
    pub crop_name: Option<String>,
    /// Cultivated area in acres.
    pub farm_acreage_acres: Option<f64>,
    /// When the producer registered.
    pub registered_at: DateTime<Utc>,
}

impl From<ProducerRecord> for NearbyCandidate {
    fn from(record: ProducerRecord) -> Self {
        Self {
            id: record.id.to_string(),
            display_name: record.display_name,
            location: record.location,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_type_strings() {
        assert_eq!(UserType::ServiceProvider.to_string(), "service_provider");
        assert_eq!("producer".parse::<UserType>().unwrap(), UserType::Producer);
        for t in UserType::all() {
            assert_eq!(t.as_ref().parse::<UserType>().unwrap(), *t);
        }
    }

    #[test]
    fn record_becomes_nearby_candidate() {
        let record = ProducerRecord {
            id: 42,
            farmer_id: "NRU32-01-008".parse().unwrap(),
            display_name: "Wanjiku Farm".to_string(),
            user_type: UserType::Producer,
            scope: WardScope::new("Nakuru", "Naivasha", "Biashara"),
            location: Some(LocationPoint::new(-0.7167, 36.4333).unwrap()),
            crop_name: Some("Kale".to_string()),
            farm_acreage_acres: Some(1.5),
            registered_at: Utc::now(),
        };
        let candidate = NearbyCandidate::from(record);
        assert_eq!(candidate.id, "42");
        assert_eq!(candidate.display_name, "Wanjiku Farm");
        assert!(candidate.location.is_some());
    }
}
