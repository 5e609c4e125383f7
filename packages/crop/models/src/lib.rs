#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Per-crop agronomic and economic parameter types.
//!
//! All yield and money figures in a [`CropProfile`] are expressed per
//! half-acre, the base unit of the crop reference table.

use serde::{Deserialize, Serialize};

/// Acreage that every per-unit figure in a [`CropProfile`] refers to.
pub const HALF_ACRE: f64 = 0.5;

/// Recommended planting distances for a crop.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlantSpacing {
    /// Distance between planting rows, in centimetres.
    pub between_rows_cm: f64,
    /// Distance between plants within a row, in centimetres.
    pub between_plants_cm: f64,
}

impl std::fmt::Display for PlantSpacing {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}cm x {}cm",
            self.between_rows_cm, self.between_plants_cm
        )
    }
}

/// One row of the crop reference table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CropProfile {
    /// Display name, unique case-insensitively within a table.
    pub crop_name: String,
    /// Recommended planting distances.
    pub plant_spacing: PlantSpacing,
    /// Number of plants that fit on half an acre.
    pub plants_per_half_acre: u32,
    /// Expected produce per plant per season, in pounds.
    pub produce_per_plant_lbs: f64,
    /// Retail price per pound.
    pub price_per_pound_at_store: f64,
    /// Revenue for one season from half an acre.
    pub revenue_per_season_at_half_acre: f64,
    /// Monthly farmer earning from half an acre.
    pub farmer_earning_per_month_at_half_acre: f64,
}

impl CropProfile {
    /// Produce volume in pounds for one half-acre unit.
    #[must_use]
    pub fn volume_lbs_per_half_acre(&self) -> f64 {
        f64::from(self.plants_per_half_acre) * self.produce_per_plant_lbs
    }

    /// Case-insensitive lookup key for this profile.
    #[must_use]
    pub fn key(&self) -> String {
        crop_key(&self.crop_name)
    }
}

/// Normalizes a crop name into its lookup key.
///
/// Lookups are exact apart from letter case and surrounding whitespace;
/// no partial or fuzzy matching is performed.
#[must_use]
pub fn crop_key(name: &str) -> String {
    name.trim().to_lowercase()
}
