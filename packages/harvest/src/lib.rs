#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Harvest yield and revenue projection.
//!
//! The crop table describes every crop per half-acre. A projection scales
//! those figures linearly by `acreage / 0.5`. Nothing is rounded here:
//! presentation code decides how many decimals to show.

pub mod units;

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use shamba_core_models::ErrorKind;
use shamba_crop::{CropMatrix, UnknownCrop};
use shamba_crop_models::HALF_ACRE;
use thiserror::Error;

pub use units::LBS_TO_KG;

/// Errors that can occur while projecting a harvest.
#[derive(Debug, Error)]
pub enum ProjectionError {
    /// The crop has no profile in the table.
    #[error(transparent)]
    UnknownCrop(#[from] UnknownCrop),

    /// Acreage is NaN or infinite.
    #[error("Invalid acreage: {acreage}")]
    InvalidAcreage {
        /// The rejected value.
        acreage: f64,
    },
}

impl ProjectionError {
    /// Classifies this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::UnknownCrop(_) => ErrorKind::NotFound,
            Self::InvalidAcreage { .. } => ErrorKind::InvalidInput,
        }
    }
}

/// Projected output of a farm for one crop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HarvestProjection {
    /// Canonical crop name from the table.
    pub crop_name: String,
    /// Acreage the projection was computed for.
    pub acreage_acres: f64,
    /// Projected produce per season, in pounds.
    pub volume_lbs: f64,
    /// Projected produce per season, in kilograms.
    pub volume_kg: f64,
    /// Projected revenue per season.
    pub revenue_per_season: f64,
    /// Projected farmer earning per month.
    pub farmer_earning_per_month: f64,
}

impl HarvestProjection {
    /// Whether this projection has no yield at all.
    #[must_use]
    #[allow(clippy::float_cmp)]
    pub fn is_zero(&self) -> bool {
        self.volume_lbs == 0.0
    }
}

/// Projects harvest volume and revenue using an injected [`CropMatrix`].
#[derive(Debug, Clone)]
pub struct HarvestProjectionEngine {
    crops: Arc<CropMatrix>,
}

impl HarvestProjectionEngine {
    /// Creates an engine over the given crop table.
    #[must_use]
    pub const fn new(crops: Arc<CropMatrix>) -> Self {
        Self { crops }
    }

    /// The crop table this engine reads from.
    #[must_use]
    pub fn crops(&self) -> &CropMatrix {
        &self.crops
    }

    /// Projects the harvest of `acreage_acres` planted with `crop_name`.
    ///
    /// A non-positive acreage yields an all-zero projection rather than an
    /// error. An unknown crop is always an error, never a zero result.
    ///
    /// # Errors
    ///
    /// * [`ProjectionError::UnknownCrop`] if the crop has no profile.
    /// * [`ProjectionError::InvalidAcreage`] if the acreage is NaN or
    ///   infinite.
    pub fn project(
        &self,
        crop_name: &str,
        acreage_acres: f64,
    ) -> Result<HarvestProjection, ProjectionError> {
        let profile = self.crops.require(crop_name)?;

        if !acreage_acres.is_finite() {
            return Err(ProjectionError::InvalidAcreage {
                acreage: acreage_acres,
            });
        }

        if acreage_acres <= 0.0 {
            log::debug!("Zero projection for {crop_name}: acreage {acreage_acres}");
            return Ok(HarvestProjection {
                crop_name: profile.crop_name.clone(),
                acreage_acres,
                volume_lbs: 0.0,
                volume_kg: 0.0,
                revenue_per_season: 0.0,
                farmer_earning_per_month: 0.0,
            });
        }

        let scale = acreage_acres / HALF_ACRE;
        let volume_lbs = profile.volume_lbs_per_half_acre() * scale;

        Ok(HarvestProjection {
            crop_name: profile.crop_name.clone(),
            acreage_acres,
            volume_lbs,
            volume_kg: volume_lbs * LBS_TO_KG,
            revenue_per_season: profile.revenue_per_season_at_half_acre * scale,
            farmer_earning_per_month: profile.farmer_earning_per_month_at_half_acre * scale,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shamba_crop_models::{CropProfile, PlantSpacing};

    fn engine() -> HarvestProjectionEngine {
        let tomato = CropProfile {
            crop_name: "Tomato".to_string(),
            plant_spacing: PlantSpacing {
                between_rows_cm: 90.0,
                between_plants_cm: 60.0,
            },
            plants_per_half_acre: 2_000,
            produce_per_plant_lbs: 5.0,
            price_per_pound_at_store: 0.8,
            revenue_per_season_at_half_acre: 10_000.0,
            farmer_earning_per_month_at_half_acre: 1_000.0,
        };
        let onion = CropProfile {
            crop_name: "Onion".to_string(),
            plant_spacing: PlantSpacing {
                between_rows_cm: 30.0,
                between_plants_cm: 10.0,
            },
            plants_per_half_acre: 26_000,
            produce_per_plant_lbs: 0.3,
            price_per_pound_at_store: 0.7,
            revenue_per_season_at_half_acre: 5_460.0,
            farmer_earning_per_month_at_half_acre: 546.0,
        };
        HarvestProjectionEngine::new(Arc::new(CropMatrix::new(vec![tomato, onion]).unwrap()))
    }

    #[test]
    fn tomato_one_acre() {
        let p = engine().project("Tomato", 1.0).unwrap();
        assert!((p.volume_lbs - 20_000.0).abs() < 1e-9);
        assert!((p.volume_kg - 9_071.84).abs() < 1e-6);
        assert!((p.revenue_per_season - 20_000.0).abs() < 1e-9);
        assert!((p.farmer_earning_per_month - 2_000.0).abs() < 1e-9);
        assert_eq!(p.crop_name, "Tomato");
    }

    #[test]
    #[allow(clippy::float_cmp)]
    fn kilograms_derive_exactly_from_pounds() {
        let engine = engine();
        for crop in ["Tomato", "Onion"] {
            for acreage in [0.1, 0.25, 0.5, 1.0, 1.7, 3.333, 12.0, 250.0] {
                let p = engine.project(crop, acreage).unwrap();
                assert_eq!(p.volume_kg, p.volume_lbs * 0.453_592);
            }
        }
    }

    #[test]
    fn revenue_is_linear_in_acreage() {
        let engine = engine();
        let base = engine.project("Onion", 1.0).unwrap().revenue_per_season;
        for acreage in [0.3, 0.5, 2.0, 7.25, 40.0] {
            let p = engine.project("Onion", acreage).unwrap();
            let per_acre = p.revenue_per_season / acreage;
            assert!(
                (per_acre - base).abs() <= base * 1e-12,
                "{acreage} acres: {per_acre} vs {base}"
            );
        }
    }

    #[test]
    fn non_positive_acreage_is_a_zero_projection() {
        let engine = engine();
        for acreage in [0.0, -1.0, -0.5] {
            let p = engine.project("Tomato", acreage).unwrap();
            assert!(p.is_zero());
            assert!(p.volume_kg.abs() < f64::EPSILON);
            assert!(p.revenue_per_season.abs() < f64::EPSILON);
            assert!(p.farmer_earning_per_month.abs() < f64::EPSILON);
        }
    }

    #[test]
    fn unknown_crop_is_not_found_even_with_zero_acreage() {
        let err = engine().project("Mango", 0.0).unwrap_err();
        assert!(matches!(err, ProjectionError::UnknownCrop(_)));
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn non_finite_acreage_is_rejected() {
        let engine = engine();
        for acreage in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let err = engine.project("Tomato", acreage).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidInput);
        }
    }

    #[test]
    fn lookup_ignores_case() {
        let p = engine().project("tOmAtO", 0.5).unwrap();
        assert_eq!(p.crop_name, "Tomato");
        assert!((p.volume_lbs - 10_000.0).abs() < 1e-9);
    }
}
