#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Immutable crop reference table.
//!
//! A [`CropMatrix`] is built once at startup, either from the table
//! embedded in the binary ([`CropMatrix::builtin`]) or from an operator
//! supplied TOML file ([`CropMatrix::from_toml_str`]), and then shared
//! read-only by every consumer. Lookups are case-insensitive and exact.

pub mod table;

use std::collections::BTreeMap;

use shamba_core_models::ErrorKind;
use shamba_crop_models::{CropProfile, crop_key};
use thiserror::Error;

/// Errors raised while building a [`CropMatrix`].
#[derive(Debug, Error)]
pub enum CropMatrixError {
    /// Two profiles share a name (ignoring case).
    #[error("Duplicate crop name: {name}")]
    DuplicateCrop {
        /// The offending crop name.
        name: String,
    },

    /// The table has no profiles at all.
    #[error("Crop table must contain at least one crop")]
    EmptyTable,

    /// A profile has an empty name.
    #[error("Crop name must not be empty")]
    EmptyName,

    /// A numeric field violates its range.
    #[error("Invalid value for {crop}.{field}: {message}")]
    InvalidField {
        /// Crop the field belongs to.
        crop: String,
        /// Field name.
        field: &'static str,
        /// What is wrong with it.
        message: String,
    },

    /// The TOML source could not be parsed.
    #[error("Failed to parse crop table: {0}")]
    Parse(#[from] toml::de::Error),

    /// The TOML file could not be read.
    #[error("Failed to read crop table: {0}")]
    Io(#[from] std::io::Error),
}

impl CropMatrixError {
    /// Classifies this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Io(_) => ErrorKind::CollaboratorFailure,
            Self::DuplicateCrop { .. }
            | Self::EmptyTable
            | Self::EmptyName
            | Self::InvalidField { .. }
            | Self::Parse(_) => ErrorKind::InvalidInput,
        }
    }
}

/// Returned when a crop name has no profile in the table.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown crop: {name}")]
pub struct UnknownCrop {
    /// The name that was looked up.
    pub name: String,
}

impl UnknownCrop {
    /// Always [`ErrorKind::NotFound`].
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        ErrorKind::NotFound
    }
}

/// Immutable table of crop profiles keyed by case-insensitive name.
#[derive(Debug, Clone)]
pub struct CropMatrix {
    /// Profiles in declaration order.
    profiles: Vec<CropProfile>,
    /// Lookup key -> index into `profiles`.
    index: BTreeMap<String, usize>,
}

impl CropMatrix {
    /// Builds a matrix from a list of profiles, validating every row.
    ///
    /// # Errors
    ///
    /// Returns [`CropMatrixError`] if the list is empty, a name is empty or
    /// duplicated, or any numeric field is out of range.
    pub fn new(profiles: Vec<CropProfile>) -> Result<Self, CropMatrixError> {
        if profiles.is_empty() {
            return Err(CropMatrixError::EmptyTable);
        }

        let mut index = BTreeMap::new();

        for (i, profile) in profiles.iter().enumerate() {
            validate_profile(profile)?;
            if index.insert(profile.key(), i).is_some() {
                return Err(CropMatrixError::DuplicateCrop {
                    name: profile.crop_name.clone(),
                });
            }
        }

        Ok(Self { profiles, index })
    }

    /// Returns the table embedded in the binary.
    ///
    /// # Errors
    ///
    /// Returns [`CropMatrixError`] if the embedded table is invalid.
    pub fn builtin() -> Result<Self, CropMatrixError> {
        let matrix = Self::from_toml_str(table::BUILTIN_CROPS_TOML)?;
        log::debug!("Loaded {} built-in crop profiles", matrix.len());
        Ok(matrix)
    }

    /// Parses and validates a TOML crop table.
    ///
    /// # Errors
    ///
    /// Returns [`CropMatrixError`] if the TOML is malformed or any row is
    /// invalid.
    pub fn from_toml_str(source: &str) -> Result<Self, CropMatrixError> {
        Self::new(table::parse_crops_toml(source)?)
    }

    /// Reads and validates a TOML crop table from disk.
    ///
    /// # Errors
    ///
    /// Returns [`CropMatrixError`] if the file cannot be read, the TOML is
    /// malformed, or any row is invalid.
    pub fn from_toml_file(path: &std::path::Path) -> Result<Self, CropMatrixError> {
        let source = std::fs::read_to_string(path)?;
        let matrix = Self::from_toml_str(&source)?;
        log::info!(
            "Loaded {} crop profiles from {}",
            matrix.len(),
            path.display()
        );
        Ok(matrix)
    }

    /// Looks up a profile by name, ignoring case and surrounding whitespace.
    #[must_use]
    pub fn get(&self, crop_name: &str) -> Option<&CropProfile> {
        self.index
            .get(&crop_key(crop_name))
            .map(|&i| &self.profiles[i])
    }

    /// Like [`Self::get`], but reports a missing crop as an error.
    ///
    /// # Errors
    ///
    /// Returns [`UnknownCrop`] if no profile matches.
    pub fn require(&self, crop_name: &str) -> Result<&CropProfile, UnknownCrop> {
        self.get(crop_name).ok_or_else(|| UnknownCrop {
            name: crop_name.to_string(),
        })
    }

    /// All profiles in declaration order.
    #[must_use]
    pub fn profiles(&self) -> &[CropProfile] {
        &self.profiles
    }

    /// Number of profiles.
    #[must_use]
    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    /// Whether the table has no profiles.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}

fn validate_profile(profile: &CropProfile) -> Result<(), CropMatrixError> {
    if profile.crop_name.trim().is_empty() {
        return Err(CropMatrixError::EmptyName);
    }

    let invalid = |field: &'static str, message: &str| CropMatrixError::InvalidField {
        crop: profile.crop_name.clone(),
        field,
        message: message.to_string(),
    };

    if profile.plants_per_half_acre == 0 {
        return Err(invalid("plantsPerHalfAcre", "must be positive"));
    }

    let positive = [
        ("producePerPlantLbs", profile.produce_per_plant_lbs),
        (
            "plantSpacing.betweenRowsCm",
            profile.plant_spacing.between_rows_cm,
        ),
        (
            "plantSpacing.betweenPlantsCm",
            profile.plant_spacing.between_plants_cm,
        ),
    ];
    for (field, value) in positive {
        if !value.is_finite() || value <= 0.0 {
            return Err(invalid(field, "must be a positive number"));
        }
    }

    let non_negative = [
        ("pricePerPoundAtStore", profile.price_per_pound_at_store),
        (
            "revenuePerSeasonAtHalfAcre",
            profile.revenue_per_season_at_half_acre,
        ),
        (
            "farmerEarningPerMonthAtHalfAcre",
            profile.farmer_earning_per_month_at_half_acre,
        ),
    ];
    for (field, value) in non_negative {
        if !value.is_finite() || value < 0.0 {
            return Err(invalid(field, "must be a non-negative number"));
        }
    }

    Ok(())
}
