//! TOML representation of the crop reference table.
//!
//! The default table lives in `packages/crop/crops.toml` and is baked into
//! the binary at compile time via [`include_str!`].

use serde::Deserialize;
use shamba_crop_models::{CropProfile, PlantSpacing};

/// The default crop table, embedded at compile time.
pub const BUILTIN_CROPS_TOML: &str = include_str!("../crops.toml");

#[derive(Debug, Deserialize)]
struct CropTable {
    #[serde(default)]
    crops: Vec<CropRow>,
}

/// One `[[crops]]` entry. Spacing is flattened into two keys so the file
/// stays a flat list of scalars.
#[derive(Debug, Deserialize)]
struct CropRow {
    crop_name: String,
    between_rows_cm: f64,
    between_plants_cm: f64,
    plants_per_half_acre: u32,
    produce_per_plant_lbs: f64,
    price_per_pound_at_store: f64,
    revenue_per_season_at_half_acre: f64,
    farmer_earning_per_month_at_half_acre: f64,
}

impl From<CropRow> for CropProfile {
    fn from(row: CropRow) -> Self {
        Self {
            crop_name: row.crop_name.trim().to_string(),
            plant_spacing: PlantSpacing {
                between_rows_cm: row.between_rows_cm,
                between_plants_cm: row.between_plants_cm,
            },
            plants_per_half_acre: row.plants_per_half_acre,
            produce_per_plant_lbs: row.produce_per_plant_lbs,
            price_per_pound_at_store: row.price_per_pound_at_store,
            revenue_per_season_at_half_acre: row.revenue_per_season_at_half_acre,
            farmer_earning_per_month_at_half_acre: row.farmer_earning_per_month_at_half_acre,
        }
    }
}

/// Parses a crop table. Range checks happen in
/// [`crate::CropMatrix::new`].
///
/// # Errors
///
/// Returns a [`toml::de::Error`] if the document is malformed or a row is
/// missing a field.
pub fn parse_crops_toml(source: &str) -> Result<Vec<CropProfile>, toml::de::Error> {
    let table: CropTable = toml::de::from_str(source)?;
    Ok(table.crops.into_iter().map(CropProfile::from).collect())
}
