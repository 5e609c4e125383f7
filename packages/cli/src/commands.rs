//! Implementations shared by the subcommands and the interactive menu.
//!
//! Each operation returns its report as a `String` so it can be printed by
//! either front end.

use std::fmt::Write as _;
use std::path::Path;

use shamba_crop::CropMatrix;
use shamba_geography::find_nearby;
use shamba_geography_models::{LocationPoint, ProximityCandidate};
use shamba_harvest::units::{kg_to_lbs, lbs_to_kg};
use shamba_harvest::{HarvestProjection, HarvestProjectionEngine};
use shamba_payment::InvoiceSplit;
use shamba_server::ServerConfig;

/// Boxed error type used by every CLI operation.
pub type CliResult<T> = Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Loads the crop table named by the configuration.
///
/// # Errors
///
/// Returns an error if the table cannot be read or is invalid.
pub fn load_crops(config: &ServerConfig) -> CliResult<CropMatrix> {
    Ok(shamba_server::load_crops(config)?)
}

/// Renders the crop table.
#[must_use]
pub fn crops_table(crops: &CropMatrix) -> String {
    let mut out = format!(
        "{:<12} {:>14} {:>8} {:>8} {:>8} {:>12}\n",
        "Crop", "Spacing", "Plants", "lb/pl", "$/lb", "lb/half-ac"
    );
    for profile in crops.profiles() {
        let _ = writeln!(
            out,
            "{:<12} {:>14} {:>8} {:>8.2} {:>8.2} {:>12.0}",
            profile.crop_name,
            profile.plant_spacing.to_string(),
            profile.plants_per_half_acre,
            profile.produce_per_plant_lbs,
            profile.price_per_pound_at_store,
            profile.volume_lbs_per_half_acre(),
        );
    }
    out
}

/// Projects a harvest and renders it.
///
/// # Errors
///
/// Returns an error if the crop is unknown or the acreage is not finite.
pub fn project(crops: CropMatrix, crop_name: &str, acres: f64) -> CliResult<String> {
    let engine = HarvestProjectionEngine::new(std::sync::Arc::new(crops));
    Ok(projection_report(&engine.project(crop_name, acres)?))
}

/// Renders a harvest projection.
#[must_use]
pub fn projection_report(projection: &HarvestProjection) -> String {
    format!(
        "{} on {} acres\n  \
         volume:          {:.2} lb ({:.2} kg)\n  \
         revenue/season:  {:.2}\n  \
         earning/month:   {:.2}\n",
        projection.crop_name,
        projection.acreage_acres,
        projection.volume_lbs,
        projection.volume_kg,
        projection.revenue_per_season,
        projection.farmer_earning_per_month,
    )
}

/// Splits an invoice and renders the shares.
///
/// # Errors
///
/// Returns an error if the amount is negative or not finite.
pub fn split(amount: f64) -> CliResult<String> {
    Ok(split_report(&shamba_payment::split(amount)?))
}

/// Renders an invoice split.
#[must_use]
pub fn split_report(split: &InvoiceSplit) -> String {
    format!(
        "invoice:           {:.2}\n  \
         producer:          {:.2}\n  \
         service provider:  {:.2}\n  \
         third party:       {:.2}\n",
        split.invoice_amount,
        split.producer_share,
        split.service_provider_share,
        split.third_party_share,
    )
}

/// Converts between pounds and kilograms; exactly one of `lbs` and `kg`
/// must be set.
///
/// # Errors
///
/// Returns an error if both or neither unit is given.
pub fn convert(lbs: Option<f64>, kg: Option<f64>) -> CliResult<String> {
    match (lbs, kg) {
        (Some(lbs), None) => Ok(format!("{lbs} lb = {:.2} kg", lbs_to_kg(lbs))),
        (None, Some(kg)) => Ok(format!("{kg} kg = {:.2} lb", kg_to_lbs(kg))),
        _ => Err("give exactly one of --lbs and --kg".into()),
    }
}

/// Opens (creating if needed) the database and loads extra administrative
/// units from `units_csv`. The built-in units are always seeded.
///
/// # Errors
///
/// Returns an error if the database or CSV cannot be read.
pub fn seed(config: &ServerConfig, units_csv: Option<&Path>) -> CliResult<String> {
    let conn = shamba_database::open(&config.db_path)?;

    let mut added = 0;
    if let Some(path) = units_csv {
        let units = shamba_database::parse_units_csv(&std::fs::read_to_string(path)?)?;
        added = shamba_database::seed_administrative_units(&conn, &units)?;
        log::info!("Loaded {added} new units from {}", path.display());
    }

    let total = shamba_database::count_units(&conn)?;
    Ok(format!(
        "{}: {total} administrative units ({added} added from file)",
        config.db_path.display()
    ))
}

/// Finds stored producers within `radius_meters` of the origin.
///
/// # Errors
///
/// Returns an error if the coordinates or radius are invalid or the
/// database cannot be read.
pub fn nearby(
    config: &ServerConfig,
    latitude: f64,
    longitude: f64,
    radius_meters: f64,
) -> CliResult<Vec<ProximityCandidate>> {
    let origin = LocationPoint::new(latitude, longitude)?;
    let conn = shamba_database::open(&config.db_path)?;
    let candidates = shamba_database::list_producer_locations(&conn)?;
    Ok(find_nearby(&origin, candidates, radius_meters)?)
}

/// Renders proximity results, nearest first.
#[must_use]
pub fn nearby_report(found: &[ProximityCandidate]) -> String {
    if found.is_empty() {
        return "No producers within the radius.\n".to_string();
    }

    let mut out = String::new();
    for candidate in found {
        let _ = writeln!(
            out,
            "{:>8} m  {} (#{})  {:.5}, {:.5}",
            candidate.display_distance_meters(),
            candidate.display_name,
            candidate.id,
            candidate.location.latitude(),
            candidate.location.longitude(),
        );
    }
    out
}
