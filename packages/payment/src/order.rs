//! Order pricing: volume × per-pound price → invoice → split.

use serde::{Deserialize, Serialize};
use shamba_core_models::round_cents;
use shamba_crop::CropMatrix;
use shamba_harvest::units::{kg_to_lbs, lbs_to_kg};

use crate::{InvoiceSplit, PaymentError, ensure_non_negative, split};

/// Ordered volume in the unit the buyer entered it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum OrderQuantity {
    /// Volume in pounds.
    Pounds(f64),
    /// Volume in kilograms.
    Kilograms(f64),
}

impl OrderQuantity {
    /// The raw number as entered.
    #[must_use]
    pub const fn value(self) -> f64 {
        match self {
            Self::Pounds(v) | Self::Kilograms(v) => v,
        }
    }

    /// `(pounds, kilograms)`, converting the side that was not entered with
    /// the rounded conversions.
    #[must_use]
    pub fn both_units(self) -> (f64, f64) {
        match self {
            Self::Pounds(lbs) => (lbs, lbs_to_kg(lbs)),
            Self::Kilograms(kg) => (kg_to_lbs(kg), kg),
        }
    }
}

/// Where the per-pound price comes from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PriceSource {
    /// The crop's store price from the crop table.
    CropTable,
    /// A flat per-pound rate set by the ordering flow. The crop name is
    /// not looked up.
    FixedPerPound(f64),
}

/// A priced order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderQuote {
    /// Crop name; canonical when priced from the crop table.
    pub crop_name: String,
    /// Ordered volume in pounds.
    pub volume_lbs: f64,
    /// Ordered volume in kilograms.
    pub volume_kg: f64,
    /// Price applied per pound.
    pub price_per_pound: f64,
    /// `volume_lbs * price_per_pound`, rounded to cents.
    pub invoice_amount: f64,
    /// How the invoice is divided.
    pub split: InvoiceSplit,
}

/// Prices an order and splits its invoice.
///
/// Kilogram volumes are converted to pounds with
/// [`shamba_harvest::units::kg_to_lbs`] before pricing, matching how the
/// order forms display them.
///
/// # Errors
///
/// * [`PaymentError::UnknownCrop`] if pricing from the crop table and the
///   crop has no profile.
/// * [`PaymentError::InvalidAmount`] if the volume or fixed rate is
///   negative or not finite.
pub fn quote(
    crops: &CropMatrix,
    crop_name: &str,
    quantity: OrderQuantity,
    price: PriceSource,
) -> Result<OrderQuote, PaymentError> {
    ensure_non_negative("volume", quantity.value())?;

    let (crop_name, price_per_pound) = match price {
        PriceSource::CropTable => {
            let profile = crops.require(crop_name)?;
            (profile.crop_name.clone(), profile.price_per_pound_at_store)
        }
        PriceSource::FixedPerPound(rate) => {
            ensure_non_negative("pricePerPound", rate)?;
            (crop_name.trim().to_string(), rate)
        }
    };

    let (volume_lbs, volume_kg) = quantity.both_units();
    let invoice_amount = round_cents(volume_lbs * price_per_pound);
    let invoice_split = split(invoice_amount)?;

    log::debug!(
        "Quoted {volume_lbs} lb of {crop_name} at {price_per_pound}/lb: {invoice_amount}"
    );

    Ok(OrderQuote {
        crop_name,
        volume_lbs,
        volume_kg,
        price_per_pound,
        invoice_amount,
        split: invoice_split,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use shamba_core_models::ErrorKind;
    use shamba_crop_models::{CropProfile, PlantSpacing};

    fn crops() -> CropMatrix {
        CropMatrix::new(vec![CropProfile {
            crop_name: "Kale".to_string(),
            plant_spacing: PlantSpacing {
                between_rows_cm: 60.0,
                between_plants_cm: 45.0,
            },
            plants_per_half_acre: 3_000,
            produce_per_plant_lbs: 2.5,
            price_per_pound_at_store: 0.6,
            revenue_per_season_at_half_acre: 4_500.0,
            farmer_earning_per_month_at_half_acre: 450.0,
        }])
        .unwrap()
    }

    #[test]
    fn prices_pounds_from_crop_table() {
        let q = quote(
            &crops(),
            "kale",
            OrderQuantity::Pounds(250.0),
            PriceSource::CropTable,
        )
        .unwrap();
        assert_eq!(q.crop_name, "Kale");
        assert!((q.invoice_amount - 150.0).abs() < 1e-9);
        assert!((q.volume_kg - 113.4).abs() < 1e-9);
        assert!((q.split.producer_share - 60.0).abs() < 1e-9);
        assert!((q.split.third_party_share - 30.0).abs() < 1e-9);
    }

    #[test]
    fn kilograms_are_converted_before_pricing() {
        let q = quote(
            &crops(),
            "Kale",
            OrderQuantity::Kilograms(10.0),
            PriceSource::CropTable,
        )
        .unwrap();
        assert!((q.volume_lbs - 22.05).abs() < 1e-9);
        assert!((q.volume_kg - 10.0).abs() < f64::EPSILON);
        assert!((q.invoice_amount - 13.23).abs() < 1e-9);
    }

    #[test]
    fn fixed_rate_skips_crop_lookup() {
        let q = quote(
            &crops(),
            " Avocado ",
            OrderQuantity::Pounds(100.0),
            PriceSource::FixedPerPound(1.25),
        )
        .unwrap();
        assert_eq!(q.crop_name, "Avocado");
        assert!((q.invoice_amount - 125.0).abs() < 1e-9);
        assert!((q.split.service_provider_share - 50.0).abs() < 1e-9);
    }

    #[test]
    fn unknown_crop_is_not_found() {
        let err = quote(
            &crops(),
            "Avocado",
            OrderQuantity::Pounds(1.0),
            PriceSource::CropTable,
        )
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn rejects_negative_volume_and_rate() {
        let crops = crops();
        let err = quote(
            &crops,
            "Kale",
            OrderQuantity::Kilograms(-1.0),
            PriceSource::CropTable,
        )
        .unwrap_err();
        assert!(matches!(err, PaymentError::InvalidAmount { field: "volume", .. }));

        let err = quote(
            &crops,
            "Kale",
            OrderQuantity::Pounds(1.0),
            PriceSource::FixedPerPound(f64::NAN),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            PaymentError::InvalidAmount {
                field: "pricePerPound",
                ..
            }
        ));
    }
}
