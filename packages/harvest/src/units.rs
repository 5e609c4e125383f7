//! Pound/kilogram conversions.
//!
//! Two flavours exist. [`LBS_TO_KG`] is the exact factor used inside
//! projections, where no rounding is allowed. [`lbs_to_kg`] and
//! [`kg_to_lbs`] are the display/order conversions: they divide or
//! multiply by [`LBS_PER_KG`] and round to two decimals, so a round trip
//! may drift by up to 0.01.

use shamba_core_models::round_cents;

/// Exact kilograms per pound.
pub const LBS_TO_KG: f64 = 0.453_592;

/// Pounds per kilogram, as used by the rounded conversions.
pub const LBS_PER_KG: f64 = 2.204_62;

/// Converts pounds to kilograms, rounded to two decimals.
#[must_use]
pub fn lbs_to_kg(lbs: f64) -> f64 {
    round_cents(lbs / LBS_PER_KG)
}

/// Converts kilograms to pounds, rounded to two decimals.
#[must_use]
pub fn kg_to_lbs(kg: f64) -> f64 {
    round_cents(kg * LBS_PER_KG)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_values() {
        assert!((lbs_to_kg(2.204_62) - 1.0).abs() < 1e-12);
        assert!((kg_to_lbs(1.0) - 2.2).abs() < 1e-12);
        assert!((kg_to_lbs(10.0) - 22.05).abs() < 1e-12);
        assert!((lbs_to_kg(100.0) - 45.36).abs() < 1e-12);
        assert!(lbs_to_kg(0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn round_trip_drift_is_bounded() {
        for i in 0..20_000 {
            let x = f64::from(i) * 0.037;
            let back = lbs_to_kg(kg_to_lbs(x));
            assert!(
                (back - x).abs() <= 0.01 + 1e-9,
                "kg {x} drifted to {back}"
            );
        }
    }

    #[test]
    fn round_trip_is_lossy_off_the_cent_grid() {
        let back = lbs_to_kg(kg_to_lbs(1.234));
        assert!((back - 1.23).abs() < 1e-12);
    }
}
