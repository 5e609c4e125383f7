#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Shared error taxonomy and numeric helpers.
//!
//! Every crate in the workspace defines its own error enum, but all of them
//! classify into one of the four [`ErrorKind`] variants so that callers
//! (the HTTP server, the CLI) can react uniformly without matching on
//! crate-specific variants.

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Machine-readable classification of a failure.
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
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    /// Unknown crop name or administrative unit.
    NotFound,
    /// Identifier allocation collided and retries were exhausted.
    Conflict,
    /// Caller supplied out-of-range or malformed input.
    InvalidInput,
    /// Storage or reference-data lookup failed.
    CollaboratorFailure,
}

impl ErrorKind {
    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::NotFound,
            Self::Conflict,
            Self::InvalidInput,
            Self::CollaboratorFailure,
        ]
    }

    /// Whether an operation failing with this kind may succeed if retried.
    #[must_use]
    pub const fn is_retryable(self) -> bool {
        matches!(self, Self::Conflict)
    }
}

/// Rounds `value` half away from zero to `places` decimal places.
///
/// Matches the rounding applied to displayed money and weight figures.
#[must_use]
pub fn round_to(value: f64, places: u32) -> f64 {
    let factor = 10f64.powi(i32::try_from(places).unwrap_or(i32::MAX));
    (value * factor).round() / factor
}

/// Rounds `value` to two decimal places (cents, hundredths of a kilogram).
#[must_use]
pub fn round_cents(value: f64) -> f64 {
    round_to(value, 2)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_string_forms() {
        assert_eq!(ErrorKind::NotFound.to_string(), "NOT_FOUND");
        assert_eq!(
            "COLLABORATOR_FAILURE".parse::<ErrorKind>().unwrap(),
            ErrorKind::CollaboratorFailure
        );
        for kind in ErrorKind::all() {
            assert_eq!(kind.as_ref().parse::<ErrorKind>().unwrap(), *kind);
        }
    }

    #[test]
    fn only_conflict_is_retryable() {
        let retryable: Vec<_> = ErrorKind::all()
            .iter()
            .filter(|k| k.is_retryable())
            .collect();
        assert_eq!(retryable, vec![&ErrorKind::Conflict]);
    }

    #[test]
    fn rounds_half_away_from_zero() {
        assert!((round_cents(2.204_62) - 2.2).abs() < f64::EPSILON);
        assert!((round_cents(0.125) - 0.13).abs() < 1e-12);
        assert!((round_cents(-1.005_1) - -1.01).abs() < 1e-12);
        assert!((round_to(9_071.84, 0) - 9_072.0).abs() < f64::EPSILON);
    }
}
