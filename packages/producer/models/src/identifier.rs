//! Structured farmer identifiers.
//!
//! Shape: `<countyCode><countyNumber>-<wardNumber>-<sequence>`, e.g.
//! `NRU32-01-008`. The sequence is three digits, zero-padded, and counts
//! producers registered in the ward.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use shamba_geography_models::AdministrativeUnit;
use thiserror::Error;

/// Largest sequence number that fits the three-digit field.
pub const MAX_SEQUENCE: u32 = 999;

/// Errors building or parsing a [`FarmerIdentifier`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FarmerIdentifierError {
    /// The sequence is zero or does not fit in three digits.
    #[error("Sequence {sequence} is outside 1..={MAX_SEQUENCE}")]
    SequenceOutOfRange {
        /// The rejected sequence.
        sequence: u32,
    },

    /// The string does not have the identifier shape.
    #[error("Malformed farmer identifier {value:?}: {reason}")]
    Malformed {
        /// The rejected string.
        value: String,
        /// What is wrong with it.
        reason: &'static str,
    },
}

/// A farmer identifier scoped to a ward.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct FarmerIdentifier {
    county_code: String,
    county_number: String,
    ward_number: String,
    sequence: u32,
}

impl FarmerIdentifier {
    /// Builds the identifier for the `sequence`-th producer of `unit`.
    ///
    /// # Errors
    ///
    /// Returns [`FarmerIdentifierError::SequenceOutOfRange`] if `sequence`
    /// is zero or above [`MAX_SEQUENCE`].
    pub fn new(unit: &AdministrativeUnit, sequence: u32) -> Result<Self, FarmerIdentifierError> {
        if sequence == 0 || sequence > MAX_SEQUENCE {
            return Err(FarmerIdentifierError::SequenceOutOfRange { sequence });
        }
        Ok(Self {
            county_code: unit.county_code.clone(),
            county_number: unit.county_number.clone(),
            ward_number: unit.ward_number.clone(),
            sequence,
        })
    }

    /// Alphabetic county code.
    #[must_use]
    pub fn county_code(&self) -> &str {
        &self.county_code
    }

    /// Zero-padded county number.
    #[must_use]
    pub fn county_number(&self) -> &str {
        &self.county_number
    }

    /// Zero-padded ward number.
    #[must_use]
    pub fn ward_number(&self) -> &str {
        &self.ward_number
    }

    /// Position of this producer within the ward, starting at 1.
    #[must_use]
    pub const fn sequence(&self) -> u32 {
        self.sequence
    }
}

impl fmt::Display for FarmerIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}-{}-{:03}",
            self.county_code, self.county_number, self.ward_number, self.sequence
        )
    }
}

impl FromStr for FarmerIdentifier {
    type Err = FarmerIdentifierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = |reason| FarmerIdentifierError::Malformed {
            value: s.to_string(),
            reason,
        };

        let mut parts = s.split('-');
        let (Some(county), Some(ward), Some(seq), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(malformed("expected three '-' separated parts"));
        };

        let digits_at = county
            .find(|c: char| c.is_ascii_digit())
            .ok_or_else(|| malformed("missing county number"))?;
        let (county_code, county_number) = county.split_at(digits_at);

        if county_code.is_empty() || !county_code.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(malformed("county code must be letters"));
        }
        if !county_number.chars().all(|c| c.is_ascii_digit()) {
            return Err(malformed("county number must be digits"));
        }
        if ward.is_empty() || !ward.chars().all(|c| c.is_ascii_digit()) {
            return Err(malformed("ward number must be digits"));
        }
        if seq.len() != 3 || !seq.chars().all(|c| c.is_ascii_digit()) {
            return Err(malformed("sequence must be three digits"));
        }

        let sequence: u32 = seq
            .parse()
            .map_err(|_| malformed("sequence must be three digits"))?;
        if sequence == 0 {
            return Err(FarmerIdentifierError::SequenceOutOfRange { sequence });
        }

        Ok(Self {
            county_code: county_code.to_string(),
            county_number: county_number.to_string(),
            ward_number: ward.to_string(),
            sequence,
        })
    }
}

impl From<FarmerIdentifier> for String {
    fn from(id: FarmerIdentifier) -> Self {
        id.to_string()
    }
}

impl TryFrom<String> for FarmerIdentifier {
    type Error = FarmerIdentifierError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nakuru_biashara() -> AdministrativeUnit {
        AdministrativeUnit {
            county_name: "Nakuru".to_string(),
            county_code: "NRU".to_string(),
            county_number: "32".to_string(),
            sub_county_name: "Naivasha".to_string(),
            ward_name: "Biashara".to_string(),
            ward_number: "01".to_string(),
        }
    }

    #[test]
    fn formats_with_zero_padded_sequence() {
        let id = FarmerIdentifier::new(&nakuru_biashara(), 8).unwrap();
        assert_eq!(id.to_string(), "NRU32-01-008");
        assert_eq!(
            FarmerIdentifier::new(&nakuru_biashara(), 999)
                .unwrap()
                .to_string(),
            "NRU32-01-999"
        );
    }

    #[test]
    fn refuses_sequences_outside_three_digits() {
        assert_eq!(
            FarmerIdentifier::new(&nakuru_biashara(), 1_000),
            Err(FarmerIdentifierError::SequenceOutOfRange { sequence: 1_000 })
        );
        assert!(FarmerIdentifier::new(&nakuru_biashara(), 0).is_err());
    }

    #[test]
    fn parses_its_own_output() {
        let id: FarmerIdentifier = "NRU32-01-008".parse().unwrap();
        assert_eq!(id.county_code(), "NRU");
        assert_eq!(id.county_number(), "32");
        assert_eq!(id.ward_number(), "01");
        assert_eq!(id.sequence(), 8);
        assert_eq!(id, FarmerIdentifier::new(&nakuru_biashara(), 8).unwrap());
    }

    #[test]
    fn rejects_malformed_strings() {
        for bad in [
            "",
            "NRU32-01",
            "NRU32-01-008-1",
            "32-01-008",
            "NRU-01-008",
            "NRU32-0A-008",
            "NRU32-01-08",
            "NRU32-01-0008",
            "NRU32--008",
            "NRU32-01-000",
        ] {
            assert!(bad.parse::<FarmerIdentifier>().is_err(), "{bad:?} parsed");
        }
    }

    #[test]
    fn serializes_as_string() {
        let id = FarmerIdentifier::new(&nakuru_biashara(), 42).unwrap();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"NRU32-01-042\"");
        let back: FarmerIdentifier = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }
}
