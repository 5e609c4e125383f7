//! County / sub-county / ward reference types.

use serde::{Deserialize, Serialize};

/// The (county, sub-county, ward) name triple that identifies a ward.
///
/// Names compare case-insensitively and ignore surrounding whitespace; use
/// [`WardScope::key`] when a normalized form is needed for storage.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WardScope {
    /// County name.
    pub county: String,
    /// Sub-county name.
    pub sub_county: String,
    /// Ward name.
    pub ward: String,
}

impl WardScope {
    /// Creates a scope from its three names.
    #[must_use]
    pub fn new(
        county: impl Into<String>,
        sub_county: impl Into<String>,
        ward: impl Into<String>,
    ) -> Self {
        Self {
            county: county.into(),
            sub_county: sub_county.into(),
            ward: ward.into(),
        }
    }

    /// Normalized `(county, sub_county, ward)` lookup key.
    #[must_use]
    pub fn key(&self) -> (String, String, String) {
        (
            normalize(&self.county),
            normalize(&self.sub_county),
            normalize(&self.ward),
        )
    }

    /// Whether any of the three names is blank.
    #[must_use]
    pub fn is_incomplete(&self) -> bool {
        [&self.county, &self.sub_county, &self.ward]
            .iter()
            .any(|s| s.trim().is_empty())
    }
}

impl PartialEq for WardScope {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for WardScope {}

impl std::fmt::Display for WardScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} / {} / {}", self.county, self.sub_county, self.ward)
    }
}

fn normalize(name: &str) -> String {
    name.trim().to_lowercase()
}

/// A row of the administrative reference table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdministrativeUnit {
    /// County name.
    pub county_name: String,
    /// Short alphabetic county code (e.g. `"NRU"`).
    pub county_code: String,
    /// Zero-padded county number (e.g. `"32"`).
    pub county_number: String,
    /// Sub-county name.
    pub sub_county_name: String,
    /// Ward name.
    pub ward_name: String,
    /// Zero-padded ward number (e.g. `"01"`).
    pub ward_number: String,
}

impl AdministrativeUnit {
    /// The scope this unit resolves.
    #[must_use]
    pub fn scope(&self) -> WardScope {
        WardScope::new(
            self.county_name.clone(),
            self.sub_county_name.clone(),
            self.ward_name.clone(),
        )
    }

    /// The identifier prefix shared by every producer in this ward, e.g.
    /// `"NRU32-01"`.
    #[must_use]
    pub fn identifier_prefix(&self) -> String {
        format!(
            "{}{}-{}",
            self.county_code, self.county_number, self.ward_number
        )
    }
}
