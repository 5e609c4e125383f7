#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Invoice splitting and order pricing.
//!
//! Every order invoice is divided 40% / 40% / 20% between the producer,
//! the service provider and a third (regulatory/tax) party. The invoice is
//! rounded to cents first, then each share is rounded to cents on its own,
//! so the shares may add up to one cent more or less than the invoice. That drift is kept as-is: redistributing it
//! would need a tie-break rule that the settlement process does not have.

pub mod order;

use serde::{Deserialize, Serialize};
use shamba_core_models::{ErrorKind, round_cents};
use shamba_crop::UnknownCrop;
use thiserror::Error;

pub use order::{OrderQuantity, OrderQuote, PriceSource, quote};

/// Producer's share of an invoice.
pub const PRODUCER_RATIO: f64 = 0.4;
/// Service provider's share of an invoice.
pub const SERVICE_PROVIDER_RATIO: f64 = 0.4;
/// Third party's share of an invoice.
pub const THIRD_PARTY_RATIO: f64 = 0.2;

/// Errors that can occur while pricing or splitting an order.
#[derive(Debug, Error)]
pub enum PaymentError {
    /// The crop has no profile in the table.
    #[error(transparent)]
    UnknownCrop(#[from] UnknownCrop),

    /// A monetary amount, rate, or volume is negative or not finite.
    #[error("Invalid {field}: {value}")]
    InvalidAmount {
        /// Which input was rejected.
        field: &'static str,
        /// The rejected value.
        value: f64,
    },
}

impl PaymentError {
    /// Classifies this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::UnknownCrop(_) => ErrorKind::NotFound,
            Self::InvalidAmount { .. } => ErrorKind::InvalidInput,
        }
    }
}

/// An invoice divided between the three stakeholders.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceSplit {
    /// The amount that was split, rounded to cents.
    pub invoice_amount: f64,
    /// 40% to the producer.
    pub producer_share: f64,
    /// 40% to the service provider.
    pub service_provider_share: f64,
    /// 20% to the third party.
    pub third_party_share: f64,
}

impl InvoiceSplit {
    /// Sum of the three rounded shares.
    #[must_use]
    pub fn total_shares(&self) -> f64 {
        self.producer_share + self.service_provider_share + self.third_party_share
    }

    /// Difference between the summed shares and the invoice amount.
    ///
    /// Never more than one cent in magnitude.
    #[must_use]
    pub fn rounding_drift(&self) -> f64 {
        self.total_shares() - self.invoice_amount
    }
}

/// Rounds `invoice_amount` to cents and splits it 40/40/20, rounding each
/// share to cents.
///
/// # Errors
///
/// Returns [`PaymentError::InvalidAmount`] if the amount is negative, not
/// finite, or too large for its shares to be represented in cents.
pub fn split(invoice_amount: f64) -> Result<InvoiceSplit, PaymentError> {
    ensure_non_negative("invoiceAmount", invoice_amount)?;

    let rounded = round_cents(invoice_amount);
    let invoice_split = InvoiceSplit {
        invoice_amount: rounded,
        producer_share: round_cents(rounded * PRODUCER_RATIO),
        service_provider_share: round_cents(rounded * SERVICE_PROVIDER_RATIO),
        third_party_share: round_cents(rounded * THIRD_PARTY_RATIO),
    };

    let representable = [
        invoice_split.invoice_amount,
        invoice_split.producer_share,
        invoice_split.service_provider_share,
        invoice_split.third_party_share,
    ]
    .iter()
    .all(|value| value.is_finite());

    if !representable {
        return Err(PaymentError::InvalidAmount {
            field: "invoiceAmount",
            value: invoice_amount,
        });
    }

    Ok(invoice_split)
}

pub(crate) fn ensure_non_negative(field: &'static str, value: f64) -> Result<(), PaymentError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(PaymentError::InvalidAmount { field, value })
    }
}
