//! Mapping from domain errors to HTTP responses.

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use shamba_core_models::ErrorKind;
use shamba_database::DbError;
use shamba_geography::GeoError;
use shamba_harvest::ProjectionError;
use shamba_identifier::IdentifierError;
use shamba_payment::PaymentError;
use shamba_server_models::ApiErrorBody;
use thiserror::Error;

/// Any failure a handler can return.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Harvest projection failed.
    #[error(transparent)]
    Projection(#[from] ProjectionError),

    /// Order pricing or invoice split failed.
    #[error(transparent)]
    Payment(#[from] PaymentError),

    /// Proximity search failed.
    #[error(transparent)]
    Geo(#[from] GeoError),

    /// Registration failed.
    #[error(transparent)]
    Identifier(#[from] IdentifierError),

    /// Direct storage read failed.
    #[error(transparent)]
    Database(#[from] DbError),

    /// No producer has this primary key.
    #[error("Producer {id} not found")]
    ProducerNotFound {
        /// The requested key.
        id: i64,
    },

    /// The producer exists but lacks data the operation needs.
    #[error("Producer {id} has no {field} on record")]
    MissingFarmData {
        /// The producer's key.
        id: i64,
        /// The missing field, as named in the API.
        field: &'static str,
    },

    /// The request body or parameters are unusable.
    #[error("{message}")]
    InvalidRequest {
        /// What is wrong.
        message: String,
    },
}

impl ApiError {
    /// Classifies this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Projection(e) => e.kind(),
            Self::Payment(e) => e.kind(),
            Self::Geo(e) => e.kind(),
            Self::Identifier(e) => e.kind(),
            Self::Database(e) => e.kind(),
            Self::ProducerNotFound { .. } => ErrorKind::NotFound,
            Self::MissingFarmData { .. } | Self::InvalidRequest { .. } => ErrorKind::InvalidInput,
        }
    }
}

/// HTTP status for an error kind.
#[must_use]
pub const fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::NotFound => StatusCode::NOT_FOUND,
        ErrorKind::Conflict => StatusCode::CONFLICT,
        ErrorKind::InvalidInput => StatusCode::UNPROCESSABLE_ENTITY,
        ErrorKind::CollaboratorFailure => StatusCode::SERVICE_UNAVAILABLE,
    }
}

/// JSON error body for `kind` with the given status.
pub fn error_body(status: StatusCode, kind: ErrorKind, message: String) -> HttpResponse {
    HttpResponse::build(status).json(ApiErrorBody {
        error: kind,
        message,
    })
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        status_for(self.kind())
    }

    fn error_response(&self) -> HttpResponse {
        let kind = self.kind();
        match kind {
            ErrorKind::CollaboratorFailure | ErrorKind::Conflict => {
                log::error!("Request failed: {self}");
            }
            ErrorKind::NotFound | ErrorKind::InvalidInput => log::debug!("Request rejected: {self}"),
        }
        error_body(self.status_code(), kind, self.to_string())
    }
}

#[cfg(test)]
mod tests {
    use shamba_identifier::RegistryError;

    use super::*;

    #[test]
    fn every_kind_has_a_distinct_status() {
        let statuses: std::collections::BTreeSet<u16> = ErrorKind::all()
            .iter()
            .map(|k| status_for(*k).as_u16())
            .collect();
        assert_eq!(statuses.len(), ErrorKind::all().len());
    }

    #[test]
    fn maps_domain_errors() {
        assert_eq!(
            ApiError::ProducerNotFound { id: 9 }.status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::MissingFarmData {
                id: 9,
                field: "cropName"
            }
            .status_code(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            ApiError::from(IdentifierError::Conflict {
                farmer_id: "NRU32-01-004".to_string(),
                attempts: 6,
            })
            .status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ApiError::from(IdentifierError::from(RegistryError::Backend {
                message: "disk full".to_string(),
            }))
            .status_code(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            ApiError::from(DbError::Poisoned).status_code(),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }
}
