//! HTTP handler functions for the Shamba API.

use actix_web::error::InternalError;
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, web};
use shamba_core_models::ErrorKind;
use shamba_geography::find_nearby;
use shamba_geography_models::LocationPoint;
use shamba_payment::{OrderQuantity, PriceSource, quote};
use shamba_producer_models::ProducerRegistration;
use shamba_server_models::{
    ApiCrop, ApiHealth, ApiNearbyFarmer, HarvestProjectionParams, NearbyFarmersParams,
    OrderRequest, RegisterRequest, RegisterResponse,
};

use crate::error::error_body;
use crate::{ApiError, AppState};

/// Rejects malformed JSON bodies with the API error shape.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        let response = error_body(StatusCode::BAD_REQUEST, ErrorKind::InvalidInput, err.to_string());
        InternalError::from_response(err, response).into()
    })
}

/// Rejects malformed query strings with the API error shape.
pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(|err, _req| {
        let response = error_body(StatusCode::BAD_REQUEST, ErrorKind::InvalidInput, err.to_string());
        InternalError::from_response(err, response).into()
    })
}

/// `GET /api/health`
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(ApiHealth {
        healthy: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// `GET /api/crops`
///
/// Returns the crop reference table in its configured order.
pub async fn crops(state: web::Data<AppState>) -> HttpResponse {
    let crops: Vec<ApiCrop> = state.crops.profiles().iter().map(ApiCrop::from).collect();
    HttpResponse::Ok().json(crops)
}

/// `POST /api/register`
///
/// Registers a producer and allocates its farmer identifier.
pub async fn register(
    state: web::Data<AppState>,
    body: web::Json<RegisterRequest>,
) -> Result<HttpResponse, ApiError> {
    let registration =
        ProducerRegistration::try_from(body.into_inner()).map_err(|e| ApiError::InvalidRequest {
            message: e.to_string(),
        })?;

    let record = state.generator.register(registration).await?;
    Ok(HttpResponse::Created().json(RegisterResponse::from(&record)))
}

/// `GET /api/harvest-projection?producerId=`
///
/// Projects the season's harvest for a producer's registered crop and
/// acreage.
pub async fn harvest_projection(
    state: web::Data<AppState>,
    params: web::Query<HarvestProjectionParams>,
) -> Result<HttpResponse, ApiError> {
    let id = params.producer_id;
    let producer = state
        .registry
        .producer(id)?
        .ok_or(ApiError::ProducerNotFound { id })?;

    let crop_name = producer
        .crop_name
        .as_deref()
        .ok_or(ApiError::MissingFarmData {
            id,
            field: "cropName",
        })?;
    let acreage = producer
        .farm_acreage_acres
        .ok_or(ApiError::MissingFarmData {
            id,
            field: "farmAcreageAcres",
        })?;

    let projection = state.engine.project(crop_name, acreage)?;
    Ok(HttpResponse::Ok().json(projection))
}

/// `GET /api/nearby-farmers?lat=&lng=&radius=`
///
/// Producers within `radius` meters of the origin, nearest first.
pub async fn nearby_farmers(
    state: web::Data<AppState>,
    params: web::Query<NearbyFarmersParams>,
) -> Result<HttpResponse, ApiError> {
    let origin = LocationPoint::new(params.lat, params.lng).map_err(shamba_geography::GeoError::from)?;
    let candidates = state.registry.producer_locations()?;

    let farmers: Vec<ApiNearbyFarmer> = find_nearby(&origin, candidates, params.radius)?
        .into_iter()
        .map(ApiNearbyFarmer::from)
        .collect();

    Ok(HttpResponse::Ok().json(farmers))
}

/// `POST /api/orders`
///
/// Prices an order and splits the invoice between the parties.
pub async fn orders(
    state: web::Data<AppState>,
    body: web::Json<OrderRequest>,
) -> Result<HttpResponse, ApiError> {
    let order = body.into_inner();

    let quantity = match (order.volume_lbs, order.volume_kg) {
        (Some(lbs), None) => OrderQuantity::Pounds(lbs),
        (None, Some(kg)) => OrderQuantity::Kilograms(kg),
        _ => {
            return Err(ApiError::InvalidRequest {
                message: "exactly one of volumeLbs and volumeKg is required".to_string(),
            });
        }
    };
    let price = order
        .price_per_pound
        .map_or(PriceSource::CropTable, PriceSource::FixedPerPound);

    let order_quote = quote(&state.crops, &order.crop_name, quantity, price)?;
    log::debug!(
        "Quoted {} lb of {} at {}",
        order_quote.volume_lbs,
        order_quote.crop_name,
        order_quote.invoice_amount
    );
    Ok(HttpResponse::Ok().json(order_quote))
}
