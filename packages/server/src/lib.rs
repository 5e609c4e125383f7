#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Actix-Web API server for Shamba.
//!
//! Exposes producer registration, harvest projections, nearby-farmer
//! search, and order pricing under `/api`. Producers and the
//! administrative reference table live in a single `DuckDB` file; the crop
//! table is loaded once at startup and shared read-only.

pub mod config;
mod error;
mod handlers;
pub mod interactive;

use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{App, HttpServer, middleware, web};
use shamba_crop::{CropMatrix, CropMatrixError};
use shamba_database::{DbError, DuckDbRegistry};
use shamba_harvest::HarvestProjectionEngine;
use shamba_identifier::{FarmerIdentifierGenerator, RetryPolicy};

pub use config::ServerConfig;
pub use error::ApiError;

/// Shared application state.
pub struct AppState {
    /// Crop reference table.
    pub crops: Arc<CropMatrix>,
    /// Projection engine over [`Self::crops`].
    pub engine: HarvestProjectionEngine,
    /// Identifier allocation and producer registration.
    pub generator: FarmerIdentifierGenerator,
    /// `DuckDB` producer storage, also used for direct reads.
    pub registry: Arc<DuckDbRegistry>,
}

impl AppState {
    /// Wires the calculation components to a registry.
    #[must_use]
    pub fn new(crops: Arc<CropMatrix>, registry: Arc<DuckDbRegistry>, retry: RetryPolicy) -> Self {
        Self {
            engine: HarvestProjectionEngine::new(crops.clone()),
            generator: FarmerIdentifierGenerator::new(registry.clone(), registry.clone())
                .with_retry_policy(retry),
            crops,
            registry,
        }
    }
}

/// Errors that can occur while starting the server.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// The crop table could not be loaded.
    #[error(transparent)]
    Crops(#[from] CropMatrixError),

    /// The database could not be opened.
    #[error(transparent)]
    Database(#[from] DbError),

    /// Binding or running the HTTP server failed.
    #[error("Server I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Loads the crop table from `config.crops_path`, or the embedded table.
///
/// # Errors
///
/// Returns [`CropMatrixError`] if the file cannot be read or the table is
/// invalid.
pub fn load_crops(config: &ServerConfig) -> Result<CropMatrix, CropMatrixError> {
    match &config.crops_path {
        Some(path) => CropMatrix::from_toml_file(path),
        None => {
            let crops = CropMatrix::builtin()?;
            log::info!("Using built-in crop table ({} crops)", crops.len());
            Ok(crops)
        }
    }
}

/// Loads the crop table and opens the database described by `config`.
///
/// # Errors
///
/// Returns [`ServerError`] if the crop table is invalid or the database
/// cannot be opened.
pub fn load_state(config: &ServerConfig) -> Result<AppState, ServerError> {
    let crops = load_crops(config)?;
    let conn = shamba_database::open(&config.db_path)?;
    let retry = RetryPolicy {
        max_retries: config.register_max_retries,
        ..RetryPolicy::default()
    };

    Ok(AppState::new(
        Arc::new(crops),
        Arc::new(DuckDbRegistry::new(conn)),
        retry,
    ))
}

/// Registers the `/api` routes.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .route("/health", web::get().to(handlers::health))
            .route("/crops", web::get().to(handlers::crops))
            .route("/register", web::post().to(handlers::register))
            .route(
                "/harvest-projection",
                web::get().to(handlers::harvest_projection),
            )
            .route("/nearby-farmers", web::get().to(handlers::nearby_farmers))
            .route("/orders", web::post().to(handlers::orders)),
    );
}

/// Starts the Shamba API server.
///
/// This is a regular async function; the caller provides the runtime
/// (e.g. via `#[actix_web::main]`) and initializes logging.
///
/// # Errors
///
/// Returns [`ServerError`] if startup fails or the HTTP server cannot
/// bind.
#[allow(clippy::future_not_send)]
pub async fn run_server(config: ServerConfig) -> Result<(), ServerError> {
    let state = web::Data::new(load_state(&config)?);

    log::info!("Starting server on {}:{}", config.bind_addr, config.port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .app_data(state.clone())
            .app_data(handlers::json_config())
            .app_data(handlers::query_config())
            .configure(configure)
    })
    .bind((config.bind_addr.as_str(), config.port))?
    .run()
    .await?;

    Ok(())
}
