#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Command-line entry point for the Shamba toolchain.
//!
//! Every operation is available as a subcommand. Run without one to get an
//! interactive menu instead.

mod commands;
mod interactive;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use shamba_server::ServerConfig;

use crate::commands::CliResult;

#[derive(Parser)]
#[command(name = "shamba", about = "Shamba supply-chain toolchain")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the API server
    Serve,
    /// Create the database and seed administrative units
    Seed {
        /// Extra administrative units CSV to load
        #[arg(long)]
        units: Option<PathBuf>,
    },
    /// List the crop reference table
    Crops,
    /// Project a season's harvest for a crop and acreage
    Project {
        /// Crop name (case-insensitive)
        crop: String,
        /// Farm size in acres
        #[arg(allow_negative_numbers = true)]
        acres: f64,
    },
    /// Split an invoice 40/40/20 between producer, service provider, and third party
    Split {
        /// Invoice amount
        #[arg(allow_negative_numbers = true)]
        amount: f64,
    },
    /// Convert between pounds and kilograms
    Convert {
        /// Pounds to convert to kilograms
        #[arg(long, conflicts_with = "kg", required_unless_present = "kg")]
        lbs: Option<f64>,
        /// Kilograms to convert to pounds
        #[arg(long)]
        kg: Option<f64>,
    },
    /// List stored producers near a point
    Nearby {
        /// Origin latitude
        #[arg(long, allow_negative_numbers = true)]
        lat: f64,
        /// Origin longitude
        #[arg(long, allow_negative_numbers = true)]
        lng: f64,
        /// Search radius in meters
        #[arg(long, default_value_t = 5_000.0)]
        radius: f64,
    },
}

#[tokio::main]
async fn main() -> CliResult<()> {
    pretty_env_logger::init();
    let cli = Cli::parse();
    let config = ServerConfig::from_env();

    match cli.command {
        None => interactive::run(config).await?,
        Some(Commands::Serve) => serve(config).await?,
        Some(Commands::Seed { units }) => println!("{}", commands::seed(&config, units.as_deref())?),
        Some(Commands::Crops) => print!("{}", commands::crops_table(&commands::load_crops(&config)?)),
        Some(Commands::Project { crop, acres }) => {
            print!("{}", commands::project(commands::load_crops(&config)?, &crop, acres)?);
        }
        Some(Commands::Split { amount }) => print!("{}", commands::split(amount)?),
        Some(Commands::Convert { lbs, kg }) => println!("{}", commands::convert(lbs, kg)?),
        Some(Commands::Nearby { lat, lng, radius }) => {
            let found = commands::nearby(&config, lat, lng, radius)?;
            print!("{}", commands::nearby_report(&found));
        }
    }

    Ok(())
}

/// Runs the Actix server on its own system thread.
///
/// The server uses actix-web's runtime, so it runs in a blocking task to
/// avoid nesting tokio runtimes.
async fn serve(config: ServerConfig) -> CliResult<()> {
    tokio::task::spawn_blocking(move || {
        actix_web::rt::System::new().block_on(shamba_server::run_server(config))
    })
    .await??;
    Ok(())
}
