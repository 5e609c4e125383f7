//! Interactive menu shown when no subcommand is given.

use dialoguer::{Input, Select};
use shamba_server::ServerConfig;

use crate::commands::{self, CliResult};

/// Top-level tool selection.
enum Tool {
    Server,
    Project,
    Split,
    Convert,
    Crops,
    Nearby,
    Seed,
}

impl Tool {
    const ALL: &[Self] = &[
        Self::Server,
        Self::Project,
        Self::Split,
        Self::Convert,
        Self::Crops,
        Self::Nearby,
        Self::Seed,
    ];

    #[must_use]
    const fn label(&self) -> &'static str {
        match self {
            Self::Server => "Start server",
            Self::Project => "Project a harvest",
            Self::Split => "Split an invoice",
            Self::Convert => "Convert pounds / kilograms",
            Self::Crops => "List crops",
            Self::Nearby => "Find nearby farmers",
            Self::Seed => "Create and seed the database",
        }
    }
}

pub async fn run(config: ServerConfig) -> CliResult<()> {
    println!("Shamba Toolchain");
    println!();

    let labels: Vec<&str> = Tool::ALL.iter().map(Tool::label).collect();

    let idx = Select::new()
        .with_prompt("What would you like to do?")
        .items(&labels)
        .default(0)
        .interact()?;

    match Tool::ALL[idx] {
        Tool::Server => {
            tokio::task::spawn_blocking(|| {
                actix_web::rt::System::new().block_on(shamba_server::interactive::run())
            })
            .await??;
        }
        Tool::Project => {
            let crops = commands::load_crops(&config)?;
            let names: Vec<&str> = crops.profiles().iter().map(|p| p.crop_name.as_str()).collect();
            let crop = Select::new()
                .with_prompt("Crop")
                .items(&names)
                .default(0)
                .interact()?;
            let crop = names[crop].to_string();
            let acres: f64 = Input::new().with_prompt("Acres").interact_text()?;
            print!("{}", commands::project(crops, &crop, acres)?);
        }
        Tool::Split => {
            let amount: f64 = Input::new().with_prompt("Invoice amount").interact_text()?;
            print!("{}", commands::split(amount)?);
        }
        Tool::Convert => {
            let unit = Select::new()
                .with_prompt("Convert from")
                .items(&["pounds", "kilograms"])
                .default(0)
                .interact()?;
            let value: f64 = Input::new().with_prompt("Amount").interact_text()?;
            let report = if unit == 0 {
                commands::convert(Some(value), None)?
            } else {
                commands::convert(None, Some(value))?
            };
            println!("{report}");
        }
        Tool::Crops => print!("{}", commands::crops_table(&commands::load_crops(&config)?)),
        Tool::Nearby => {
            let lat: f64 = Input::new().with_prompt("Latitude").interact_text()?;
            let lng: f64 = Input::new().with_prompt("Longitude").interact_text()?;
            let radius: f64 = Input::new()
                .with_prompt("Radius (meters)")
                .default(5_000.0)
                .interact_text()?;
            let found = commands::nearby(&config, lat, lng, radius)?;
            print!("{}", commands::nearby_report(&found));
        }
        Tool::Seed => println!("{}", commands::seed(&config, None)?),
    }

    Ok(())
}
