use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use inquire::{Confirm, CustomType, Text};
use skycast_core::{
    Config, FetchCoordinator, FixedPosition, ForecastFetcher, HomePosition, LocationResolver,
    OpenMeteoProvider, Status, WeatherApiGeocoder,
};

use crate::render;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "skycast", version, about = "Weather in your terminal")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the geocoding API key and an optional home position.
    Configure,

    /// Show weather for a city.
    Show {
        /// City name, e.g. "Paris".
        city: String,

        /// Display temperatures in Fahrenheit.
        #[arg(long)]
        fahrenheit: bool,
    },

    /// Show weather for the configured home position.
    Here {
        /// Display temperatures in Fahrenheit.
        #[arg(long)]
        fahrenheit: bool,
    },
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        match self.command {
            Command::Configure => configure(),
            Command::Show { city, fahrenheit } => {
                let coordinator = build_coordinator()?;
                if fahrenheit {
                    coordinator.toggle_unit().await;
                }

                coordinator.search(&city).await;
                finish(&coordinator)
            }
            Command::Here { fahrenheit } => {
                let coordinator = build_coordinator()?;
                if fahrenheit {
                    coordinator.toggle_unit().await;
                }

                coordinator.use_my_location().await;
                finish(&coordinator)
            }
        }
    }
}

fn finish(coordinator: &FetchCoordinator) -> Result<()> {
    let state = coordinator.current();
    render::view(&state);

    if matches!(state.status, Status::Errored(_)) {
        std::process::exit(1);
    }
    Ok(())
}

fn build_coordinator() -> Result<FetchCoordinator> {
    let config = Config::load()?;

    let geocoder = Arc::new(WeatherApiGeocoder::new(config.api_key.clone()));
    let forecast = Arc::new(OpenMeteoProvider::new());
    let device = Arc::new(FixedPosition::new(
        config.home.map(|home| (home.latitude, home.longitude)),
    ));

    Ok(FetchCoordinator::new(
        LocationResolver::new(geocoder),
        ForecastFetcher::new(forecast),
        device,
    )
    .keep_snapshot_on_unit_error(config.keep_snapshot_on_unit_error))
}

fn configure() -> Result<()> {
    let mut config = Config::load()?;

    let key = Text::new("Geocoding API key (weatherapi.com):")
        .with_help_message("Stored in the skycast config file; SKYCAST_API_KEY overrides it")
        .prompt()?;
    if !key.trim().is_empty() {
        config.api_key = Some(key.trim().to_owned());
    }

    let set_home = Confirm::new("Set a home position for `skycast here`?")
        .with_default(config.home.is_some())
        .prompt()?;
    if set_home {
        let latitude = CustomType::<f64>::new("Latitude:").prompt()?;
        let longitude = CustomType::<f64>::new("Longitude:").prompt()?;
        config.home = Some(HomePosition {
            latitude,
            longitude,
        });
    }

    config.save()?;
    println!("Saved {}", Config::config_file_path()?.display());

    Ok(())
}
