use anyhow::{Context, anyhow};
use clap::{ArgAction, Parser, Subcommand};
use inquire::{Confirm, CustomType, Password, PasswordDisplayMode, Select, Text};
use weather_core::{
    Config, Coordinates, ErrorKind, LocationQuery, LocationResolver, PositionSource, Session,
    UnitFormatter, UnitSystem, VisualCrossingProvider, WeatherService,
    location::{FixedPosition, IpPositionSource},
};

use crate::render;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather", version, about = "Weather for the 24 hours either side of now")]
pub struct Cli {
    /// API key; takes precedence over the configured one.
    #[arg(long, env = "WEATHER_API_KEY", global = true, hide_env_values = true)]
    pub api_key: Option<String>,

    /// Increase log verbosity (-v info, -vv debug). RUST_LOG wins when set.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the API key, unit system and optional home coordinates.
    Configure,

    /// Show the previous and next 24 hours for a location.
    Show {
        /// Address or place name. Omit to use your home or current location.
        #[arg(conflicts_with = "lat")]
        location: Option<String>,

        /// Latitude in decimal degrees.
        #[arg(long, requires = "lon", allow_negative_numbers = true)]
        lat: Option<f64>,

        /// Longitude in decimal degrees.
        #[arg(long, requires = "lat", allow_negative_numbers = true)]
        lon: Option<f64>,

        /// Print the normalized windows as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Load your location, then keep prompting for searches.
    Watch,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure => configure(),
            Command::Show { location, lat, lon, json } => {
                let config = load_config(self.api_key)?;
                let query = match (location, lat, lon) {
                    (Some(text), _, _) => Some(LocationQuery::Text(text)),
                    (None, Some(latitude), Some(longitude)) => {
                        Some(LocationQuery::Coordinates(Coordinates {
                            latitude,
                            longitude,
                        }))
                    }
                    _ => None,
                };
                show(&config, query, json).await
            }
            Command::Watch => {
                let config = load_config(self.api_key)?;
                watch(&config).await
            }
        }
    }
}

fn load_config(api_key: Option<String>) -> anyhow::Result<Config> {
    let mut config = Config::load()?;
    config.override_api_key(api_key);
    Ok(config)
}

fn service(config: &Config) -> anyhow::Result<WeatherService<VisualCrossingProvider>> {
    WeatherService::from_config(config).map_err(|err| anyhow!(err.user_message()))
}

/// Home coordinates when configured, otherwise an IP-based lookup.
fn locator(config: &Config) -> LocationResolver {
    let source: Box<dyn PositionSource> = match config.home {
        Some(home) => Box::new(FixedPosition(home)),
        None => Box::new(IpPositionSource::new()),
    };
    LocationResolver::new(Some(source))
}

async fn show(config: &Config, query: Option<LocationQuery>, json: bool) -> anyhow::Result<()> {
    let service = service(config)?;
    let mut session = Session::new();

    match query {
        Some(query) => {
            service.refresh(&mut session, &query).await;
        }
        None => {
            service.load_from_device(&mut session, &mut locator(config)).await;
        }
    }

    if let Some(kind) = session.state().error() {
        return Err(anyhow!(kind.user_message()));
    }

    let response = session
        .state()
        .displayed()
        .ok_or_else(|| anyhow!("No weather data was loaded"))?;

    if json {
        println!("{}", render::json(response)?);
    } else {
        print!("{}", render::text(response, service.formatter()));
    }

    Ok(())
}

async fn watch(config: &Config) -> anyhow::Result<()> {
    let service = service(config)?;
    let formatter = service.formatter();
    let mut session = Session::new();

    let mut current = service.load_from_device(&mut session, &mut locator(config)).await;
    report(&session, formatter);

    loop {
        let input = Text::new("Location:")
            .with_help_message("Enter to refresh, :q to quit")
            .prompt()
            .context("Failed to read location")?;
        let input = input.trim();

        if input == ":q" {
            return Ok(());
        }

        let query = if input.is_empty() {
            match &current {
                Some(query) => query.clone(),
                None => {
                    eprintln!("{}", ErrorKind::InvalidInput.user_message());
                    continue;
                }
            }
        } else {
            LocationQuery::Text(input.to_string())
        };

        service.refresh(&mut session, &query).await;
        if session.state().error().is_none() {
            current = Some(query);
        }
        report(&session, formatter);
    }
}

fn report(session: &Session, formatter: UnitFormatter) {
    match session.state().error() {
        Some(kind) => eprintln!("{}", kind.user_message()),
        None => {
            if let Some(response) = session.state().displayed() {
                print!("{}", render::text(response, formatter));
            }
        }
    }
}

fn configure() -> anyhow::Result<()> {
    let mut config = Config::load()?;

    let api_key = Password::new("API key:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .with_help_message("Leave empty to keep the current key")
        .prompt()
        .context("Failed to read API key")?;
    config.override_api_key(Some(api_key));

    let start = UnitSystem::all()
        .iter()
        .position(|u| *u == config.unit_system)
        .unwrap_or_default();
    config.unit_system = Select::new("Unit system:", UnitSystem::all().to_vec())
        .with_starting_cursor(start)
        .prompt()
        .context("Failed to read unit system")?;

    let set_home = Confirm::new("Set home coordinates for location-less lookups?")
        .with_default(config.home.is_some())
        .prompt()
        .context("Failed to read answer")?;
    config.home = if set_home {
        let latitude = CustomType::<f64>::new("Latitude:")
            .with_error_message("Please enter a decimal number")
            .prompt()
            .context("Failed to read latitude")?;
        let longitude = CustomType::<f64>::new("Longitude:")
            .with_error_message("Please enter a decimal number")
            .prompt()
            .context("Failed to read longitude")?;
        Some(Coordinates {
            latitude,
            longitude,
        })
    } else {
        None
    };

    config.save()?;
    println!("Saved configuration to {}", Config::config_file_path()?.display());

    if config.provider_settings().is_err() {
        println!("Note: no API key is stored yet; set WEATHER_API_KEY or run configure again.");
    }

    Ok(())
}
