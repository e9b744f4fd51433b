use anyhow::{Result, bail};
use clap::{Parser, Subcommand};
use std::sync::Arc;

use skycast_core::{
    Config, FavoritesStore, Geocoder, Location, OpenMeteoClient, TemperatureUnit,
    WeatherViewModel,
};

use crate::{interactive, ui};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "skycast", version, about = "Terminal weather dashboard")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Interactive dashboard session (the default).
    Dashboard,

    /// One-shot dashboard for a city, or the configured default location.
    Show {
        /// City name to look up, e.g. "London".
        city: Option<String>,

        /// Fetch in Fahrenheit instead of the configured unit.
        #[arg(long)]
        fahrenheit: bool,
    },

    /// Print place candidates for a query.
    Search {
        /// Free-text place query.
        query: String,
    },

    /// Manage the saved favorites list.
    Favorites {
        #[command(subcommand)]
        command: FavoritesCommand,
    },
}

#[derive(Debug, Subcommand)]
pub enum FavoritesCommand {
    /// Print saved favorites, most recent first.
    List,

    /// Geocode a city and save the best match.
    Add { city: String },

    /// Remove a saved favorite by name.
    Remove { city: String },
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        let config = Config::load()?;
        let client = OpenMeteoClient::from_config(&config)?;

        match self.command.unwrap_or(Command::Dashboard) {
            Command::Dashboard => interactive::run(config, client).await,
            Command::Show { city, fahrenheit } => show(&config, client, city, fahrenheit).await,
            Command::Search { query } => search(&client, &query).await,
            Command::Favorites { command } => favorites(&config, &client, command).await,
        }
    }
}

async fn show(
    config: &Config,
    client: OpenMeteoClient,
    city: Option<String>,
    fahrenheit: bool,
) -> Result<()> {
    let location = match city {
        Some(city) => resolve_city(&client, &city).await?,
        None => config.default_location.clone(),
    };
    let unit = if fahrenheit { TemperatureUnit::Fahrenheit } else { config.default_unit };

    let vm = WeatherViewModel::new(Arc::new(client), location, unit);
    vm.refresh().await;

    let snapshot = vm.snapshot();
    if let Some(error) = &snapshot.error {
        bail!("{error}");
    }

    let store = FavoritesStore::open(Config::favorites_file_path()?, config.max_favorites);
    println!(
        "{}",
        ui::render_dashboard(&snapshot, store.len(), store.is_favorite(&snapshot.location))
    );
    Ok(())
}

async fn search(client: &OpenMeteoClient, query: &str) -> Result<()> {
    let results = client.search(query).await?;
    if results.is_empty() {
        println!("No matches for '{query}'.");
        return Ok(());
    }
    for candidate in results {
        println!("{}  ({:.3}, {:.3})", candidate.name, candidate.latitude, candidate.longitude);
    }
    Ok(())
}

async fn favorites(
    config: &Config,
    client: &OpenMeteoClient,
    command: FavoritesCommand,
) -> Result<()> {
    let mut store = FavoritesStore::open(Config::favorites_file_path()?, config.max_favorites);

    match command {
        FavoritesCommand::List => {
            println!("{}", ui::render_favorites(store.list()));
        }
        FavoritesCommand::Add { city } => {
            let location = resolve_city(client, &city).await?;
            let name = location.name.clone();
            if store.add(location) {
                println!("Saved {name}.");
            } else {
                println!("{name} is already a favorite.");
            }
        }
        FavoritesCommand::Remove { city } => {
            let Some(target) = find_favorite(&store, &city) else {
                bail!("No favorite matching '{city}'");
            };
            store.remove(&target);
            println!("Removed {}.", target.name);
        }
    }
    Ok(())
}

async fn resolve_city(client: &OpenMeteoClient, city: &str) -> Result<Location> {
    let mut results = client.search(city).await?;
    if results.is_empty() {
        bail!("No location found for '{city}'");
    }
    Ok(results.remove(0).to_location())
}

fn find_favorite(store: &FavoritesStore, city: &str) -> Option<Location> {
    let needle = city.to_lowercase();
    store.list().iter().find(|fav| fav.name.to_lowercase().contains(&needle)).cloned()
}
