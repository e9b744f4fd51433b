//! Core library for the `skycast` weather dashboard.
//!
//! This crate defines:
//! - Configuration handling
//! - HTTP clients for the forecast and geocoding services
//! - The debounced search controller and the weather view model
//! - The persisted favorites store
//! - Shared domain models (locations, forecasts, units)
//!
//! It is used by `skycast-cli`, but can also be reused by other front ends.

pub mod codes;
pub mod config;
pub mod favorites;
pub mod model;
pub mod provider;
pub mod search;
pub mod viewmodel;

pub use codes::{WeatherIcon, describe_weather_code, weather_icon};
pub use config::Config;
pub use favorites::FavoritesStore;
pub use model::{COORD_TOLERANCE, CurrentData, ForecastData, GeoResult, Location, TemperatureUnit};
pub use provider::open_meteo::OpenMeteoClient;
pub use provider::{ForecastProvider, GeocodeError, Geocoder, WeatherError, WeatherSnapshot};
pub use search::{MIN_QUERY_CHARS, SearchController, SearchKey, SearchSnapshot};
pub use viewmodel::{ViewSnapshot, WeatherViewModel};
