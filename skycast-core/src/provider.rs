use async_trait::async_trait;
use std::fmt::Debug;
use thiserror::Error;

use crate::model::{CurrentData, ForecastData, GeoResult, TemperatureUnit};

pub mod open_meteo;

/// Everything one forecast fetch produces: the daily series plus the
/// instantaneous conditions. Recomputed wholesale per fetch, never patched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WeatherSnapshot {
    pub forecast: ForecastData,
    pub current: CurrentData,
}

/// Weather fetch errors.
#[derive(Debug, Error)]
pub enum WeatherError {
    #[error("Invalid coordinates: latitude must be -90 to 90, longitude must be -180 to 180")]
    InvalidCoordinates,

    #[error("Weather request failed: {0}")]
    RequestFailed(String),

    #[error("Weather request failed with status {status}: {body}")]
    BadStatus { status: u16, body: String },

    #[error("Failed to parse weather response: {0}")]
    Parse(String),
}

/// Geocoding errors.
#[derive(Debug, Error)]
pub enum GeocodeError {
    #[error("Geocoding request failed: {0}")]
    RequestFailed(String),

    #[error("Geocoding request failed with status {status}: {body}")]
    BadStatus { status: u16, body: String },

    #[error("Failed to parse geocoding response: {0}")]
    Parse(String),
}

/// Fetches current conditions plus a multi-day forecast for a coordinate
/// pair in the requested unit system.
#[async_trait]
pub trait ForecastProvider: Send + Sync + Debug {
    async fn fetch(
        &self,
        lat: f64,
        lon: f64,
        unit: TemperatureUnit,
    ) -> Result<WeatherSnapshot, WeatherError>;
}

/// Resolves a free-text query to a ranked list of place candidates.
#[async_trait]
pub trait Geocoder: Send + Sync + Debug {
    async fn search(&self, query: &str) -> Result<Vec<GeoResult>, GeocodeError>;
}
