use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Tolerance (in degrees) for treating two coordinate pairs as the same
/// place. Favorites round-trip through JSON on disk, so exact float
/// equality would produce false negatives.
pub const COORD_TOLERANCE: f64 = 1e-3;

/// A named geographic point. Replaced wholesale on every selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub lat: f64,
    pub lon: f64,
    pub name: String,
}

impl Location {
    pub fn new(lat: f64, lon: f64, name: impl Into<String>) -> Self {
        Self { lat, lon, name: name.into() }
    }

    /// Coordinate identity within [`COORD_TOLERANCE`]; the display name is
    /// not part of the identity.
    pub fn same_place(&self, other: &Location) -> bool {
        self.matches_coords(other.lat, other.lon)
    }

    pub fn matches_coords(&self, lat: f64, lon: f64) -> bool {
        (self.lat - lat).abs() < COORD_TOLERANCE && (self.lon - lon).abs() < COORD_TOLERANCE
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({:.2}, {:.2})", self.name, self.lat, self.lon)
    }
}

/// Temperature unit preference, passed straight through to the weather API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TemperatureUnit {
    #[default]
    Celsius,
    Fahrenheit,
}

impl TemperatureUnit {
    /// Value of the `temperature_unit` query parameter.
    pub fn api_param(self) -> &'static str {
        match self {
            Self::Celsius => "celsius",
            Self::Fahrenheit => "fahrenheit",
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Self::Celsius => "°C",
            Self::Fahrenheit => "°F",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Self::Celsius => Self::Fahrenheit,
            Self::Fahrenheit => Self::Celsius,
        }
    }
}

/// Daily forecast series as provided by the weather API, one entry per day.
///
/// The four sequences are supposed to be the same length, but the API is
/// not trusted on that: [`ForecastData::len`] reports the shortest, and
/// renderers must index within it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ForecastData {
    pub time: Vec<NaiveDate>,
    pub temperature_min: Vec<f64>,
    pub temperature_max: Vec<f64>,
    pub weathercode: Vec<i32>,
}

impl ForecastData {
    /// Number of fully-populated days (shortest of the four series).
    pub fn len(&self) -> usize {
        self.time
            .len()
            .min(self.temperature_min.len())
            .min(self.temperature_max.len())
            .min(self.weathercode.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Instantaneous conditions. Every field is optional: `None` means
/// "not yet loaded" or "missing from the API response"; renderers show a
/// placeholder instead. Values are floored to integers for display.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CurrentData {
    pub temperature: Option<i32>,
    pub weathercode: Option<i32>,
    pub wind: Option<i32>,
    pub pressure: Option<i32>,
    pub humidity: Option<i32>,
}

/// One geocoding candidate. Transient: lives only in the suggestion list.
#[derive(Debug, Clone, PartialEq)]
pub struct GeoResult {
    pub id: String,
    /// Composed display name: `place[, admin1][, country]`.
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoResult {
    pub fn to_location(&self) -> Location {
        Location::new(self.latitude, self.longitude, self.name.clone())
    }
}
