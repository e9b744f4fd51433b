//! Open-Meteo HTTP clients: one endpoint for forecasts, one for geocoding.
//! Both are keyless public APIs returning plain JSON.

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

use crate::{
    config::Config,
    model::{CurrentData, ForecastData, GeoResult, TemperatureUnit},
    provider::{ForecastProvider, GeocodeError, Geocoder, WeatherError, WeatherSnapshot},
};

const MPS_TO_KMH: f64 = 3.6;

#[derive(Debug, Clone)]
pub struct OpenMeteoClient {
    http: Client,
    weather_base: String,
    geocoding_base: String,
    forecast_days: u8,
    max_suggestions: usize,
}

impl OpenMeteoClient {
    /// Build a client from configuration, with the configured HTTP timeout.
    pub fn from_config(config: &Config) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.http_timeout_secs))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            http,
            weather_base: config.weather_base_url.clone(),
            geocoding_base: config.geocoding_base_url.clone(),
            forecast_days: config.forecast_days,
            max_suggestions: config.max_suggestions,
        })
    }

    /// Client against explicit base URLs (used by tests with a local server).
    pub fn with_bases(weather_base: impl Into<String>, geocoding_base: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            weather_base: weather_base.into(),
            geocoding_base: geocoding_base.into(),
            forecast_days: 5,
            max_suggestions: 5,
        }
    }

    fn validate_coordinates(lat: f64, lon: f64) -> Result<(), WeatherError> {
        if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lon) {
            return Err(WeatherError::InvalidCoordinates);
        }
        Ok(())
    }
}

#[async_trait]
impl ForecastProvider for OpenMeteoClient {
    async fn fetch(
        &self,
        lat: f64,
        lon: f64,
        unit: TemperatureUnit,
    ) -> Result<WeatherSnapshot, WeatherError> {
        Self::validate_coordinates(lat, lon)?;

        let url = format!("{}/forecast", self.weather_base);
        debug!(%url, lat, lon, unit = unit.api_param(), "fetching forecast");

        let res = self
            .http
            .get(&url)
            .query(&[
                ("latitude", lat.to_string()),
                ("longitude", lon.to_string()),
                ("daily", "temperature_2m_max,temperature_2m_min,weathercode".to_string()),
                ("current_weather", "true".to_string()),
                ("hourly", "surface_pressure,relativehumidity_2m,windspeed_10m".to_string()),
                ("timezone", "auto".to_string()),
                ("forecast_days", self.forecast_days.to_string()),
                ("temperature_unit", unit.api_param().to_string()),
            ])
            .send()
            .await
            .map_err(|e| WeatherError::RequestFailed(e.to_string()))?;

        let status = res.status();
        let body = res
            .text()
            .await
            .map_err(|e| WeatherError::RequestFailed(e.to_string()))?;

        if !status.is_success() {
            return Err(WeatherError::BadStatus {
                status: status.as_u16(),
                body: truncate_body(&body),
            });
        }

        let parsed: ForecastResponse =
            serde_json::from_str(&body).map_err(|e| WeatherError::Parse(e.to_string()))?;

        Ok(normalize(parsed))
    }
}

#[async_trait]
impl Geocoder for OpenMeteoClient {
    async fn search(&self, query: &str) -> Result<Vec<GeoResult>, GeocodeError> {
        let url = format!("{}/search", self.geocoding_base);
        debug!(%url, query, "searching places");

        let res = self
            .http
            .get(&url)
            .query(&[
                ("name", query.to_string()),
                ("count", self.max_suggestions.to_string()),
                ("language", "en".to_string()),
                ("format", "json".to_string()),
            ])
            .send()
            .await
            .map_err(|e| GeocodeError::RequestFailed(e.to_string()))?;

        let status = res.status();
        let body = res
            .text()
            .await
            .map_err(|e| GeocodeError::RequestFailed(e.to_string()))?;

        if !status.is_success() {
            return Err(GeocodeError::BadStatus {
                status: status.as_u16(),
                body: truncate_body(&body),
            });
        }

        let parsed: GeocodingResponse =
            serde_json::from_str(&body).map_err(|e| GeocodeError::Parse(e.to_string()))?;

        Ok(parsed.results.into_iter().map(GeoRecord::into_result).collect())
    }
}

#[derive(Debug, Default, Deserialize)]
struct ForecastResponse {
    #[serde(default)]
    daily: DailyBlock,
    current_weather: Option<CurrentWeatherBlock>,
    #[serde(default)]
    hourly: HourlyBlock,
}

#[derive(Debug, Default, Deserialize)]
struct DailyBlock {
    #[serde(default)]
    time: Vec<String>,
    #[serde(default)]
    temperature_2m_max: Vec<f64>,
    #[serde(default)]
    temperature_2m_min: Vec<f64>,
    #[serde(default)]
    weathercode: Vec<i32>,
}

#[derive(Debug, Default, Deserialize)]
struct CurrentWeatherBlock {
    temperature: Option<f64>,
    windspeed: Option<f64>,
    weathercode: Option<i32>,
    time: Option<String>,
    // Not part of the documented current_weather block, but some deployments
    // inline them; preferred over the hourly fallback when present.
    surface_pressure: Option<f64>,
    relativehumidity_2m: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
struct HourlyBlock {
    #[serde(default)]
    time: Vec<String>,
    #[serde(default)]
    surface_pressure: Vec<f64>,
    #[serde(default)]
    relativehumidity_2m: Vec<f64>,
    #[serde(default)]
    windspeed_10m: Vec<f64>,
}

#[derive(Debug, Deserialize)]
struct GeocodingResponse {
    #[serde(default)]
    results: Vec<GeoRecord>,
}

#[derive(Debug, Deserialize)]
struct GeoRecord {
    id: Option<i64>,
    name: String,
    latitude: f64,
    longitude: f64,
    country: Option<String>,
    admin1: Option<String>,
}

impl GeoRecord {
    /// Display name is `place[, admin1][, country]`, skipping absent parts.
    fn into_result(self) -> GeoResult {
        let id = self
            .id
            .map(|i| i.to_string())
            .unwrap_or_else(|| format!("{}-{}-{}", self.latitude, self.longitude, self.name));

        let mut name = self.name;
        for part in [&self.admin1, &self.country] {
            if let Some(part) = part
                && !part.is_empty()
            {
                name.push_str(", ");
                name.push_str(part);
            }
        }

        GeoResult { id, name, latitude: self.latitude, longitude: self.longitude }
    }
}

fn normalize(resp: ForecastResponse) -> WeatherSnapshot {
    WeatherSnapshot {
        forecast: normalize_daily(resp.daily),
        current: normalize_current(resp.current_weather.as_ref(), &resp.hourly),
    }
}

fn normalize_daily(daily: DailyBlock) -> ForecastData {
    let mut time = Vec::with_capacity(daily.time.len());
    for raw in &daily.time {
        // A malformed date truncates the series instead of failing the fetch.
        match NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
            Ok(date) => time.push(date),
            Err(_) => break,
        }
    }

    ForecastData {
        time,
        temperature_min: daily.temperature_2m_min,
        temperature_max: daily.temperature_2m_max,
        weathercode: daily.weathercode,
    }
}

fn normalize_current(cw: Option<&CurrentWeatherBlock>, hourly: &HourlyBlock) -> CurrentData {
    let Some(cw) = cw else {
        return CurrentData::default();
    };

    let idx = hourly_index(hourly, cw.time.as_deref());

    let pressure = cw
        .surface_pressure
        .or_else(|| idx.and_then(|i| hourly.surface_pressure.get(i).copied()));
    let humidity = cw
        .relativehumidity_2m
        .or_else(|| idx.and_then(|i| hourly.relativehumidity_2m.get(i).copied()));
    // current_weather reports wind in km/h; the hourly series is m/s.
    let wind = cw
        .windspeed
        .or_else(|| idx.and_then(|i| hourly.windspeed_10m.get(i).copied().map(|v| v * MPS_TO_KMH)));

    CurrentData {
        temperature: cw.temperature.map(floor_i32),
        weathercode: cw.weathercode,
        wind: wind.map(floor_i32),
        pressure: pressure.map(floor_i32),
        humidity: humidity.map(floor_i32),
    }
}

/// Index into the hourly series matching the current-weather timestamp.
/// No exact match falls back to the first entry; an empty series to `None`.
fn hourly_index(hourly: &HourlyBlock, current_time: Option<&str>) -> Option<usize> {
    if hourly.time.is_empty() {
        return None;
    }
    current_time
        .and_then(|t| hourly.time.iter().position(|h| h == t))
        .or(Some(0))
}

fn floor_i32(v: f64) -> i32 {
    v.floor() as i32
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() > MAX {
        format!("{}...", &body[..MAX])
    } else {
        body.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn sample_response() -> ForecastResponse {
        serde_json::from_str(SAMPLE_JSON).unwrap()
    }

    const SAMPLE_JSON: &str = r#"{
        "daily": {
            "time": ["2025-06-01", "2025-06-02", "2025-06-03", "2025-06-04", "2025-06-05"],
            "temperature_2m_max": [21.4, 19.9, 18.2, 22.0, 23.7],
            "temperature_2m_min": [12.1, 11.5, 10.8, 13.0, 14.2],
            "weathercode": [0, 2, 61, 3, 95]
        },
        "current_weather": {
            "temperature": 17.6,
            "windspeed": 11.9,
            "weathercode": 2,
            "time": "2025-06-01T14:00"
        },
        "hourly": {
            "time": ["2025-06-01T13:00", "2025-06-01T14:00", "2025-06-01T15:00"],
            "surface_pressure": [1011.2, 1012.7, 1013.1],
            "relativehumidity_2m": [52.0, 48.4, 47.0],
            "windspeed_10m": [3.0, 3.5, 4.0]
        }
    }"#;

    #[test]
    fn normalize_floors_current_values() {
        let snapshot = normalize(sample_response());
        assert_eq!(snapshot.current.temperature, Some(17));
        assert_eq!(snapshot.current.wind, Some(11));
        assert_eq!(snapshot.current.weathercode, Some(2));
    }

    #[test]
    fn pressure_and_humidity_recovered_from_matching_hour() {
        let snapshot = normalize(sample_response());
        // 14:00 is index 1 in the hourly series.
        assert_eq!(snapshot.current.pressure, Some(1012));
        assert_eq!(snapshot.current.humidity, Some(48));
    }

    #[test]
    fn unmatched_timestamp_falls_back_to_first_hour() {
        let mut resp = sample_response();
        resp.current_weather.as_mut().unwrap().time = Some("2025-06-01T14:23".to_string());
        let snapshot = normalize(resp);
        assert_eq!(snapshot.current.pressure, Some(1011));
        assert_eq!(snapshot.current.humidity, Some(52));
    }

    #[test]
    fn inline_pressure_wins_over_hourly() {
        let mut resp = sample_response();
        resp.current_weather.as_mut().unwrap().surface_pressure = Some(999.9);
        let snapshot = normalize(resp);
        assert_eq!(snapshot.current.pressure, Some(999));
    }

    #[test]
    fn empty_hourly_leaves_fields_unset() {
        let mut resp = sample_response();
        resp.hourly = HourlyBlock::default();
        let snapshot = normalize(resp);
        assert_eq!(snapshot.current.pressure, None);
        assert_eq!(snapshot.current.humidity, None);
        // Wind still comes straight from current_weather.
        assert_eq!(snapshot.current.wind, Some(11));
    }

    #[test]
    fn missing_current_wind_converts_hourly_mps() {
        let mut resp = sample_response();
        resp.current_weather.as_mut().unwrap().windspeed = None;
        let snapshot = normalize(resp);
        // 3.5 m/s at the matching hour -> 12.6 km/h, floored.
        assert_eq!(snapshot.current.wind, Some(12));
    }

    #[test]
    fn missing_current_weather_yields_placeholders() {
        let mut resp = sample_response();
        resp.current_weather = None;
        let snapshot = normalize(resp);
        assert_eq!(snapshot.current, CurrentData::default());
    }

    #[test]
    fn ragged_daily_arrays_truncate() {
        let mut resp = sample_response();
        resp.daily.temperature_2m_max.truncate(3);
        let snapshot = normalize(resp);
        assert_eq!(snapshot.forecast.len(), 3);
    }

    #[test]
    fn malformed_date_truncates_series() {
        let mut resp = sample_response();
        resp.daily.time[2] = "not-a-date".to_string();
        let snapshot = normalize(resp);
        assert_eq!(snapshot.forecast.len(), 2);
    }

    #[test]
    fn geo_record_display_name_composition() {
        let full = GeoRecord {
            id: Some(2643743),
            name: "London".to_string(),
            latitude: 51.51,
            longitude: -0.13,
            country: Some("UK".to_string()),
            admin1: Some("England".to_string()),
        };
        assert_eq!(full.into_result().name, "London, England, UK");

        let bare = GeoRecord {
            id: None,
            name: "Atlantis".to_string(),
            latitude: 0.0,
            longitude: 0.0,
            country: None,
            admin1: None,
        };
        let result = bare.into_result();
        assert_eq!(result.name, "Atlantis");
        assert_eq!(result.id, "0-0-Atlantis");
    }

    #[tokio::test]
    async fn fetch_parses_live_style_payload() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/forecast"))
            .and(query_param("temperature_unit", "fahrenheit"))
            .and(query_param("timezone", "auto"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(SAMPLE_JSON, "application/json"))
            .mount(&server)
            .await;

        let client = OpenMeteoClient::with_bases(server.uri(), server.uri());
        let snapshot = client.fetch(60.17, 24.94, TemperatureUnit::Fahrenheit).await.unwrap();
        assert_eq!(snapshot.forecast.len(), 5);
        assert_eq!(snapshot.current.temperature, Some(17));
    }

    #[tokio::test]
    async fn fetch_surfaces_http_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/forecast"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let client = OpenMeteoClient::with_bases(server.uri(), server.uri());
        let err = client.fetch(60.17, 24.94, TemperatureUnit::Celsius).await.unwrap_err();
        match err {
            WeatherError::BadStatus { status, body } => {
                assert_eq!(status, 500);
                assert_eq!(body, "boom");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn fetch_rejects_bad_coordinates_without_network() {
        let client = OpenMeteoClient::with_bases("http://127.0.0.1:1", "http://127.0.0.1:1");
        let err = client.fetch(91.0, 0.0, TemperatureUnit::Celsius).await.unwrap_err();
        assert!(matches!(err, WeatherError::InvalidCoordinates));
    }

    #[tokio::test]
    async fn search_maps_candidates_in_order() {
        let server = MockServer::start().await;
        let body = r#"{"results": [
            {"id": 2643743, "name": "London", "latitude": 51.51, "longitude": -0.13, "country": "UK", "admin1": "England"},
            {"name": "London", "latitude": 42.98, "longitude": -81.25, "country": "Canada", "admin1": "Ontario"}
        ]}"#;
        Mock::given(method("GET"))
            .and(path("/search"))
            .and(query_param("name", "Lon"))
            .and(query_param("count", "5"))
            .and(query_param("language", "en"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(body, "application/json"))
            .mount(&server)
            .await;

        let client = OpenMeteoClient::with_bases(server.uri(), server.uri());
        let results = client.search("Lon").await.unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].name, "London, England, UK");
        assert_eq!(results[1].name, "London, Ontario, Canada");
    }

    #[tokio::test]
    async fn search_tolerates_missing_results_key() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search"))
            .respond_with(ResponseTemplate::new(200).set_body_raw("{}", "application/json"))
            .mount(&server)
            .await;

        let client = OpenMeteoClient::with_bases(server.uri(), server.uri());
        let results = client.search("nowhere").await.unwrap();
        assert!(results.is_empty());
    }
}
