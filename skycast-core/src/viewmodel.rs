//! Fetch orchestration for the dashboard.
//!
//! Owns the selected location, the unit preference and the
//! loading/error/result state around a [`ForecastProvider`]. Fetches are
//! guarded by a sequence number the same way search lookups are: only the
//! most recently issued fetch may commit its result, so a slow reply for an
//! old location can never overwrite a newer one.

use std::sync::{Arc, Mutex};
use tracing::warn;

use crate::model::{CurrentData, ForecastData, Location, TemperatureUnit};
use crate::provider::{ForecastProvider, WeatherSnapshot};

/// Read-only view of the dashboard state for rendering.
#[derive(Debug, Clone)]
pub struct ViewSnapshot {
    pub location: Location,
    pub unit: TemperatureUnit,
    pub loading: bool,
    pub error: Option<String>,
    pub forecast: Option<ForecastData>,
    pub current: CurrentData,
}

#[derive(Debug)]
struct State {
    location: Location,
    unit: TemperatureUnit,
    loading: bool,
    error: Option<String>,
    forecast: Option<ForecastData>,
    current: CurrentData,
    fetch_seq: u64,
}

#[derive(Debug)]
pub struct WeatherViewModel {
    provider: Arc<dyn ForecastProvider>,
    state: Mutex<State>,
}

impl WeatherViewModel {
    pub fn new(
        provider: Arc<dyn ForecastProvider>,
        initial_location: Location,
        unit: TemperatureUnit,
    ) -> Self {
        Self {
            provider,
            state: Mutex::new(State {
                location: initial_location,
                unit,
                loading: false,
                error: None,
                forecast: None,
                current: CurrentData::default(),
                fetch_seq: 0,
            }),
        }
    }

    pub fn snapshot(&self) -> ViewSnapshot {
        let st = self.state.lock().unwrap();
        ViewSnapshot {
            location: st.location.clone(),
            unit: st.unit,
            loading: st.loading,
            error: st.error.clone(),
            forecast: st.forecast.clone(),
            current: st.current,
        }
    }

    /// Re-fetch for the currently selected location and unit. Used for the
    /// initial load and for explicit refreshes.
    pub async fn refresh(&self) {
        self.fetch().await;
    }

    /// Switch to a new location (from search or favorites) and fetch it.
    pub async fn set_location(&self, location: Location) {
        {
            let mut st = self.state.lock().unwrap();
            st.location = location;
        }
        self.fetch().await;
    }

    /// Flip the temperature unit and re-fetch the same location in it.
    /// Returns the unit now in effect.
    pub async fn toggle_unit(&self) -> TemperatureUnit {
        let unit = {
            let mut st = self.state.lock().unwrap();
            st.unit = st.unit.toggled();
            st.unit
        };
        self.fetch().await;
        unit
    }

    /// Set an explicit unit and re-fetch if it changed.
    pub async fn set_unit(&self, unit: TemperatureUnit) {
        let changed = {
            let mut st = self.state.lock().unwrap();
            let changed = st.unit != unit;
            st.unit = unit;
            changed
        };
        if changed {
            self.fetch().await;
        }
    }

    async fn fetch(&self) {
        let (seq, lat, lon, unit) = {
            let mut st = self.state.lock().unwrap();
            st.fetch_seq += 1;
            st.loading = true;
            st.error = None;
            (st.fetch_seq, st.location.lat, st.location.lon, st.unit)
        };

        let outcome = self.provider.fetch(lat, lon, unit).await;

        let mut st = self.state.lock().unwrap();
        if st.fetch_seq != seq {
            // A newer fetch owns the state now; this reply is stale.
            return;
        }
        // Cleared on success and failure alike.
        st.loading = false;
        match outcome {
            Ok(WeatherSnapshot { forecast, current }) => {
                st.forecast = Some(forecast);
                st.current = current;
            }
            Err(e) => {
                warn!("weather fetch failed: {e}");
                st.error = Some("Failed to load weather data".to_string());
            }
        }
    }
}
