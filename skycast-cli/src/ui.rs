//! Text rendering for the dashboard. Pure functions of the snapshots, no
//! business logic: anything missing renders as a `--` placeholder.

use std::fmt::Write as _;

use skycast_core::{
    Location, SearchSnapshot, ViewSnapshot, describe_weather_code, weather_icon,
};

pub const PLACEHOLDER: &str = "--";

/// Days of forecast shown on the dashboard.
const FORECAST_ROWS: usize = 5;

pub fn render_dashboard(view: &ViewSnapshot, favorites_count: usize, is_favorite: bool) -> String {
    if view.loading {
        return "Loading weather data...".to_string();
    }
    if let Some(error) = &view.error {
        return format!("Error: {error}");
    }

    let mut out = String::new();

    let date = view
        .forecast
        .as_ref()
        .filter(|f| !f.is_empty())
        .map(|f| f.time[0].format("%b %-d, %Y").to_string())
        .unwrap_or_else(|| PLACEHOLDER.to_string());
    let saved = if is_favorite { "★ favorited" } else { "☆ not saved" };
    let _ = writeln!(
        out,
        "{date}  [{}]  {saved} ({favorites_count} saved)",
        view.unit.symbol()
    );
    let _ = writeln!(out, "{}", view.location.name);
    let _ = writeln!(
        out,
        "{}  {}{}  {}",
        weather_icon(view.current.weathercode).glyph(),
        fmt_opt(view.current.temperature),
        view.unit.symbol(),
        describe_weather_code(view.current.weathercode)
    );
    out.push('\n');

    let _ = writeln!(out, "{FORECAST_ROWS}-DAY FORECAST");
    match &view.forecast {
        Some(forecast) if !forecast.is_empty() => {
            for i in 0..forecast.len().min(FORECAST_ROWS) {
                let label = if i == 0 {
                    "Today".to_string()
                } else {
                    forecast.time[i].format("%a").to_string()
                };
                let _ = writeln!(
                    out,
                    "  {label:<6} {}  {:>3}° / {:>3}°",
                    weather_icon(Some(forecast.weathercode[i])).glyph(),
                    forecast.temperature_min[i].floor() as i32,
                    forecast.temperature_max[i].floor() as i32,
                );
            }
        }
        _ => {
            let _ = writeln!(out, "  {PLACEHOLDER}");
        }
    }
    out.push('\n');

    let _ = writeln!(
        out,
        "Humidity {}%   Wind {} km/h   Pressure {} hPa",
        fmt_opt(view.current.humidity),
        fmt_opt(view.current.wind),
        fmt_opt(view.current.pressure)
    );

    out
}

pub fn render_suggestions(search: &SearchSnapshot) -> String {
    let mut out = String::new();
    if search.searching {
        let _ = writeln!(out, "Searching...");
    }
    if let Some(error) = &search.error {
        let _ = writeln!(out, "{error}");
    }
    for (i, candidate) in search.candidates.iter().enumerate() {
        let marker = if search.highlight == Some(i) { ">" } else { " " };
        let _ = writeln!(
            out,
            "{marker} {}  ({:.3}, {:.3})",
            candidate.name, candidate.latitude, candidate.longitude
        );
    }
    out
}

pub fn render_favorites(favorites: &[Location]) -> String {
    if favorites.is_empty() {
        return "No favorites saved yet.".to_string();
    }
    let mut out = String::new();
    for (i, fav) in favorites.iter().enumerate() {
        let _ = writeln!(out, "{}. {fav}", i + 1);
    }
    out
}

fn fmt_opt(value: Option<i32>) -> String {
    value.map_or_else(|| PLACEHOLDER.to_string(), |v| v.to_string())
}
