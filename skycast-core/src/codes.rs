//! WMO weather-code mapping.
//!
//! The weather API reports sky/precipitation conditions as a small integer
//! code. Both functions here are total: any code, including `None` for
//! "not loaded", maps to a fallback rather than panicking.
//! See: <https://open-meteo.com/en/docs#weathervariables>

/// Icon category for a weather code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeatherIcon {
    Sun,
    CloudSun,
    Cloud,
    CloudRain,
}

impl WeatherIcon {
    pub fn name(self) -> &'static str {
        match self {
            Self::Sun => "sun",
            Self::CloudSun => "cloud-sun",
            Self::Cloud => "cloud",
            Self::CloudRain => "cloud-rain",
        }
    }

    /// Terminal glyph for the icon.
    pub fn glyph(self) -> &'static str {
        match self {
            Self::Sun => "☀",
            Self::CloudSun => "⛅",
            Self::Cloud => "☁",
            Self::CloudRain => "🌧",
        }
    }
}

/// Human-readable condition for a weather code.
pub fn describe_weather_code(code: Option<i32>) -> &'static str {
    let Some(code) = code else {
        return "Unknown";
    };
    match code {
        0 => "Clear sky",
        1 => "Mainly clear",
        2 => "Partly cloudy",
        3 => "Overcast",
        45..=48 => "Fog",
        51..=57 => "Drizzle",
        61..=67 => "Rain",
        71..=77 => "Snow",
        80..=82 => "Showers",
        c if c >= 95 => "Thunderstorm",
        _ => "Unknown",
    }
}

/// Icon category for a weather code. Unmatched codes fall back to [`WeatherIcon::Sun`].
pub fn weather_icon(code: Option<i32>) -> WeatherIcon {
    let Some(code) = code else {
        return WeatherIcon::Sun;
    };
    match code {
        0 | 1 => WeatherIcon::Sun,
        2 => WeatherIcon::CloudSun,
        3 | 45..=48 => WeatherIcon::Cloud,
        51..=67 | 80..=99 => WeatherIcon::CloudRain,
        _ => WeatherIcon::Sun,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn total_over_full_code_range() {
        // Neither function may panic for any plausible code.
        for code in -5..=150 {
            let _ = describe_weather_code(Some(code));
            let _ = weather_icon(Some(code));
        }
        assert_eq!(describe_weather_code(None), "Unknown");
        assert_eq!(weather_icon(None), WeatherIcon::Sun);
    }

    #[test]
    fn clear_and_cloud_descriptions() {
        assert_eq!(describe_weather_code(Some(0)), "Clear sky");
        assert_eq!(describe_weather_code(Some(1)), "Mainly clear");
        assert_eq!(describe_weather_code(Some(2)), "Partly cloudy");
        assert_eq!(describe_weather_code(Some(3)), "Overcast");
    }

    #[test]
    fn fog_range() {
        for code in 45..=48 {
            assert_eq!(describe_weather_code(Some(code)), "Fog");
            assert_eq!(weather_icon(Some(code)), WeatherIcon::Cloud);
        }
    }

    #[test]
    fn precipitation_ranges() {
        for code in 51..=57 {
            assert_eq!(describe_weather_code(Some(code)), "Drizzle");
        }
        for code in 61..=67 {
            assert_eq!(describe_weather_code(Some(code)), "Rain");
        }
        for code in 51..=67 {
            assert_eq!(weather_icon(Some(code)), WeatherIcon::CloudRain);
        }
        for code in 71..=77 {
            assert_eq!(describe_weather_code(Some(code)), "Snow");
        }
        for code in 80..=82 {
            assert_eq!(describe_weather_code(Some(code)), "Showers");
        }
        for code in 80..=99 {
            assert_eq!(weather_icon(Some(code)), WeatherIcon::CloudRain);
        }
    }

    #[test]
    fn thunderstorm_is_open_ended() {
        assert_eq!(describe_weather_code(Some(95)), "Thunderstorm");
        assert_eq!(describe_weather_code(Some(99)), "Thunderstorm");
        assert_eq!(describe_weather_code(Some(120)), "Thunderstorm");
    }

    #[test]
    fn gap_codes_fall_back() {
        // 4..=44 and 83..=94 are unused by the provider.
        assert_eq!(describe_weather_code(Some(10)), "Unknown");
        assert_eq!(describe_weather_code(Some(85)), "Unknown");
        assert_eq!(weather_icon(Some(10)), WeatherIcon::Sun);
        assert_eq!(weather_icon(Some(85)), WeatherIcon::CloudRain);
    }

    #[test]
    fn icon_names_and_glyphs() {
        assert_eq!(WeatherIcon::Sun.name(), "sun");
        assert_eq!(WeatherIcon::CloudRain.name(), "cloud-rain");
        assert!(!WeatherIcon::CloudSun.glyph().is_empty());
    }
}
