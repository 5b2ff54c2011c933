use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

/// One successful lookup result, as resolved by the weather service.
///
/// Built only by [`crate::WeatherClient`] after the response passed validation,
/// so `humidity_percent <= 100`, `wind_speed >= 0` and `city_name` is non-empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherData {
    pub city_name: String,
    pub country: Option<String>,
    pub temperature_celsius: f64,
    pub feels_like_celsius: f64,
    pub condition_text: String,
    pub humidity_percent: u8,
    /// Kilometres per hour.
    pub wind_speed: f64,
    /// Local wall-clock time of the reading at the resolved location.
    pub observation_time: NaiveDateTime,
    pub icon_url: Option<String>,
}

impl WeatherData {
    pub fn wind_speed_mps(&self) -> f64 {
        self.wind_speed / 3.6
    }

    /// "City" or "City, Country" when the service reported a country.
    pub fn display_location(&self) -> String {
        match &self.country {
            Some(country) if !country.is_empty() => format!("{}, {}", self.city_name, country),
            _ => self.city_name.clone(),
        }
    }
}

/// A recorded past lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub query: String,
    pub weather: WeatherData,
    pub looked_up_at: DateTime<Utc>,
}

impl HistoryEntry {
    pub fn new(query: impl Into<String>, weather: WeatherData) -> Self {
        Self {
            query: query.into(),
            weather,
            looked_up_at: Utc::now(),
        }
    }
}
