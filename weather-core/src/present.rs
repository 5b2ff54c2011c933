//! Text shared by the console and graphical front-ends.

use chrono::Local;

use crate::{
    error::{MISSING_API_KEY, WeatherError},
    history::HistoryStore,
    model::{HistoryEntry, WeatherData},
};

pub const NO_HISTORY: &str = "No recent searches.";
pub const CONNECTION_FAILED: &str = "Failed to connect to the weather service.";
pub const EMPTY_QUERY: &str = "Please enter a city name.";
pub const INVALID_DATA: &str = "Received invalid data from the weather service.";

const OBSERVED_FORMAT: &str = "%Y-%m-%d %H:%M";

/// The fixed user-facing sentence for each failure.
pub fn error_message(err: &WeatherError) -> String {
    match err {
        WeatherError::Configuration => MISSING_API_KEY.to_string(),
        WeatherError::EmptyQuery => EMPTY_QUERY.to_string(),
        WeatherError::Connection(_) => CONNECTION_FAILED.to_string(),
        WeatherError::CityNotFound { query, .. } => format!("City '{query}' not found."),
        WeatherError::Http { status, message } => match message {
            Some(message) => {
                format!("Weather service returned an error (HTTP {status}): {message}")
            }
            None => format!("Weather service returned an error (HTTP {status})"),
        },
        WeatherError::Parse(_) => INVALID_DATA.to_string(),
        WeatherError::Schema(detail) => {
            format!("Weather data is missing expected information: {detail}")
        }
    }
}

/// Multi-line console block for one reading.
pub fn weather_report(data: &WeatherData) -> String {
    format!(
        "Weather in {} at {}:\n\
         Temperature: {:.1}°C (Feels like: {:.1}°C)\n\
         Conditions: {}\n\
         Humidity: {}%\n\
         Wind Speed: {:.1} km/h ({:.1} m/s)",
        data.display_location(),
        data.observation_time.format(OBSERVED_FORMAT),
        data.temperature_celsius,
        data.feels_like_celsius,
        data.condition_text,
        data.humidity_percent,
        data.wind_speed,
        data.wind_speed_mps(),
    )
}

/// Console rendering of a whole lookup outcome.
pub fn render(result: &Result<WeatherData, WeatherError>) -> String {
    match result {
        Ok(data) => weather_report(data),
        Err(err) => error_message(err),
    }
}

/// One numbered line of the history listing.
pub fn history_line(position: usize, entry: &HistoryEntry) -> String {
    let w = &entry.weather;
    format!(
        "{position}. {}: {:.1}°C, {} (searched \"{}\" at {})",
        w.display_location(),
        w.temperature_celsius,
        w.condition_text,
        entry.query,
        entry.looked_up_at.with_timezone(&Local).format("%H:%M:%S"),
    )
}

pub fn history_lines(store: &HistoryStore, limit: Option<usize>) -> Vec<String> {
    store
        .list(limit)
        .into_iter()
        .enumerate()
        .map(|(i, entry)| history_line(i + 1, entry))
        .collect()
}

pub fn history_report(store: &HistoryStore, limit: Option<usize>) -> String {
    if store.is_empty() {
        return NO_HISTORY.to_string();
    }

    let mut out = String::from("===== RECENT SEARCHES =====\n");
    for line in history_lines(store, limit) {
        out.push_str(&line);
        out.push('\n');
    }
    out.push_str("===========================");
    out
}

/// Pre-formatted strings for the graphical display region.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherCard {
    pub title: String,
    pub observed: String,
    pub condition: String,
    pub temperature: String,
    pub feels_like: String,
    pub humidity: String,
    pub wind: String,
    pub icon_url: Option<String>,
}

impl From<&WeatherData> for WeatherCard {
    fn from(data: &WeatherData) -> Self {
        Self {
            title: data.display_location(),
            observed: format!("As of {}", data.observation_time.format(OBSERVED_FORMAT)),
            condition: data.condition_text.clone(),
            temperature: format!("{:.1}°C", data.temperature_celsius),
            feels_like: format!("{:.1}°C", data.feels_like_celsius),
            humidity: format!("{}%", data.humidity_percent),
            wind: format!("{:.1} km/h ({:.1} m/s)", data.wind_speed, data.wind_speed_mps()),
            icon_url: data.icon_url.clone(),
        }
    }
}
