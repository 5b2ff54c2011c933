use thiserror::Error;

/// Message shown when no API key could be resolved.
pub const MISSING_API_KEY: &str = "API key not found. Please set WEATHER_API_KEY in .env file.";

/// Everything that can go wrong during a single lookup.
///
/// Every variant is terminal for the fetch that produced it; nothing is retried.
#[derive(Debug, Error)]
pub enum WeatherError {
    #[error("{}", MISSING_API_KEY)]
    Configuration,

    #[error("query must not be empty")]
    EmptyQuery,

    #[error("failed to reach the weather service: {0}")]
    Connection(String),

    #[error("no location matches '{query}' (HTTP {status})")]
    CityNotFound {
        query: String,
        status: u16,
        message: Option<String>,
    },

    #[error("weather service responded with HTTP {status}")]
    Http { status: u16, message: Option<String> },

    #[error("response body is not valid JSON")]
    Parse(#[source] serde_json::Error),

    #[error("unexpected response shape: {0}")]
    Schema(String),
}

/// Coarse classification used by presenters for titles and banners.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Configuration,
    Input,
    Connection,
    Search,
    Http,
    Data,
}

impl ErrorKind {
    pub fn title(&self) -> &'static str {
        match self {
            ErrorKind::Configuration => "CONFIGURATION",
            ErrorKind::Input => "INPUT",
            ErrorKind::Connection => "CONNECTION",
            ErrorKind::Search => "SEARCH",
            ErrorKind::Http => "HTTP",
            ErrorKind::Data => "DATA",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.title())
    }
}

impl WeatherError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            WeatherError::Configuration => ErrorKind::Configuration,
            WeatherError::EmptyQuery => ErrorKind::Input,
            WeatherError::Connection(_) => ErrorKind::Connection,
            WeatherError::CityNotFound { .. } => ErrorKind::Search,
            WeatherError::Http { .. } => ErrorKind::Http,
            WeatherError::Parse(_) | WeatherError::Schema(_) => ErrorKind::Data,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn configuration_error_displays_setup_hint() {
        assert_eq!(WeatherError::Configuration.to_string(), MISSING_API_KEY);
    }

    #[test]
    fn kinds_are_distinct_per_taxonomy_entry() {
        let not_found = WeatherError::CityNotFound {
            query: "x".into(),
            status: 400,
            message: None,
        };
        let http = WeatherError::Http { status: 503, message: None };

        assert_eq!(not_found.kind(), ErrorKind::Search);
        assert_eq!(http.kind(), ErrorKind::Http);
        assert_eq!(WeatherError::Schema("x".into()).kind(), ErrorKind::Data);
        assert_eq!(WeatherError::Connection("timeout".into()).kind(), ErrorKind::Connection);
    }
}
