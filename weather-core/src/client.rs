use chrono::NaiveDateTime;
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::{
    config::ClientConfig,
    error::WeatherError,
    model::WeatherData,
    transport::{HttpResponse, ReqwestTransport, Transport},
};

/// Format of `location.localtime`, e.g. `2024-01-01 12:00`.
pub const LOCALTIME_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Client for the provider's "current weather" endpoint.
#[derive(Debug, Clone)]
pub struct WeatherClient {
    config: ClientConfig,
    transport: Arc<dyn Transport>,
}

impl WeatherClient {
    pub fn new(config: ClientConfig) -> Result<Self, WeatherError> {
        let transport =
            ReqwestTransport::new(config.timeout()).map_err(|err| WeatherError::Connection(err.0))?;

        Ok(Self::with_transport(config, Arc::new(transport)))
    }

    pub fn with_transport(config: ClientConfig, transport: Arc<dyn Transport>) -> Self {
        Self { config, transport }
    }

    /// Look up current conditions for `query` ("City" or "City,CountryCode").
    ///
    /// Issues exactly one request; every failure is returned as-is, never retried.
    pub async fn fetch(&self, query: &str) -> Result<WeatherData, WeatherError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(WeatherError::EmptyQuery);
        }

        debug!(query, url = self.config.base_url(), "requesting current weather");

        let res = self
            .transport
            .get(
                self.config.base_url(),
                &[("key", self.config.api_key()), ("q", query)],
            )
            .await
            .map_err(|err| {
                warn!(query, error = %err, "weather service unreachable");
                WeatherError::Connection(err.0)
            })?;

        if !res.is_success() {
            let err = status_error(query, &res);
            warn!(query, status = res.status, "weather service rejected lookup");
            return Err(err);
        }

        let data = parse_current(&res.body).inspect_err(|err| {
            warn!(query, error = %err, "weather response failed validation");
        })?;

        info!(query, city = %data.city_name, "weather lookup succeeded");
        Ok(data)
    }

    /// Download the condition icon. Any failure is logged and reported as `None`.
    pub async fn fetch_icon(&self, icon_url: &str) -> Option<Vec<u8>> {
        let url = resolve_icon_url(icon_url)?;

        match self.transport.get_bytes(&url).await {
            Ok(res) if res.is_success() && !res.body.is_empty() => Some(res.body),
            Ok(res) => {
                warn!(%url, status = res.status, "icon request returned no image");
                None
            }
            Err(err) => {
                warn!(%url, error = %err, "icon request failed");
                None
            }
        }
    }
}

/// Turn the provider's protocol-relative icon path into a fetchable URL.
pub fn resolve_icon_url(icon_url: &str) -> Option<String> {
    let icon_url = icon_url.trim();
    if icon_url.is_empty() {
        None
    } else if icon_url.starts_with("//") {
        Some(format!("https:{icon_url}"))
    } else {
        Some(icon_url.to_string())
    }
}

fn status_error(query: &str, res: &HttpResponse) -> WeatherError {
    let message = serde_json::from_slice::<WaErrorBody>(&res.body)
        .ok()
        .map(|body| body.error.message);

    match res.status {
        400 | 404 => WeatherError::CityNotFound {
            query: query.to_string(),
            status: res.status,
            message,
        },
        status => WeatherError::Http { status, message },
    }
}

/// Validate a "current weather" body and build the record.
pub fn parse_current(body: &[u8]) -> Result<WeatherData, WeatherError> {
    let value: serde_json::Value = serde_json::from_slice(body).map_err(WeatherError::Parse)?;

    let parsed: WaResponse =
        serde_json::from_value(value).map_err(|err| WeatherError::Schema(err.to_string()))?;

    let city_name = parsed.location.name.trim().to_string();
    if city_name.is_empty() {
        return Err(WeatherError::Schema("location.name is empty".to_string()));
    }

    let humidity_percent = u8::try_from(parsed.current.humidity)
        .ok()
        .filter(|h| *h <= 100)
        .ok_or_else(|| {
            WeatherError::Schema(format!(
                "current.humidity out of range: {}",
                parsed.current.humidity
            ))
        })?;

    let wind_speed = parsed.current.wind_kph;
    if !wind_speed.is_finite() || wind_speed < 0.0 {
        return Err(WeatherError::Schema(format!(
            "current.wind_kph out of range: {wind_speed}"
        )));
    }

    let observation_time =
        NaiveDateTime::parse_from_str(parsed.location.localtime.trim(), LOCALTIME_FORMAT)
            .map_err(|err| {
                WeatherError::Schema(format!(
                    "location.localtime '{}' is not a valid time: {err}",
                    parsed.location.localtime
                ))
            })?;

    Ok(WeatherData {
        city_name,
        country: parsed.location.country.filter(|c| !c.is_empty()),
        temperature_celsius: parsed.current.temp_c,
        feels_like_celsius: parsed.current.feelslike_c,
        condition_text: parsed.current.condition.text,
        humidity_percent,
        wind_speed,
        observation_time,
        icon_url: parsed.current.condition.icon.filter(|i| !i.is_empty()),
    })
}

#[derive(Debug, Deserialize)]
struct WaLocation {
    name: String,
    country: Option<String>,
    localtime: String,
}

#[derive(Debug, Deserialize)]
struct WaCondition {
    text: String,
    icon: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WaCurrent {
    temp_c: f64,
    feelslike_c: f64,
    humidity: i64,
    wind_kph: f64,
    condition: WaCondition,
}

#[derive(Debug, Deserialize)]
struct WaResponse {
    location: WaLocation,
    current: WaCurrent,
}

#[derive(Debug, Deserialize)]
struct WaErrorDetail {
    message: String,
}

#[derive(Debug, Deserialize)]
struct WaErrorBody {
    error: WaErrorDetail,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::scripted::ScriptedTransport;
    use serde_json::json;

    const LONDON: &str = r#"{"location":{"name":"London","localtime":"2024-01-01 12:00"},"current":{"temp_c":5.0,"feelslike_c":2.0,"condition":{"text":"Cloudy","icon":"//x/64.png"},"humidity":80,"wind_kph":15.0}}"#;

    fn client(transport: &ScriptedTransport) -> WeatherClient {
        let config = ClientConfig::new("TEST_KEY").expect("valid key");
        WeatherClient::with_transport(config, Arc::new(transport.clone()))
    }

    fn london_payload() -> serde_json::Value {
        serde_json::from_str(LONDON).expect("fixture is valid JSON")
    }

    fn remove(value: &mut serde_json::Value, path: &[&str]) {
        let (last, parents) = path.split_last().expect("non-empty path");
        let mut node = value;
        for key in parents {
            node = node.get_mut(*key).expect("fixture path exists");
        }
        node.as_object_mut().expect("object").remove(*last);
    }

    #[tokio::test]
    async fn london_maps_field_by_field() {
        let transport = ScriptedTransport::new().reply(200, LONDON);
        let data = client(&transport).fetch("London").await.expect("valid payload");

        assert_eq!(
            data,
            WeatherData {
                city_name: "London".into(),
                country: None,
                temperature_celsius: 5.0,
                feels_like_celsius: 2.0,
                condition_text: "Cloudy".into(),
                humidity_percent: 80,
                wind_speed: 15.0,
                observation_time: NaiveDateTime::parse_from_str("2024-01-01 12:00", LOCALTIME_FORMAT)
                    .unwrap(),
                icon_url: Some("//x/64.png".into()),
            }
        );
    }

    #[tokio::test]
    async fn sends_key_and_query_to_configured_endpoint() {
        let transport = ScriptedTransport::new().reply(200, LONDON);
        client(&transport).fetch("  Paris,FR ").await.expect("valid payload");

        let calls = transport.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].url, crate::config::DEFAULT_BASE_URL);
        assert_eq!(
            calls[0].query,
            vec![
                ("key".to_string(), "TEST_KEY".to_string()),
                ("q".to_string(), "Paris,FR".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn empty_query_never_hits_the_network() {
        let transport = ScriptedTransport::new();
        let err = client(&transport).fetch("   ").await.unwrap_err();

        assert!(matches!(err, WeatherError::EmptyQuery));
        assert!(transport.calls().is_empty());
    }

    #[tokio::test]
    async fn missing_required_fields_are_schema_errors() {
        let required: [&[&str]; 5] = [
            &["location", "name"],
            &["current", "temp_c"],
            &["current", "condition", "text"],
            &["current", "humidity"],
            &["current", "wind_kph"],
        ];

        for path in required {
            let mut payload = london_payload();
            remove(&mut payload, path);

            let transport = ScriptedTransport::new().reply(200, payload.to_string());
            let err = client(&transport).fetch("London").await.unwrap_err();

            assert!(
                matches!(err, WeatherError::Schema(_)),
                "removing {path:?} gave {err:?}"
            );
        }
    }

    #[test]
    fn missing_icon_is_not_an_error() {
        let mut payload = london_payload();
        remove(&mut payload, &["current", "condition", "icon"]);

        let data = parse_current(payload.to_string().as_bytes()).expect("icon is optional");
        assert_eq!(data.icon_url, None);
    }

    #[test]
    fn country_is_carried_when_present() {
        let mut payload = london_payload();
        payload["location"]["country"] = json!("United Kingdom");

        let data = parse_current(payload.to_string().as_bytes()).expect("valid payload");
        assert_eq!(data.country.as_deref(), Some("United Kingdom"));
        assert_eq!(data.display_location(), "London, United Kingdom");
    }

    #[test]
    fn wrong_types_and_ranges_are_schema_errors() {
        let cases = [
            ("humidity", json!("high")),
            ("humidity", json!(101)),
            ("humidity", json!(-1)),
            ("wind_kph", json!(-0.5)),
            ("temp_c", json!(null)),
        ];

        for (field, value) in cases {
            let mut payload = london_payload();
            payload["current"][field] = value.clone();

            let err = parse_current(payload.to_string().as_bytes()).unwrap_err();
            assert!(
                matches!(err, WeatherError::Schema(_)),
                "{field}={value} gave {err:?}"
            );
        }
    }

    #[test]
    fn range_boundaries_are_accepted() {
        for (humidity, wind) in [(0, 0.0), (100, 0.0), (100, 250.0)] {
            let mut payload = london_payload();
            payload["current"]["humidity"] = json!(humidity);
            payload["current"]["wind_kph"] = json!(wind);

            let data = parse_current(payload.to_string().as_bytes())
                .unwrap_or_else(|err| panic!("humidity={humidity} wind={wind} gave {err:?}"));
            assert_eq!(data.humidity_percent, humidity);
            assert_eq!(data.wind_speed, wind);
        }
    }

    #[test]
    fn blank_city_and_bad_localtime_are_schema_errors() {
        let mut payload = london_payload();
        payload["location"]["name"] = json!("  ");
        assert!(matches!(
            parse_current(payload.to_string().as_bytes()),
            Err(WeatherError::Schema(_))
        ));

        let mut payload = london_payload();
        payload["location"]["localtime"] = json!("yesterday");
        assert!(matches!(
            parse_current(payload.to_string().as_bytes()),
            Err(WeatherError::Schema(_))
        ));
    }

    #[tokio::test]
    async fn invalid_json_is_a_parse_error() {
        let transport = ScriptedTransport::new().reply(200, "<html>oops</html>");
        let err = client(&transport).fetch("London").await.unwrap_err();
        assert!(matches!(err, WeatherError::Parse(_)));
    }

    #[tokio::test]
    async fn bad_request_and_not_found_mean_city_not_found() {
        for status in [400, 404] {
            let body = r#"{"error":{"code":1006,"message":"No matching location found."}}"#;
            let transport = ScriptedTransport::new().reply(status, body);
            let err = client(&transport).fetch("Zzzznotacity").await.unwrap_err();

            match err {
                WeatherError::CityNotFound { query, status: s, message } => {
                    assert_eq!(query, "Zzzznotacity");
                    assert_eq!(s, status);
                    assert_eq!(message.as_deref(), Some("No matching location found."));
                }
                other => panic!("expected CityNotFound, got {other:?}"),
            }
        }
    }

    #[tokio::test]
    async fn other_statuses_are_generic_http_errors() {
        for status in [401, 403, 429, 500, 503] {
            let transport = ScriptedTransport::new().reply(status, "not json");
            let err = client(&transport).fetch("London").await.unwrap_err();

            assert!(
                matches!(err, WeatherError::Http { status: s, message: None } if s == status),
                "status {status} gave {err:?}"
            );
        }
    }

    #[tokio::test]
    async fn http_errors_carry_the_remote_message() {
        for status in [401, 500] {
            let body = r#"{"error":{"code":2006,"message":"API key is invalid."}}"#;
            let transport = ScriptedTransport::new().reply(status, body);
            let err = client(&transport).fetch("London").await.unwrap_err();

            match err {
                WeatherError::Http { status: s, message } => {
                    assert_eq!(s, status);
                    assert_eq!(message.as_deref(), Some("API key is invalid."));
                }
                other => panic!("expected Http, got {other:?}"),
            }
        }
    }

    #[tokio::test]
    async fn transport_failure_is_a_connection_error() {
        let transport = ScriptedTransport::new().fail("request timed out");
        let err = client(&transport).fetch("London").await.unwrap_err();
        assert!(matches!(err, WeatherError::Connection(msg) if msg.contains("timed out")));
    }

    #[tokio::test]
    async fn icon_fetch_resolves_protocol_relative_urls() {
        let transport = ScriptedTransport::new().reply(200, vec![1u8, 2, 3]);
        let bytes = client(&transport).fetch_icon("//cdn.example/64.png").await;

        assert_eq!(bytes, Some(vec![1, 2, 3]));
        assert_eq!(transport.calls()[0].url, "https://cdn.example/64.png");
    }

    #[tokio::test]
    async fn icon_failures_are_swallowed() {
        let transport = ScriptedTransport::new().reply(404, "").fail("connection reset");
        let client = client(&transport);

        assert_eq!(client.fetch_icon("//cdn.example/64.png").await, None);
        assert_eq!(client.fetch_icon("//cdn.example/64.png").await, None);
        assert_eq!(client.fetch_icon("").await, None);
        assert_eq!(transport.calls().len(), 2);
    }
}
