use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;

use crate::model::WeatherReport;

const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org";

/// Errors surfaced by [`OpenWeatherClient::fetch`].
#[derive(Debug, Error)]
pub enum FetchError {
    /// The upstream API answered with a non-2xx status code.
    #[error("upstream weather API returned status {0}")]
    Upstream(u16),

    /// Network failure, malformed JSON, or any other unexpected condition.
    #[error("{0}")]
    Internal(String),
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        FetchError::Internal(err.to_string())
    }
}

/// Client for the OpenWeatherMap current-weather endpoint.
///
/// Holds its own `reqwest::Client`; no state is shared across requests
/// beyond the connection pool inside reqwest.
#[derive(Debug, Clone)]
pub struct OpenWeatherClient {
    api_key: String,
    base_url: String,
    http: Client,
}

impl OpenWeatherClient {
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
            http: Client::new(),
        }
    }

    /// Point the client at a different host. Used by tests to talk to a
    /// local mock server instead of the public API.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn weather_request(&self, city: &str) -> reqwest::RequestBuilder {
        let url = format!("{}/data/2.5/weather", self.base_url);

        // `query` handles encoding, so multi-word city names and special
        // characters survive the trip.
        self.http.get(url).query(&[
            ("q", city),
            ("appid", self.api_key.as_str()),
            ("units", "metric"),
        ])
    }

    /// Fetch current weather for `city` and normalize the response.
    ///
    /// Every call performs a fresh upstream round trip; there is no caching
    /// and no retry. A non-2xx upstream status becomes
    /// [`FetchError::Upstream`] carrying that same status code.
    pub async fn fetch(&self, city: &str) -> Result<WeatherReport, FetchError> {
        tracing::debug!(%city, "requesting current weather");

        let res = self.weather_request(city).send().await?;

        let status = res.status();
        if !status.is_success() {
            tracing::warn!(%city, %status, "upstream returned an error status");
            return Err(FetchError::Upstream(status.as_u16()));
        }

        let body = res.text().await?;
        let parsed: OwCurrentResponse = serde_json::from_str(&body)
            .map_err(|e| FetchError::Internal(format!("failed to parse upstream JSON: {e}")))?;

        Ok(normalize(parsed))
    }
}

fn normalize(raw: OwCurrentResponse) -> WeatherReport {
    let description = raw
        .weather
        .into_iter()
        .next()
        .map(|w| w.description)
        .unwrap_or_default();

    WeatherReport {
        city: raw.name,
        description,
        temp: raw.main.temp,
        temp_min: raw.main.temp_min,
        temp_max: raw.main.temp_max,
        pressure: raw.main.pressure,
        humidity: raw.main.humidity,
        wind_speed: raw.wind.speed,
        sunrise: raw.sys.sunrise,
        sunset: raw.sys.sunset,
    }
}

// Upstream wire format. Every field is optional: a missing field at any
// depth normalizes to zero or an empty string instead of failing the parse.

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct OwCurrentResponse {
    name: String,
    main: OwMain,
    weather: Vec<OwWeather>,
    wind: OwWind,
    sys: OwSys,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct OwMain {
    temp: f64,
    temp_min: f64,
    temp_max: f64,
    pressure: i64,
    humidity: i64,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct OwWeather {
    description: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct OwWind {
    speed: f64,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct OwSys {
    sunrise: i64,
    sunset: i64,
}
