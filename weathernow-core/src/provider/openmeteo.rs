use async_trait::async_trait;
use chrono::NaiveDateTime;
use reqwest::Client;
use serde::{Deserialize, Deserializer, de::DeserializeOwned};

use crate::{
    config::Config,
    error::FetchError,
    model::{CurrentWeather, GeoResult, HourlySeries, PlaceQuery, WeatherPayload},
};

use super::{Geocoder, WeatherProvider};

pub const GEOCODING_URL: &str = "https://geocoding-api.open-meteo.com/v1/search";
pub const FORECAST_URL: &str = "https://api.open-meteo.com/v1/forecast";

const GEOCODING_ENDPOINT: &str = "Open-Meteo geocoding";
const FORECAST_ENDPOINT: &str = "Open-Meteo forecast";
const HOURLY_METRICS: &str = "temperature_2m,relative_humidity_2m,precipitation_probability";

/// Client for the free Open-Meteo geocoding and forecast APIs. No API key needed.
#[derive(Debug, Clone)]
pub struct OpenMeteoClient {
    http: Client,
    geocoding_url: String,
    forecast_url: String,
}

impl Default for OpenMeteoClient {
    fn default() -> Self {
        Self::with_endpoints(GEOCODING_URL, FORECAST_URL)
    }
}

impl OpenMeteoClient {
    pub fn with_endpoints(
        geocoding_url: impl Into<String>,
        forecast_url: impl Into<String>,
    ) -> Self {
        Self {
            http: Client::new(),
            geocoding_url: geocoding_url.into(),
            forecast_url: forecast_url.into(),
        }
    }

    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.request_timeout() {
            builder = builder.timeout(timeout);
        }
        let http = builder.build()?;

        Ok(Self {
            http,
            geocoding_url: config.geocoding_url.clone(),
            forecast_url: config.forecast_url.clone(),
        })
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &'static str,
        url: &str,
        query: &[(&str, &str)],
    ) -> Result<T, FetchError> {
        let res = self
            .http
            .get(url)
            .query(query)
            .send()
            .await
            .map_err(|source| FetchError::Transport { endpoint, source })?;

        let status = res.status();
        let body = res.text().await.map_err(|source| FetchError::Transport { endpoint, source })?;

        if !status.is_success() {
            return Err(FetchError::Status { endpoint, status, body: truncate_body(&body) });
        }

        serde_json::from_str(&body).map_err(|source| FetchError::Decode { endpoint, source })
    }
}

#[derive(Debug, Deserialize)]
struct OmGeocodingResponse {
    // Absent entirely when nothing matches.
    #[serde(default)]
    results: Option<Vec<OmPlace>>,
}

#[derive(Debug, Deserialize)]
struct OmPlace {
    name: String,
    latitude: f64,
    longitude: f64,
    #[serde(default)]
    country: String,
}

#[derive(Debug, Deserialize)]
struct OmCurrentWeather {
    temperature: f64,
    windspeed: f64,
    weathercode: i32,
}

#[derive(Debug, Deserialize)]
struct OmHourly {
    #[serde(deserialize_with = "local_times")]
    time: Vec<NaiveDateTime>,
    temperature_2m: Vec<f64>,
    #[serde(default)]
    precipitation_probability: Vec<Option<f64>>,
}

#[derive(Debug, Deserialize)]
struct OmForecastResponse {
    current_weather: OmCurrentWeather,
    hourly: OmHourly,
}

#[async_trait]
impl Geocoder for OpenMeteoClient {
    async fn resolve(&self, query: &PlaceQuery) -> Result<Option<GeoResult>, FetchError> {
        tracing::debug!(query = %query, "geocoding");

        let parsed: OmGeocodingResponse = self
            .get_json(
                GEOCODING_ENDPOINT,
                &self.geocoding_url,
                &[("name", query.as_str()), ("count", "1")],
            )
            .await?;

        let place = parsed.results.unwrap_or_default().into_iter().next();

        Ok(place.map(|p| GeoResult {
            latitude: p.latitude,
            longitude: p.longitude,
            name: p.name,
            country: p.country,
        }))
    }
}

#[async_trait]
impl WeatherProvider for OpenMeteoClient {
    async fn fetch_weather(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<WeatherPayload, FetchError> {
        tracing::debug!(latitude, longitude, "fetching forecast");

        let lat = latitude.to_string();
        let lon = longitude.to_string();

        let parsed: OmForecastResponse = self
            .get_json(
                FORECAST_ENDPOINT,
                &self.forecast_url,
                &[
                    ("latitude", lat.as_str()),
                    ("longitude", lon.as_str()),
                    ("current_weather", "true"),
                    ("hourly", HOURLY_METRICS),
                    ("timezone", "auto"),
                ],
            )
            .await?;

        Ok(WeatherPayload {
            current: CurrentWeather {
                temperature_c: parsed.current_weather.temperature,
                wind_kph: parsed.current_weather.windspeed,
                condition_code: parsed.current_weather.weathercode,
            },
            hourly: HourlySeries {
                times: parsed.hourly.time,
                temperatures_c: parsed.hourly.temperature_2m,
                rain_probability_pct: parsed.hourly.precipitation_probability,
            },
        })
    }
}

/// Hourly timestamps come without an offset, in the location's own time zone.
fn local_times<'de, D>(deserializer: D) -> Result<Vec<NaiveDateTime>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Vec::<String>::deserialize(deserializer)?;
    raw.iter()
        .map(|s| parse_local_time(s).map_err(serde::de::Error::custom))
        .collect()
}

fn parse_local_time(s: &str) -> Result<NaiveDateTime, chrono::ParseError> {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M")
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S"))
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
