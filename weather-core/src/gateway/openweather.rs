use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::{
    config::DEFAULT_BASE_URL,
    error::WeatherError,
    model::{Coordinates, ForecastEntry, ForecastSnapshot, LocationQuery, ResolvedLocation},
};

use super::WeatherGateway;

const UNITS: &str = "imperial";

#[derive(Debug, Clone)]
pub struct OpenWeatherGateway {
    api_key: String,
    base_url: String,
    http: Client,
}

impl OpenWeatherGateway {
    pub fn new(api_key: String) -> Self {
        Self::with_base_url(api_key, DEFAULT_BASE_URL)
    }

    pub fn with_base_url(api_key: String, base_url: &str) -> Self {
        Self {
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            http: Client::new(),
        }
    }

    /// GET `{base}/{endpoint}` and return the body of a successful response.
    async fn get_body(&self, endpoint: &str, params: &[(&str, &str)]) -> Result<String> {
        let url = format!("{}/{endpoint}", self.base_url);

        tracing::debug!(%url, "requesting OpenWeather {endpoint}");

        let res = self
            .http
            .get(&url)
            .query(params)
            .query(&[("appid", self.api_key.as_str()), ("units", UNITS)])
            .send()
            .await
            .with_context(|| format!("Failed to send request to OpenWeather ({endpoint})"))?;

        let status = res.status();
        let body = res
            .text()
            .await
            .with_context(|| format!("Failed to read OpenWeather {endpoint} response body"))?;

        if !status.is_success() {
            tracing::debug!(%status, body = %truncate_body(&body), "OpenWeather rejected request");
            return Err(anyhow!("OpenWeather {endpoint} request failed with status {status}"));
        }

        Ok(body)
    }
}

#[derive(Debug, Deserialize)]
struct OwCoord {
    lat: f64,
    lon: f64,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    name: String,
    coord: OwCoord,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    id: u32,
    description: String,
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    feels_like: f64,
    humidity: f64,
}

#[derive(Debug, Deserialize)]
struct OwWind {
    speed: f64,
}

#[derive(Debug, Deserialize)]
struct OwForecastEntry {
    dt_txt: String,
    #[serde(default)]
    weather: Vec<OwWeather>,
    main: OwMain,
    wind: OwWind,
}

#[derive(Debug, Deserialize)]
struct OwForecastResponse {
    list: Vec<OwForecastEntry>,
}

impl From<OwCurrentResponse> for ResolvedLocation {
    fn from(parsed: OwCurrentResponse) -> Self {
        ResolvedLocation {
            name: parsed.name,
            coordinates: Coordinates {
                latitude: parsed.coord.lat,
                longitude: parsed.coord.lon,
            },
        }
    }
}

impl From<OwForecastEntry> for ForecastEntry {
    fn from(entry: OwForecastEntry) -> Self {
        let condition = entry.weather.into_iter().next();

        ForecastEntry {
            timestamp: entry.dt_txt,
            condition_code: condition.as_ref().map(|w| w.id),
            condition_description: condition.map(|w| w.description),
            temperature: entry.main.temp,
            feels_like: entry.main.feels_like,
            humidity: entry.main.humidity,
            wind_speed: entry.wind.speed,
        }
    }
}

#[async_trait]
impl WeatherGateway for OpenWeatherGateway {
    async fn resolve_location(
        &self,
        query: &LocationQuery,
    ) -> Result<ResolvedLocation, WeatherError> {
        let body = self
            .get_body("weather", &[("q", query.as_str())])
            .await
            .map_err(|e| WeatherError::Resolution(format!("{e:#}")))?;

        let parsed: OwCurrentResponse = serde_json::from_str(&body)
            .map_err(|e| WeatherError::Resolution(format!("unexpected weather JSON: {e}")))?;

        Ok(parsed.into())
    }

    async fn fetch_forecast(
        &self,
        coordinates: Coordinates,
    ) -> Result<ForecastSnapshot, WeatherError> {
        let lat = coordinates.latitude.to_string();
        let lon = coordinates.longitude.to_string();

        let body = self
            .get_body("forecast", &[("lat", lat.as_str()), ("lon", lon.as_str())])
            .await
            .map_err(|e| WeatherError::Forecast(format!("{e:#}")))?;

        let parsed: OwForecastResponse = serde_json::from_str(&body)
            .map_err(|e| WeatherError::Forecast(format!("unexpected forecast JSON: {e}")))?;

        Ok(ForecastSnapshot::new(
            parsed.list.into_iter().map(ForecastEntry::from).collect(),
        ))
    }
}

fn truncate_body(body: &str) -> &str {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => &body[..idx],
        None => body,
    }
}
