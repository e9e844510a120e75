use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::{
    config::QuerySettings,
    error::QueryError,
    model::{Units, WeatherReading, WeatherRequest},
};

use super::WeatherSource;

const SUCCESS_STATUS: i64 = 200;

#[derive(Debug, Clone)]
pub struct OpenWeatherSource {
    api_key: String,
    endpoint: String,
    http: Client,
}

impl OpenWeatherSource {
    pub fn new(api_key: String) -> Self {
        Self::with_settings(api_key, &QuerySettings::default())
    }

    pub fn with_settings(api_key: String, settings: &QuerySettings) -> Self {
        Self {
            api_key,
            endpoint: settings.endpoint.clone(),
            http: Client::new(),
        }
    }
}

#[async_trait]
impl WeatherSource for OpenWeatherSource {
    async fn fetch(&self, request: &WeatherRequest) -> Result<Value, QueryError> {
        debug!(endpoint = %self.endpoint, city = %request.city, units = %request.units, "requesting current weather");

        let res = self
            .http
            .get(&self.endpoint)
            .query(&[
                ("q", request.city.as_str()),
                ("units", request.units.as_str()),
                ("appid", self.api_key.as_str()),
            ])
            .send()
            .await?;

        // The HTTP status is not consulted; the payload carries its own `cod`.
        let http_status = res.status();
        let body = res.text().await?;
        debug!(%http_status, bytes = body.len(), "received weather payload");

        serde_json::from_str(&body).map_err(|e| QueryError::transport(&e))
    }
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    humidity: u8,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    description: String,
}

#[derive(Debug, Deserialize)]
struct OwWind {
    speed: f64,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    name: Option<String>,
    dt: Option<i64>,
    main: OwMain,
    weather: Vec<OwWeather>,
    wind: OwWind,
}

/// Turn a decoded payload into a reading or an API error.
///
/// `cod` counts as success when it is the JSON number 200 (`200` or `200.0`).
/// OpenWeather sends error codes as strings (`"404"`), and those take the error branch.
pub fn classify_payload(payload: Value, units: Units) -> Result<WeatherReading, QueryError> {
    let status = payload
        .get("cod")
        .cloned()
        .ok_or_else(|| QueryError::MalformedPayload("payload has no `cod` field".to_string()))?;

    if status.as_f64() != Some(SUCCESS_STATUS as f64) {
        let message = match payload.get("message") {
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
            None => {
                return Err(QueryError::MalformedPayload(format!(
                    "status {status} payload has no `message` field"
                )));
            }
        };
        return Err(QueryError::Api { status, message });
    }

    let parsed: OwCurrentResponse =
        serde_json::from_value(payload).map_err(|e| QueryError::MalformedPayload(e.to_string()))?;

    let condition = parsed
        .weather
        .into_iter()
        .next()
        .map(|w| w.description)
        .ok_or_else(|| QueryError::MalformedPayload("`weather` list is empty".to_string()))?;

    Ok(WeatherReading {
        status: SUCCESS_STATUS,
        units,
        temperature: parsed.main.temp,
        condition,
        humidity_pct: parsed.main.humidity,
        wind_speed: parsed.wind.speed,
        location_name: parsed.name,
        observation_time: parsed.dt.and_then(unix_to_utc),
    })
}

fn unix_to_utc(ts: i64) -> Option<DateTime<Utc>> {
    DateTime::<Utc>::from_timestamp(ts, 0)
}
