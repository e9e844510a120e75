use crate::{error::QueryError, model::WeatherRequest};
use async_trait::async_trait;
use std::fmt::Debug;

pub mod openweather;

pub use openweather::{OpenWeatherSource, classify_payload};

/// Something that can answer a [`WeatherRequest`] with a raw JSON payload.
///
/// Implementations make exactly one attempt and map any failure to reach or
/// decode the service to [`QueryError::Transport`].
#[async_trait]
pub trait WeatherSource: Send + Sync + Debug {
    async fn fetch(&self, request: &WeatherRequest) -> Result<serde_json::Value, QueryError>;
}
