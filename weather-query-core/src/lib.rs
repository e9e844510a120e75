//! Core library for the `weather-query` CLI.
//!
//! This crate defines:
//! - The request and reading models
//! - The `WeatherSource` seam and its OpenWeather implementation
//! - Payload classification into a reading or a `QueryError`
//!
//! The binary only prompts for a credential and prints what [`query_weather`] returns.

pub mod config;
pub mod error;
pub mod model;
pub mod provider;
pub mod query;

pub use config::QuerySettings;
pub use error::QueryError;
pub use model::{Units, WeatherReading, WeatherRequest};
pub use provider::{OpenWeatherSource, WeatherSource, classify_payload};
pub use query::query_weather;
