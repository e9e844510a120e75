use crate::model::{Units, WeatherRequest};

pub const OPENWEATHER_ENDPOINT: &str = "https://api.openweathermap.org/data/2.5/weather";
pub const DEFAULT_CITY: &str = "London";

/// In-memory settings for one query. Nothing here is read from or written to disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuerySettings {
    /// Full URL of the current-weather endpoint.
    pub endpoint: String,
    pub city: String,
    pub units: Units,
}

impl Default for QuerySettings {
    fn default() -> Self {
        Self {
            endpoint: OPENWEATHER_ENDPOINT.to_string(),
            city: DEFAULT_CITY.to_string(),
            units: Units::Metric,
        }
    }
}

impl QuerySettings {
    /// Replace the endpoint, keeping the fixed city and units.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn request(&self) -> WeatherRequest {
        WeatherRequest { city: self.city.clone(), units: self.units }
    }
}
