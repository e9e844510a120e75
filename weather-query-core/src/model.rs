use chrono::{DateTime, Utc};
use std::fmt;

/// Unit system understood by the OpenWeather `units` query parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Units {
    #[default]
    Metric,
    Imperial,
    Standard,
}

impl Units {
    pub fn as_str(&self) -> &'static str {
        match self {
            Units::Metric => "metric",
            Units::Imperial => "imperial",
            Units::Standard => "standard",
        }
    }

    pub fn temperature_suffix(&self) -> &'static str {
        match self {
            Units::Metric => "°C",
            Units::Imperial => "°F",
            Units::Standard => "K",
        }
    }

    pub fn wind_speed_suffix(&self) -> &'static str {
        match self {
            Units::Metric | Units::Standard => "m/s",
            Units::Imperial => "mph",
        }
    }
}

impl fmt::Display for Units {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeatherRequest {
    pub city: String,
    pub units: Units,
}

/// Fields pulled out of a successful payload, in the units they were requested in.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherReading {
    pub status: i64,
    pub units: Units,
    pub temperature: f64,
    pub condition: String,
    pub humidity_pct: u8,
    pub wind_speed: f64,
    pub location_name: Option<String>,
    pub observation_time: Option<DateTime<Utc>>,
}

impl fmt::Display for WeatherReading {
    // `{:?}` keeps the fractional part of whole numbers (`20.0`, not `20`).
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Temperature: {:?}{}", self.temperature, self.units.temperature_suffix())?;
        writeln!(f, "Weather: {}", self.condition)?;
        writeln!(f, "Humidity: {}%", self.humidity_pct)?;
        writeln!(f, "Wind Speed: {:?} {}", self.wind_speed, self.units.wind_speed_suffix())
    }
}
