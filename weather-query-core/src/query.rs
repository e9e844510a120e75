use tracing::debug;

use crate::{
    error::QueryError,
    model::{WeatherReading, WeatherRequest},
    provider::{WeatherSource, classify_payload},
};

/// Run one query against `source`: a single fetch, then classification of the payload.
pub async fn query_weather(
    source: &dyn WeatherSource,
    request: &WeatherRequest,
) -> Result<WeatherReading, QueryError> {
    let payload = source.fetch(request).await.inspect_err(|e| {
        debug!(error = %e, "weather request did not complete");
    })?;

    match classify_payload(payload, request.units) {
        Ok(reading) => {
            debug!(
                location = reading.location_name.as_deref().unwrap_or("?"),
                observed_at = ?reading.observation_time,
                "weather reading parsed"
            );
            Ok(reading)
        }
        Err(e) => {
            debug!(error = %e, "weather service did not return a reading");
            Err(e)
        }
    }
}
