use std::error::Error as StdError;
use thiserror::Error;

/// Ways a single weather query can end without a reading.
#[derive(Debug, Error)]
pub enum QueryError {
    /// The service answered, but its payload reports a non-success status.
    #[error("Error: {message}")]
    Api { status: serde_json::Value, message: String },

    /// The request never produced a decodable payload.
    #[error("Request failed: {detail}")]
    Transport { detail: String },

    /// The payload is JSON but lacks fields needed to report either outcome.
    #[error("Malformed weather payload: {0}")]
    MalformedPayload(String),
}

impl QueryError {
    pub fn transport(err: &(dyn StdError + 'static)) -> Self {
        QueryError::Transport { detail: error_chain(err) }
    }

    /// Api and Transport are the two outcomes shown to the user; anything else is fatal.
    pub fn is_reportable(&self) -> bool {
        matches!(self, QueryError::Api { .. } | QueryError::Transport { .. })
    }
}

impl From<reqwest::Error> for QueryError {
    fn from(err: reqwest::Error) -> Self {
        // the URL carries `appid`
        let err = err.without_url();
        QueryError::transport(&err)
    }
}

/// Joins an error and its sources with `": "`, skipping repeated messages.
fn error_chain(err: &(dyn StdError + 'static)) -> String {
    let mut parts: Vec<String> = Vec::new();
    let mut current = Some(err);

    while let Some(e) = current {
        let msg = e.to_string();
        if !parts.iter().any(|p| p.contains(&msg)) {
            parts.push(msg);
        }
        current = e.source();
    }

    parts.join(": ")
}
