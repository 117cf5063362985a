use chrono::NaiveDate;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WeatherDataError {
    #[error("Failed to build HTTP client")]
    ClientBuild(#[source] reqwest::Error),

    #[error("Network request failed for {url}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Request to {url} timed out after {timeout:?}")]
    Timeout { url: String, timeout: Duration },

    #[error("HTTP request failed for {url} with status {status}")]
    HttpStatus {
        url: String,
        status: reqwest::StatusCode,
    },

    // The service answered with `{"error": true, "reason": ...}`
    #[error("Weather API returned an error: {reason}")]
    UpstreamApi { reason: String },

    #[error("Failed to decode weather API response")]
    Decode(#[from] serde_json::Error),

    #[error("Weather API returned {found} forecasts for {expected} records on {date}")]
    ShapeMismatch {
        date: NaiveDate,
        expected: usize,
        found: usize,
    },
}

impl WeatherDataError {
    /// Classifies a reqwest failure for `url`, splitting out timeouts.
    pub(crate) fn from_request(url: &str, timeout: Duration, source: reqwest::Error) -> Self {
        if source.is_timeout() {
            WeatherDataError::Timeout {
                url: url.to_string(),
                timeout,
            }
        } else {
            WeatherDataError::Transport {
                url: url.to_string(),
                source,
            }
        }
    }
}
