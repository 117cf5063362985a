//! Serde models for the historical-weather API response.

use crate::weather_data::error::WeatherDataError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// Daily series for one location: a `time` axis plus one array per requested variable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DailySeries {
    /// ISO dates, earliest first.
    #[serde(default)]
    pub time: Vec<String>,
    /// Variable name to raw JSON array. Kept untyped so that nulls and
    /// unexpected value types degrade to missing values instead of failing
    /// the whole response.
    #[serde(flatten)]
    pub values: HashMap<String, Value>,
}

impl DailySeries {
    /// Returns the numeric series for `variable`, `None` when the variable is absent.
    /// Non-numeric entries become `None`.
    pub fn series(&self, variable: &str) -> Option<Vec<Option<f64>>> {
        self.values
            .get(variable)
            .and_then(Value::as_array)
            .map(|values| values.iter().map(Value::as_f64).collect())
    }
}

/// One location's answer from the weather API.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Forecast {
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    #[serde(default)]
    pub elevation: Option<f64>,
    #[serde(default)]
    pub timezone: Option<String>,
    #[serde(default)]
    pub utc_offset_seconds: Option<i64>,
    #[serde(default)]
    pub daily_units: HashMap<String, String>,
    #[serde(default)]
    pub daily: Option<DailySeries>,
}

impl Forecast {
    /// Builds a forecast holding only daily data, mostly useful for tests and benchmarks.
    pub fn with_daily(time: Vec<String>, values: HashMap<String, Value>) -> Self {
        Self {
            daily: Some(DailySeries { time, values }),
            ..Self::default()
        }
    }
}

/// The API answers a single-location request with one object and a multi-location
/// request with an array of objects, positionally aligned with the query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WeatherResponse {
    Batch(Vec<Forecast>),
    Single(Forecast),
}

impl WeatherResponse {
    /// Decodes a response body.
    ///
    /// Error payloads (`{"error": true, "reason": "..."}`) are detected before the
    /// shape is interpreted, since they carry no `daily` data.
    ///
    /// # Errors
    ///
    /// Returns [`WeatherDataError::UpstreamApi`] for error payloads and
    /// [`WeatherDataError::Decode`] for bodies matching neither shape.
    pub fn from_json(body: Value) -> Result<Self, WeatherDataError> {
        if let Some(object) = body.as_object() {
            if object.contains_key("error") {
                let reason = object
                    .get("reason")
                    .and_then(Value::as_str)
                    .unwrap_or("no reason given")
                    .to_string();
                return Err(WeatherDataError::UpstreamApi { reason });
            }
        }
        Ok(serde_json::from_value(body)?)
    }

    /// Normalises the response into a list of forecasts.
    pub fn into_forecasts(self) -> Vec<Forecast> {
        match self {
            WeatherResponse::Batch(forecasts) => forecasts,
            WeatherResponse::Single(forecast) => vec![forecast],
        }
    }

    pub fn len(&self) -> usize {
        match self {
            WeatherResponse::Batch(forecasts) => forecasts.len(),
            WeatherResponse::Single(_) => 1,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
