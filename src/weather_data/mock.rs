//! In-memory [`WeatherSource`] used by the tests.

use crate::types::forecast::{Forecast, WeatherResponse};
use crate::types::weather_query::WeatherQuery;
use crate::weather_data::client::WeatherSource;
use crate::weather_data::error::WeatherDataError;
use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Mutex;

enum Behaviour {
    Synthesize,
    ShortByOne,
    Body(Value),
}

/// Records every query and answers with synthetic forecasts.
///
/// For a location with latitude `lat`, every requested variable holds
/// `lat + k` on the `k`-th day of the window (`k = 0` is the start date), so
/// each feature value identifies the query position it came from.
pub(crate) struct MockSource {
    behaviour: Behaviour,
    queries: Mutex<Vec<WeatherQuery>>,
}

impl MockSource {
    pub(crate) fn new() -> Self {
        Self::with(Behaviour::Synthesize)
    }

    /// Answers every query with one forecast fewer than requested.
    pub(crate) fn short_by_one() -> Self {
        Self::with(Behaviour::ShortByOne)
    }

    /// Answers every query with `body`, decoded like a real response.
    pub(crate) fn replying(body: Value) -> Self {
        Self::with(Behaviour::Body(body))
    }

    fn with(behaviour: Behaviour) -> Self {
        Self {
            behaviour,
            queries: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn queries(&self) -> Vec<WeatherQuery> {
        self.queries.lock().map(|q| q.clone()).unwrap_or_default()
    }

    fn synthesize(query: &WeatherQuery) -> Vec<Forecast> {
        let days: Vec<String> = query
            .start_date
            .iter_days()
            .take_while(|d| *d <= query.end_date)
            .map(crate::normalize::format_date)
            .collect();

        query
            .latitudes
            .iter()
            .zip(&query.longitudes)
            .map(|(lat, lon)| {
                let values: HashMap<String, Value> = query
                    .variables
                    .iter()
                    .map(|v| {
                        let series: Vec<f64> = (0..days.len()).map(|k| lat + k as f64).collect();
                        (v.clone(), json!(series))
                    })
                    .collect();
                Forecast {
                    latitude: Some(*lat),
                    longitude: Some(*lon),
                    ..Forecast::with_daily(days.clone(), values)
                }
            })
            .collect()
    }
}

#[async_trait]
impl WeatherSource for MockSource {
    async fn fetch(&self, query: &WeatherQuery) -> Result<WeatherResponse, WeatherDataError> {
        if let Ok(mut queries) = self.queries.lock() {
            queries.push(query.clone());
        }
        match &self.behaviour {
            Behaviour::Synthesize => {
                let mut forecasts = Self::synthesize(query);
                if forecasts.len() == 1 {
                    Ok(WeatherResponse::Single(forecasts.remove(0)))
                } else {
                    Ok(WeatherResponse::Batch(forecasts))
                }
            }
            Behaviour::ShortByOne => {
                let mut forecasts = Self::synthesize(query);
                forecasts.pop();
                Ok(WeatherResponse::Batch(forecasts))
            }
            Behaviour::Body(body) => WeatherResponse::from_json(body.clone()),
        }
    }
}
