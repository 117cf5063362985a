//! Main entry point: enriches a table of strandings with prior-day weather.

use crate::error::ContextError;
use crate::frame::{features_to_frame, read_records};
use crate::progress::{EnrichmentObserver, LogObserver};
use crate::types::feature_row::feature_columns;
use crate::types::weather_query::dedup_variables;
use crate::weather_data::client::{OpenMeteoClient, WeatherSource};
use crate::weather_data::orchestrator::{enrich_records, EnrichmentOptions};
use bon::bon;
use log::info;
use polars::prelude::DataFrame;
use std::sync::Arc;
use std::time::Duration;

/// How feature columns are returned by [`enrich_frame`] and [`WeatherContext::enrich`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    /// Only the feature columns, one row per input row.
    #[default]
    Replace,
    /// The input columns followed by the feature columns.
    Append,
}

/// Names of the input columns holding the record fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordColumns<'a> {
    pub latitude: &'a str,
    pub longitude: &'a str,
    pub date: &'a str,
}

impl<'a> RecordColumns<'a> {
    pub fn new(latitude: &'a str, longitude: &'a str, date: &'a str) -> Self {
        Self {
            latitude,
            longitude,
            date,
        }
    }
}

/// Enriches every row of `frame` with weather features fetched from `source`.
///
/// Rows keep their order. Rows with an unparseable or missing date get nulls
/// in every feature column. See [`enrich_records`] for the fetching rules.
///
/// # Errors
///
/// [`ContextError::MissingColumn`] or [`ContextError::TypeConversion`] for bad
/// input columns, plus everything [`enrich_records`] can return.
pub async fn enrich_frame<S>(
    source: &S,
    frame: &DataFrame,
    columns: RecordColumns<'_>,
    options: &EnrichmentOptions,
    observer: &dyn EnrichmentObserver,
    mode: OutputMode,
) -> Result<DataFrame, ContextError>
where
    S: WeatherSource + ?Sized,
{
    let records = read_records(frame, columns.latitude, columns.longitude, columns.date)?;
    let rows = enrich_records(source, &records, options, observer).await?;

    let feature_names = feature_columns(
        &dedup_variables(&options.daily_variables),
        options.days_prior,
        options.include_deltas,
    );
    let features = features_to_frame(&rows, &feature_names)?;

    match mode {
        OutputMode::Replace => Ok(features),
        OutputMode::Append => Ok(frame.hstack(features.get_columns())?),
    }
}

/// Client for adding weather context to stranding tables.
///
/// Each call to [`WeatherContext::enrich`] opens its own HTTP client, which is
/// dropped once the run ends, successful or not.
///
/// # Examples
///
/// ```rust
/// use stranding_context::WeatherContext;
/// use std::time::Duration;
///
/// let context = WeatherContext::builder()
///     .timeout(Duration::from_secs(30))
///     .build();
/// assert_eq!(context.timeout(), Some(Duration::from_secs(30)));
/// ```
pub struct WeatherContext {
    base_url: Option<String>,
    timeout: Option<Duration>,
    observer: Arc<dyn EnrichmentObserver>,
}

impl Default for WeatherContext {
    fn default() -> Self {
        Self::new()
    }
}

#[bon]
impl WeatherContext {
    /// Creates a `WeatherContext`.
    ///
    /// # Arguments
    ///
    /// * `.base_url(String)`: Optional. Weather API endpoint, see [`OpenMeteoClient`].
    /// * `.timeout(Duration)`: Optional. Per-request timeout, see [`OpenMeteoClient`].
    /// * `.observer(Arc<dyn EnrichmentObserver>)`: Optional. Progress hook. Defaults to [`LogObserver`].
    #[builder(start_fn = builder, finish_fn = build)]
    pub fn with_settings(
        #[builder(into)] base_url: Option<String>,
        timeout: Option<Duration>,
        observer: Option<Arc<dyn EnrichmentObserver>>,
    ) -> Self {
        Self {
            base_url,
            timeout,
            observer: observer.unwrap_or_else(|| Arc::new(LogObserver)),
        }
    }

    /// A context talking to the public Open-Meteo endpoint and logging progress.
    pub fn new() -> Self {
        Self::builder().build()
    }

    pub fn base_url(&self) -> Option<&str> {
        self.base_url.as_deref()
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Adds `{variable}_{n}_days_prior` columns (and optionally `_delta` columns)
    /// for every row of `frame`.
    ///
    /// This method uses a builder pattern.
    ///
    /// # Arguments
    ///
    /// * `.frame(&DataFrame)`: **Required.** The stranding records.
    /// * `.lat_column(&str)` / `.lon_column(&str)` / `.date_column(&str)`: **Required.**
    ///   Column names holding latitude, longitude and event date.
    /// * `.options(EnrichmentOptions)`: **Required.** Variables, window and pacing.
    /// * `.mode(OutputMode)`: Optional. Defaults to [`OutputMode::Replace`].
    ///
    /// # Errors
    ///
    /// Returns [`ContextError::WeatherData`] when the client cannot be built or
    /// any weather call fails, and the column errors of [`enrich_frame`].
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// # use stranding_context::{ContextError, EnrichmentOptions, WeatherContext};
    /// # use polars::prelude::*;
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), ContextError> {
    /// let strandings = df!(
    ///     "Latitude" => [35.2245, 34.7001],
    ///     "Longitude" => [-75.5332, -76.6667],
    ///     "Observation date" => ["2019-05-01", "2019-05-02"],
    /// )?;
    /// let options = EnrichmentOptions::builder()
    ///     .daily_variables(vec!["temperature_2m_max".to_string()])
    ///     .days_prior(3)
    ///     .build();
    ///
    /// let features = WeatherContext::new()
    ///     .enrich()
    ///     .frame(&strandings)
    ///     .lat_column("Latitude")
    ///     .lon_column("Longitude")
    ///     .date_column("Observation date")
    ///     .options(options)
    ///     .call()
    ///     .await?;
    /// println!("{}", features);
    /// # Ok(())
    /// # }
    /// ```
    #[builder]
    pub async fn enrich(
        &self,
        frame: &DataFrame,
        lat_column: &str,
        lon_column: &str,
        date_column: &str,
        options: EnrichmentOptions,
        mode: Option<OutputMode>,
    ) -> Result<DataFrame, ContextError> {
        let client = OpenMeteoClient::builder()
            .maybe_base_url(self.base_url.clone())
            .maybe_timeout(self.timeout)
            .build()?;
        info!(
            "Enriching {} rows from {} with {} daily variables",
            frame.height(),
            client.base_url(),
            options.daily_variables.len()
        );

        enrich_frame(
            &client,
            frame,
            RecordColumns::new(lat_column, lon_column, date_column),
            &options,
            self.observer.as_ref(),
            mode.unwrap_or_default(),
        )
        .await
    }
}
