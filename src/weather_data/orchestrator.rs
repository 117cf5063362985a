//! Drives the date-group loop: one weather call per event date, results scattered
//! back to the input order.

use crate::error::ContextError;
use crate::progress::EnrichmentObserver;
use crate::types::feature_row::{feature_columns, FeatureRow};
use crate::types::stranding_record::StrandingRecord;
use crate::types::weather_query::{dedup_variables, WeatherQuery};
use crate::weather_data::batcher::group_by_date;
use crate::weather_data::client::WeatherSource;
use crate::weather_data::error::WeatherDataError;
use crate::weather_data::reshaper::reshape;
use bon::Builder;
use std::time::Duration;

pub const DEFAULT_TIMEZONE: &str = "America/New_York";
pub const DEFAULT_DAYS_PRIOR: usize = 7;
pub const DEFAULT_SLEEP_INTERVAL: Duration = Duration::from_secs(30);

/// What to fetch and how to shape it.
///
/// # Examples
///
/// ```
/// use stranding_context::EnrichmentOptions;
/// use std::time::Duration;
///
/// let options = EnrichmentOptions::builder()
///     .daily_variables(vec!["temperature_2m_max".to_string(), "precipitation_sum".to_string()])
///     .days_prior(3)
///     .include_deltas(true)
///     .sleep_interval(Duration::from_secs(5))
///     .build();
///
/// assert_eq!(options.timezone, "America/New_York");
/// ```
#[derive(Debug, Clone, PartialEq, Builder)]
pub struct EnrichmentOptions {
    /// Daily variables to request, e.g. `temperature_2m_max`.
    pub daily_variables: Vec<String>,
    /// IANA timezone the daily aggregation is computed in.
    #[builder(default = DEFAULT_TIMEZONE.to_string(), into)]
    pub timezone: String,
    /// Window length in days, event day included.
    #[builder(default = DEFAULT_DAYS_PRIOR)]
    pub days_prior: usize,
    /// Also emit day-over-day delta columns.
    #[builder(default)]
    pub include_deltas: bool,
    /// Pause between two consecutive weather calls.
    #[builder(default = DEFAULT_SLEEP_INTERVAL)]
    pub sleep_interval: Duration,
}

/// Enriches `records` with daily weather features fetched from `source`.
///
/// Records are grouped by event date and each group is served by a single
/// call, with `options.sleep_interval` between consecutive calls. The returned
/// rows follow the order of `records`. Records without an event date are not
/// sent upstream and get all-missing rows.
///
/// # Errors
///
/// The whole run is aborted, without partial results, on the first
/// [`WeatherDataError`] (transport failure, timeout, upstream error payload,
/// or a response whose length differs from the group size), and on invalid
/// options or coordinates.
pub async fn enrich_records<S>(
    source: &S,
    records: &[StrandingRecord],
    options: &EnrichmentOptions,
    observer: &dyn EnrichmentObserver,
) -> Result<Vec<FeatureRow>, ContextError>
where
    S: WeatherSource + ?Sized,
{
    let days_prior = options.days_prior;
    if days_prior == 0 {
        return Err(ContextError::InvalidDaysPrior(days_prior));
    }
    let variables = dedup_variables(&options.daily_variables);
    if variables.is_empty() {
        return Err(ContextError::NoDailyVariables);
    }
    let columns = feature_columns(&variables, days_prior, options.include_deltas);

    let groups = group_by_date(records);
    let dated_groups = groups.iter().filter(|g| g.date.is_some()).count();
    let mut slots: Vec<Option<FeatureRow>> = vec![None; records.len()];
    let mut completed = 0;

    // Every query is built up front so bad coordinates fail before any call goes out.
    let queries = groups
        .iter()
        .map(|group| {
            group
                .date
                .map(|date| {
                    WeatherQuery::for_records(
                        group.records(),
                        date,
                        days_prior,
                        &variables,
                        &options.timezone,
                    )
                })
                .transpose()
        })
        .collect::<Result<Vec<_>, _>>()?;

    for (group, query) in groups.iter().zip(queries) {
        let (Some(date), Some(query)) = (group.date, query) else {
            observer.on_missing_date_group(group.len());
            for (position, record) in &group.members {
                slots[*position] = Some(FeatureRow::missing(record.id, &columns));
            }
            continue;
        };

        if completed > 0 && !options.sleep_interval.is_zero() {
            tokio::time::sleep(options.sleep_interval).await;
        }

        observer.on_request(&query);

        let forecasts = source.fetch(&query).await?.into_forecasts();
        if forecasts.len() != group.len() {
            return Err(WeatherDataError::ShapeMismatch {
                date,
                expected: group.len(),
                found: forecasts.len(),
            }
            .into());
        }

        for ((position, record), forecast) in group.members.iter().zip(&forecasts) {
            slots[*position] = Some(reshape(
                forecast,
                record.id,
                &variables,
                days_prior,
                options.include_deltas,
            ));
        }

        completed += 1;
        observer.on_group_complete(date, completed, dated_groups);
    }

    Ok(slots.into_iter().flatten().collect())
}
