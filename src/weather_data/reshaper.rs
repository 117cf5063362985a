//! Pivots one location's daily series into flat `{variable}_{n}_days_prior` columns.

use crate::types::feature_row::{delta_column, has_delta, value_column, FeatureRow};
use crate::types::forecast::Forecast;
use log::{debug, warn};

/// Reshapes `forecast` into the feature row of record `record_id`.
///
/// Each series is aligned from its end: the last entry is the event day
/// (`0_days_prior`), the one before it `1_days_prior`, and so on. Series shorter
/// than `days_prior` leave the earliest days missing, longer ones have their
/// surplus leading days ignored.
///
/// With `include_deltas`, offsets that have a previous day inside the window
/// (see [`crate::feature_columns`]) also get `value(n) - value(n + 1)`. A delta
/// with a missing operand is missing. Missing variables, short series, nulls and
/// non-numeric entries all become `None`; reshaping never fails.
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use stranding_context::{reshape, Forecast};
/// use std::collections::HashMap;
///
/// let forecast = Forecast::with_daily(
///     vec!["2019-04-29".into(), "2019-04-30".into(), "2019-05-01".into()],
///     HashMap::from([("temperature_2m_max".to_string(), json!([10.0, 12.0, 15.0]))]),
/// );
/// let row = reshape(&forecast, 0, &["temperature_2m_max".to_string()], 3, true);
///
/// assert_eq!(row.get("temperature_2m_max_2_days_prior"), Some(Some(10.0)));
/// assert_eq!(row.get("temperature_2m_max_0_days_prior"), Some(Some(15.0)));
/// assert_eq!(row.get("temperature_2m_max_1_days_prior_delta"), Some(Some(2.0)));
/// assert_eq!(row.get("temperature_2m_max_2_days_prior_delta"), None);
/// ```
pub fn reshape(
    forecast: &Forecast,
    record_id: usize,
    daily_variables: &[String],
    days_prior: usize,
    include_deltas: bool,
) -> FeatureRow {
    let daily = forecast.daily.as_ref();
    if let Some(daily) = daily {
        if daily.time.len() != days_prior {
            warn!(
                "Record {}: expected {} days of weather data, got {}; aligning from the most recent day",
                record_id,
                days_prior,
                daily.time.len()
            );
        }
    } else {
        debug!("Record {}: forecast has no daily block", record_id);
    }

    let mut values = Vec::with_capacity(daily_variables.len() * days_prior * 2);
    for variable in daily_variables {
        let series = daily.and_then(|d| d.series(variable)).unwrap_or_else(|| {
            debug!("Record {}: variable '{}' missing from payload", record_id, variable);
            Vec::new()
        });
        let value_at = |n: usize| -> Option<f64> {
            series
                .len()
                .checked_sub(n + 1)
                .and_then(|index| series[index])
        };

        for n in (0..days_prior).rev() {
            let value = value_at(n);
            values.push((value_column(variable, n), value));

            if include_deltas && has_delta(n, days_prior) {
                let delta = match (value, value_at(n + 1)) {
                    (Some(current), Some(previous)) => Some(current - previous),
                    _ => None,
                };
                values.push((delta_column(variable, n), delta));
            }
        }
    }

    FeatureRow::new(record_id, values)
}
