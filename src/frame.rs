//! Conversion between polars `DataFrame`s and the enrichment types.

use crate::error::ContextError;
use crate::normalize::parse_date;
use crate::types::feature_row::FeatureRow;
use crate::types::stranding_record::StrandingRecord;
use chrono::{DateTime, Datelike, NaiveDate, Utc};
use chrono_tz::Tz;
use polars::prelude::*;

// Polars dates are days since 1970-01-01, chrono counts from 0001-01-01.
const UNIX_EPOCH_DAYS_FROM_CE: i32 = 719_163;

pub(crate) fn date_from_days(days: i32) -> Option<NaiveDate> {
    NaiveDate::from_num_days_from_ce_opt(days + UNIX_EPOCH_DAYS_FROM_CE)
}

pub(crate) fn days_from_date(date: NaiveDate) -> i32 {
    date.num_days_from_ce() - UNIX_EPOCH_DAYS_FROM_CE
}

fn get_column<'a>(frame: &'a DataFrame, name: &str) -> Result<&'a Column, ContextError> {
    frame
        .column(name)
        .map_err(|e| ContextError::MissingColumn(name.to_string(), e))
}

/// Reads a numeric coordinate column. Strings holding numbers are accepted,
/// anything else (including nulls) is a [`ContextError::TypeConversion`].
pub(crate) fn coordinate_values(column: &Column, name: &str) -> Result<Vec<f64>, ContextError> {
    let as_float = column
        .strict_cast(&DataType::Float64)
        .map_err(|e| ContextError::type_conversion(name, e.to_string()))?;

    as_float
        .f64()?
        .into_iter()
        .enumerate()
        .map(|(row, value)| {
            value.ok_or_else(|| ContextError::type_conversion(name, format!("null value in row {row}")))
        })
        .collect()
}

/// Reads a date-like column as calendar dates.
///
/// `Date` and `Datetime` columns are truncated to the day, `String` columns are
/// parsed leniently; values that cannot be interpreted become `None`. Zoned
/// datetimes are truncated in their own time zone, not in UTC.
pub(crate) fn date_values(column: &Column, name: &str) -> Result<Vec<Option<NaiveDate>>, ContextError> {
    match column.dtype() {
        DataType::Date => Ok(days_to_dates(column.date()?)),
        DataType::Datetime(unit, Some(time_zone)) => {
            local_dates(column, *unit, time_zone.as_str(), name)
        }
        DataType::Datetime(_, None) => {
            let as_date = column.cast(&DataType::Date)?;
            Ok(days_to_dates(as_date.date()?))
        }
        DataType::String => Ok(column
            .str()?
            .into_iter()
            .map(|value| value.and_then(parse_date))
            .collect()),
        other => Err(ContextError::type_conversion(
            name,
            format!("expected a date, datetime or string column, found {other}"),
        )),
    }
}

fn utc_from_timestamp(value: i64, unit: TimeUnit) -> Option<DateTime<Utc>> {
    match unit {
        TimeUnit::Milliseconds => DateTime::from_timestamp_millis(value),
        TimeUnit::Microseconds => DateTime::from_timestamp_micros(value),
        TimeUnit::Nanoseconds => Some(DateTime::from_timestamp_nanos(value)),
    }
}

fn local_dates(
    column: &Column,
    unit: TimeUnit,
    time_zone: &str,
    name: &str,
) -> Result<Vec<Option<NaiveDate>>, ContextError> {
    let tz: Tz = time_zone
        .parse()
        .map_err(|_| ContextError::type_conversion(name, format!("unknown time zone '{time_zone}'")))?;
    Ok(column
        .datetime()?
        .into_iter()
        .map(|stamp| {
            stamp
                .and_then(|v| utc_from_timestamp(v, unit))
                .map(|utc| utc.with_timezone(&tz).date_naive())
        })
        .collect())
}

fn days_to_dates(dates: &DateChunked) -> Vec<Option<NaiveDate>> {
    dates
        .into_iter()
        .map(|days| days.and_then(date_from_days))
        .collect()
}

/// Extracts one [`StrandingRecord`] per row of `frame`, using the row position as id.
///
/// # Errors
///
/// Returns [`ContextError::MissingColumn`] when a named column does not exist and
/// [`ContextError::TypeConversion`] for non-numeric or null coordinates or an
/// unsupported date column type.
pub fn read_records(
    frame: &DataFrame,
    lat_column: &str,
    lon_column: &str,
    date_column: &str,
) -> Result<Vec<StrandingRecord>, ContextError> {
    let latitudes = coordinate_values(get_column(frame, lat_column)?, lat_column)?;
    let longitudes = coordinate_values(get_column(frame, lon_column)?, lon_column)?;
    let dates = date_values(get_column(frame, date_column)?, date_column)?;

    Ok(latitudes
        .into_iter()
        .zip(longitudes)
        .zip(dates)
        .enumerate()
        .map(|(id, ((latitude, longitude), event_date))| {
            StrandingRecord::new(id, latitude, longitude, event_date)
        })
        .collect())
}

/// Builds a `Float64` frame with one column per entry of `columns` and one row per
/// feature row, in order. Missing values become nulls.
pub fn features_to_frame(rows: &[FeatureRow], columns: &[String]) -> Result<DataFrame, ContextError> {
    let series: Vec<Column> = columns
        .iter()
        .map(|name| {
            let values: Vec<Option<f64>> = rows.iter().map(|row| row.get(name).flatten()).collect();
            Column::new(name.as_str().into(), values)
        })
        .collect();
    Ok(DataFrame::new(series)?)
}
