//! Time-based feature helpers: season labels, date assembly and cyclic encodings.
//!
//! These operate on polars `Series` and are independent of the weather enrichment.

use crate::error::ContextError;
use crate::frame::{date_values, days_from_date};
use crate::types::season::Season;
use chrono::{Month, NaiveDate};
use polars::prelude::*;
use std::f64::consts::PI;

fn series_dates(dates: &Series) -> Result<Vec<Option<NaiveDate>>, ContextError> {
    let name = dates.name().to_string();
    date_values(&Column::from(dates.clone()), &name)
}

/// Labels every date with its [`Season`] name (`spring`, `summer`, `autumn`, `winter`).
///
/// Accepts `Date`, `Datetime` or `String` series. Values that are not valid dates
/// become null. The result keeps the input's name.
pub fn make_season_col(dates: &Series) -> Result<Series, ContextError> {
    let seasons: Vec<Option<&str>> = series_dates(dates)?
        .into_iter()
        .map(|date| date.map(|d| Season::from_date(d).name()))
        .collect();
    Ok(Series::new(dates.name().clone(), seasons))
}

fn parse_month(value: &str) -> Option<u32> {
    let trimmed = value.trim();
    trimmed
        .parse::<u32>()
        .ok()
        .or_else(|| trimmed.parse::<Month>().ok().map(|m| m.number_from_month()))
}

fn integer_values(series: &Series) -> Result<Vec<Option<i64>>, ContextError> {
    let cast = series.cast(&DataType::Int64)?;
    Ok(cast.i64()?.into_iter().collect())
}

/// Combines day, month and year series into a `Date` series named `date`.
///
/// Months may be numeric or month names such as `Jan`/`January` (case-insensitive).
/// Rows that do not form a valid calendar date are null.
///
/// # Errors
///
/// Returns [`ContextError::TypeConversion`] if the series lengths differ.
pub fn make_dt_col(day: &Series, month: &Series, year: &Series) -> Result<Series, ContextError> {
    if day.len() != month.len() || day.len() != year.len() {
        return Err(ContextError::type_conversion(
            "date",
            format!(
                "day, month and year lengths differ ({}, {}, {})",
                day.len(),
                month.len(),
                year.len()
            ),
        ));
    }

    let months: Vec<Option<u32>> = match month.dtype() {
        DataType::String => month
            .str()?
            .into_iter()
            .map(|m| m.and_then(parse_month))
            .collect(),
        _ => integer_values(month)?
            .into_iter()
            .map(|m| m.and_then(|m| u32::try_from(m).ok()))
            .collect(),
    };
    let days = integer_values(day)?;
    let years = integer_values(year)?;

    let dates: Vec<Option<i32>> = years
        .into_iter()
        .zip(months)
        .zip(days)
        .map(|((y, m), d)| {
            let (y, m, d) = (y?, m?, d?);
            let date = NaiveDate::from_ymd_opt(i32::try_from(y).ok()?, m, u32::try_from(d).ok()?)?;
            Some(days_from_date(date))
        })
        .collect();

    Ok(Series::new("date".into(), dates).cast(&DataType::Date)?)
}

fn cyclic_names(series: &Series, name: Option<&str>) -> (String, String) {
    let base = match name {
        Some(name) => name.to_string(),
        None if !series.name().is_empty() => series.name().to_string(),
        None => "unnamed".to_string(),
    };
    (format!("{base}_sin"), format!("{base}_cos"))
}

/// Encodes a periodic numeric series as a `(sin, cos)` pair of `Float32` series.
///
/// Each value `x` maps to `sin(2πx / period)` and `cos(2πx / period)`, so the
/// first and last positions of a cycle end up next to each other. The outputs
/// are named `{name}_sin` and `{name}_cos`, where `name` defaults to the input
/// series' name (or `unnamed`). Nulls stay null.
///
/// # Errors
///
/// Returns [`ContextError::InvalidPeriod`] unless `period` is finite and positive,
/// and [`ContextError::TypeConversion`] for non-numeric input.
///
/// # Examples
///
/// ```
/// use polars::prelude::*;
/// use stranding_context::make_cyclic;
///
/// let months = Series::new("month".into(), [0i32, 3, 6]);
/// let (sin, cos) = make_cyclic(&months, 12.0, None)?;
///
/// assert_eq!(sin.name().as_str(), "month_sin");
/// assert_eq!(sin.f32()?.get(0), Some(0.0));
/// assert_eq!(cos.f32()?.get(0), Some(1.0));
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn make_cyclic(
    series: &Series,
    period: f64,
    name: Option<&str>,
) -> Result<(Series, Series), ContextError> {
    if !period.is_finite() || period <= 0.0 {
        return Err(ContextError::InvalidPeriod(period));
    }
    let column_name = series.name().to_string();
    if matches!(series.dtype(), DataType::String | DataType::Date | DataType::Datetime(_, _)) {
        return Err(ContextError::type_conversion(
            &column_name,
            format!("cyclic encoding needs numeric values, found {}", series.dtype()),
        ));
    }
    let values = series
        .strict_cast(&DataType::Float64)
        .map_err(|e| ContextError::type_conversion(&column_name, e.to_string()))?;

    let radians: Vec<Option<f64>> = values
        .f64()?
        .into_iter()
        .map(|v| v.map(|x| 2.0 * PI * x / period))
        .collect();
    let sin: Vec<Option<f32>> = radians.iter().map(|r| r.map(|r| r.sin() as f32)).collect();
    let cos: Vec<Option<f32>> = radians.iter().map(|r| r.map(|r| r.cos() as f32)).collect();

    let (sin_name, cos_name) = cyclic_names(series, name);
    Ok((
        Series::new(sin_name.into(), sin),
        Series::new(cos_name.into(), cos),
    ))
}

/// Like [`make_cyclic`], returning the pair as a two-column `DataFrame`.
pub fn make_cyclic_frame(
    series: &Series,
    period: f64,
    name: Option<&str>,
) -> Result<DataFrame, ContextError> {
    let (sin, cos) = make_cyclic(series, period, name)?;
    Ok(DataFrame::new(vec![sin.into(), cos.into()])?)
}

/// Cyclic encoding of the season of each date (period 4, spring = 0).
///
/// Outputs are named `{name}_sin`/`{name}_cos`, `name` defaulting to `season`.
pub fn make_cyclic_season(
    dates: &Series,
    name: Option<&str>,
) -> Result<(Series, Series), ContextError> {
    let indices: Vec<Option<f64>> = series_dates(dates)?
        .into_iter()
        .map(|date| date.map(|d| f64::from(Season::from_date(d).index())))
        .collect();
    let seasons = Series::new(name.unwrap_or("season").into(), indices);
    make_cyclic(&seasons, 4.0, None)
}
