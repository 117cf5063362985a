//! Coordinate and date normalisation.
//!
//! Coordinates are rounded to a fixed precision so that nearby duplicates share
//! one key, and dates are rendered as ISO `YYYY-MM-DD` strings for grouping and
//! for the weather API's `start_date`/`end_date` parameters.

use crate::error::ContextError;
use chrono::{NaiveDate, NaiveDateTime};

/// Number of decimal places kept for latitude/longitude (~111 m).
pub const COORD_PRECISION: i32 = 3;

const DATE_FORMAT: &str = "%Y-%m-%d";

const DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

const DATE_FORMATS: [&str; 3] = [DATE_FORMAT, "%m/%d/%Y", "%Y/%m/%d"];

/// Rounds a coordinate to [`COORD_PRECISION`] decimal places.
///
/// # Errors
///
/// Returns [`ContextError::TypeConversion`] for NaN or infinite input, which
/// cannot be sent to the weather API.
///
/// # Examples
///
/// ```
/// use stranding_context::normalize_coord;
///
/// assert_eq!(normalize_coord(34.123456).unwrap(), 34.123);
/// assert_eq!(normalize_coord(-77.98765).unwrap(), -77.988);
/// ```
pub fn normalize_coord(value: f64) -> Result<f64, ContextError> {
    if !value.is_finite() {
        return Err(ContextError::type_conversion(
            "coordinate",
            format!("{value} is not a finite number"),
        ));
    }
    let scale = 10f64.powi(COORD_PRECISION);
    Ok((value * scale).round() / scale)
}

/// Formats a calendar date as `YYYY-MM-DD`.
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Parses a date-like string, discarding any time-of-day component.
///
/// Unparseable input yields `None` instead of an error so that rows with bad
/// dates still end up in a (missing-date) group.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(trimmed, fmt).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(trimmed, fmt).ok())
                .map(|dt| dt.date())
        })
        .or_else(|| {
            chrono::DateTime::parse_from_rfc3339(trimmed)
                .ok()
                .map(|dt| dt.date_naive())
        })
}

/// Normalises a date-like string to `YYYY-MM-DD`, or `None` when it cannot be parsed.
///
/// # Examples
///
/// ```
/// use stranding_context::normalize_date;
///
/// assert_eq!(normalize_date("2019-05-01 13:45:00").as_deref(), Some("2019-05-01"));
/// assert_eq!(normalize_date("05/02/2019").as_deref(), Some("2019-05-02"));
/// assert_eq!(normalize_date("not a date"), None);
/// ```
pub fn normalize_date(value: &str) -> Option<String> {
    parse_date(value).map(format_date)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_coord_rounds_to_three_places() {
        assert_eq!(normalize_coord(35.22449).unwrap(), 35.224);
        assert_eq!(normalize_coord(35.2245001).unwrap(), 35.225);
        assert_eq!(normalize_coord(-75.53).unwrap(), -75.53);
        assert_eq!(normalize_coord(0.0).unwrap(), 0.0);
    }

    #[test]
    fn test_normalize_coord_is_idempotent() {
        for value in [
            34.0001, 34.0005, -76.6789123, 89.9999, -179.99951, 12.3456789, 0.0004999,
        ] {
            let once = normalize_coord(value).unwrap();
            let twice = normalize_coord(once).unwrap();
            assert_eq!(once, twice, "normalising {value} twice changed the result");

            // At most three decimals survive.
            let scaled = once * 1000.0;
            assert!((scaled - scaled.round()).abs() < 1e-6);
        }
    }

    #[test]
    fn test_normalize_coord_rejects_non_finite() {
        assert!(matches!(
            normalize_coord(f64::NAN),
            Err(ContextError::TypeConversion { .. })
        ));
        assert!(normalize_coord(f64::INFINITY).is_err());
    }

    #[test]
    fn test_normalize_date_formats() {
        assert_eq!(normalize_date("2019-05-01").as_deref(), Some("2019-05-01"));
        assert_eq!(
            normalize_date("2019-05-01T23:59:59").as_deref(),
            Some("2019-05-01")
        );
        assert_eq!(
            normalize_date("2019-05-01 08:00:00.250").as_deref(),
            Some("2019-05-01")
        );
        assert_eq!(
            normalize_date("2019-05-01T08:00:00-04:00").as_deref(),
            Some("2019-05-01")
        );
        assert_eq!(normalize_date("  12/31/2018 ").as_deref(), Some("2018-12-31"));
    }

    #[test]
    fn test_normalize_date_coerces_garbage_to_none() {
        assert_eq!(normalize_date(""), None);
        assert_eq!(normalize_date("unknown"), None);
        assert_eq!(normalize_date("2019-02-30"), None);
    }
}
