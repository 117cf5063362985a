//! The outbound request for one date group.

use crate::error::ContextError;
use crate::normalize::{format_date, normalize_coord};
use crate::types::stranding_record::StrandingRecord;
use chrono::{Days, NaiveDate};

/// Parameters of one historical-weather call covering every record of a date group.
///
/// `latitudes` and `longitudes` are positionally aligned with the records the
/// query was built from, and the API answers with one forecast per position.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherQuery {
    pub latitudes: Vec<f64>,
    pub longitudes: Vec<f64>,
    /// First day of the window, `end_date - (days_prior - 1)`.
    pub start_date: NaiveDate,
    /// The event date.
    pub end_date: NaiveDate,
    /// Daily variable names, deduplicated in first-seen order.
    pub variables: Vec<String>,
    /// IANA timezone name, e.g. `America/New_York`.
    pub timezone: String,
}

impl WeatherQuery {
    /// Builds the query for `records` sharing `end_date`, covering a window of
    /// `days_prior` days that ends on (and includes) `end_date`.
    ///
    /// # Errors
    ///
    /// Returns [`ContextError::InvalidDaysPrior`] when `days_prior` is zero and
    /// [`ContextError::TypeConversion`] for non-finite coordinates or a window
    /// reaching before the supported calendar range.
    pub fn for_records<'a>(
        records: impl IntoIterator<Item = &'a StrandingRecord>,
        end_date: NaiveDate,
        days_prior: usize,
        variables: &[String],
        timezone: &str,
    ) -> Result<Self, ContextError> {
        if days_prior == 0 {
            return Err(ContextError::InvalidDaysPrior(days_prior));
        }
        let start_date = end_date
            .checked_sub_days(Days::new(days_prior as u64 - 1))
            .ok_or_else(|| {
                ContextError::type_conversion(
                    "event_date",
                    format!("{days_prior} days before {end_date} is out of range"),
                )
            })?;

        let mut latitudes = Vec::new();
        let mut longitudes = Vec::new();
        for record in records {
            latitudes.push(normalize_coord(record.latitude)?);
            longitudes.push(normalize_coord(record.longitude)?);
        }

        Ok(Self {
            latitudes,
            longitudes,
            start_date,
            end_date,
            variables: dedup_variables(variables),
            timezone: timezone.to_string(),
        })
    }

    /// Number of locations in the query.
    pub fn len(&self) -> usize {
        self.latitudes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.latitudes.is_empty()
    }

    /// Renders the query as URL parameters. Coordinate lists and variables are comma-joined.
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        vec![
            ("latitude", join(&self.latitudes)),
            ("longitude", join(&self.longitudes)),
            ("start_date", format_date(self.start_date)),
            ("end_date", format_date(self.end_date)),
            ("daily", self.variables.join(",")),
            ("timezone", self.timezone.clone()),
        ]
    }
}

fn join(values: &[f64]) -> String {
    values
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(",")
}

pub(crate) fn dedup_variables(variables: &[String]) -> Vec<String> {
    let mut seen = Vec::with_capacity(variables.len());
    for variable in variables {
        if !seen.contains(variable) {
            seen.push(variable.clone());
        }
    }
    seen
}
