//! Progress hooks for enrichment runs.
//!
//! The pipeline reports what it is doing through an [`EnrichmentObserver`]
//! instead of printing, leaving the choice of output to the caller.

use crate::normalize::format_date;
use crate::types::weather_query::WeatherQuery;
use chrono::NaiveDate;
use log::{debug, info, warn};

/// Receives progress notifications from an enrichment run. All hooks default to no-ops.
pub trait EnrichmentObserver: Send + Sync {
    /// Called right before a query is sent to the weather source.
    fn on_request(&self, _query: &WeatherQuery) {}

    /// Called after the records of a date group have been reshaped.
    fn on_group_complete(&self, _date: NaiveDate, _completed: usize, _total: usize) {}

    /// Called once when records without a usable event date were found.
    fn on_missing_date_group(&self, _records: usize) {}
}

/// Ignores every notification.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl EnrichmentObserver for NoopObserver {}

/// Forwards notifications to the `log` facade.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogObserver;

impl EnrichmentObserver for LogObserver {
    fn on_request(&self, query: &WeatherQuery) {
        debug!(
            "Fetching {} to {} for {} locations",
            format_date(query.start_date),
            format_date(query.end_date),
            query.len()
        );
    }

    fn on_group_complete(&self, date: NaiveDate, completed: usize, total: usize) {
        let percent = if total == 0 {
            100.0
        } else {
            completed as f64 / total as f64 * 100.0
        };
        info!(
            "Weather context for {} done ({}/{} groups, {:.1}%)",
            date, completed, total, percent
        );
    }

    fn on_missing_date_group(&self, records: usize) {
        warn!(
            "{} records have no usable event date; their weather features will be missing",
            records
        );
    }
}
