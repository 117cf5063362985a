use crate::weather_data::error::WeatherDataError;
use polars::error::PolarsError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ContextError {
    #[error(transparent)]
    WeatherData(#[from] WeatherDataError),

    #[error("Cannot convert values of column '{column}': {message}")]
    TypeConversion { column: String, message: String },

    #[error("Required column '{0}' not found in DataFrame")]
    MissingColumn(String, #[source] PolarsError),

    #[error("Failed processing DataFrame: {0}")]
    Polars(#[from] PolarsError),

    #[error("At least one daily weather variable must be requested")]
    NoDailyVariables,

    #[error("days_prior must be at least 1, got {0}")]
    InvalidDaysPrior(usize),

    #[error("Cyclic period must be a positive finite number, got {0}")]
    InvalidPeriod(f64),

    #[error("Failed to create directory '{0}'")]
    DirCreation(PathBuf, #[source] std::io::Error),

    #[error("Failed to write file '{0}'")]
    FileWrite(PathBuf, #[source] std::io::Error),
}

impl ContextError {
    pub(crate) fn type_conversion(column: &str, message: impl Into<String>) -> Self {
        ContextError::TypeConversion {
            column: column.to_string(),
            message: message.into(),
        }
    }
}
