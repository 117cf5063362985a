//! Weather context for marine mammal stranding records.
//!
//! Every stranding (a location plus an event date) is enriched with the daily
//! weather of the days leading up to it, fetched in batches from the Open-Meteo
//! historical forecast API. Records sharing an event date are served by a single
//! request, and the returned series are reshaped into fixed
//! `{variable}_{n}_days_prior` columns (with optional `_delta` columns).
//!
//! The crate also carries a few helpers used when preparing stranding data:
//! season labels, date assembly from day/month/year columns, cyclic encodings
//! and a downloader for the raw NOAA dataset.

mod error;
mod frame;
mod normalize;
mod progress;
mod raw_data;
mod transformations;
mod types;
mod utils;
mod weather_context;
mod weather_data;

pub use error::ContextError;
pub use weather_context::*;

pub use frame::{features_to_frame, read_records};
pub use normalize::{format_date, normalize_coord, normalize_date, parse_date, COORD_PRECISION};
pub use progress::{EnrichmentObserver, LogObserver, NoopObserver};
pub use raw_data::{download_dataset, DEFAULT_RAW_DIR, STRANDINGS_DATASET_URL};
pub use transformations::{
    make_cyclic, make_cyclic_frame, make_cyclic_season, make_dt_col, make_season_col,
};
pub use utils::ensure_dir_exists;

pub use types::feature_row::{delta_column, feature_columns, value_column, FeatureRow};
pub use types::forecast::{DailySeries, Forecast, WeatherResponse};
pub use types::season::Season;
pub use types::stranding_record::StrandingRecord;
pub use types::weather_query::WeatherQuery;

pub use weather_data::batcher::{group_by_date, DateGroup};
pub use weather_data::client::{OpenMeteoClient, WeatherSource, DEFAULT_BASE_URL, DEFAULT_TIMEOUT};
pub use weather_data::error::WeatherDataError;
pub use weather_data::orchestrator::{
    enrich_records, EnrichmentOptions, DEFAULT_DAYS_PRIOR, DEFAULT_SLEEP_INTERVAL,
    DEFAULT_TIMEZONE,
};
pub use weather_data::reshaper::reshape;
