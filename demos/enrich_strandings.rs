// demos/enrich_strandings.rs
use polars::prelude::*;
use std::time::Duration;
use stranding_context::{
    make_cyclic, make_cyclic_season, make_season_col, ContextError, EnrichmentOptions,
    OutputMode, WeatherContext,
};

#[tokio::main]
async fn main() -> Result<(), ContextError> {
    // Set RUST_LOG=info (or debug) to follow the requests
    env_logger::init();

    let strandings = df!(
        "National Database Number" => ["NC-2019-001", "NC-2019-002", "VA-2019-017"],
        "Latitude" => [35.2245, 34.7001, 36.8529],
        "Longitude" => [-75.5332, -76.6667, -75.9780],
        "Observation date" => ["2019-05-01", "2019-05-01", "2019-07-14"],
    )?;

    let options = EnrichmentOptions::builder()
        .daily_variables(vec![
            "temperature_2m_max".to_string(),
            "precipitation_sum".to_string(),
            "wind_speed_10m_max".to_string(),
        ])
        .days_prior(3)
        .include_deltas(true)
        .sleep_interval(Duration::from_secs(2))
        .build();

    let mut enriched = WeatherContext::new()
        .enrich()
        .frame(&strandings)
        .lat_column("Latitude")
        .lon_column("Longitude")
        .date_column("Observation date")
        .options(options)
        .mode(OutputMode::Append)
        .call()
        .await?;

    let dates = enriched.column("Observation date")?.as_materialized_series().clone();
    let (season_sin, season_cos) = make_cyclic_season(&dates, None)?;
    let season = make_season_col(&dates)?.with_name("season".into());

    let months = dates
        .str()?
        .into_iter()
        .map(|d| d.and_then(|d| d.get(5..7)).and_then(|m| m.parse::<i32>().ok()))
        .collect::<Vec<_>>();
    let (month_sin, month_cos) = make_cyclic(&Series::new("month".into(), months), 12.0, None)?;

    enriched.hstack_mut(&[
        season.into(),
        season_sin.into(),
        season_cos.into(),
        month_sin.into(),
        month_cos.into(),
    ])?;

    println!("Shape: {:?}", enriched.shape());
    println!("{}", enriched);
    Ok(())
}
