use chrono::NaiveDate;
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use serde_json::{json, Value};
use std::collections::HashMap;
use stranding_context::{group_by_date, reshape, Forecast, StrandingRecord};

const VARIABLES: [&str; 4] = [
    "temperature_2m_max",
    "temperature_2m_min",
    "precipitation_sum",
    "wind_speed_10m_max",
];

fn sample_forecast(days: usize) -> Forecast {
    let start = NaiveDate::from_ymd_opt(2019, 4, 1).unwrap_or_default();
    let time: Vec<String> = start
        .iter_days()
        .take(days)
        .map(|d| d.format("%Y-%m-%d").to_string())
        .collect();
    let values: HashMap<String, Value> = VARIABLES
        .iter()
        .enumerate()
        .map(|(i, v)| {
            let series: Vec<Value> = (0..days)
                .map(|k| if k % 11 == 0 { Value::Null } else { json!(i as f64 + k as f64 * 0.5) })
                .collect();
            (v.to_string(), Value::Array(series))
        })
        .collect();
    Forecast::with_daily(time, values)
}

fn bench_reshape(c: &mut Criterion) {
    let variables: Vec<String> = VARIABLES.iter().map(|v| v.to_string()).collect();
    let week = sample_forecast(7);
    let month = sample_forecast(30);

    c.bench_function("reshape_7_days", |b| {
        b.iter(|| reshape(black_box(&week), 0, &variables, 7, false))
    });
    c.bench_function("reshape_30_days_with_deltas", |b| {
        b.iter(|| reshape(black_box(&month), 0, &variables, 30, true))
    });
}

fn bench_group_by_date(c: &mut Criterion) {
    let start = NaiveDate::from_ymd_opt(2017, 1, 1).unwrap_or_default();
    let records: Vec<StrandingRecord> = (0..2_000)
        .map(|i| {
            let date = if i % 50 == 0 { None } else { start.checked_add_days(chrono::Days::new(i as u64 % 365)) };
            StrandingRecord::new(i, 35.0 + (i % 7) as f64 * 0.1, -75.5, date)
        })
        .collect();

    c.bench_function("group_by_date_2000_records", |b| {
        b.iter(|| group_by_date(black_box(&records)))
    });
}

criterion_group!(benches, bench_reshape, bench_group_by_date);
criterion_main!(benches);
