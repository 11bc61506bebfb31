use anyhow::{Context, Result};
use chrono::DateTime;
use polars::prelude::*;
use std::path::Path;
use std::str::FromStr;

use crate::core::domain::{DayPeriod, FlightRecord};
use crate::features::generator::{
    COL_ACTUAL, COL_DAY_PERIOD, COL_DELAY_15, COL_HIGH_SEASON, COL_MIN_DIFF, COL_SCHEDULED,
};

/// Parse a flights CSV file into a Polars DataFrame.
///
/// The two departure timestamp columns are kept as raw strings; conversion
/// to typed timestamps is `FeatureGenerator::convert_dates`'s job.
pub fn parse_flights_csv(csv_path: &Path) -> Result<DataFrame> {
    let df = CsvReadOptions::default()
        .with_has_header(true)
        .try_into_reader_with_file_path(Some(csv_path.into()))?
        .finish()
        .context("Failed to parse CSV into DataFrame")?;

    normalize_timestamp_columns(df)
}

/// Parse flights CSV data from an in-memory string.
pub fn parse_flights_csv_str(data: &str) -> Result<DataFrame> {
    let df = CsvReadOptions::default()
        .with_has_header(true)
        .into_reader_with_file_handle(std::io::Cursor::new(data))
        .finish()
        .context("Failed to parse CSV string into DataFrame")?;

    normalize_timestamp_columns(df)
}

/// Cast the timestamp columns to String in case the reader inferred
/// something else for them.
fn normalize_timestamp_columns(df: DataFrame) -> Result<DataFrame> {
    let column_names: Vec<String> = df
        .get_column_names()
        .iter()
        .map(|s| s.to_string())
        .collect();

    let mut lazy_df = df.lazy();
    for col_name in [COL_SCHEDULED, COL_ACTUAL] {
        if column_names.contains(&col_name.to_string()) {
            lazy_df = lazy_df.with_column(col(col_name).cast(DataType::String));
        }
    }

    lazy_df
        .collect()
        .context("Failed to cast timestamp columns to strings")
}

/// Convert a DataFrame with typed timestamp columns to FlightRecord structures.
///
/// Derived feature columns are optional; absent ones stay `None` on the
/// records.
pub fn dataframe_to_records(df: &DataFrame) -> Result<Vec<FlightRecord>> {
    let height = df.height();

    let scheduled = df
        .column(COL_SCHEDULED)?
        .i64()
        .context("Fecha-I is not a typed timestamp column; run convert_dates first")?;
    let actual = df
        .column(COL_ACTUAL)?
        .i64()
        .context("Fecha-O is not a typed timestamp column; run convert_dates first")?;

    let high_season = df.column(COL_HIGH_SEASON).ok().and_then(|c| c.bool().ok());
    let delay_minutes = df.column(COL_MIN_DIFF).ok().and_then(|c| c.i64().ok());
    let delayed_15 = df.column(COL_DELAY_15).ok().and_then(|c| c.bool().ok());
    let day_periods = df.column(COL_DAY_PERIOD).ok().and_then(|c| c.str().ok());

    let mut records = Vec::with_capacity(height);
    for i in 0..height {
        let scheduled_departure = epoch_to_datetime(scheduled.get(i), COL_SCHEDULED, i)?;
        let actual_departure = epoch_to_datetime(actual.get(i), COL_ACTUAL, i)?;

        records.push(FlightRecord {
            scheduled_departure,
            actual_departure,
            high_season: high_season.and_then(|col| col.get(i)),
            delay_minutes: delay_minutes.and_then(|col| col.get(i)),
            delayed_15: delayed_15.and_then(|col| col.get(i)),
            day_period: day_periods
                .and_then(|col| col.get(i))
                .and_then(|s| DayPeriod::from_str(s).ok()),
        });
    }

    Ok(records)
}

/// Convert FlightRecord structures to a Polars DataFrame.
pub fn records_to_dataframe(records: &[FlightRecord]) -> Result<DataFrame> {
    let n = records.len();

    let mut scheduled = Vec::with_capacity(n);
    let mut actual = Vec::with_capacity(n);
    let mut high_season = Vec::with_capacity(n);
    let mut delay_minutes = Vec::with_capacity(n);
    let mut delayed_15 = Vec::with_capacity(n);
    let mut day_periods = Vec::with_capacity(n);

    for record in records {
        scheduled.push(record.scheduled_departure.and_utc().timestamp());
        actual.push(record.actual_departure.and_utc().timestamp());
        high_season.push(record.high_season);
        delay_minutes.push(record.delay_minutes);
        delayed_15.push(record.delayed_15);
        day_periods.push(record.day_period.map(|p| p.as_str().to_string()));
    }

    let df = df!(
        COL_SCHEDULED => scheduled,
        COL_ACTUAL => actual,
        COL_HIGH_SEASON => high_season,
        COL_MIN_DIFF => delay_minutes,
        COL_DELAY_15 => delayed_15,
        COL_DAY_PERIOD => day_periods,
    )?;

    Ok(df)
}

fn epoch_to_datetime(
    value: Option<i64>,
    column: &str,
    row: usize,
) -> Result<chrono::NaiveDateTime> {
    let secs = value.with_context(|| format!("Missing {} at row {}", column, row))?;
    let dt = DateTime::from_timestamp(secs, 0)
        .with_context(|| format!("{} out of range at row {}: {}", column, row, secs))?;
    Ok(dt.naive_utc())
}
