//! Per-table feature generation over the flights DataFrame.
//!
//! `FeatureGenerator` owns the in-memory table and derives the four synthetic
//! columns from the two departure timestamps. Each step vectorizes a pure
//! function from [`crate::core::domain`]; the DataFrame holds all state.

use chrono::{DateTime, NaiveDateTime};
use polars::prelude::*;
use std::path::Path;

use crate::core::domain;
use crate::features::error::{FeatureError, FeatureResult};

/// Raw scheduled departure timestamp column.
pub const COL_SCHEDULED: &str = "Fecha-I";
/// Raw actual departure timestamp column.
pub const COL_ACTUAL: &str = "Fecha-O";
/// High-season flag column.
pub const COL_HIGH_SEASON: &str = "temporada_alta";
/// Signed delay-minutes column.
pub const COL_MIN_DIFF: &str = "dif_min";
/// 15-minute delay flag column.
pub const COL_DELAY_15: &str = "atraso_15";
/// Day-period category column.
pub const COL_DAY_PERIOD: &str = "periodo_dia";

/// Timestamp format of the raw departure columns.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// The exported synthetic columns, in contract order, with the generation
/// step that produces each. Column order and presence are a compatibility
/// contract for downstream consumers.
pub const SYNTHETIC_FEATURES: [(&str, &str); 4] = [
    (COL_HIGH_SEASON, "generate_seasonality"),
    (COL_MIN_DIFF, "generate_min_diff"),
    (COL_DELAY_15, "generate_15_delay"),
    (COL_DAY_PERIOD, "generate_day_period"),
];

/// Feature generator over an in-memory flights table.
///
/// All steps require [`convert_dates`](Self::convert_dates) first;
/// [`generate_15_delay`](Self::generate_15_delay) additionally requires
/// [`generate_min_diff`](Self::generate_min_diff). Steps that are invoked
/// out of order fail with a descriptive error instead of a raw column
/// lookup failure. [`crate::features::pipeline::FeaturePipeline`] runs the
/// whole chain in a fixed order.
///
/// # Examples
///
/// ```
/// use flights_rust::features::generator::FeatureGenerator;
/// use polars::prelude::*;
///
/// let df = df!(
///     "Fecha-I" => ["2017-12-25 20:00:00"],
///     "Fecha-O" => ["2017-12-25 20:20:00"],
/// ).unwrap();
///
/// let mut generator = FeatureGenerator::new(df);
/// generator.convert_dates().unwrap();
/// generator.generate_min_diff().unwrap();
/// generator.generate_15_delay().unwrap();
/// generator.generate_seasonality().unwrap();
/// generator.generate_day_period().unwrap();
///
/// let features = generator.synthetic_features().unwrap();
/// assert_eq!(features.width(), 4);
/// ```
pub struct FeatureGenerator {
    data: DataFrame,
}

impl FeatureGenerator {
    /// Wraps a loaded flights DataFrame.
    pub fn new(data: DataFrame) -> Self {
        Self { data }
    }

    /// The current table, including any derived columns.
    pub fn data(&self) -> &DataFrame {
        &self.data
    }

    /// Consumes the generator and returns the table.
    pub fn into_data(self) -> DataFrame {
        self.data
    }

    /// Parses the two raw timestamp columns into typed epoch-second columns.
    ///
    /// Unparseable cells abort with the column, row, and offending value.
    pub fn convert_dates(&mut self) -> FeatureResult<()> {
        let scheduled = parse_timestamp_column(&self.data, COL_SCHEDULED)?;
        let actual = parse_timestamp_column(&self.data, COL_ACTUAL)?;

        self.data
            .with_column(Series::new(COL_SCHEDULED.into(), to_epoch_seconds(&scheduled)))?;
        self.data
            .with_column(Series::new(COL_ACTUAL.into(), to_epoch_seconds(&actual)))?;
        Ok(())
    }

    /// Sets the high-season flag from the scheduled departure's month/day.
    pub fn generate_seasonality(&mut self) -> FeatureResult<()> {
        let scheduled = self.timestamp_column(COL_SCHEDULED)?;
        let flags: Vec<bool> = scheduled
            .iter()
            .map(|dt| domain::is_high_season(dt.date()))
            .collect();

        self.data
            .with_column(Series::new(COL_HIGH_SEASON.into(), flags))?;
        Ok(())
    }

    /// Computes signed delay minutes between actual and scheduled departure.
    ///
    /// Negative values mean the flight left early; the sign is preserved.
    pub fn generate_min_diff(&mut self) -> FeatureResult<()> {
        let scheduled = self.timestamp_column(COL_SCHEDULED)?;
        let actual = self.timestamp_column(COL_ACTUAL)?;

        let minutes: Vec<i64> = scheduled
            .iter()
            .zip(actual.iter())
            .map(|(s, a)| domain::delay_minutes(*s, *a))
            .collect();

        self.data
            .with_column(Series::new(COL_MIN_DIFF.into(), minutes))?;
        Ok(())
    }

    /// Flags departures whose delay exceeds 15 minutes.
    ///
    /// Fails with a missing-feature error when `dif_min` has not been
    /// generated yet.
    pub fn generate_15_delay(&mut self) -> FeatureResult<()> {
        let minutes = self
            .data
            .column(COL_MIN_DIFF)
            .map_err(|_| FeatureError::MissingFeature {
                column: COL_MIN_DIFF,
                step: "generate_min_diff",
            })?
            .i64()?;

        let flags: Vec<Option<bool>> = minutes
            .into_iter()
            .map(|m| m.map(domain::is_delayed_15))
            .collect();

        self.data
            .with_column(Series::new(COL_DELAY_15.into(), flags))?;
        Ok(())
    }

    /// Classifies the scheduled departure clock time into its day period.
    pub fn generate_day_period(&mut self) -> FeatureResult<()> {
        let scheduled = self.timestamp_column(COL_SCHEDULED)?;
        let periods: Vec<&str> = scheduled
            .iter()
            .map(|dt| domain::day_period(dt.time()).as_str())
            .collect();

        self.data
            .with_column(Series::new(COL_DAY_PERIOD.into(), periods))?;
        Ok(())
    }

    /// Selects the four synthetic columns in contract order.
    ///
    /// Fails with a missing-feature error naming the generation step to run
    /// if any of the four columns is absent.
    pub fn synthetic_features(&self) -> FeatureResult<DataFrame> {
        for (column, step) in SYNTHETIC_FEATURES {
            if self.data.column(column).is_err() {
                return Err(FeatureError::MissingFeature { column, step });
            }
        }

        let df = self
            .data
            .select(SYNTHETIC_FEATURES.iter().map(|(column, _)| *column))?;
        Ok(df)
    }

    /// Writes the four synthetic columns to a CSV file.
    pub fn export_synthetic_features(&self, path: &Path) -> FeatureResult<()> {
        let mut features = self.synthetic_features()?;

        let mut file = std::fs::File::create(path)?;
        CsvWriter::new(&mut file)
            .include_header(true)
            .finish(&mut features)?;
        Ok(())
    }

    /// Reads a typed epoch-second timestamp column back as chrono timestamps.
    fn timestamp_column(&self, column: &str) -> FeatureResult<Vec<NaiveDateTime>> {
        let col = self
            .data
            .column(column)
            .map_err(|_| FeatureError::MissingColumn(column.to_string()))?;
        let seconds = col.i64().map_err(|_| FeatureError::DatesNotConverted)?;

        let mut out = Vec::with_capacity(seconds.len());
        for (row, value) in seconds.into_iter().enumerate() {
            let secs = value.ok_or_else(|| FeatureError::TimestampParse {
                column: column.to_string(),
                row,
                reason: "null value".to_string(),
            })?;
            let dt = DateTime::from_timestamp(secs, 0).ok_or_else(|| {
                FeatureError::TimestampParse {
                    column: column.to_string(),
                    row,
                    reason: format!("epoch seconds out of range: {}", secs),
                }
            })?;
            out.push(dt.naive_utc());
        }
        Ok(out)
    }
}

/// Parse a raw string timestamp column into chrono timestamps.
fn parse_timestamp_column(df: &DataFrame, column: &str) -> FeatureResult<Vec<NaiveDateTime>> {
    let col = df
        .column(column)
        .map_err(|_| FeatureError::MissingColumn(column.to_string()))?;
    let raw = col.str()?;

    let mut out = Vec::with_capacity(raw.len());
    for (row, value) in raw.into_iter().enumerate() {
        let value = value.ok_or_else(|| FeatureError::TimestampParse {
            column: column.to_string(),
            row,
            reason: "null value".to_string(),
        })?;
        let parsed = NaiveDateTime::parse_from_str(value, TIMESTAMP_FORMAT).map_err(|e| {
            FeatureError::TimestampParse {
                column: column.to_string(),
                row,
                reason: format!("'{}' ({})", value, e),
            }
        })?;
        out.push(parsed);
    }
    Ok(out)
}

fn to_epoch_seconds(timestamps: &[NaiveDateTime]) -> Vec<i64> {
    timestamps.iter().map(|dt| dt.and_utc().timestamp()).collect()
}
