use chrono::DateTime;
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

use crate::features::error::{FeatureError, FeatureResult};
use crate::features::generator::{COL_DELAY_15, COL_MIN_DIFF, COL_SCHEDULED};

/// Chart-ready categorical series for a bar visualization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BarChartData {
    pub labels: Vec<String>,
    pub counts: Vec<u32>,
    pub xlabel: String,
    pub ylabel: String,
    pub title: String,
}

/// Chart-ready numeric series for a scatter visualization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScatterChartData {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub xlabel: String,
    pub ylabel: String,
    pub title: String,
}

/// Per-category 15-minute delay rates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DelayRateData {
    pub labels: Vec<String>,
    pub rates: Vec<f64>,
    pub flights: Vec<u32>,
}

/// Summary statistics over the delay-minutes column.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DelayStats {
    pub count: usize,
    pub mean: f64,
    pub median: f64,
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
}

/// Count occurrences of each value in a column, most frequent first.
///
/// Nulls are skipped. Ties are broken by label so the output is stable.
pub fn value_counts(df: &DataFrame, column: &str) -> FeatureResult<(Vec<String>, Vec<u32>)> {
    let col = df
        .column(column)
        .map_err(|_| FeatureError::MissingColumn(column.to_string()))?;

    let mut counts: HashMap<String, u32> = HashMap::new();
    for i in 0..col.len() {
        if let Some(label) = label_at(col, i)? {
            *counts.entry(label).or_insert(0) += 1;
        }
    }

    let mut pairs: Vec<(String, u32)> = counts.into_iter().collect();
    pairs.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    Ok(pairs.into_iter().unzip())
}

/// Wrap an arbitrary label/count series with axis labels and a title.
pub fn general_distribution(
    labels: Vec<String>,
    counts: Vec<u32>,
    xlabel: &str,
    ylabel: &str,
    title: &str,
) -> BarChartData {
    BarChartData {
        labels,
        counts,
        xlabel: xlabel.to_string(),
        ylabel: ylabel.to_string(),
        title: title.to_string(),
    }
}

/// Wrap paired numeric series with axis labels and a title.
pub fn scatter_distribution(
    x: Vec<f64>,
    y: Vec<f64>,
    xlabel: &str,
    ylabel: &str,
    title: &str,
) -> ScatterChartData {
    ScatterChartData {
        x,
        y,
        xlabel: xlabel.to_string(),
        ylabel: ylabel.to_string(),
        title: title.to_string(),
    }
}

/// Flights per calendar date of the scheduled departure, in date order.
///
/// Requires the timestamp columns to be converted already.
pub fn dates_distribution(
    df: &DataFrame,
    xlabel: &str,
    ylabel: &str,
    title: &str,
) -> FeatureResult<BarChartData> {
    let col = df
        .column(COL_SCHEDULED)
        .map_err(|_| FeatureError::MissingColumn(COL_SCHEDULED.to_string()))?;
    let seconds = col.i64().map_err(|_| FeatureError::DatesNotConverted)?;

    let mut counts: BTreeMap<chrono::NaiveDate, u32> = BTreeMap::new();
    for value in seconds.into_iter().flatten() {
        if let Some(dt) = DateTime::from_timestamp(value, 0) {
            *counts.entry(dt.date_naive()).or_insert(0) += 1;
        }
    }

    let labels = counts.keys().map(|d| d.to_string()).collect();
    let values = counts.values().copied().collect();
    Ok(general_distribution(labels, values, xlabel, ylabel, title))
}

/// Share of 15-minute delays per category of `column`, sorted by label.
pub fn delay_rate_by_category(df: &DataFrame, column: &str) -> FeatureResult<DelayRateData> {
    let categories = df
        .column(column)
        .map_err(|_| FeatureError::MissingColumn(column.to_string()))?;
    let delayed = df
        .column(COL_DELAY_15)
        .map_err(|_| FeatureError::MissingFeature {
            column: COL_DELAY_15,
            step: "generate_15_delay",
        })?
        .bool()?;

    let mut totals: BTreeMap<String, (u32, u32)> = BTreeMap::new();
    for i in 0..df.height() {
        let Some(label) = label_at(categories, i)? else {
            continue;
        };
        let entry = totals.entry(label).or_insert((0, 0));
        entry.1 += 1;
        if delayed.get(i) == Some(true) {
            entry.0 += 1;
        }
    }

    let mut labels = Vec::with_capacity(totals.len());
    let mut rates = Vec::with_capacity(totals.len());
    let mut flights = Vec::with_capacity(totals.len());
    for (label, (delayed_count, total)) in totals {
        labels.push(label);
        rates.push(delayed_count as f64 / total as f64);
        flights.push(total);
    }

    Ok(DelayRateData {
        labels,
        rates,
        flights,
    })
}

/// Summary statistics over the delay-minutes column.
pub fn delay_stats(df: &DataFrame) -> FeatureResult<DelayStats> {
    let minutes = df
        .column(COL_MIN_DIFF)
        .map_err(|_| FeatureError::MissingFeature {
            column: COL_MIN_DIFF,
            step: "generate_min_diff",
        })?
        .i64()?;

    let values: Vec<f64> = minutes.into_iter().flatten().map(|m| m as f64).collect();
    Ok(compute_stats(&values))
}

/// Compute statistics for a set of values.
fn compute_stats(values: &[f64]) -> DelayStats {
    if values.is_empty() {
        return DelayStats {
            count: 0,
            mean: 0.0,
            median: 0.0,
            std_dev: 0.0,
            min: 0.0,
            max: 0.0,
        };
    }

    let count = values.len();
    let mean = values.iter().sum::<f64>() / count as f64;

    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let median = if count % 2 == 0 {
        (sorted[count / 2 - 1] + sorted[count / 2]) / 2.0
    } else {
        sorted[count / 2]
    };

    let variance = values
        .iter()
        .map(|v| {
            let diff = v - mean;
            diff * diff
        })
        .sum::<f64>()
        / count as f64;

    DelayStats {
        count,
        mean,
        median,
        std_dev: variance.sqrt(),
        min: sorted.first().copied().unwrap_or(0.0),
        max: sorted.last().copied().unwrap_or(0.0),
    }
}

/// Textual label of a cell, `None` for nulls.
fn label_at(col: &Column, i: usize) -> FeatureResult<Option<String>> {
    let label = match col.get(i)? {
        AnyValue::Null => None,
        AnyValue::String(s) => Some(s.to_string()),
        AnyValue::StringOwned(s) => Some(s.to_string()),
        AnyValue::Boolean(b) => Some(b.to_string()),
        other => Some(other.to_string()),
    };
    Ok(label)
}
