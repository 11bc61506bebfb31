//! Presentation-side helpers for exploratory analysis.
//!
//! These services compute chart-ready series (labels, counts, rates) from the
//! feature DataFrame. Rendering is left to whatever frontend consumes the
//! serialized structures; nothing here draws.

pub mod distributions;

pub use distributions::{
    dates_distribution, delay_rate_by_category, delay_stats, general_distribution,
    scatter_distribution, value_counts, BarChartData, DelayRateData, DelayStats, ScatterChartData,
};
