//! Ordered feature-generation pipeline.
//!
//! The individual generator steps carry an ordering dependency
//! (`convert_dates` before everything, `generate_min_diff` before
//! `generate_15_delay`). The pipeline makes that order explicit so it cannot
//! be invoked wrong from outside.

use anyhow::{Context, Result};
use log::info;
use polars::prelude::*;
use std::path::Path;

use crate::features::generator::{FeatureGenerator, COL_DELAY_15, COL_HIGH_SEASON};
use crate::parsing::csv_parser;

/// Result of a feature generation run
#[derive(Debug)]
pub struct FeatureReport {
    pub dataframe: DataFrame,
    pub total_flights: usize,
    pub delayed_flights: usize,
    pub high_season_flights: usize,
}

/// Configuration for the feature pipeline
pub struct FeatureConfig {
    pub seasonality: bool,
    pub delay_features: bool,
    pub day_period: bool,
}

impl Default for FeatureConfig {
    fn default() -> Self {
        Self {
            seasonality: true,
            delay_features: true,
            day_period: true,
        }
    }
}

/// Main feature-generation pipeline
pub struct FeaturePipeline {
    config: FeatureConfig,
}

impl FeaturePipeline {
    /// Create a new pipeline with default configuration
    pub fn new() -> Self {
        Self {
            config: FeatureConfig::default(),
        }
    }

    /// Create a pipeline with custom configuration
    pub fn with_config(config: FeatureConfig) -> Self {
        Self { config }
    }

    /// Process a flights CSV file into a DataFrame with derived features
    ///
    /// # Arguments
    /// * `csv_path` - Path to the raw flights CSV
    ///
    /// # Returns
    /// FeatureReport with the enriched DataFrame and summary counts
    pub fn run(&self, csv_path: &Path) -> Result<FeatureReport> {
        let df = csv_parser::parse_flights_csv(csv_path).context("Failed to load flights CSV")?;
        self.run_dataframe(df)
    }

    /// Process an already-loaded flights DataFrame
    pub fn run_dataframe(&self, df: DataFrame) -> Result<FeatureReport> {
        let mut generator = FeatureGenerator::new(df);
        self.apply(&mut generator)?;
        Ok(report(generator.into_data()))
    }

    /// Run the configured generation steps in dependency order.
    fn apply(&self, generator: &mut FeatureGenerator) -> Result<()> {
        generator
            .convert_dates()
            .context("Failed to convert timestamp columns")?;

        if self.config.delay_features {
            generator
                .generate_min_diff()
                .context("Failed to compute delay minutes")?;
            generator
                .generate_15_delay()
                .context("Failed to flag 15-minute delays")?;
        }
        if self.config.seasonality {
            generator
                .generate_seasonality()
                .context("Failed to flag high-season departures")?;
        }
        if self.config.day_period {
            generator
                .generate_day_period()
                .context("Failed to classify day periods")?;
        }
        Ok(())
    }
}

impl Default for FeaturePipeline {
    fn default() -> Self {
        Self::new()
    }
}

fn report(df: DataFrame) -> FeatureReport {
    let total_flights = df.height();
    let delayed_flights = count_true(&df, COL_DELAY_15);
    let high_season_flights = count_true(&df, COL_HIGH_SEASON);

    info!(
        "Derived features for {} flights ({} delayed over 15 min, {} in high season)",
        total_flights, delayed_flights, high_season_flights
    );

    FeatureReport {
        dataframe: df,
        total_flights,
        delayed_flights,
        high_season_flights,
    }
}

fn count_true(df: &DataFrame, column: &str) -> usize {
    df.column(column)
        .ok()
        .and_then(|c| c.bool().ok())
        .and_then(|b| b.sum())
        .unwrap_or(0) as usize
}

/// Convenience function: derive all features from a raw flights CSV and
/// export the four synthetic columns.
pub fn generate_features(input: &Path, output: &Path) -> Result<FeatureReport> {
    let pipeline = FeaturePipeline::new();

    let df = csv_parser::parse_flights_csv(input).context("Failed to load flights CSV")?;
    let mut generator = FeatureGenerator::new(df);
    pipeline.apply(&mut generator)?;

    generator
        .export_synthetic_features(output)
        .with_context(|| format!("Failed to export synthetic features to {}", output.display()))?;

    Ok(report(generator.into_data()))
}
