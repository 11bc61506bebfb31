use anyhow::{Context, Result};
use log::info;
use polars::prelude::*;
use std::path::Path;

use crate::core::domain::FlightRecord;
use crate::parsing::csv_parser;

/// Result of loading flight data
#[derive(Debug)]
pub struct FlightLoadResult {
    pub dataframe: DataFrame,
    pub num_flights: usize,
}

impl FlightLoadResult {
    pub fn new(dataframe: DataFrame) -> Self {
        let num_flights = dataframe.height();
        Self {
            dataframe,
            num_flights,
        }
    }
}

/// Unified interface for loading flight data
pub struct FlightLoader;

impl FlightLoader {
    /// Load flight data from a file (CSV only)
    pub fn load_from_file(path: &Path) -> Result<FlightLoadResult> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .context("File has no extension")?;

        match extension.to_lowercase().as_str() {
            "csv" => Self::load_from_csv(path),
            _ => anyhow::bail!("Unsupported file format: {}", extension),
        }
    }

    /// Load flight data from a CSV file
    pub fn load_from_csv(csv_path: &Path) -> Result<FlightLoadResult> {
        let df = csv_parser::parse_flights_csv(csv_path).context("Failed to parse CSV file")?;

        let result = FlightLoadResult::new(df);
        info!(
            "Loaded {} flights from {}",
            result.num_flights,
            csv_path.display()
        );
        Ok(result)
    }

    /// Load flight data from a CSV string (useful for testing or API usage)
    pub fn load_from_csv_str(data: &str) -> Result<FlightLoadResult> {
        let df =
            csv_parser::parse_flights_csv_str(data).context("Failed to parse CSV string")?;

        Ok(FlightLoadResult::new(df))
    }

    /// Load a feature-enriched DataFrame as FlightRecord structures
    pub fn records_from_dataframe(df: &DataFrame) -> Result<Vec<FlightRecord>> {
        csv_parser::dataframe_to_records(df)
    }
}
