//! Feature generation for flight on-time performance data.
//!
//! This module derives the four synthetic columns (high-season flag, delay
//! minutes, 15-minute delay flag, day period) from the two raw departure
//! timestamps, and exports them as the reduced feature table.
//!
//! # Modules
//!
//! - [`generator`]: per-table feature derivation steps and export
//! - [`pipeline`]: explicit ordered pipeline over the generator
//! - [`error`]: typed errors for feature generation
//!
//! # Example
//!
//! ```no_run
//! use flights_rust::features::generate_features;
//! use std::path::Path;
//!
//! let report = generate_features(Path::new("flights.csv"), Path::new("features.csv"))
//!     .expect("Feature generation failed");
//! println!("Processed {} flights", report.total_flights);
//! ```

pub mod error;
pub mod generator;
pub mod pipeline;

pub use error::{FeatureError, FeatureResult};
pub use generator::FeatureGenerator;
pub use pipeline::{generate_features, FeatureConfig, FeaturePipeline, FeatureReport};
