//! High-level data loading utilities.
//!
//! This module provides convenient loaders that combine CSV parsing with
//! error context and load statistics, producing ready-to-use DataFrames for
//! the feature pipeline.
//!
//! # Example
//!
//! ```no_run
//! use flights_rust::io::loaders::FlightLoader;
//! use std::path::Path;
//!
//! let result = FlightLoader::load_from_file(Path::new("flights.csv"))
//!     .expect("Failed to load");
//! println!("Loaded {} flights", result.num_flights);
//! ```

pub mod loaders;


pub use loaders::{FlightLoader, FlightLoadResult};
