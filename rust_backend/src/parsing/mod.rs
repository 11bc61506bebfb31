//! Parsers for flight on-time performance data.
//!
//! This module parses the raw flights CSV into a Polars DataFrame and
//! converts between the DataFrame representation and typed `FlightRecord`
//! structures.
//!
//! # Example
//!
//! ```no_run
//! use flights_rust::parsing::csv_parser::parse_flights_csv;
//! use std::path::Path;
//!
//! let df = parse_flights_csv(Path::new("flights.csv"))
//!     .expect("Failed to parse flights CSV");
//! ```

pub mod csv_parser;
