//! Flights Rust Backend - On-time performance feature engineering

pub mod core;
pub mod features;
pub mod io;
pub mod parsing;
pub mod services;
