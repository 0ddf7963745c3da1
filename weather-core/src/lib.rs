//! Core library for the weather gateway.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - Fetching and normalizing upstream weather data
//! - CSV export of a normalized report
//!
//! It is used by `weather-server`, but can also be reused by other binaries or services.

pub mod config;
pub mod export;
pub mod fetch;
pub mod model;

pub use config::Config;
pub use export::{CsvExport, to_csv};
pub use fetch::{FetchError, OpenWeatherClient};
pub use model::WeatherReport;
