use serde::{Deserialize, Serialize};

/// Normalized weather record built from the upstream payload.
///
/// Numeric fields fall back to zero and strings to empty when the upstream
/// response omits them, so construction never fails on a missing field.
/// The record lives for a single request and is never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherReport {
    pub city: String,
    pub description: String,
    pub temp: f64,
    pub temp_min: f64,
    pub temp_max: f64,
    pub pressure: i64,
    pub humidity: i64,
    pub wind_speed: f64,
    /// Unix timestamp in seconds, UTC.
    pub sunrise: i64,
    /// Unix timestamp in seconds, UTC.
    pub sunset: i64,
}
