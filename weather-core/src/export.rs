use chrono::{Local, TimeZone};

use crate::model::WeatherReport;

const HEADER: &str = "City,Description,Temp,MinTemp,MaxTemp,Pressure,Humidity,Wind,Sunrise,Sunset";

/// A rendered CSV document plus the filename suggested to the caller.
#[derive(Debug, Clone)]
pub struct CsvExport {
    pub bytes: Vec<u8>,
    pub filename: String,
}

/// Render `report` as a one-row CSV document.
///
/// The document is UTF-8: a fixed header line followed by exactly one data
/// line, each terminated by `\n`. Temperatures render with one decimal,
/// sunrise/sunset as local wall-clock `HH:mm:ss`. `city` is the raw
/// caller-supplied name and only feeds the suggested filename; the data row
/// uses the city name reported by the upstream.
///
/// Pure transform: no I/O, cannot fail.
pub fn to_csv(report: &WeatherReport, city: &str) -> CsvExport {
    let row = [
        escape_field(&report.city),
        escape_field(&report.description),
        format!("{:.1}", report.temp),
        format!("{:.1}", report.temp_min),
        format!("{:.1}", report.temp_max),
        report.pressure.to_string(),
        report.humidity.to_string(),
        report.wind_speed.to_string(),
        wall_time(report.sunrise),
        wall_time(report.sunset),
    ]
    .join(",");

    let document = format!("{HEADER}\n{row}\n");

    CsvExport {
        bytes: document.into_bytes(),
        filename: format!("{city}-weather.csv"),
    }
}

/// Quote a free-text field when it contains a comma, double quote, or
/// newline, doubling any internal quotes. Other fields pass through as-is.
fn escape_field(value: &str) -> String {
    if value.contains([',', '"', '\n']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// Unix seconds to `HH:mm:ss` on the local clock of the serializing process.
fn wall_time(unix_secs: i64) -> String {
    Local
        .timestamp_opt(unix_secs, 0)
        .single()
        .map(|dt| dt.format("%H:%M:%S").to_string())
        .unwrap_or_default()
}
