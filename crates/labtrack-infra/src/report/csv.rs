use std::fmt::Write;

use labtrack_core::domain::{Device, Reading};
use labtrack_core::ports::{Report, ReportError, ReportGenerator};

const HEADER: &str = "timestamp,co2,humidity,temperature";

/// Renders readings as RFC 4180 CSV, one row per reading.
#[derive(Debug, Default, Clone, Copy)]
pub struct CsvReportGenerator;

fn cell(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

fn file_name(device: &Device) -> String {
    let slug: String = device
        .name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_lowercase() } else { '-' })
        .collect();
    let slug = slug.trim_matches('-');

    if slug.is_empty() {
        format!("device-{}-readings.csv", device.id)
    } else {
        format!("{slug}-readings.csv")
    }
}

impl ReportGenerator for CsvReportGenerator {
    fn readings_report(&self, device: &Device, readings: &[Reading]) -> Result<Report, ReportError> {
        let mut out = String::with_capacity(HEADER.len() + readings.len() * 48);
        out.push_str(HEADER);
        out.push_str("\r\n");

        for reading in readings {
            write!(
                out,
                "{},{},{},{}\r\n",
                reading.timestamp.to_rfc3339(),
                cell(reading.payload.co2),
                cell(reading.payload.humidity),
                cell(reading.payload.temperature),
            )
            .map_err(|e| ReportError::Render(e.to_string()))?;
        }

        Ok(Report {
            file_name: file_name(device),
            content_type: "text/csv; charset=utf-8",
            bytes: out.into_bytes(),
        })
    }
}
