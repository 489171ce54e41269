use crate::errors::Result;
use crate::telemetry::Reading;
use chrono::NaiveDate;
use std::path::{Path, PathBuf};

pub const CSV_HEADER: &str = "deviceid,timestamp,temperature,humidity,batterylevel,latitude,longitude";

/// Object key (and relative local path) of a device's daily file.
pub fn object_key(date: NaiveDate, device_id: &str) -> String {
    format!("daily-data/{}/{}.csv", date.format("%Y-%m-%d"), device_id)
}

/// Escape a value for CSV: wrap in quotes if it contains comma, quote, or newline.
fn csv_escape(value: &str) -> String {
    if value.contains(',') || value.contains('"') || value.contains('\n') {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

pub fn build_csv(readings: &[Reading]) -> String {
    let mut out = String::with_capacity((readings.len() + 1) * 96);
    out.push_str(CSV_HEADER);
    out.push('\n');

    for r in readings {
        let row = [
            csv_escape(&r.device_id),
            r.timestamp.format("%Y-%m-%dT%H:%M:%SZ").to_string(),
            r.temperature.to_string(),
            r.humidity.to_string(),
            r.battery_level.to_string(),
            r.latitude.to_string(),
            r.longitude.to_string(),
        ];
        out.push_str(&row.join(","));
        out.push('\n');
    }

    out
}

/// Writes the readings under `output_dir` at the path mirroring the object key.
pub async fn write_csv(
    output_dir: &Path,
    date: NaiveDate,
    device_id: &str,
    readings: &[Reading],
) -> Result<PathBuf> {
    let path = output_dir.join(object_key(date, device_id));
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(&path, build_csv(readings)).await?;
    Ok(path)
}
