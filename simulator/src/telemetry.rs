use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use rand::Rng;

pub const READINGS_PER_DAY: u32 = 24;

const BASE_LATITUDE: f64 = 37.7749;
const BASE_LONGITUDE: f64 = -122.4194;
const BATTERY_DRAIN_PER_HOUR: f64 = 1.5;

/// One hourly sample for a device
#[derive(Debug, Clone, PartialEq)]
pub struct Reading {
    pub device_id: String,
    pub timestamp: DateTime<Utc>,
    pub temperature: f64,
    pub humidity: f64,
    pub battery_level: f64,
    pub latitude: f64,
    pub longitude: f64,
}

/// Generates a full day of hourly readings for one device.
///
/// Each device gets its own base temperature, humidity and battery level; the
/// battery drains linearly through the day and never goes below zero.
pub fn generate_day(rng: &mut impl Rng, device_id: &str, date: NaiveDate) -> Vec<Reading> {
    let base_temp = rng.gen_range(20.0..30.0);
    let base_humidity = rng.gen_range(40.0..70.0);
    let base_battery = rng.gen_range(60.0..100.0);
    let midnight = date.and_time(NaiveTime::MIN).and_utc();

    (0..READINGS_PER_DAY)
        .map(|hour| {
            let mut temperature = base_temp + rng.gen_range(-2.0..2.0);
            let mut humidity = base_humidity + rng.gen_range(-5.0..5.0);
            let battery_level = base_battery - f64::from(hour) * BATTERY_DRAIN_PER_HOUR;

            if rng.gen_bool(0.05) {
                temperature = if rng.gen_bool(0.5) {
                    rng.gen_range(40.0..50.0) // spike
                } else {
                    rng.gen_range(-15.0..-10.0) // freeze
                };
            }

            if rng.gen_bool(0.03) {
                humidity = if rng.gen_bool(0.5) {
                    rng.gen_range(98.0..100.0)
                } else {
                    rng.gen_range(2.0..5.0)
                };
            }

            Reading {
                device_id: device_id.to_string(),
                timestamp: midnight + Duration::hours(i64::from(hour)),
                temperature: round2(temperature),
                humidity: round2(humidity),
                battery_level: round2(battery_level).max(0.0),
                latitude: BASE_LATITUDE + rng.gen_range(-0.05..0.05),
                longitude: BASE_LONGITUDE + rng.gen_range(-0.05..0.05),
            }
        })
        .collect()
}

/// Rounds to two decimals from the exact binary value, ties to even.
fn round2(value: f64) -> f64 {
    // From 2^53 up every f64 is an integer
    if !value.is_finite() || value.abs() >= 9_007_199_254_740_992.0 {
        return value;
    }
    format!("{:.2}", value).parse().unwrap_or(value)
}
