use crate::model::{Anomaly, AnomalyType, SensorReading};

const TEMP_MAX: f64 = 35.0;
const TEMP_MIN: f64 = -10.0;
const HUMIDITY_MAX: f64 = 95.0;
const HUMIDITY_MIN: f64 = 5.0;
const BATTERY_MIN: f64 = 20.0;

/// Runs every rule against the reading and collects the hits in rule order:
/// temperature, humidity, battery.
pub fn detect_anomalies(reading: &SensorReading) -> Vec<Anomaly> {
    [
        temperature_spike(reading.temperature),
        humidity_anomaly(reading.humidity),
        low_battery(reading.battery_level),
    ]
    .into_iter()
    .flatten()
    .collect()
}

pub fn temperature_spike(temperature: Option<f64>) -> Option<Anomaly> {
    let value = temperature?;
    let threshold = if value > TEMP_MAX {
        ">35°C"
    } else if value < TEMP_MIN {
        "<-10°C"
    } else {
        return None;
    };

    Some(Anomaly {
        kind: AnomalyType::TemperatureSpike,
        value,
        threshold,
    })
}

pub fn humidity_anomaly(humidity: Option<f64>) -> Option<Anomaly> {
    let value = humidity?;
    let threshold = if value > HUMIDITY_MAX {
        ">95%"
    } else if value < HUMIDITY_MIN {
        "<5%"
    } else {
        return None;
    };

    Some(Anomaly {
        kind: AnomalyType::HumidityAnomaly,
        value,
        threshold,
    })
}

pub fn low_battery(battery_level: Option<f64>) -> Option<Anomaly> {
    let value = battery_level?;
    if value >= BATTERY_MIN {
        return None;
    }

    Some(Anomaly {
        kind: AnomalyType::LowBattery,
        value,
        threshold: "<20%",
    })
}
