use crate::errors::{Error, Result};
use serde::Serialize;
use serde_json::{Map, Value};

pub const UNKNOWN_DEVICE: &str = "unknown";

/// One sensor reading as received by the handler.
///
/// Every field is optional. `device_id` falls back to [`UNKNOWN_DEVICE`] when
/// the result is built; numeric fields stay `None` so that a missing value is
/// never confused with zero.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SensorReading {
    pub device_id: Option<String>,
    pub temperature: Option<f64>,
    pub humidity: Option<f64>,
    pub battery_level: Option<f64>,
    pub timestamp: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl SensorReading {
    /// Builds a reading from a raw event.
    ///
    /// Anything that is not a JSON object (including `null`) is rejected with
    /// [`Error::InvalidReading`]. Fields holding a value of the wrong JSON type
    /// are treated as absent.
    pub fn from_event(event: &Value) -> Result<Self> {
        let fields = event.as_object().ok_or(Error::InvalidReading)?;

        Ok(Self {
            device_id: device_id(fields),
            temperature: number(fields, "temperature"),
            humidity: number(fields, "humidity"),
            battery_level: number(fields, "batteryLevel"),
            timestamp: fields
                .get("timestamp")
                .and_then(Value::as_str)
                .map(str::to_string),
            latitude: number(fields, "latitude"),
            longitude: number(fields, "longitude"),
        })
    }

    pub fn device_id_or_default(&self) -> &str {
        self.device_id.as_deref().unwrap_or(UNKNOWN_DEVICE)
    }
}

fn number(fields: &Map<String, Value>, key: &str) -> Option<f64> {
    fields.get(key).and_then(Value::as_f64)
}

fn device_id(fields: &Map<String, Value>) -> Option<String> {
    match fields.get("deviceId")? {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        // Numeric ids show up in hand-written test events
        other => Some(other.to_string()),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AnomalyType {
    TemperatureSpike,
    HumidityAnomaly,
    LowBattery,
}

impl AnomalyType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnomalyType::TemperatureSpike => "temperature_spike",
            AnomalyType::HumidityAnomaly => "humidity_anomaly",
            AnomalyType::LowBattery => "low_battery",
        }
    }
}

/// A single threshold violation. `value` is the raw reading, not rounded.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Anomaly {
    #[serde(rename = "type")]
    pub kind: AnomalyType,
    pub value: f64,
    pub threshold: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HealthStatus {
    Healthy,
    AnomaliesDetected,
}

impl HealthStatus {
    pub fn from_anomaly_count(count: usize) -> Self {
        if count == 0 {
            HealthStatus::Healthy
        } else {
            HealthStatus::AnomaliesDetected
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Metrics {
    pub temperature: Option<f64>,
    pub humidity: Option<f64>,
    pub battery_level: Option<f64>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

/// Summary record returned for a well-formed reading
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationResult {
    pub device_id: String,
    pub analysis_date: String,
    pub reading_timestamp: Option<String>,
    pub readings_count: u32,
    pub metrics: Metrics,
    pub anomalies: Vec<Anomaly>,
    pub anomaly_count: usize,
    pub health_status: HealthStatus,
    pub timestamp: String,
}

/// Result shape returned when the event is missing or not a mapping
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvalidReadingResult {
    pub device_id: String,
    pub error: String,
    pub timestamp: String,
}

/// What the handler hands back to its caller. Both variants serialize flat.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Outcome {
    Evaluated(EvaluationResult),
    Invalid(InvalidReadingResult),
}

impl Outcome {
    pub fn device_id(&self) -> &str {
        match self {
            Outcome::Evaluated(result) => &result.device_id,
            Outcome::Invalid(result) => &result.device_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_event_reads_camel_case_fields() {
        let event = json!({
            "deviceId": "sensor-003",
            "temperature": 21.5,
            "humidity": 48,
            "batteryLevel": 77.25,
            "timestamp": "2024-03-02T10:00:00Z",
            "latitude": 37.77,
            "longitude": -122.41
        });

        let reading = SensorReading::from_event(&event).unwrap();

        assert_eq!(reading.device_id.as_deref(), Some("sensor-003"));
        assert_eq!(reading.temperature, Some(21.5));
        assert_eq!(reading.humidity, Some(48.0));
        assert_eq!(reading.battery_level, Some(77.25));
        assert_eq!(reading.timestamp.as_deref(), Some("2024-03-02T10:00:00Z"));
        assert_eq!(reading.latitude, Some(37.77));
        assert_eq!(reading.longitude, Some(-122.41));
    }

    #[test]
    fn test_from_event_rejects_non_objects() {
        for event in [json!(null), json!([1, 2]), json!("reading"), json!(42)] {
            assert!(matches!(
                SensorReading::from_event(&event),
                Err(Error::InvalidReading)
            ));
        }
    }

    #[test]
    fn test_empty_object_has_no_fields() {
        let reading = SensorReading::from_event(&json!({})).unwrap();
        assert_eq!(reading, SensorReading::default());
        assert_eq!(reading.device_id_or_default(), UNKNOWN_DEVICE);
    }

    #[test]
    fn test_wrongly_typed_fields_are_absent() {
        let event = json!({
            "deviceId": null,
            "temperature": "hot",
            "batteryLevel": [10],
            "timestamp": 1704085200
        });

        let reading = SensorReading::from_event(&event).unwrap();

        assert_eq!(reading.device_id, None);
        assert_eq!(reading.temperature, None);
        assert_eq!(reading.battery_level, None);
        assert_eq!(reading.timestamp, None);
    }

    #[test]
    fn test_numeric_device_id_is_kept() {
        let reading = SensorReading::from_event(&json!({ "deviceId": 7 })).unwrap();
        assert_eq!(reading.device_id_or_default(), "7");
    }

    #[test]
    fn test_anomaly_serializes_with_type_key() {
        let anomaly = Anomaly {
            kind: AnomalyType::LowBattery,
            value: 12.5,
            threshold: "<20%",
        };

        assert_eq!(
            serde_json::to_value(&anomaly).unwrap(),
            json!({ "type": "low_battery", "value": 12.5, "threshold": "<20%" })
        );
    }
}
