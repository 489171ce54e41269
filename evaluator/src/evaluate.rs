use crate::detect::detect_anomalies;
use crate::errors::Error;
use crate::metrics::{
    ANOMALIES_TOTAL, EVALUATION_SECONDS, EVENTS_TOTAL, INVALID_READINGS_TOTAL,
    UNHEALTHY_READINGS_TOTAL,
};
use crate::model::{
    EvaluationResult, HealthStatus, InvalidReadingResult, Metrics, Outcome, SensorReading,
    UNKNOWN_DEVICE,
};
use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::Value;
use tracing::{debug, info, info_span};
use uuid::Uuid;

/// Opaque per-call context. Only used to correlate log lines.
#[derive(Debug, Clone)]
pub struct InvocationContext {
    pub request_id: Uuid,
}

impl InvocationContext {
    pub fn new() -> Self {
        Self {
            request_id: Uuid::new_v4(),
        }
    }
}

impl Default for InvocationContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Entry point for one event: logs it, evaluates it against the current time
/// and records metrics. Never fails; invalid input comes back as
/// [`Outcome::Invalid`].
pub fn handle(event: &Value, ctx: &InvocationContext) -> Outcome {
    let span = info_span!("invoke", request_id = %ctx.request_id);
    let _guard = span.enter();

    info!(event = %event, "Received event");
    EVENTS_TOTAL.inc();

    let timer = EVALUATION_SECONDS.start_timer();
    let outcome = evaluate_at(event, Utc::now());
    timer.observe_duration();

    record_outcome(&outcome);
    debug!(device_id = outcome.device_id(), "Evaluation complete");

    outcome
}

/// Pure evaluation of one event at the given wall-clock time.
pub fn evaluate_at(event: &Value, now: DateTime<Utc>) -> Outcome {
    match SensorReading::from_event(event) {
        Ok(reading) => Outcome::Evaluated(evaluate_reading(&reading, now)),
        Err(e) => Outcome::Invalid(invalid_reading(&e, now)),
    }
}

pub fn evaluate_reading(reading: &SensorReading, now: DateTime<Utc>) -> EvaluationResult {
    let anomalies = detect_anomalies(reading);
    let anomaly_count = anomalies.len();

    EvaluationResult {
        device_id: reading.device_id_or_default().to_string(),
        analysis_date: analysis_date(reading.timestamp.as_deref(), now),
        reading_timestamp: reading.timestamp.clone(),
        readings_count: 1,
        metrics: Metrics {
            temperature: reading.temperature.map(round2),
            humidity: reading.humidity.map(round2),
            battery_level: reading.battery_level.map(round2),
            latitude: reading.latitude,
            longitude: reading.longitude,
        },
        anomalies,
        anomaly_count,
        health_status: HealthStatus::from_anomaly_count(anomaly_count),
        timestamp: format_timestamp(now),
    }
}

fn invalid_reading(error: &Error, now: DateTime<Utc>) -> InvalidReadingResult {
    InvalidReadingResult {
        device_id: UNKNOWN_DEVICE.to_string(),
        error: error.to_string(),
        timestamp: format_timestamp(now),
    }
}

/// Date part of the reading timestamp, or of `now` when the reading carries
/// no usable timestamp.
fn analysis_date(reading_timestamp: Option<&str>, now: DateTime<Utc>) -> String {
    match reading_timestamp.filter(|ts| !ts.is_empty()) {
        Some(ts) => ts.split_once('T').map_or(ts, |(date, _)| date).to_string(),
        None => now.format("%Y-%m-%d").to_string(),
    }
}

fn format_timestamp(now: DateTime<Utc>) -> String {
    now.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Rounds to two decimals from the exact binary value, ties to even.
fn round2(value: f64) -> f64 {
    // From 2^53 up every f64 is an integer
    if !value.is_finite() || value.abs() >= 9_007_199_254_740_992.0 {
        return value;
    }
    format!("{:.2}", value).parse().unwrap_or(value)
}

fn record_outcome(outcome: &Outcome) {
    match outcome {
        Outcome::Evaluated(result) => {
            for anomaly in &result.anomalies {
                ANOMALIES_TOTAL
                    .with_label_values(&[anomaly.kind.as_str()])
                    .inc();
            }
            if result.health_status == HealthStatus::AnomaliesDetected {
                UNHEALTHY_READINGS_TOTAL.inc();
            }
        }
        Outcome::Invalid(_) => INVALID_READINGS_TOTAL.inc(),
    }
}
