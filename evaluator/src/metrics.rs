use crate::errors::Result;
use lazy_static::lazy_static;
use prometheus::{
    Encoder, Histogram, HistogramOpts, IntCounter, IntCounterVec, Opts, Registry, TextEncoder,
};

lazy_static! {
    pub static ref REGISTRY: Registry = Registry::new();
    pub static ref EVENTS_TOTAL: IntCounter = IntCounter::with_opts(Opts::new(
        "evaluator_events_total",
        "Total events received by the handler"
    ))
    .expect("valid metric options");
    pub static ref INVALID_READINGS_TOTAL: IntCounter = IntCounter::with_opts(Opts::new(
        "evaluator_invalid_readings_total",
        "Total events rejected as invalid sensor readings"
    ))
    .expect("valid metric options");
    pub static ref ANOMALIES_TOTAL: IntCounterVec = IntCounterVec::new(
        Opts::new("evaluator_anomalies_total", "Total anomalies flagged by type"),
        &["type"]
    )
    .expect("valid metric options");
    pub static ref UNHEALTHY_READINGS_TOTAL: IntCounter = IntCounter::with_opts(Opts::new(
        "evaluator_unhealthy_readings_total",
        "Total readings with at least one anomaly"
    ))
    .expect("valid metric options");
    pub static ref EVALUATION_SECONDS: Histogram = Histogram::with_opts(
        HistogramOpts::new(
            "evaluator_evaluation_seconds",
            "Time taken to evaluate one event"
        )
        .buckets(vec![0.00001, 0.00005, 0.0001, 0.0005, 0.001, 0.005, 0.01])
    )
    .expect("valid metric options");
}

pub fn init_metrics() -> Result<()> {
    REGISTRY.register(Box::new(EVENTS_TOTAL.clone()))?;
    REGISTRY.register(Box::new(INVALID_READINGS_TOTAL.clone()))?;
    REGISTRY.register(Box::new(ANOMALIES_TOTAL.clone()))?;
    REGISTRY.register(Box::new(UNHEALTHY_READINGS_TOTAL.clone()))?;
    REGISTRY.register(Box::new(EVALUATION_SECONDS.clone()))?;
    Ok(())
}

pub fn gather_metrics() -> Result<String> {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer)?;
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}
