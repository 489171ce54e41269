//! Threshold-based anomaly evaluation for single IoT sensor readings.
//!
//! [`evaluate::handle`] is the invocation boundary: it takes one JSON event and
//! always returns an [`model::Outcome`], either a full evaluation or the
//! invalid-reading shape.

pub mod config;
pub mod detect;
pub mod errors;
pub mod evaluate;
pub mod metrics;
pub mod model;
pub mod rest;

pub use evaluate::{evaluate_at, handle, InvocationContext};
pub use model::{Anomaly, AnomalyType, EvaluationResult, HealthStatus, Outcome, SensorReading};
