use crate::errors::Result;
use crate::evaluate::{handle, InvocationContext};
use crate::metrics;
use crate::model::Outcome;
use axum::{
    body::Bytes,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tracing::error;

pub fn create_router() -> Router {
    Router::new()
        .route("/invoke", post(invoke))
        .route("/health", get(health))
        .route("/metrics", get(metrics_handler))
}

/// Runs the handler on the request body. An empty body is passed on as an
/// absent event and comes back as the invalid-reading result.
async fn invoke(body: Bytes) -> std::result::Result<Json<Outcome>, AppError> {
    let event = decode_event(&body).map_err(|e| AppError {
        status: StatusCode::BAD_REQUEST,
        error: anyhow::anyhow!("Invalid event body: {}", e),
    })?;

    let ctx = InvocationContext::new();
    Ok(Json(handle(&event, &ctx)))
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

async fn metrics_handler() -> std::result::Result<String, AppError> {
    metrics::gather_metrics().map_err(|e| anyhow::anyhow!("Failed to encode metrics: {}", e).into())
}

fn decode_event(body: &[u8]) -> Result<Value> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Null);
    }
    Ok(serde_json::from_slice(body)?)
}

struct AppError {
    status: StatusCode,
    error: anyhow::Error,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        error!("API error: {}", self.error);
        (self.status, Json(json!({ "error": self.error.to_string() }))).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            error: err.into(),
        }
    }
}
