use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::response::Response;
use evaluator::rest::create_router;
use serde_json::{json, Value};
use tower::ServiceExt;

async fn post_invoke(body: impl Into<Body>) -> Response {
    let request = Request::builder()
        .method(Method::POST)
        .uri("/invoke")
        .header("content-type", "application/json")
        .body(body.into())
        .unwrap();

    create_router().oneshot(request).await.unwrap()
}

async fn body_json(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_invoke_flags_spike_and_low_battery() {
    let event = json!({
        "deviceId": "sensor-001",
        "temperature": 40,
        "humidity": 50,
        "batteryLevel": 15,
        "timestamp": "2024-01-01T05:00:00Z"
    });

    let response = post_invoke(event.to_string()).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["deviceId"], "sensor-001");
    assert_eq!(json["analysisDate"], "2024-01-01");
    assert_eq!(json["readingTimestamp"], "2024-01-01T05:00:00Z");
    assert_eq!(json["readingsCount"], 1);
    assert_eq!(json["anomalyCount"], 2);
    assert_eq!(json["healthStatus"], "anomalies_detected");
    assert_eq!(json["anomalies"][0]["type"], "temperature_spike");
    assert_eq!(json["anomalies"][0]["threshold"], ">35°C");
    assert_eq!(json["anomalies"][1]["type"], "low_battery");
    assert_eq!(json["anomalies"][1]["threshold"], "<20%");
    assert_eq!(json["metrics"]["humidity"], 50.0);
}

#[tokio::test]
async fn test_invoke_empty_object_is_healthy() {
    let response = post_invoke("{}").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["deviceId"], "unknown");
    assert_eq!(json["anomalyCount"], 0);
    assert_eq!(json["healthStatus"], "healthy");
    assert_eq!(json["metrics"]["temperature"], Value::Null);
    assert!(json["timestamp"].is_string());
}

#[tokio::test]
async fn test_invoke_without_body_returns_error_shape() {
    let response = post_invoke(Body::empty()).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["deviceId"], "unknown");
    assert_eq!(json["error"], "Invalid sensor reading data");
    assert!(json["timestamp"].is_string());
    assert!(json.get("anomalies").is_none());
}

#[tokio::test]
async fn test_invoke_array_returns_error_shape() {
    let json = body_json(post_invoke("[1, 2, 3]").await).await;
    assert_eq!(json["error"], "Invalid sensor reading data");
}

#[tokio::test]
async fn test_invoke_rejects_malformed_json() {
    let response = post_invoke("{ not json").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    assert!(json["error"].as_str().unwrap().starts_with("Invalid event body"));
}

#[tokio::test]
async fn test_health() {
    let request = Request::builder()
        .uri("/health")
        .body(Body::empty())
        .unwrap();

    let response = create_router().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!({ "status": "ok" }));
}

#[tokio::test]
async fn test_metrics_endpoint_reports_events() {
    evaluator::metrics::init_metrics().unwrap();

    let response = post_invoke(r#"{"deviceId":"sensor-001","batteryLevel":10}"#).await;
    assert_eq!(response.status(), StatusCode::OK);

    let request = Request::builder()
        .uri("/metrics")
        .body(Body::empty())
        .unwrap();

    let response = create_router().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(body.contains("evaluator_events_total"));
    assert!(body.contains("evaluator_anomalies_total{type=\"low_battery\"}"));
}
