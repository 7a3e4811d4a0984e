use axum::{
    body::Bytes,
    extract::{DefaultBodyLimit, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    routing::post,
    Json, Router,
};
use serde::Serialize;
use serde_json::{json, Value};
use tower_http::cors::CorsLayer;

use crate::state::GatewayState;
use crate::telemetry::decode_batch;

/// Request body cap, matching what the device firmware is allowed to send.
const MAX_BODY_BYTES: usize = 2 * 1024 * 1024;

#[derive(Serialize)]
struct ApiStatus {
    status: &'static str,
    message: String,
}

fn success(message: &str) -> Response {
    (
        StatusCode::OK,
        Json(ApiStatus {
            status: "success",
            message: message.to_string(),
        }),
    )
        .into_response()
}

fn failure(code: StatusCode, message: String) -> Response {
    (
        code,
        Json(ApiStatus {
            status: "error",
            message,
        }),
    )
        .into_response()
}

/// Build the HTTP surface around a gateway state handle.
pub fn router(state: GatewayState) -> Router {
    Router::new()
        .route("/api", post(receive_data))
        .route("/api/data", get(get_live_data))
        .route("/api/stats", get(get_stats))
        .route("/test", get(test_get).post(test_post))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// `POST /api`: decode the whole batch first, then apply it. A payload that
/// fails to decode is rejected with no side effects; the acknowledgment is
/// sent as soon as the in-memory stores are updated, without waiting for the
/// log writer.
async fn receive_data(State(state): State<GatewayState>, body: Bytes) -> Response {
    let samples = match decode_batch(&body) {
        Ok(samples) => samples,
        Err(err) => return failure(StatusCode::BAD_REQUEST, err.to_string()),
    };

    match state.ingest(samples) {
        Ok(()) => success("Data received and queued"),
        Err(err) => {
            log::error!("failed to apply batch: {}", err);
            failure(StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
        }
    }
}

async fn get_live_data(State(state): State<GatewayState>) -> Response {
    match state.window_snapshot() {
        Ok(snapshot) => Json(snapshot).into_response(),
        Err(err) => {
            log::error!("failed to snapshot live window: {}", err);
            failure(StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
        }
    }
}

async fn get_stats(State(state): State<GatewayState>) -> Response {
    match state.stats_snapshot() {
        Ok(snapshot) => Json(snapshot).into_response(),
        Err(err) => {
            log::error!("failed to snapshot stats: {}", err);
            failure(StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
        }
    }
}

async fn test_get() -> Response {
    Json(json!({
        "status": "success",
        "message": "Test endpoint active",
    }))
    .into_response()
}

async fn test_post(body: Bytes) -> Response {
    let data: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);
    Json(json!({
        "status": "success",
        "message": "Test POST received",
        "data": data,
    }))
    .into_response()
}
