//! Root and health endpoints.

use axum::{extract::State, http::StatusCode};
use serde_json::{json, Value};

use crate::api::AppState;
use crate::types::{response, ApiResponse};

/// Root endpoint
pub async fn root() -> ApiResponse<Value> {
    response::message("Welcome to axum-toolkit")
}

/// Health check pinging every registered database and cache connection.
///
/// Returns 503 when any connection fails to answer.
pub async fn health(State(state): State<AppState>) -> ApiResponse<Value> {
    #[cfg(feature = "database")]
    let databases = state.databases.ping_all().await;
    #[cfg(not(feature = "database"))]
    let databases = std::collections::BTreeMap::<String, bool>::new();

    let caches = state.caches.ping_all().await;

    let healthy = databases.values().chain(caches.values()).all(|ok| *ok);
    let data = json!({
        "status": if healthy { "healthy" } else { "degraded" },
        "databases": databases,
        "caches": caches,
    });

    if healthy {
        response::success(data).with_message("Healthy")
    } else {
        response::error("Service degraded")
            .with_data(data)
            .with_status(StatusCode::SERVICE_UNAVAILABLE)
    }
}
