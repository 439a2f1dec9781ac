//! Request timeout middleware.

use std::time::Duration;

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::config::DEFAULT_REQUEST_TIMEOUT_SECS;
use crate::types::response;

/// Timeout settings
#[derive(Debug, Clone, Copy)]
pub struct TimeoutSettings {
    pub timeout: Duration,
}

impl Default for TimeoutSettings {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs_f64(DEFAULT_REQUEST_TIMEOUT_SECS),
        }
    }
}

/// Abort requests that take longer than the configured timeout.
///
/// The downstream future is dropped on expiry and a 408 envelope is returned.
pub async fn timeout_middleware(
    State(settings): State<TimeoutSettings>,
    request: Request,
    next: Next,
) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();

    match tokio::time::timeout(settings.timeout, next.run(request)).await {
        Ok(response) => response,
        Err(_) => {
            tracing::warn!(
                method = %method,
                uri = %uri,
                timeout_secs = settings.timeout.as_secs_f64(),
                "Request timed out"
            );
            timeout_response(settings.timeout)
        }
    }
}

/// 408 envelope for a request that exceeded `timeout`.
pub fn timeout_response(timeout: Duration) -> Response {
    response::error(format!(
        "Request took longer than {} seconds",
        timeout.as_secs_f64()
    ))
    .with_errors(vec!["Request timeout".to_string()])
    .with_status(StatusCode::REQUEST_TIMEOUT)
    .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeout_response_status() {
        let response = timeout_response(Duration::from_millis(1500));
        assert_eq!(response.status(), StatusCode::REQUEST_TIMEOUT);
    }

    #[test]
    fn test_default_timeout() {
        assert_eq!(TimeoutSettings::default().timeout, Duration::from_secs(30));
    }
}
