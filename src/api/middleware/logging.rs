//! Request/response logging middleware.

use std::net::SocketAddr;
use std::time::Instant;

use axum::{
    body::{to_bytes, Body, Bytes, HttpBody},
    extract::{ConnectInfo, Request, State},
    http::{HeaderMap, Method},
    middleware::Next,
    response::Response,
};
use serde_json::{Map, Value};

use crate::config::{MAX_LOGGED_BODY_BYTES, REDACTED, SENSITIVE_HEADERS, UNDECODABLE_BODY};
use crate::errors::{AppError, AppResult};

/// Logging settings
#[derive(Debug, Clone)]
pub struct LoggingSettings {
    pub log_request_body: bool,
    pub log_response_body: bool,
    /// Bodies larger than this are never buffered for logging
    pub max_body_bytes: usize,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            log_request_body: false,
            log_response_body: false,
            max_body_bytes: MAX_LOGGED_BODY_BYTES,
        }
    }
}

/// Log every request and its response.
///
/// Bodies are only buffered when enabled and their size is known to fit
/// `max_body_bytes`; the buffered bytes are handed on unchanged.
pub async fn logging_middleware(
    State(settings): State<LoggingSettings>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let start = Instant::now();
    let method = request.method().clone();
    let uri = request.uri().clone();
    let client_ip = client_ip(&request);
    let headers = headers_json(request.headers());

    let logs_body = settings.log_request_body
        && matches!(method, Method::POST | Method::PUT | Method::PATCH);
    let (request, request_body) = if logs_body {
        let (parts, body) = request.into_parts();
        let (body, logged) = capture(body, settings.max_body_bytes)
            .await
            .map_err(|_| AppError::bad_request("Failed to read request body"))?;
        (Request::from_parts(parts, body), logged)
    } else {
        (request, None)
    };

    tracing::info!(
        method = %method,
        url = %uri,
        client_ip = client_ip.as_deref(),
        headers = %headers,
        body = request_body.as_deref(),
        "Request"
    );

    let response = next.run(request).await;

    let (response, response_body) = if settings.log_response_body {
        let (parts, body) = response.into_parts();
        match capture(body, settings.max_body_bytes).await {
            Ok((body, logged)) => (Response::from_parts(parts, body), logged),
            Err(e) => {
                tracing::error!(error = %e, "Failed to buffer response body");
                return Err(AppError::internal("Failed to read response body"));
            }
        }
    } else {
        (response, None)
    };

    tracing::info!(
        status_code = response.status().as_u16(),
        process_time = round_secs(start.elapsed().as_secs_f64()),
        headers = %headers_json(response.headers()),
        body = response_body.as_deref(),
        "Response"
    );

    Ok(response)
}

/// Buffer `body` when its size is known to fit `limit`.
///
/// Returns the (possibly rebuilt) body and its decoded text, if captured.
async fn capture(body: Body, limit: usize) -> AppResult<(Body, Option<String>)> {
    let fits = body
        .size_hint()
        .upper()
        .is_some_and(|upper| upper <= limit as u64);
    if !fits {
        return Ok((body, None));
    }

    let bytes = to_bytes(body, limit)
        .await
        .map_err(|e| AppError::internal(format!("Body buffering error: {}", e)))?;
    let text = decode(&bytes);

    Ok((Body::from(bytes), Some(text)))
}

fn decode(bytes: &Bytes) -> String {
    std::str::from_utf8(bytes)
        .map(str::to_owned)
        .unwrap_or_else(|_| UNDECODABLE_BODY.to_string())
}

/// Client address: proxy headers first, then the connection itself.
fn client_ip(request: &Request) -> Option<String> {
    if let Some(forwarded) = request
        .headers()
        .get("X-Forwarded-For")
        .and_then(|h| h.to_str().ok())
    {
        if let Some(ip) = forwarded.split(',').next() {
            return Some(ip.trim().to_string());
        }
    }

    if let Some(real_ip) = request
        .headers()
        .get("X-Real-IP")
        .and_then(|h| h.to_str().ok())
    {
        return Some(real_ip.to_string());
    }

    request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|info| info.0.ip().to_string())
}

/// Headers as a JSON object; repeated headers are joined with `", "`.
fn headers_json(headers: &HeaderMap) -> Value {
    let mut map = Map::new();

    for name in headers.keys() {
        let value = if SENSITIVE_HEADERS.contains(&name.as_str()) {
            REDACTED.to_string()
        } else {
            headers
                .get_all(name)
                .iter()
                .map(|v| v.to_str().unwrap_or(UNDECODABLE_BODY))
                .collect::<Vec<_>>()
                .join(", ")
        };
        map.insert(name.as_str().to_string(), Value::String(value));
    }

    Value::Object(map)
}

fn round_secs(secs: f64) -> f64 {
    (secs * 10_000.0).round() / 10_000.0
}
