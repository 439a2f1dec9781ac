//! Integration tests for the middleware stack.
//!
//! Each test builds a small router, applies `setup_middleware` and drives it
//! with `oneshot`.

mod common;

use std::time::Duration;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    routing::{get, post},
    Router,
};
use serde_json::json;
use tower::ServiceExt;

use axum_toolkit::api::middleware::{setup_middleware, CorsSettings, MiddlewareSettings};
use axum_toolkit::types::response;
use common::{body_json, get as get_request, post_json};

fn app(settings: &MiddlewareSettings) -> Router {
    let router = Router::new()
        .route("/ok", get(|| async { response::message("pong") }))
        .route(
            "/slow",
            get(|| async {
                tokio::time::sleep(Duration::from_millis(500)).await;
                response::message("too late")
            }),
        )
        .route(
            "/panic",
            get(|| async {
                if true {
                    panic!("database exploded");
                }
                response::message("unreachable")
            }),
        )
        .route("/echo", post(|body: String| async move { body }));

    setup_middleware(router, settings).unwrap()
}

#[tokio::test]
async fn test_passes_through_normal_requests() {
    let response = app(&MiddlewareSettings::default())
        .oneshot(get_request("/ok"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["message"], json!("pong"));
    assert_eq!(body["success"], json!(true));
}

#[tokio::test]
async fn test_slow_request_times_out() {
    let settings = MiddlewareSettings::default().with_timeout(Duration::from_millis(50));

    let response = app(&settings).oneshot(get_request("/slow")).await.unwrap();

    assert_eq!(response.status(), StatusCode::REQUEST_TIMEOUT);
    let body = body_json(response).await;
    assert_eq!(body["success"], json!(false));
    assert_eq!(body["message"], json!("Request took longer than 0.05 seconds"));
    assert_eq!(body["errors"], json!(["Request timeout"]));
}

#[tokio::test]
async fn test_panic_becomes_internal_error() {
    let response = app(&MiddlewareSettings::default())
        .oneshot(get_request("/panic"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_json(response).await;
    assert_eq!(body["message"], json!("An unexpected error occurred"));
    assert_eq!(body["errors"], json!(["Internal server error"]));
    assert!(body["meta"]["error_id"]
        .as_str()
        .unwrap()
        .starts_with("error_"));
}

#[tokio::test]
async fn test_panic_details_when_enabled() {
    let mut settings = MiddlewareSettings::default();
    settings.error_handler.include_details = true;

    let response = app(&settings).oneshot(get_request("/panic")).await.unwrap();

    let body = body_json(response).await;
    assert_eq!(
        body["errors"],
        json!(["Internal server error", "database exploded"])
    );
}

#[tokio::test]
async fn test_cors_preflight_mirrors_origin() {
    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/ok")
        .header(header::ORIGIN, "https://app.example")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "GET")
        .body(Body::empty())
        .unwrap();

    let response = app(&MiddlewareSettings::default())
        .oneshot(request)
        .await
        .unwrap();

    let headers = response.headers();
    assert_eq!(
        headers[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        "https://app.example"
    );
    assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_CREDENTIALS], "true");
}

#[tokio::test]
async fn test_cors_rejects_unlisted_origin() {
    let settings = MiddlewareSettings {
        cors: CorsSettings::with_origins(["https://allowed.example"]),
        ..MiddlewareSettings::default()
    };

    let request = Request::builder()
        .uri("/ok")
        .header(header::ORIGIN, "https://evil.example")
        .body(Body::empty())
        .unwrap();

    let response = app(&settings).oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response
        .headers()
        .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
        .is_none());
}

#[tokio::test]
async fn test_logging_keeps_bodies_intact() {
    let mut settings = MiddlewareSettings::default();
    settings.logging.log_request_body = true;
    settings.logging.log_response_body = true;

    let response = app(&settings)
        .oneshot(post_json("/echo", r#"{"hello":"world"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body, json!({ "hello": "world" }));
}

#[tokio::test]
async fn test_layers_can_be_disabled() {
    let settings = MiddlewareSettings {
        enable_logging: false,
        enable_cors: false,
        ..MiddlewareSettings::default()
    };

    let request = Request::builder()
        .uri("/ok")
        .header(header::ORIGIN, "https://app.example")
        .body(Body::empty())
        .unwrap();

    let response = app(&settings).oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response
        .headers()
        .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
        .is_none());
}
