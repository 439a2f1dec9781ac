//! Integration tests for the service container and its extractors.

mod common;

use std::sync::Arc;

use axum::{http::StatusCode, routing::get, Router};
use serde_json::json;
use tower::ServiceExt;

use axum_toolkit::errors::{AppError, AppResult};
use axum_toolkit::injection::{get_container, inject, Container, Inject, InjectGlobal, Injectable, Resolver};
use axum_toolkit::types::{response, ApiResponse};
use common::{body_json, get as get_request};

trait Clock: Send + Sync {
    fn now(&self) -> u64;
}

struct FixedClock(u64);

impl Clock for FixedClock {
    fn now(&self) -> u64 {
        self.0
    }
}

struct Scheduler {
    clock: Arc<dyn Clock>,
}

impl Injectable for Scheduler {
    fn inject(resolver: &mut Resolver<'_>) -> AppResult<Self> {
        Ok(Self {
            clock: resolver.get()?,
        })
    }
}

async fn current_time(Inject(clock): Inject<dyn Clock>) -> ApiResponse<serde_json::Value> {
    response::success(json!({ "now": clock.now() }))
}

#[tokio::test]
async fn test_inject_resolves_trait_objects() {
    let container = Arc::new(Container::new());
    container.register_singleton::<dyn Clock>(Arc::new(FixedClock(1_700_000_000)));

    let app = Router::new()
        .route("/now", get(current_time))
        .with_state(container);

    let response = app.oneshot(get_request("/now")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["now"], json!(1_700_000_000u64));
}

#[tokio::test]
async fn test_inject_missing_service_is_error_envelope() {
    let app = Router::new()
        .route("/now", get(current_time))
        .with_state(Arc::new(Container::new()));

    let response = app.oneshot(get_request("/now")).await.unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_json(response).await;
    assert_eq!(body["success"], json!(false));
    assert_eq!(body["errors"], json!(["DEPENDENCY_ERROR"]));
}

#[test]
fn test_auto_wiring_builds_dependencies() {
    let container = Container::new();
    container.register_instance::<dyn Clock>(Arc::new(FixedClock(5)));

    let scheduler = container.get_or_build::<Scheduler>().unwrap();
    assert_eq!(scheduler.clock.now(), 5);
}

#[test]
fn test_auto_wiring_reports_missing_dependency() {
    let container = Container::new();

    let err = container.get_or_build::<Scheduler>().err().unwrap();
    match err {
        AppError::AutoWire { type_name, source } => {
            assert!(type_name.ends_with("Scheduler"));
            assert!(matches!(*source, AppError::DependencyNotFound(_)));
        }
        other => panic!("unexpected error: {other}"),
    }
}

struct GlobalMarker(&'static str);

#[tokio::test]
async fn test_global_container() {
    get_container().register_singleton(Arc::new(GlobalMarker("global")));

    assert_eq!(inject::<GlobalMarker>().unwrap().0, "global");

    let app = Router::new().route(
        "/marker",
        get(|InjectGlobal(marker): InjectGlobal<GlobalMarker>| async move {
            response::message(marker.0)
        }),
    );

    let response = app.oneshot(get_request("/marker")).await.unwrap();
    let body = body_json(response).await;
    assert_eq!(body["message"], json!("global"));
}
