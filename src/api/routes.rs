//! Application route configuration.

use axum::{routing::get, Router};
use tower_http::trace::TraceLayer;

use super::handlers::{demo_routes, health, root};
use super::middleware::{setup_middleware, MiddlewareSettings};
use super::AppState;
use crate::errors::AppResult;

/// Create the demo router with every route and the middleware stack
/// configured from the state's [`Config`](crate::config::Config).
pub fn create_router(state: AppState) -> AppResult<Router> {
    let settings = MiddlewareSettings::from(state.config.as_ref());

    let router = Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .nest("/demo", demo_routes());

    let router = setup_middleware(router, &settings)?;

    Ok(router
        // Global middleware
        .layer(TraceLayer::new_for_http())
        .with_state(state))
}
