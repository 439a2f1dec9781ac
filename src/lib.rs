//! axum-toolkit - building blocks for axum services
//!
//! # Modules
//!
//! - **injection**: Type-keyed dependency injection container and extractors
//! - **api**: Middleware stack, extractors and a demo router
//! - **infra**: Database and cache connections with named managers
//! - **types**: Response envelopes, status mapping and pagination
//! - **config**: Environment configuration and constants
//! - **errors**: Centralized error handling
//! - **cli** / **commands**: The `toolkit-demo` binary
//!
//! # Example
//!
//! ```rust,ignore
//! use axum::{routing::get, Router};
//! use axum_toolkit::{api::middleware::{setup_middleware, MiddlewareSettings}, types::response};
//!
//! let router = Router::new().route("/", get(|| async { response::message("pong") }));
//! let router = setup_middleware(router, &MiddlewareSettings::default())?;
//! ```
//!
//! # Features
//!
//! - `postgres`, `mysql` (imply `database`): sea-orm SQL pools
//! - `redis`, `memcache`: cache backends
//! - `test-utils`: mockall mocks of the connection traits

pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod errors;
pub mod infra;
pub mod injection;
pub mod types;

// Re-export commonly used types at crate root
pub use api::AppState;
pub use config::Config;
pub use errors::{AppError, AppResult};
pub use injection::{get_container, inject, Container, Inject, InjectGlobal, Injectable};
pub use types::{response, ApiResponse};
