//! API layer - HTTP handlers, middleware and extractors
//!
//! - Middleware stack (timeout, logging, error handler, CORS)
//! - Custom extractors
//! - Demo routes wiring every component together

pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod state;

pub use routes::create_router;
pub use state::AppState;
