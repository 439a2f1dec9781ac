//! Error translation middleware.
//!
//! Handlers report expected failures through `AppError`; this layer catches
//! panics raised while serving a request and turns them into a 500 envelope
//! carrying an error id that also appears in the logs.

use std::any::Any;
use std::panic::AssertUnwindSafe;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use chrono::Utc;
use futures::FutureExt;
use uuid::Uuid;

use crate::types::response;

/// Error handler settings
#[derive(Debug, Clone, Copy, Default)]
pub struct ErrorHandlerSettings {
    /// Expose the panic message in the envelope's `errors`
    pub include_details: bool,
}

pub async fn error_handler_middleware(
    State(settings): State<ErrorHandlerSettings>,
    request: Request,
    next: Next,
) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    match AssertUnwindSafe(next.run(request)).catch_unwind().await {
        Ok(response) => response,
        Err(panic) => {
            let error_id = new_error_id();
            let message = panic_message(panic.as_ref());

            tracing::error!(
                error_id = %error_id,
                error_type = "panic",
                error_message = %message,
                path = %path,
                method = %method,
                "Unhandled error"
            );

            let mut errors = vec!["Internal server error".to_string()];
            if settings.include_details {
                errors.push(message);
            }

            response::internal_server_error(Some(&error_id))
                .with_message("An unexpected error occurred")
                .with_errors(errors)
                .into_response()
        }
    }
}

/// Error identifier of the form `error_{unix_seconds}_{8 hex chars}`.
pub fn new_error_id() -> String {
    let suffix = Uuid::new_v4().simple().to_string();
    format!("error_{}_{}", Utc::now().timestamp(), &suffix[..8])
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_id_format() {
        let id = new_error_id();
        let parts: Vec<&str> = id.split('_').collect();

        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], "error");
        assert!(parts[1].parse::<i64>().is_ok());
        assert_eq!(parts[2].len(), 8);
    }

    #[test]
    fn test_panic_message_payloads() {
        let static_str: Box<dyn Any + Send> = Box::new("boom");
        let owned: Box<dyn Any + Send> = Box::new(String::from("kaboom"));
        let other: Box<dyn Any + Send> = Box::new(42_u8);

        assert_eq!(panic_message(static_str.as_ref()), "boom");
        assert_eq!(panic_message(owned.as_ref()), "kaboom");
        assert_eq!(panic_message(other.as_ref()), "unknown panic payload");
    }
}
