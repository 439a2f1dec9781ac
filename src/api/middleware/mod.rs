//! HTTP middleware.
//!
//! [`setup_middleware`] composes the stack in a fixed order. From the
//! outside in:
//!
//! 1. timeout
//! 2. logging
//! 3. error handler
//! 4. CORS (closest to the routes)

mod cors;
mod error_handler;
mod logging;
mod timeout;

use std::time::Duration;

use axum::{middleware, Router};

pub use cors::{cors_layer, CorsSettings};
pub use error_handler::{error_handler_middleware, new_error_id, ErrorHandlerSettings};
pub use logging::{logging_middleware, LoggingSettings};
pub use timeout::{timeout_middleware, timeout_response, TimeoutSettings};

use crate::config::Config;
use crate::errors::AppResult;

/// Settings for the whole middleware stack
#[derive(Debug, Clone)]
pub struct MiddlewareSettings {
    pub timeout: TimeoutSettings,
    pub enable_logging: bool,
    pub logging: LoggingSettings,
    pub enable_error_handler: bool,
    pub error_handler: ErrorHandlerSettings,
    pub enable_cors: bool,
    pub cors: CorsSettings,
}

impl Default for MiddlewareSettings {
    fn default() -> Self {
        Self {
            timeout: TimeoutSettings::default(),
            enable_logging: true,
            logging: LoggingSettings::default(),
            enable_error_handler: true,
            error_handler: ErrorHandlerSettings::default(),
            enable_cors: true,
            cors: CorsSettings::default(),
        }
    }
}

impl MiddlewareSettings {
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = TimeoutSettings { timeout };
        self
    }
}

impl From<&Config> for MiddlewareSettings {
    fn from(config: &Config) -> Self {
        Self {
            timeout: TimeoutSettings {
                timeout: config.request_timeout,
            },
            logging: LoggingSettings {
                log_request_body: config.log_request_body,
                log_response_body: config.log_response_body,
                ..LoggingSettings::default()
            },
            error_handler: ErrorHandlerSettings {
                include_details: config.include_error_details,
            },
            cors: CorsSettings::with_origins(config.cors_origins.iter().cloned()),
            ..Self::default()
        }
    }
}

/// Apply the middleware stack to `router`.
///
/// Fails only when the CORS settings contain an invalid origin, method or
/// header.
pub fn setup_middleware<S>(router: Router<S>, settings: &MiddlewareSettings) -> AppResult<Router<S>>
where
    S: Clone + Send + Sync + 'static,
{
    let mut router = router;

    if settings.enable_cors {
        router = router.layer(cors_layer(&settings.cors)?);
    }

    if settings.enable_error_handler {
        router = router.layer(middleware::from_fn_with_state(
            settings.error_handler,
            error_handler_middleware,
        ));
    }

    if settings.enable_logging {
        router = router.layer(middleware::from_fn_with_state(
            settings.logging.clone(),
            logging_middleware,
        ));
    }

    router = router.layer(middleware::from_fn_with_state(
        settings.timeout,
        timeout_middleware,
    ));

    tracing::debug!(
        timeout_secs = settings.timeout.timeout.as_secs_f64(),
        logging = settings.enable_logging,
        error_handler = settings.enable_error_handler,
        cors = settings.enable_cors,
        "Middleware configured"
    );

    Ok(router)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_from_config() {
        let config = Config {
            request_timeout: Duration::from_secs(5),
            cors_origins: vec!["https://app.example".into()],
            log_request_body: true,
            include_error_details: true,
            ..Config::default()
        };

        let settings = MiddlewareSettings::from(&config);
        assert_eq!(settings.timeout.timeout, Duration::from_secs(5));
        assert_eq!(settings.cors.allow_origins, vec!["https://app.example"]);
        assert!(settings.cors.allow_credentials);
        assert!(settings.logging.log_request_body);
        assert!(!settings.logging.log_response_body);
        assert!(settings.error_handler.include_details);
        assert!(settings.enable_logging && settings.enable_cors);
    }
}
