//! Cross-origin resource sharing.

use axum::http::{HeaderName, HeaderValue, Method};
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};

use crate::config::CORS_WILDCARD;
use crate::errors::{AppError, AppResult};

/// CORS settings. Defaults allow every origin, method and header with
/// credentials enabled.
#[derive(Debug, Clone)]
pub struct CorsSettings {
    pub allow_origins: Vec<String>,
    pub allow_credentials: bool,
    pub allow_methods: Vec<String>,
    pub allow_headers: Vec<String>,
}

impl Default for CorsSettings {
    fn default() -> Self {
        Self {
            allow_origins: vec![CORS_WILDCARD.to_string()],
            allow_credentials: true,
            allow_methods: vec![CORS_WILDCARD.to_string()],
            allow_headers: vec![CORS_WILDCARD.to_string()],
        }
    }
}

impl CorsSettings {
    /// Defaults restricted to the given origins.
    pub fn with_origins<I, O>(origins: I) -> Self
    where
        I: IntoIterator<Item = O>,
        O: Into<String>,
    {
        Self {
            allow_origins: origins.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }
}

fn is_wildcard(values: &[String]) -> bool {
    values.iter().any(|v| v == CORS_WILDCARD)
}

/// Build a `CorsLayer` from settings.
///
/// A literal `*` is not allowed together with credentials, so wildcards
/// mirror the request's origin, method and headers in that case.
pub fn cors_layer(settings: &CorsSettings) -> AppResult<CorsLayer> {
    let credentials = settings.allow_credentials;

    let origin = if is_wildcard(&settings.allow_origins) {
        if credentials {
            AllowOrigin::mirror_request()
        } else {
            AllowOrigin::any()
        }
    } else {
        let origins = settings
            .allow_origins
            .iter()
            .map(|o| {
                HeaderValue::from_str(o)
                    .map_err(|_| AppError::config(format!("invalid CORS origin: {}", o)))
            })
            .collect::<AppResult<Vec<_>>>()?;
        AllowOrigin::list(origins)
    };

    let methods = if is_wildcard(&settings.allow_methods) {
        if credentials {
            AllowMethods::mirror_request()
        } else {
            AllowMethods::any()
        }
    } else {
        let methods = settings
            .allow_methods
            .iter()
            .map(|m| {
                Method::from_bytes(m.to_ascii_uppercase().as_bytes())
                    .map_err(|_| AppError::config(format!("invalid CORS method: {}", m)))
            })
            .collect::<AppResult<Vec<_>>>()?;
        AllowMethods::list(methods)
    };

    let headers = if is_wildcard(&settings.allow_headers) {
        if credentials {
            AllowHeaders::mirror_request()
        } else {
            AllowHeaders::any()
        }
    } else {
        let headers = settings
            .allow_headers
            .iter()
            .map(|h| {
                HeaderName::from_bytes(h.as_bytes())
                    .map_err(|_| AppError::config(format!("invalid CORS header: {}", h)))
            })
            .collect::<AppResult<Vec<_>>>()?;
        AllowHeaders::list(headers)
    };

    Ok(CorsLayer::new()
        .allow_origin(origin)
        .allow_methods(methods)
        .allow_headers(headers)
        .allow_credentials(credentials))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings_build() {
        assert!(cors_layer(&CorsSettings::default()).is_ok());
    }

    #[test]
    fn test_explicit_lists_build() {
        let settings = CorsSettings {
            allow_origins: vec!["https://app.example".into()],
            allow_credentials: false,
            allow_methods: vec!["get".into(), "POST".into()],
            allow_headers: vec!["content-type".into()],
        };
        assert!(cors_layer(&settings).is_ok());
    }

    #[test]
    fn test_invalid_origin_is_rejected() {
        let settings = CorsSettings::with_origins(["bad\norigin"]);
        let err = cors_layer(&settings).err().unwrap();
        assert!(matches!(err, AppError::Config(_)));
    }
}
