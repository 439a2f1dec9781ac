//! Toolkit settings loaded from environment variables.

use std::env;
use std::time::Duration;

use super::constants::{
    CORS_WILDCARD, DEFAULT_REQUEST_TIMEOUT_SECS, DEFAULT_SERVER_HOST, DEFAULT_SERVER_PORT,
};

/// Toolkit configuration
#[derive(Clone)]
pub struct Config {
    pub server_host: String,
    pub server_port: u16,
    pub request_timeout: Duration,
    pub cors_origins: Vec<String>,
    pub log_request_body: bool,
    pub log_response_body: bool,
    pub include_error_details: bool,
    pub database_url: Option<String>,
    pub redis_url: Option<String>,
    pub memcache_url: Option<String>,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let redact = |url: &Option<String>| url.as_ref().map(|_| "[REDACTED]");

        f.debug_struct("Config")
            .field("server_host", &self.server_host)
            .field("server_port", &self.server_port)
            .field("request_timeout", &self.request_timeout)
            .field("cors_origins", &self.cors_origins)
            .field("log_request_body", &self.log_request_body)
            .field("log_response_body", &self.log_response_body)
            .field("include_error_details", &self.include_error_details)
            .field("database_url", &redact(&self.database_url))
            .field("redis_url", &redact(&self.redis_url))
            .field("memcache_url", &redact(&self.memcache_url))
            .finish()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_host: DEFAULT_SERVER_HOST.to_string(),
            server_port: DEFAULT_SERVER_PORT,
            request_timeout: Duration::from_secs_f64(DEFAULT_REQUEST_TIMEOUT_SECS),
            cors_origins: vec![CORS_WILDCARD.to_string()],
            log_request_body: false,
            log_response_body: false,
            include_error_details: false,
            database_url: None,
            redis_url: None,
            memcache_url: None,
        }
    }
}

impl Config {
    /// Load configuration from environment variables (and `.env` if present).
    ///
    /// Unset or unparsable values fall back to the defaults.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let request_timeout = lookup("REQUEST_TIMEOUT_SECS")
            .and_then(|v| parse_or_warn::<f64>("REQUEST_TIMEOUT_SECS", &v))
            .filter(|secs| secs.is_finite() && *secs > 0.0)
            .map(Duration::from_secs_f64)
            .unwrap_or(defaults.request_timeout);

        let cors_origins = lookup("CORS_ORIGINS")
            .map(|v| {
                v.split(',')
                    .map(str::trim)
                    .filter(|origin| !origin.is_empty())
                    .map(String::from)
                    .collect::<Vec<_>>()
            })
            .filter(|origins| !origins.is_empty())
            .unwrap_or(defaults.cors_origins);

        Self {
            server_host: lookup("SERVER_HOST").unwrap_or(defaults.server_host),
            server_port: lookup("SERVER_PORT")
                .and_then(|v| parse_or_warn("SERVER_PORT", &v))
                .unwrap_or(defaults.server_port),
            request_timeout,
            cors_origins,
            log_request_body: flag(&lookup, "LOG_REQUEST_BODY"),
            log_response_body: flag(&lookup, "LOG_RESPONSE_BODY"),
            include_error_details: flag(&lookup, "INCLUDE_ERROR_DETAILS"),
            database_url: lookup("DATABASE_URL").filter(|v| !v.is_empty()),
            redis_url: lookup("REDIS_URL").filter(|v| !v.is_empty()),
            memcache_url: lookup("MEMCACHE_URL").filter(|v| !v.is_empty()),
        }
    }

    /// Get the full server address.
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}

fn parse_or_warn<T: std::str::FromStr>(key: &str, value: &str) -> Option<T> {
    match value.trim().parse() {
        Ok(parsed) => Some(parsed),
        Err(_) => {
            tracing::warn!(key = %key, value = %value, "Ignoring unparsable setting");
            None
        }
    }
}

fn flag<F>(lookup: &F, key: &str) -> bool
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Config {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]);
        assert_eq!(config.server_addr(), "0.0.0.0:8000");
        assert_eq!(config.request_timeout, Duration::from_secs(30));
        assert_eq!(config.cors_origins, vec!["*"]);
        assert!(!config.log_request_body);
        assert!(config.database_url.is_none());
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("SERVER_PORT", "9000"),
            ("REQUEST_TIMEOUT_SECS", "2.5"),
            ("CORS_ORIGINS", "https://a.example, https://b.example"),
            ("LOG_REQUEST_BODY", "true"),
            ("REDIS_URL", "redis://cache:6379/0"),
        ]);

        assert_eq!(config.server_port, 9000);
        assert_eq!(config.request_timeout, Duration::from_millis(2500));
        assert_eq!(
            config.cors_origins,
            vec!["https://a.example", "https://b.example"]
        );
        assert!(config.log_request_body);
        assert_eq!(config.redis_url.as_deref(), Some("redis://cache:6379/0"));
    }

    #[test]
    fn test_invalid_values_fall_back() {
        let config = config_from(&[("SERVER_PORT", "not-a-port"), ("REQUEST_TIMEOUT_SECS", "-1")]);
        assert_eq!(config.server_port, DEFAULT_SERVER_PORT);
        assert_eq!(config.request_timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_debug_redacts_urls() {
        let config = config_from(&[("DATABASE_URL", "postgres://u:secret@db/app")]);
        let debug = format!("{:?}", config);
        assert!(!debug.contains("secret"));
        assert!(debug.contains("[REDACTED]"));
    }
}
