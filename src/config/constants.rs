//! Toolkit-wide constants
//!
//! Centralized location for default values.

// =============================================================================
// Pagination
// =============================================================================

/// Default number of items per page
pub const DEFAULT_PAGE_SIZE: u64 = 10;

/// Maximum allowed items per page
pub const MAX_PAGE_SIZE: u64 = 100;

/// Default starting page number (1-indexed)
pub const DEFAULT_PAGE_NUMBER: u64 = 1;

// =============================================================================
// Server Configuration
// =============================================================================

/// Default server host address
pub const DEFAULT_SERVER_HOST: &str = "0.0.0.0";

/// Default server port
pub const DEFAULT_SERVER_PORT: u16 = 8000;

// =============================================================================
// Middleware
// =============================================================================

/// Default request timeout in seconds
pub const DEFAULT_REQUEST_TIMEOUT_SECS: f64 = 30.0;

/// Largest body the logging middleware buffers (1 MiB)
pub const MAX_LOGGED_BODY_BYTES: usize = 1024 * 1024;

/// Placeholder logged for bodies that are not valid UTF-8
pub const UNDECODABLE_BODY: &str = "<unable to decode>";

/// Placeholder logged for sensitive header values
pub const REDACTED: &str = "[REDACTED]";

/// Headers whose values are never logged
pub const SENSITIVE_HEADERS: &[&str] = &["authorization", "cookie", "set-cookie"];

/// Wildcard used for CORS origins, methods and headers
pub const CORS_WILDCARD: &str = "*";

// =============================================================================
// Database
// =============================================================================

/// Default MySQL host
pub const DEFAULT_MYSQL_HOST: &str = "localhost";

/// Default MySQL port
pub const DEFAULT_MYSQL_PORT: u16 = 3306;

/// Default MySQL user
pub const DEFAULT_MYSQL_USER: &str = "root";

/// Default PostgreSQL host
pub const DEFAULT_POSTGRES_HOST: &str = "localhost";

/// Default PostgreSQL port
pub const DEFAULT_POSTGRES_PORT: u16 = 5432;

/// Default PostgreSQL user
pub const DEFAULT_POSTGRES_USER: &str = "postgres";

/// Default PostgreSQL database
pub const DEFAULT_POSTGRES_DATABASE: &str = "postgres";

/// Default maximum pool size
pub const DEFAULT_POOL_MAX_CONNECTIONS: u32 = 10;

/// Default minimum pool size
pub const DEFAULT_POOL_MIN_CONNECTIONS: u32 = 1;

/// Default connect timeout in seconds
pub const DEFAULT_POOL_CONNECT_TIMEOUT_SECS: u64 = 10;

// =============================================================================
// Cache
// =============================================================================

/// Default Redis host
pub const DEFAULT_REDIS_HOST: &str = "localhost";

/// Default Redis port
pub const DEFAULT_REDIS_PORT: u16 = 6379;

/// Default Memcache host
pub const DEFAULT_MEMCACHE_HOST: &str = "localhost";

/// Default Memcache port
pub const DEFAULT_MEMCACHE_PORT: u16 = 11211;

/// Separator between cache key parts
pub const CACHE_KEY_SEPARATOR: &str = ":";

// =============================================================================
// Connection names
// =============================================================================

/// Name under which single-URL connections are registered
pub const DEFAULT_CONNECTION_NAME: &str = "default";
