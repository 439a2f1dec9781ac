//! Connection options for the SQL backends.

use std::time::Duration;

use sea_orm::{ConnectOptions, DbBackend};
use url::Url;

use crate::config::{
    DEFAULT_MYSQL_HOST, DEFAULT_MYSQL_PORT, DEFAULT_MYSQL_USER, DEFAULT_POOL_CONNECT_TIMEOUT_SECS,
    DEFAULT_POOL_MAX_CONNECTIONS, DEFAULT_POOL_MIN_CONNECTIONS, DEFAULT_POSTGRES_DATABASE,
    DEFAULT_POSTGRES_HOST, DEFAULT_POSTGRES_PORT, DEFAULT_POSTGRES_USER,
};
use crate::errors::{AppError, AppResult};

/// MySQL server location and credentials
#[derive(Debug, Clone)]
pub struct MySqlOptions {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub database: String,
}

impl Default for MySqlOptions {
    fn default() -> Self {
        Self {
            host: DEFAULT_MYSQL_HOST.to_string(),
            port: DEFAULT_MYSQL_PORT,
            user: DEFAULT_MYSQL_USER.to_string(),
            password: String::new(),
            database: String::new(),
        }
    }
}

impl MySqlOptions {
    pub fn url(&self) -> AppResult<String> {
        build_url(
            "mysql",
            &self.host,
            self.port,
            &self.user,
            &self.password,
            &self.database,
        )
    }
}

/// PostgreSQL server location and credentials
#[derive(Debug, Clone)]
pub struct PostgresOptions {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub database: String,
}

impl Default for PostgresOptions {
    fn default() -> Self {
        Self {
            host: DEFAULT_POSTGRES_HOST.to_string(),
            port: DEFAULT_POSTGRES_PORT,
            user: DEFAULT_POSTGRES_USER.to_string(),
            password: String::new(),
            database: DEFAULT_POSTGRES_DATABASE.to_string(),
        }
    }
}

impl PostgresOptions {
    pub fn url(&self) -> AppResult<String> {
        build_url(
            "postgres",
            &self.host,
            self.port,
            &self.user,
            &self.password,
            &self.database,
        )
    }
}

/// Pool tuning shared by every SQL backend
#[derive(Debug, Clone)]
pub struct PoolOptions {
    pub max_connections: u32,
    pub min_connections: u32,
    pub connect_timeout: Duration,
    pub idle_timeout: Option<Duration>,
    /// Log every statement through sqlx
    pub sql_logging: bool,
}

impl Default for PoolOptions {
    fn default() -> Self {
        Self {
            max_connections: DEFAULT_POOL_MAX_CONNECTIONS,
            min_connections: DEFAULT_POOL_MIN_CONNECTIONS,
            connect_timeout: Duration::from_secs(DEFAULT_POOL_CONNECT_TIMEOUT_SECS),
            idle_timeout: None,
            sql_logging: false,
        }
    }
}

impl PoolOptions {
    pub(crate) fn connect_options(&self, url: &str) -> ConnectOptions {
        let mut options = ConnectOptions::new(url.to_owned());
        options
            .max_connections(self.max_connections)
            .min_connections(self.min_connections)
            .connect_timeout(self.connect_timeout)
            .sqlx_logging(self.sql_logging);

        if let Some(idle) = self.idle_timeout {
            options.idle_timeout(idle);
        }

        options
    }
}

/// Pick the backend from a connection URL scheme.
pub fn backend_for_url(url: &str) -> AppResult<DbBackend> {
    let parsed = Url::parse(url).map_err(|e| AppError::config(format!("invalid database url: {e}")))?;

    match parsed.scheme() {
        "mysql" | "mariadb" => Ok(DbBackend::MySql),
        "postgres" | "postgresql" => Ok(DbBackend::Postgres),
        other => Err(AppError::config(format!(
            "unsupported database scheme '{other}'"
        ))),
    }
}

/// The URL with its password removed, safe to log.
pub fn redacted_url(url: &str) -> String {
    match Url::parse(url) {
        Ok(mut parsed) => {
            if parsed.password().is_some() {
                let _ = parsed.set_password(None);
            }
            parsed.to_string()
        }
        Err(_) => "<invalid url>".to_string(),
    }
}

fn build_url(
    scheme: &str,
    host: &str,
    port: u16,
    user: &str,
    password: &str,
    database: &str,
) -> AppResult<String> {
    let invalid = |what: &str| AppError::config(format!("invalid {scheme} {what}"));

    let mut url = Url::parse(&format!("{scheme}://localhost"))
        .map_err(|e| AppError::config(e.to_string()))?;

    url.set_host(Some(host)).map_err(|_| invalid("host"))?;
    url.set_port(Some(port)).map_err(|_| invalid("port"))?;
    url.set_username(user).map_err(|_| invalid("user"))?;
    if !password.is_empty() {
        url.set_password(Some(password))
            .map_err(|_| invalid("password"))?;
    }
    url.set_path(&format!("/{database}"));

    Ok(url.to_string())
}
