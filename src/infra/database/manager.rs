//! Registry of named SQL connections.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use futures::future::{join_all, try_join_all};
use parking_lot::RwLock;

use super::options::{MySqlOptions, PoolOptions, PostgresOptions};
use super::pool::{SharedSqlConnection, SqlPool};
use crate::errors::{AppError, AppResult};

/// Holds every SQL connection of the application under a name.
#[derive(Default)]
pub struct DatabaseManager {
    connections: RwLock<HashMap<String, SharedSqlConnection>>,
}

impl DatabaseManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a connection, replacing any previous one with the same name.
    pub fn add_connection(&self, name: impl Into<String>, connection: SharedSqlConnection) {
        let name = name.into();
        tracing::debug!(name = %name, "Registering database connection");
        self.connections.write().insert(name, connection);
    }

    pub fn get_connection(&self, name: &str) -> AppResult<SharedSqlConnection> {
        self.connections
            .read()
            .get(name)
            .cloned()
            .ok_or_else(|| AppError::ConnectionNotFound(name.to_string()))
    }

    /// Create and register a MySQL pool. It is not opened until
    /// [`connect_all`](Self::connect_all) runs.
    pub fn create_mysql_connection(
        &self,
        name: impl Into<String>,
        options: MySqlOptions,
        pool: PoolOptions,
    ) -> AppResult<Arc<SqlPool>> {
        let connection = Arc::new(SqlPool::mysql(options, pool)?);
        self.add_connection(name, connection.clone());
        Ok(connection)
    }

    /// Create and register a PostgreSQL pool.
    pub fn create_postgresql_connection(
        &self,
        name: impl Into<String>,
        options: PostgresOptions,
        pool: PoolOptions,
    ) -> AppResult<Arc<SqlPool>> {
        let connection = Arc::new(SqlPool::postgres(options, pool)?);
        self.add_connection(name, connection.clone());
        Ok(connection)
    }

    /// Create and register a pool from a connection URL.
    pub fn create_connection_from_url(
        &self,
        name: impl Into<String>,
        url: &str,
        pool: PoolOptions,
    ) -> AppResult<Arc<SqlPool>> {
        let connection = Arc::new(SqlPool::from_url(url, pool)?);
        self.add_connection(name, connection.clone());
        Ok(connection)
    }

    /// Registered connection names, sorted
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.connections.read().keys().cloned().collect();
        names.sort();
        names
    }

    /// Connect every registered connection concurrently.
    ///
    /// Fails with the first error; connections that already succeeded stay
    /// open.
    pub async fn connect_all(&self) -> AppResult<()> {
        let connections = self.snapshot();

        try_join_all(connections.iter().map(|(name, connection)| async move {
            connection.connect().await.map_err(|e| {
                tracing::error!(name = %name, "Database connection failed: {}", e);
                e
            })
        }))
        .await?;

        tracing::info!(count = connections.len(), "Databases connected");
        Ok(())
    }

    /// Disconnect every registered connection concurrently.
    ///
    /// All connections are attempted; the first failure is returned afterwards.
    pub async fn disconnect_all(&self) -> AppResult<()> {
        let connections = self.snapshot();

        let results = join_all(
            connections
                .iter()
                .map(|(name, connection)| async move { (name, connection.disconnect().await) }),
        )
        .await;

        let mut first_error = None;
        for (name, result) in results {
            if let Err(e) = result {
                tracing::error!(name = %name, "Database disconnect failed: {}", e);
                first_error.get_or_insert(e);
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    /// Ping every connection; `true` means it answered.
    pub async fn ping_all(&self) -> BTreeMap<String, bool> {
        let connections = self.snapshot();

        join_all(connections.into_iter().map(|(name, connection)| async move {
            let healthy = match connection.ping().await {
                Ok(()) => true,
                Err(e) => {
                    tracing::warn!(name = %name, "Database ping failed: {}", e);
                    false
                }
            };
            (name, healthy)
        }))
        .await
        .into_iter()
        .collect()
    }

    fn snapshot(&self) -> Vec<(String, SharedSqlConnection)> {
        self.connections
            .read()
            .iter()
            .map(|(name, connection)| (name.clone(), connection.clone()))
            .collect()
    }
}
