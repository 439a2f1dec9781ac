//! Registry of named cache connections.

use std::collections::{BTreeMap, HashMap};
use std::future::Future;
use std::sync::Arc;

use parking_lot::RwLock;
use serde::{de::DeserializeOwned, Serialize};

use super::connection::{CacheConnection, CacheExt};
use super::key::CacheKey;
use crate::errors::{AppError, AppResult};

#[cfg(feature = "memcache")]
use super::memcache::{MemcacheCache, MemcacheOptions};
#[cfg(feature = "redis")]
use super::redis::{RedisCache, RedisOptions};

/// Shared handle type used by the manager
pub type SharedCacheConnection = Arc<dyn CacheConnection>;

/// Holds every cache connection of the application under a name.
#[derive(Default)]
pub struct CacheManager {
    connections: RwLock<HashMap<String, SharedCacheConnection>>,
}

impl CacheManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a connection, replacing any previous one with the same name.
    pub fn add_connection(&self, name: impl Into<String>, connection: SharedCacheConnection) {
        let name = name.into();
        tracing::debug!(name = %name, "Registering cache connection");
        self.connections.write().insert(name, connection);
    }

    pub fn get_connection(&self, name: &str) -> AppResult<SharedCacheConnection> {
        self.connections
            .read()
            .get(name)
            .cloned()
            .ok_or_else(|| AppError::ConnectionNotFound(name.to_string()))
    }

    #[cfg(feature = "redis")]
    pub fn create_redis_connection(
        &self,
        name: impl Into<String>,
        options: RedisOptions,
    ) -> AppResult<Arc<RedisCache>> {
        let connection = Arc::new(RedisCache::new(options)?);
        self.add_connection(name, connection.clone());
        Ok(connection)
    }

    #[cfg(feature = "memcache")]
    pub fn create_memcache_connection(
        &self,
        name: impl Into<String>,
        options: MemcacheOptions,
    ) -> Arc<MemcacheCache> {
        let connection = Arc::new(MemcacheCache::new(options));
        self.add_connection(name, connection.clone());
        connection
    }

    /// Registered connection names, sorted
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.connections.read().keys().cloned().collect();
        names.sort();
        names
    }

    /// Connect every registered connection one after another, in name order.
    pub async fn connect_all(&self) -> AppResult<()> {
        for (name, connection) in self.snapshot() {
            if let Err(e) = connection.connect().await {
                tracing::error!(name = %name, "Cache connection failed: {}", e);
                return Err(e);
            }
        }
        Ok(())
    }

    /// Disconnect every registered connection one after another.
    ///
    /// All connections are attempted; the first failure is returned afterwards.
    pub async fn disconnect_all(&self) -> AppResult<()> {
        let mut first_error = None;

        for (name, connection) in self.snapshot() {
            if let Err(e) = connection.disconnect().await {
                tracing::error!(name = %name, "Cache disconnect failed: {}", e);
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
        let mut status = BTreeMap::new();

        for (name, connection) in self.snapshot() {
            let healthy = match connection.ping().await {
                Ok(()) => true,
                Err(e) => {
                    tracing::warn!(name = %name, "Cache ping failed: {}", e);
                    false
                }
            };
            status.insert(name, healthy);
        }
        status
    }

    /// Read-through caching.
    ///
    /// Returns the value stored under `key` on `connection` when there is
    /// one. Otherwise runs `producer`, stores its result for `expire`
    /// seconds and returns it. Errors from `producer` are never cached.
    /// Entries that no longer decode are treated as misses.
    ///
    /// # Example
    /// ```ignore
    /// let key = CacheKey::new("users", "find").arg(id);
    /// let user = caches
    ///     .cached("default", &key, Some(300), || repo.find(id))
    ///     .await?;
    /// ```
    pub async fn cached<T, F, Fut>(
        &self,
        connection: &str,
        key: &CacheKey,
        expire: Option<u64>,
        producer: F,
    ) -> AppResult<T>
    where
        T: Serialize + DeserializeOwned + Send + Sync + 'static,
        F: FnOnce() -> Fut + Send,
        Fut: Future<Output = AppResult<T>> + Send,
    {
        let cache = self.get_connection(connection)?;
        let key = key.to_string();

        match cache.get::<T>(&key).await {
            Ok(Some(hit)) => {
                tracing::debug!(key = %key, "Cache hit");
                return Ok(hit);
            }
            Ok(None) => tracing::debug!(key = %key, "Cache miss"),
            Err(AppError::Serialization(e)) => {
                tracing::warn!(key = %key, "Discarding undecodable cache entry: {}", e);
            }
            Err(e) => return Err(e),
        }

        let value = producer().await?;
        cache.set(&key, &value, expire).await?;
        Ok(value)
    }

    fn snapshot(&self) -> Vec<(String, SharedCacheConnection)> {
        let mut connections: Vec<_> = self
            .connections
            .read()
            .iter()
            .map(|(name, connection)| (name.clone(), connection.clone()))
            .collect();
        connections.sort_by(|a, b| a.0.cmp(&b.0));
        connections
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::cache::{Codec, MockCacheConnection};
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_get_unknown_connection() {
        let manager = CacheManager::new();
        let err = manager.get_connection("missing").err().unwrap();
        assert!(matches!(err, AppError::ConnectionNotFound(name) if name == "missing"));
    }

    #[tokio::test]
    async fn test_connect_all_stops_on_first_error() {
        let mut first = MockCacheConnection::new();
        first
            .expect_connect()
            .times(1)
            .returning(|| Err(AppError::ServiceUnavailable("a".into())));

        let mut second = MockCacheConnection::new();
        second.expect_connect().never();

        let manager = CacheManager::new();
        manager.add_connection("a", Arc::new(first));
        manager.add_connection("b", Arc::new(second));

        assert!(manager.connect_all().await.is_err());
    }

    #[tokio::test]
    async fn test_disconnect_all_attempts_every_connection() {
        let mut failing = MockCacheConnection::new();
        failing
            .expect_disconnect()
            .times(1)
            .returning(|| Err(AppError::internal("boom")));

        let mut healthy = MockCacheConnection::new();
        healthy.expect_disconnect().times(1).returning(|| Ok(()));

        let manager = CacheManager::new();
        manager.add_connection("a", Arc::new(failing));
        manager.add_connection("b", Arc::new(healthy));

        assert!(manager.disconnect_all().await.is_err());
    }

    #[tokio::test]
    async fn test_cached_returns_hit_without_running_producer() {
        let mut mock = MockCacheConnection::new();
        mock.expect_codec().return_const(Codec::Json);
        mock.expect_get_bytes()
            .returning(|_| Ok(Some(b"\"cached\"".to_vec())));
        mock.expect_set_bytes().never();

        let manager = CacheManager::new();
        manager.add_connection("default", Arc::new(mock));

        let value: String = manager
            .cached("default", &CacheKey::new("p", "f"), None, || async {
                Ok::<_, AppError>("fresh".to_string())
            })
            .await
            .unwrap();
        assert_eq!(value, "cached");
    }

    #[tokio::test]
    async fn test_cached_stores_miss() {
        let mut mock = MockCacheConnection::new();
        mock.expect_codec().return_const(Codec::Json);
        mock.expect_get_bytes().returning(|_| Ok(None));
        mock.expect_set_bytes()
            .withf(|key, value, expire| {
                key == "p:f:7" && value.as_slice() == b"49" && *expire == Some(10)
            })
            .times(1)
            .returning(|_, _, _| Ok(true));

        let manager = CacheManager::new();
        manager.add_connection("default", Arc::new(mock));

        let calls = AtomicUsize::new(0);
        let value: u32 = manager
            .cached("default", &CacheKey::new("p", "f").arg(7), Some(10), || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(49)
            })
            .await
            .unwrap();

        assert_eq!(value, 49);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_cached_does_not_store_errors() {
        let mut mock = MockCacheConnection::new();
        mock.expect_codec().return_const(Codec::Json);
        mock.expect_get_bytes().returning(|_| Ok(None));
        mock.expect_set_bytes().never();

        let manager = CacheManager::new();
        manager.add_connection("default", Arc::new(mock));

        let result: AppResult<u32> = manager
            .cached("default", &CacheKey::new("p", "f"), None, || async {
                Err(AppError::not_found("Thing"))
            })
            .await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_ping_all() {
        let mut up = MockCacheConnection::new();
        up.expect_ping().returning(|| Ok(()));
        let mut down = MockCacheConnection::new();
        down.expect_ping()
            .returning(|| Err(AppError::NotConnected("down".into())));

        let manager = CacheManager::new();
        manager.add_connection("up", Arc::new(up));
        manager.add_connection("down", Arc::new(down));

        let status = manager.ping_all().await;
        assert_eq!(status, BTreeMap::from([("down".to_string(), false), ("up".to_string(), true)]));
    }
}
