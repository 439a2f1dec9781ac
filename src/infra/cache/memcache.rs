//! Memcache backend.
//!
//! The `memcache` client is synchronous, so every call runs on the blocking
//! thread pool.

use std::sync::Arc;

use async_trait::async_trait;
use memcache::{Client, MemcacheError};
use parking_lot::RwLock;

use super::codec::Codec;
use super::connection::CacheConnection;
use crate::config::{DEFAULT_MEMCACHE_HOST, DEFAULT_MEMCACHE_PORT};
use crate::errors::{AppError, AppResult};

/// Memcache server location and value encoding
#[derive(Debug, Clone)]
pub struct MemcacheOptions {
    pub host: String,
    pub port: u16,
    pub codec: Codec,
    /// Connections kept open to the server
    pub pool_size: u32,
}

impl Default for MemcacheOptions {
    fn default() -> Self {
        Self {
            host: DEFAULT_MEMCACHE_HOST.to_string(),
            port: DEFAULT_MEMCACHE_PORT,
            codec: Codec::Json,
            pool_size: 1,
        }
    }
}

impl MemcacheOptions {
    pub fn url(&self) -> String {
        format!("memcache://{}:{}", self.host, self.port)
    }
}

pub struct MemcacheCache {
    url: String,
    pool_size: u32,
    codec: Codec,
    client: RwLock<Option<Arc<Client>>>,
}

impl MemcacheCache {
    pub fn new(options: MemcacheOptions) -> Self {
        Self {
            url: options.url(),
            pool_size: options.pool_size.max(1),
            codec: options.codec,
            client: RwLock::new(None),
        }
    }

    /// Connection for a full `memcache://host:port` URL.
    pub fn from_url(url: &str, codec: Codec) -> Self {
        Self {
            url: url.to_owned(),
            pool_size: 1,
            codec,
            client: RwLock::new(None),
        }
    }

    fn client(&self) -> AppResult<Arc<Client>> {
        self.client
            .read()
            .clone()
            .ok_or_else(|| AppError::NotConnected(self.url.clone()))
    }

    async fn blocking<T, F>(&self, op: F) -> AppResult<T>
    where
        F: FnOnce(&Client) -> Result<T, MemcacheError> + Send + 'static,
        T: Send + 'static,
    {
        let client = self.client()?;
        let result = tokio::task::spawn_blocking(move || op(&client))
            .await
            .map_err(|e| AppError::internal(format!("memcache task failed: {e}")))?;
        Ok(result?)
    }
}

#[async_trait]
impl CacheConnection for MemcacheCache {
    async fn connect(&self) -> AppResult<()> {
        let url = self.url.clone();
        let pool_size = self.pool_size;

        let client = tokio::task::spawn_blocking(move || Client::with_pool_size(url.as_str(), pool_size))
            .await
            .map_err(|e| AppError::internal(format!("memcache task failed: {e}")))??;

        *self.client.write() = Some(Arc::new(client));
        tracing::info!(connection = %self.url, "Memcache connected");
        Ok(())
    }

    async fn disconnect(&self) -> AppResult<()> {
        if self.client.write().take().is_some() {
            tracing::info!(connection = %self.url, "Memcache disconnected");
        }
        Ok(())
    }

    async fn get_bytes(&self, key: &str) -> AppResult<Option<Vec<u8>>> {
        let key = key.to_owned();
        self.blocking(move |client| client.get::<Vec<u8>>(&key)).await
    }

    async fn set_bytes(&self, key: &str, value: Vec<u8>, expire: Option<u64>) -> AppResult<bool> {
        let key = key.to_owned();
        let expiration = expiration(expire);

        self.blocking(move |client| client.set(&key, value.as_slice(), expiration))
            .await?;
        Ok(true)
    }

    async fn delete(&self, key: &str) -> AppResult<bool> {
        let key = key.to_owned();
        self.blocking(move |client| client.delete(&key)).await
    }

    async fn exists(&self, key: &str) -> AppResult<bool> {
        Ok(self.get_bytes(key).await?.is_some())
    }

    async fn clear(&self) -> AppResult<bool> {
        self.blocking(|client| client.flush()).await?;
        tracing::warn!(connection = %self.url, "Memcache flushed");
        Ok(true)
    }

    async fn ping(&self) -> AppResult<()> {
        self.blocking(|client| client.version()).await?;
        Ok(())
    }

    fn codec(&self) -> Codec {
        self.codec
    }
}

/// Memcache treats `0` as "never expires"; longer values saturate.
fn expiration(expire: Option<u64>) -> u32 {
    expire
        .map(|secs| u32::try_from(secs).unwrap_or(u32::MAX))
        .unwrap_or(0)
}
