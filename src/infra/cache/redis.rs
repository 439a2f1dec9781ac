//! Redis cache backend.

use async_trait::async_trait;
use parking_lot::RwLock;
use redis::{aio::ConnectionManager, AsyncCommands, Client};
use url::Url;

use super::codec::Codec;
use super::connection::CacheConnection;
use crate::config::{DEFAULT_REDIS_HOST, DEFAULT_REDIS_PORT};
use crate::errors::{AppError, AppResult};

/// Redis server location and value encoding
#[derive(Debug, Clone)]
pub struct RedisOptions {
    pub host: String,
    pub port: u16,
    pub password: Option<String>,
    pub db: i64,
    pub codec: Codec,
}

impl Default for RedisOptions {
    fn default() -> Self {
        Self {
            host: DEFAULT_REDIS_HOST.to_string(),
            port: DEFAULT_REDIS_PORT,
            password: None,
            db: 0,
            codec: Codec::Json,
        }
    }
}

impl RedisOptions {
    pub fn url(&self) -> AppResult<String> {
        let invalid = |what: &str| AppError::config(format!("invalid redis {what}"));

        let mut url = Url::parse("redis://localhost").map_err(|e| AppError::config(e.to_string()))?;
        url.set_host(Some(&self.host)).map_err(|_| invalid("host"))?;
        url.set_port(Some(self.port)).map_err(|_| invalid("port"))?;
        if let Some(password) = &self.password {
            url.set_password(Some(password))
                .map_err(|_| invalid("password"))?;
        }
        url.set_path(&format!("/{}", self.db));

        Ok(url.to_string())
    }
}

/// Redis connection using a multiplexed, auto-reconnecting
/// [`ConnectionManager`].
pub struct RedisCache {
    client: Client,
    label: String,
    codec: Codec,
    connection: RwLock<Option<ConnectionManager>>,
}

impl RedisCache {
    pub fn new(options: RedisOptions) -> AppResult<Self> {
        let url = options.url()?;
        let label = format!("{}:{}/{}", options.host, options.port, options.db);
        Self::build(&url, label, options.codec)
    }

    /// Connection for a full `redis://` URL.
    pub fn from_url(url: &str, codec: Codec) -> AppResult<Self> {
        let label = Url::parse(url)
            .ok()
            .and_then(|u| u.host_str().map(|h| format!("{}:{}", h, u.port().unwrap_or(DEFAULT_REDIS_PORT))))
            .unwrap_or_else(|| "redis".to_string());
        Self::build(url, label, codec)
    }

    fn build(url: &str, label: String, codec: Codec) -> AppResult<Self> {
        Ok(Self {
            client: Client::open(url)?,
            label,
            codec,
            connection: RwLock::new(None),
        })
    }

    /// Get the connection manager for direct Redis operations.
    pub fn connection(&self) -> AppResult<ConnectionManager> {
        self.connection
            .read()
            .clone()
            .ok_or_else(|| AppError::NotConnected(self.label.clone()))
    }

    /// Increment a counter, creating it at zero first when missing.
    pub async fn increment(&self, key: &str, amount: i64) -> AppResult<i64> {
        let mut conn = self.connection()?;
        let value: i64 = conn.incr(key, amount).await?;
        Ok(value)
    }

    /// Set key expiration time in seconds. `false` when the key is missing.
    pub async fn expire(&self, key: &str, seconds: i64) -> AppResult<bool> {
        let mut conn = self.connection()?;
        let applied: bool = conn.expire(key, seconds).await?;
        Ok(applied)
    }

    /// Remaining time to live in seconds.
    ///
    /// `-1` when the key has no expiry and `-2` when it does not exist.
    pub async fn ttl(&self, key: &str) -> AppResult<i64> {
        let mut conn = self.connection()?;
        let ttl: i64 = conn.ttl(key).await?;
        Ok(ttl)
    }

    /// Delete all keys matching a glob pattern.
    pub async fn delete_pattern(&self, pattern: &str) -> AppResult<u64> {
        let mut conn = self.connection()?;
        let keys: Vec<String> = conn.keys(pattern).await?;

        if keys.is_empty() {
            return Ok(0);
        }

        let deleted: u64 = conn.del(&keys).await?;
        Ok(deleted)
    }
}

#[async_trait]
impl CacheConnection for RedisCache {
    async fn connect(&self) -> AppResult<()> {
        let mut conn = ConnectionManager::new(self.client.clone()).await?;
        let _: String = redis::cmd("PING").query_async(&mut conn).await?;

        *self.connection.write() = Some(conn);
        tracing::info!(connection = %self.label, "Redis cache connected");
        Ok(())
    }

    async fn disconnect(&self) -> AppResult<()> {
        if self.connection.write().take().is_some() {
            tracing::info!(connection = %self.label, "Redis cache disconnected");
        }
        Ok(())
    }

    async fn get_bytes(&self, key: &str) -> AppResult<Option<Vec<u8>>> {
        let mut conn = self.connection()?;
        let value: Option<Vec<u8>> = conn.get(key).await?;
        Ok(value)
    }

    async fn set_bytes(&self, key: &str, value: Vec<u8>, expire: Option<u64>) -> AppResult<bool> {
        let mut conn = self.connection()?;

        match expire.filter(|secs| *secs > 0) {
            Some(secs) => {
                let _: () = conn.set_ex(key, value, secs).await?;
            }
            None => {
                let _: () = conn.set(key, value).await?;
            }
        }
        Ok(true)
    }

    async fn delete(&self, key: &str) -> AppResult<bool> {
        let mut conn = self.connection()?;
        let removed: u64 = conn.del(key).await?;
        Ok(removed > 0)
    }

    async fn exists(&self, key: &str) -> AppResult<bool> {
        let mut conn = self.connection()?;
        let found: bool = conn.exists(key).await?;
        Ok(found)
    }

    async fn clear(&self) -> AppResult<bool> {
        let mut conn = self.connection()?;
        let _: () = redis::cmd("FLUSHDB").query_async(&mut conn).await?;
        tracing::warn!(connection = %self.label, "Redis database flushed");
        Ok(true)
    }

    async fn ping(&self) -> AppResult<()> {
        let mut conn = self.connection()?;
        let _: String = redis::cmd("PING").query_async(&mut conn).await?;
        Ok(())
    }

    fn codec(&self) -> Codec {
        self.codec
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_url() {
        assert_eq!(RedisOptions::default().url().unwrap(), "redis://localhost:6379/0");
    }

    #[test]
    fn test_url_with_password_and_db() {
        let options = RedisOptions {
            host: "cache.internal".into(),
            password: Some("s3cr#t".into()),
            db: 2,
            ..RedisOptions::default()
        };
        assert_eq!(
            options.url().unwrap(),
            "redis://:s3cr%23t@cache.internal:6379/2"
        );
    }

    #[tokio::test]
    async fn test_commands_before_connect_fail() {
        let cache = RedisCache::new(RedisOptions::default()).unwrap();

        let err = cache.get_bytes("key").await.unwrap_err();
        assert!(matches!(err, AppError::NotConnected(label) if label == "localhost:6379/0"));
        assert!(cache.disconnect().await.is_ok());
    }
}
