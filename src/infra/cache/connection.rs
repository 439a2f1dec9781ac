//! The cache connection abstraction shared by every backend.

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

use super::codec::Codec;
use crate::errors::AppResult;

/// Byte-level operations every cache backend provides.
///
/// Typed access goes through [`CacheExt`], which every connection gets for
/// free.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait CacheConnection: Send + Sync {
    async fn connect(&self) -> AppResult<()>;

    async fn disconnect(&self) -> AppResult<()>;

    async fn get_bytes(&self, key: &str) -> AppResult<Option<Vec<u8>>>;

    /// Store `value`, expiring after `expire` seconds when given.
    async fn set_bytes(&self, key: &str, value: Vec<u8>, expire: Option<u64>) -> AppResult<bool>;

    /// Returns whether the key existed.
    async fn delete(&self, key: &str) -> AppResult<bool>;

    async fn exists(&self, key: &str) -> AppResult<bool>;

    /// Drop every key the connection can see.
    async fn clear(&self) -> AppResult<bool>;

    async fn ping(&self) -> AppResult<()>;

    fn codec(&self) -> Codec;
}

/// Typed get/set over any [`CacheConnection`].
#[async_trait]
pub trait CacheExt: CacheConnection {
    /// Fetch and decode a value. Undecodable entries are an error.
    async fn get<T>(&self, key: &str) -> AppResult<Option<T>>
    where
        T: DeserializeOwned + Send + 'static,
    {
        match self.get_bytes(key).await? {
            Some(bytes) => self.codec().decode(&bytes).map(Some),
            None => Ok(None),
        }
    }

    async fn set<T>(&self, key: &str, value: &T, expire: Option<u64>) -> AppResult<bool>
    where
        T: Serialize + ?Sized + Sync,
    {
        let bytes = self.codec().encode(value)?;
        self.set_bytes(key, bytes, expire).await
    }
}

impl<C: CacheConnection + ?Sized> CacheExt for C {}
