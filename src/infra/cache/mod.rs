//! Cache connections for Redis and Memcache.
//!
//! Backends implement the byte-level [`CacheConnection`]; typed values go
//! through [`CacheExt`] using each connection's [`Codec`]. The
//! [`CacheManager`] keeps named connections and provides read-through
//! caching keyed by [`CacheKey`].

mod codec;
mod connection;
mod key;
mod manager;
#[cfg(feature = "memcache")]
mod memcache;
#[cfg(feature = "redis")]
mod redis;

pub use codec::Codec;
pub use connection::{CacheConnection, CacheExt};
pub use key::CacheKey;
pub use manager::{CacheManager, SharedCacheConnection};

#[cfg(any(test, feature = "test-utils"))]
pub use connection::MockCacheConnection;

#[cfg(feature = "memcache")]
pub use self::memcache::{MemcacheCache, MemcacheOptions};
#[cfg(feature = "redis")]
pub use self::redis::{RedisCache, RedisOptions};
