//! Application state shared by every handler.

use std::sync::Arc;

use axum::extract::FromRef;

use crate::config::{Config, DEFAULT_CONNECTION_NAME};
use crate::errors::AppResult;
#[cfg(any(feature = "redis", feature = "memcache"))]
use crate::infra::cache::Codec;
use crate::infra::cache::CacheManager;
#[cfg(feature = "database")]
use crate::infra::database::{DatabaseManager, PoolOptions};
use crate::injection::Container;

use super::handlers::{FriendlyGreeter, Greeter, ItemCatalog};

/// Application state: configuration, the service container and the
/// connection managers.
///
/// Each field can be extracted on its own through `State<T>`.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub container: Arc<Container>,
    #[cfg(feature = "database")]
    pub databases: Arc<DatabaseManager>,
    pub caches: Arc<CacheManager>,
}

impl FromRef<AppState> for Arc<Config> {
    fn from_ref(state: &AppState) -> Self {
        state.config.clone()
    }
}

impl FromRef<AppState> for Arc<Container> {
    fn from_ref(state: &AppState) -> Self {
        state.container.clone()
    }
}

#[cfg(feature = "database")]
impl FromRef<AppState> for Arc<DatabaseManager> {
    fn from_ref(state: &AppState) -> Self {
        state.databases.clone()
    }
}

impl FromRef<AppState> for Arc<CacheManager> {
    fn from_ref(state: &AppState) -> Self {
        state.caches.clone()
    }
}

impl AppState {
    /// State with empty connection managers.
    pub fn new(config: Config) -> Self {
        let state = Self {
            config: Arc::new(config),
            container: Arc::new(Container::new()),
            #[cfg(feature = "database")]
            databases: Arc::new(DatabaseManager::new()),
            caches: Arc::new(CacheManager::new()),
        };
        state.register_services();
        state
    }

    /// State with a `default` connection registered for every URL present
    /// in `config`. Nothing is opened until [`connect`](Self::connect).
    pub fn from_config(config: Config) -> AppResult<Self> {
        let state = Self::new(config);

        #[cfg(feature = "database")]
        if let Some(url) = &state.config.database_url {
            state.databases.create_connection_from_url(
                DEFAULT_CONNECTION_NAME,
                url,
                PoolOptions::default(),
            )?;
        }

        #[cfg(feature = "redis")]
        if let Some(url) = &state.config.redis_url {
            let cache = crate::infra::cache::RedisCache::from_url(url, Codec::Json)?;
            state
                .caches
                .add_connection(DEFAULT_CONNECTION_NAME, Arc::new(cache));
        }

        #[cfg(feature = "memcache")]
        if let Some(url) = &state.config.memcache_url {
            let cache = crate::infra::cache::MemcacheCache::from_url(url, Codec::Json);
            // Redis takes the default slot when both are configured
            let name = if state.config.redis_url.is_some() {
                "memcache"
            } else {
                DEFAULT_CONNECTION_NAME
            };
            state.caches.add_connection(name, Arc::new(cache));
        }

        Ok(state)
    }

    /// Open every registered connection.
    pub async fn connect(&self) -> AppResult<()> {
        #[cfg(feature = "database")]
        self.databases.connect_all().await?;
        self.caches.connect_all().await
    }

    /// Close every registered connection, logging failures.
    pub async fn shutdown(&self) {
        #[cfg(feature = "database")]
        if let Err(e) = self.databases.disconnect_all().await {
            tracing::error!("Database shutdown failed: {}", e);
        }
        if let Err(e) = self.caches.disconnect_all().await {
            tracing::error!("Cache shutdown failed: {}", e);
        }
    }

    fn register_services(&self) {
        self.container.register_singleton(self.config.clone());
        self.container.register_singleton(self.caches.clone());
        #[cfg(feature = "database")]
        self.container.register_singleton(self.databases.clone());

        self.container
            .register_singleton::<dyn Greeter>(Arc::new(FriendlyGreeter));
        self.container.register_injectable::<ItemCatalog>();
    }
}
