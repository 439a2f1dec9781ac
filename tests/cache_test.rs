//! Integration tests for the cache manager against an in-memory backend.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tokio_test::{assert_err, assert_ok};

use axum_toolkit::errors::{AppError, AppResult};
use axum_toolkit::infra::cache::{CacheConnection, CacheExt, CacheKey, CacheManager, Codec};

/// HashMap-backed cache recording the expiry of each write.
#[derive(Default)]
struct MemoryCache {
    codec: Codec,
    entries: Mutex<HashMap<String, (Vec<u8>, Option<u64>)>>,
    connected: Mutex<bool>,
}

impl MemoryCache {
    fn with_codec(codec: Codec) -> Self {
        Self {
            codec,
            ..Self::default()
        }
    }

    fn expiry_of(&self, key: &str) -> Option<Option<u64>> {
        self.entries.lock().get(key).map(|(_, expire)| *expire)
    }
}

#[async_trait]
impl CacheConnection for MemoryCache {
    async fn connect(&self) -> AppResult<()> {
        *self.connected.lock() = true;
        Ok(())
    }

    async fn disconnect(&self) -> AppResult<()> {
        *self.connected.lock() = false;
        Ok(())
    }

    async fn get_bytes(&self, key: &str) -> AppResult<Option<Vec<u8>>> {
        Ok(self.entries.lock().get(key).map(|(value, _)| value.clone()))
    }

    async fn set_bytes(&self, key: &str, value: Vec<u8>, expire: Option<u64>) -> AppResult<bool> {
        self.entries.lock().insert(key.to_string(), (value, expire));
        Ok(true)
    }

    async fn delete(&self, key: &str) -> AppResult<bool> {
        Ok(self.entries.lock().remove(key).is_some())
    }

    async fn exists(&self, key: &str) -> AppResult<bool> {
        Ok(self.entries.lock().contains_key(key))
    }

    async fn clear(&self) -> AppResult<bool> {
        self.entries.lock().clear();
        Ok(true)
    }

    async fn ping(&self) -> AppResult<()> {
        if *self.connected.lock() {
            Ok(())
        } else {
            Err(AppError::NotConnected("memory".into()))
        }
    }

    fn codec(&self) -> Codec {
        self.codec
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Report {
    id: u32,
    lines: Vec<String>,
}

fn report(id: u32) -> Report {
    Report {
        id,
        lines: vec![format!("line for {}", id)],
    }
}

#[tokio::test]
async fn test_typed_roundtrip_with_both_codecs() {
    for codec in [Codec::Json, Codec::Binary] {
        let cache = MemoryCache::with_codec(codec);

        assert!(assert_ok!(cache.set("report:1", &report(1), Some(30)).await));
        let loaded: Option<Report> = assert_ok!(cache.get("report:1").await);

        assert_eq!(loaded, Some(report(1)));
        assert_eq!(cache.expiry_of("report:1"), Some(Some(30)));
    }
}

#[tokio::test]
async fn test_delete_exists_clear() {
    let cache = MemoryCache::default();
    assert_ok!(cache.set("a", "x", None).await);
    assert_ok!(cache.set("b", "y", None).await);

    assert!(assert_ok!(cache.exists("a").await));
    assert!(assert_ok!(cache.delete("a").await));
    assert!(!assert_ok!(cache.delete("a").await));

    assert_ok!(cache.clear().await);
    assert!(!assert_ok!(cache.exists("b").await));
}

#[tokio::test]
async fn test_cached_runs_producer_once() {
    let manager = CacheManager::new();
    manager.add_connection("default", Arc::new(MemoryCache::default()));
    manager.connect_all().await.unwrap();

    let calls = AtomicUsize::new(0);
    let key = CacheKey::new("reports", "load").arg(7).kwarg("full", true);

    for _ in 0..3 {
        let loaded = manager
            .cached("default", &key, Some(120), || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(report(7))
            })
            .await
            .unwrap();
        assert_eq!(loaded, report(7));
    }

    assert_eq!(calls.load(Ordering::SeqCst), 1);
    let cache = manager.get_connection("default").unwrap();
    assert!(assert_ok!(cache.exists("reports:load:7:full=true").await));
}

#[tokio::test]
async fn test_cached_replaces_undecodable_entry() {
    let memory = Arc::new(MemoryCache::default());
    memory
        .set_bytes("reports:load:1", b"{broken".to_vec(), None)
        .await
        .unwrap();

    let manager = CacheManager::new();
    manager.add_connection("default", memory.clone());

    let loaded = manager
        .cached("default", &CacheKey::new("reports", "load").arg(1), None, || async {
            Ok(report(1))
        })
        .await
        .unwrap();

    assert_eq!(loaded, report(1));
    let stored: Option<Report> = assert_ok!(memory.get("reports:load:1").await);
    assert_eq!(stored, Some(report(1)));
}

#[tokio::test]
async fn test_cached_unknown_connection() {
    let manager = CacheManager::new();

    let result = manager
        .cached("missing", &CacheKey::new("", "x"), None, || async { Ok(1u8) })
        .await;
    assert!(matches!(assert_err!(result), AppError::ConnectionNotFound(_)));
}

#[tokio::test]
async fn test_lifecycle_and_ping() {
    let manager = CacheManager::new();
    manager.add_connection("primary", Arc::new(MemoryCache::default()));
    manager.add_connection("secondary", Arc::new(MemoryCache::default()));

    let before = manager.ping_all().await;
    assert!(before.values().all(|ok| !ok));

    assert_ok!(manager.connect_all().await);
    let after = manager.ping_all().await;
    assert_eq!(after.len(), 2);
    assert!(after.values().all(|ok| *ok));

    assert_ok!(manager.disconnect_all().await);
    assert_eq!(manager.names(), vec!["primary", "secondary"]);
}
