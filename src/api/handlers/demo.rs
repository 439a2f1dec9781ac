//! Demo endpoints exercising the toolkit: injected services, pagination,
//! read-through caching and validated payloads.

use std::sync::Arc;

use axum::{
    extract::{Path, Query},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::config::DEFAULT_CONNECTION_NAME;
use crate::errors::AppResult;
use crate::infra::cache::{CacheKey, CacheManager};
use crate::injection::{Inject, Injectable, Resolver};
use crate::types::{response, ApiResponse, Created, PaginationParams};

use super::super::AppState;

/// Number of items in the demo catalog
const CATALOG_SIZE: u64 = 42;

/// Seconds a catalog page stays cached
const CATALOG_PAGE_TTL: u64 = 60;

pub trait Greeter: Send + Sync {
    fn greet(&self, name: &str) -> String;
}

pub struct FriendlyGreeter;

impl Greeter for FriendlyGreeter {
    fn greet(&self, name: &str) -> String {
        format!("Hello, {}!", name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: u64,
    pub name: String,
}

/// Fixed catalog served page by page, cached on the default cache
/// connection when one is registered.
pub struct ItemCatalog {
    caches: Arc<CacheManager>,
}

impl Injectable for ItemCatalog {
    fn inject(resolver: &mut Resolver<'_>) -> AppResult<Self> {
        Ok(Self {
            caches: resolver.get()?,
        })
    }
}

impl ItemCatalog {
    pub fn total(&self) -> u64 {
        CATALOG_SIZE
    }

    pub async fn page(&self, params: &PaginationParams) -> AppResult<Vec<Item>> {
        if !self.caches.names().iter().any(|n| n == DEFAULT_CONNECTION_NAME) {
            return Ok(build_page(params));
        }

        let key = CacheKey::new("catalog", "page")
            .kwarg("page", params.page())
            .kwarg("per_page", params.limit());

        let cached = self
            .caches
            .cached(DEFAULT_CONNECTION_NAME, &key, Some(CATALOG_PAGE_TTL), || async {
                Ok(build_page(params))
            })
            .await;

        match cached {
            Ok(items) => Ok(items),
            Err(e) => {
                tracing::warn!(key = %key, "Catalog cache unavailable: {}", e);
                Ok(build_page(params))
            }
        }
    }
}

fn build_page(params: &PaginationParams) -> Vec<Item> {
    let start = params.offset().saturating_add(1);
    let end = params.offset().saturating_add(params.limit()).min(CATALOG_SIZE);

    (start..=end)
        .map(|id| Item {
            id,
            name: format!("Item {}", id),
        })
        .collect()
}

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct EchoRequest {
    #[validate(length(min = 1, message = "Message is required"))]
    pub message: String,
    #[validate(range(min = 1, max = 10, message = "Repeat must be between 1 and 10"))]
    #[serde(default = "default_repeat")]
    pub repeat: u8,
}

fn default_repeat() -> u8 {
    1
}

/// Create demo routes
pub fn demo_routes() -> Router<AppState> {
    Router::new()
        .route("/items", get(list_items))
        .route("/greet/:name", get(greet))
        .route("/echo", post(echo))
}

/// List catalog items page by page
pub async fn list_items(
    Inject(catalog): Inject<ItemCatalog>,
    Query(params): Query<PaginationParams>,
) -> AppResult<ApiResponse<Vec<Item>>> {
    let items = catalog.page(&params).await?;
    Ok(params.respond(items, catalog.total()))
}

/// Greet through whichever [`Greeter`] is registered
pub async fn greet(Inject(greeter): Inject<dyn Greeter>, Path(name): Path<String>) -> ApiResponse<Value> {
    response::success(json!({ "greeting": greeter.greet(&name) }))
}

/// Echo a validated payload back
pub async fn echo(ValidatedJson(payload): ValidatedJson<EchoRequest>) -> Created<Value> {
    let repeated = vec![payload.message.as_str(); payload.repeat as usize].join(" ");
    Created(json!({ "echo": repeated }))
}
