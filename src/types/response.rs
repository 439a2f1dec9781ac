//! Response envelopes.
//!
//! Every endpoint helper produces the same JSON shape:
//! `success`, `message`, `timestamp`, `data`, `errors`, `meta`.
//! All six keys are always present; absent values serialize as `null`.

use std::collections::BTreeMap;

use axum::{http::StatusCode, response::IntoResponse, Json};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{json, Map, Value};

/// Free-form envelope metadata
pub type Meta = Map<String, Value>;

/// Standard API response envelope
#[derive(Debug, Clone, Serialize)]
pub struct ApiResponse<T = Value> {
    pub success: bool,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub data: Option<T>,
    pub errors: Option<Vec<String>>,
    pub meta: Option<Meta>,
    #[serde(skip)]
    status: StatusCode,
}

impl<T> ApiResponse<T> {
    fn new(success: bool, message: impl Into<String>, status: StatusCode) -> Self {
        Self {
            success,
            message: message.into(),
            timestamp: Utc::now(),
            data: None,
            errors: None,
            meta: None,
            status,
        }
    }

    /// HTTP status used when the envelope is returned from a handler
    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn with_status(mut self, status: StatusCode) -> Self {
        self.status = status;
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    pub fn with_data(mut self, data: T) -> Self {
        self.data = Some(data);
        self
    }

    pub fn with_errors(mut self, errors: Vec<String>) -> Self {
        self.errors = Some(errors);
        self
    }

    pub fn with_meta(mut self, meta: Meta) -> Self {
        self.meta = Some(meta);
        self
    }

    /// Insert a single metadata entry, creating the map when absent.
    pub fn with_meta_entry(mut self, key: impl Into<String>, value: Value) -> Self {
        self.meta
            .get_or_insert_with(Meta::new)
            .insert(key.into(), value);
        self
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> axum::response::Response {
        (self.status, Json(self)).into_response()
    }
}

/// Pagination block stored under `meta.pagination`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageInfo {
    pub page: u64,
    pub per_page: u64,
    pub total: u64,
    pub total_pages: u64,
    pub has_next: bool,
    pub has_prev: bool,
}

impl PageInfo {
    pub fn new(page: u64, per_page: u64, total: u64) -> Self {
        let total_pages = if total > 0 && per_page > 0 {
            total.div_ceil(per_page)
        } else {
            0
        };

        Self {
            page,
            per_page,
            total,
            total_pages,
            has_next: page < total_pages,
            has_prev: page > 1,
        }
    }
}

// =============================================================================
// Helper constructors
// =============================================================================

/// Success envelope (200, message "Success").
pub fn success<T>(data: T) -> ApiResponse<T> {
    ApiResponse::new(true, "Success", StatusCode::OK).with_data(data)
}

/// Success envelope without a payload.
pub fn message(message: impl Into<String>) -> ApiResponse<Value> {
    ApiResponse::new(true, message, StatusCode::OK)
}

/// Generic error envelope (400). `errors` starts out as an empty list.
pub fn error(message: impl Into<String>) -> ApiResponse<Value> {
    ApiResponse::new(false, message, StatusCode::BAD_REQUEST).with_errors(Vec::new())
}

/// Paginated success envelope with `meta.pagination`.
pub fn paginated<T>(data: Vec<T>, page: u64, per_page: u64, total: u64) -> ApiResponse<Vec<T>> {
    let info = PageInfo::new(page, per_page, total);
    success(data).with_meta_entry("pagination", json!(info))
}

/// Validation error envelope (422).
///
/// Each field error is rendered as `"field: message"`; the raw map is kept
/// under `data.validation_errors`.
pub fn validation_error(validation_errors: BTreeMap<String, Vec<String>>) -> ApiResponse<Value> {
    let errors = validation_errors
        .iter()
        .flat_map(|(field, messages)| messages.iter().map(move |m| format!("{}: {}", field, m)))
        .collect();

    error("Validation failed")
        .with_status(StatusCode::UNPROCESSABLE_ENTITY)
        .with_errors(errors)
        .with_data(json!({ "validation_errors": validation_errors }))
}

/// Not found envelope (404). A resource name yields `"{resource} not found"`.
pub fn not_found(resource: Option<&str>) -> ApiResponse<Value> {
    let message = match resource {
        Some(resource) => format!("{} not found", resource),
        None => "Resource not found".to_string(),
    };
    error(message).with_status(StatusCode::NOT_FOUND)
}

pub fn unauthorized() -> ApiResponse<Value> {
    error("Unauthorized access").with_status(StatusCode::UNAUTHORIZED)
}

pub fn forbidden() -> ApiResponse<Value> {
    error("Access forbidden").with_status(StatusCode::FORBIDDEN)
}

pub fn bad_request(errors: Vec<String>) -> ApiResponse<Value> {
    error("Bad request").with_errors(errors)
}

/// Internal server error envelope (500) carrying `meta.error_id` when given.
pub fn internal_server_error(error_id: Option<&str>) -> ApiResponse<Value> {
    let response = error("Internal server error").with_status(StatusCode::INTERNAL_SERVER_ERROR);
    match error_id {
        Some(id) => response.with_meta_entry("error_id", json!(id)),
        None => response,
    }
}

/// Created response helper (201 with success envelope)
pub struct Created<T: Serialize>(pub T);

impl<T: Serialize> IntoResponse for Created<T> {
    fn into_response(self) -> axum::response::Response {
        success(self.0)
            .with_message("Created")
            .with_status(StatusCode::CREATED)
            .into_response()
    }
}

/// No content response helper
pub struct NoContent;

impl IntoResponse for NoContent {
    fn into_response(self) -> axum::response::Response {
        StatusCode::NO_CONTENT.into_response()
    }
}
