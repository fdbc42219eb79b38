//! Admin API response envelope and error mapping.

use std::collections::HashMap;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use serde_json::{json, Value};
use thiserror::Error;

use crate::config::schema::PaginationConfig;
use crate::persistence::SnapshotError;
use crate::registry::validate::ValidationError;
use crate::registry::RegistryError;

/// Envelope wrapping every admin response body.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    /// Empty list on success, a message string on failure.
    pub errors: Value,
    pub messages: Vec<String>,
    pub result: Option<T>,
    pub result_info: Option<ResultInfo>,
}

/// Pagination block for collection responses.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ResultInfo {
    pub page: usize,
    pub per_page: usize,
    pub count: usize,
    pub total_count: usize,
    pub total_pages: usize,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn single(result: T) -> Self {
        Self {
            success: true,
            errors: json!([]),
            messages: Vec::new(),
            result: Some(result),
            result_info: None,
        }
    }

    pub fn collection(result: T, info: ResultInfo) -> Self {
        Self {
            success: true,
            errors: json!([]),
            messages: Vec::new(),
            result: Some(result),
            result_info: Some(info),
        }
    }
}

impl ApiResponse<Value> {
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            errors: Value::String(message.into()),
            messages: Vec::new(),
            result: None,
            result_info: None,
        }
    }
}

/// Paging inputs, parsed leniently: anything missing or unparsable falls
/// back to the configured defaults.
#[derive(Debug, Default, Clone, Copy)]
pub struct PageParams {
    pub page: Option<usize>,
    pub per_page: Option<usize>,
}

impl PageParams {
    pub fn from_query(query: &HashMap<String, String>) -> Self {
        Self {
            page: query.get("page").and_then(|v| v.parse().ok()),
            per_page: query.get("per_page").and_then(|v| v.parse().ok()),
        }
    }
}

/// Clamp paging inputs and slice the collection. An out-of-range page lands
/// on the last valid page rather than being rejected.
pub fn paginate<T>(
    items: Vec<T>,
    params: &PageParams,
    config: &PaginationConfig,
) -> (Vec<T>, ResultInfo) {
    let per_page = match params.per_page {
        Some(p) if p >= 1 => p.min(config.max_per_page),
        _ => config.default_per_page,
    };
    let requested = match params.page {
        Some(p) if p >= 1 => p,
        _ => 1,
    };

    let total_count = items.len();
    let total_pages = total_count.div_ceil(per_page).max(1);
    let page = requested.min(total_pages);

    let page_items: Vec<T> = items
        .into_iter()
        .skip((page - 1) * per_page)
        .take(per_page)
        .collect();
    let count = page_items.len();

    (
        page_items,
        ResultInfo {
            page,
            per_page,
            count,
            total_count,
            total_pages,
        },
    )
}

/// Admin operation failure, mapped onto the envelope and an HTTP status.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("upstream {0} does not exist")]
    NotFound(u64),
    #[error("{0}")]
    BadRequest(String),
    #[error(transparent)]
    Registry(#[from] RegistryError),
    #[error("failed to persist registry snapshot: {0}")]
    Snapshot(#[from] SnapshotError),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) | ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) | ApiError::Registry(RegistryError::NotFound(_)) => {
                StatusCode::NOT_FOUND
            }
            ApiError::Registry(RegistryError::AllocationExhausted(_)) | ApiError::Snapshot(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        (status, Json(ApiResponse::failure(self.to_string()))).into_response()
    }
}
