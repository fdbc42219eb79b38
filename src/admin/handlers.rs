//! Admin API handlers.
//!
//! The collection route dispatches on the method by hand because PURGE is an
//! extension method axum's method routers cannot name.

use std::collections::HashMap;

use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use axum::http::{header, HeaderMap, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use serde_json::Value;

use super::response::{paginate, ApiError, ApiResponse, PageParams};
use crate::balancer::SelectError;
use crate::http::server::AppState;
use crate::observability::metrics;
use crate::registry::record::UpstreamRecord;
use crate::registry::{allocator, validate};

/// A record plus its observability tally, as read endpoints return it.
#[derive(Debug, Serialize)]
pub struct UpstreamView {
    #[serde(flatten)]
    pub record: UpstreamRecord,
    pub requests: i64,
}

#[derive(Debug, Serialize)]
pub struct SystemStatus {
    pub version: &'static str,
    pub status: &'static str,
    pub registry: String,
    pub strategy: &'static str,
    pub upstreams: usize,
}

fn view(state: &AppState, record: UpstreamRecord) -> UpstreamView {
    let requests = state.registry.requests_for(record.id);
    UpstreamView { record, requests }
}

fn parse_body(headers: &HeaderMap, body: &Bytes) -> Result<Value, ApiError> {
    if body.is_empty() {
        return Err(ApiError::BadRequest("data not provided".to_string()));
    }
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");
    if !content_type.starts_with("application/json") {
        return Err(ApiError::BadRequest(
            "content-type is not application/json".to_string(),
        ));
    }
    serde_json::from_slice(body).map_err(|_| ApiError::BadRequest("invalid json".to_string()))
}

pub async fn get_status(State(state): State<AppState>) -> Json<SystemStatus> {
    state.ensure_loaded();
    Json(SystemStatus {
        version: env!("CARGO_PKG_VERSION"),
        status: "operational",
        registry: state.registry.name().to_string(),
        strategy: state.balancer.name(),
        upstreams: state.registry.len(),
    })
}

/// `GET | POST | PURGE /upstreams`.
pub async fn collection(
    State(state): State<AppState>,
    method: Method,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    state.ensure_loaded();
    match method.as_str() {
        "GET" => list_upstreams(&state, &PageParams::from_query(&query)).into_response(),
        "POST" => match create_upstream(&state, &headers, &body) {
            Ok(created) => created.into_response(),
            Err(error) => error.into_response(),
        },
        "PURGE" => match purge_upstreams(&state) {
            Ok(status) => status.into_response(),
            Err(error) => error.into_response(),
        },
        _ => StatusCode::METHOD_NOT_ALLOWED.into_response(),
    }
}

fn list_upstreams(
    state: &AppState,
    params: &PageParams,
) -> Json<ApiResponse<Vec<UpstreamView>>> {
    let views: Vec<UpstreamView> = state
        .registry
        .snapshot()
        .into_iter()
        .map(|record| view(state, record))
        .collect();
    let (page_items, info) = paginate(views, params, &state.pagination);
    Json(ApiResponse::collection(page_items, info))
}

fn create_upstream(
    state: &AppState,
    headers: &HeaderMap,
    body: &Bytes,
) -> Result<(StatusCode, Json<ApiResponse<UpstreamView>>), ApiError> {
    let raw = parse_body(headers, body)?;
    let payload = validate::parse_create_payload(&raw)?;

    let id = allocator::allocate_id(&state.registry)?;
    let record = UpstreamRecord::from_payload(id, &payload);
    state.registry.put(record.clone());

    tracing::info!(
        registry = %state.registry.name(),
        id,
        endpoint = %record.endpoint,
        "upstream created"
    );
    metrics::record_admin_op("create");
    state.bridge.snapshot(&state.registry)?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::single(view(state, record))),
    ))
}

fn purge_upstreams(state: &AppState) -> Result<StatusCode, ApiError> {
    state.registry.clear();
    state.bridge.reload(&state.registry)?;

    tracing::info!(
        registry = %state.registry.name(),
        count = state.registry.len(),
        "registry purged and reloaded from seed configuration"
    );
    metrics::record_admin_op("purge");
    state.bridge.snapshot(&state.registry)?;

    Ok(StatusCode::NO_CONTENT)
}

/// `GET /upstreams/{id}`.
pub async fn get_upstream(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<ApiResponse<UpstreamView>>, ApiError> {
    state.ensure_loaded();
    let record = state.registry.get(id).ok_or(ApiError::NotFound(id))?;
    Ok(Json(ApiResponse::single(view(&state, record))))
}

/// `PUT | PATCH /upstreams/{id}`.
pub async fn update_upstream(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<ApiResponse<UpstreamView>>, ApiError> {
    state.ensure_loaded();
    let raw = parse_body(&headers, &body)?;
    let mut record = state.registry.get(id).ok_or(ApiError::NotFound(id))?;

    // Validation completes before any field lands on the record.
    let payload = validate::parse_payload(&raw)?;
    record.merge(&payload);
    state.registry.put(record.clone());

    tracing::info!(
        registry = %state.registry.name(),
        id,
        endpoint = %record.endpoint,
        "upstream updated"
    );
    metrics::record_admin_op("update");
    state.bridge.snapshot(&state.registry)?;

    Ok(Json(ApiResponse::single(view(&state, record))))
}

/// `DELETE /upstreams/{id}`.
pub async fn delete_upstream(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<StatusCode, ApiError> {
    state.ensure_loaded();
    if !state.registry.delete(id) {
        return Err(ApiError::NotFound(id));
    }
    state.registry.reset_requests(id);

    tracing::info!(registry = %state.registry.name(), id, "upstream deleted");
    metrics::record_admin_op("delete");
    state.bridge.snapshot(&state.registry)?;

    Ok(StatusCode::NO_CONTENT)
}

/// `GET /select`: the selector contract exposed to the proxying layer.
pub async fn select_upstream(State(state): State<AppState>) -> Response {
    state.ensure_loaded();
    let snapshot = state.registry.snapshot();
    match state.balancer.select(&snapshot, state.registry.counters()) {
        Ok(record) => {
            metrics::record_selection(&record.endpoint);
            (StatusCode::OK, record.endpoint).into_response()
        }
        Err(SelectError::NoHealthyUpstream) => {
            metrics::record_selection_failure();
            tracing::warn!(registry = %state.registry.name(), "no healthy upstream");
            StatusCode::SERVICE_UNAVAILABLE.into_response()
        }
    }
}
