//! Records API handlers.
//!
//! | Method | Path           | Success              |
//! |--------|----------------|----------------------|
//! | GET    | `/records`     | 200 JSON array       |
//! | GET    | `/records/:id` | 200 JSON record      |
//! | POST   | `/records`     | 201 JSON record      |
//! | DELETE | `/records/:id` | 200 text             |
//! | GET    | `/total`       | 200 text             |
//! | GET    | `/metrics`     | 200 Prometheus text  |

use std::time::Instant;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use tracing::{info, instrument};

use super::types::ApiError;
use super::AppState;
use crate::domain::{NewRecord, Record, RecordId, StoreError};

fn parse_id(raw: &str) -> Result<RecordId, ApiError> {
    raw.parse()
        .map_err(|_| ApiError::BadRequest(format!("Invalid record ID: {raw}")))
}

/// Record latency and failures for one store operation.
fn track<T>(state: &AppState, operation: &str, started: Instant, result: &Result<T, StoreError>) {
    if let Some(metrics) = &state.metrics {
        metrics.observe(operation, started.elapsed().as_secs_f64());
        if let Err(err) = result {
            metrics.record_error(operation, err);
        }
    }
}

async fn refresh_gauge(state: &AppState) {
    if let Some(metrics) = &state.metrics {
        metrics.set_records_stored(state.store.len().await);
    }
}

/// GET /records
pub async fn list_records(State(state): State<AppState>) -> Result<Json<Vec<Record>>, ApiError> {
    let records = state.store.list().await;
    if records.is_empty() {
        return Err(ApiError::NoRecords);
    }
    Ok(Json(records))
}

/// GET /records/:id
pub async fn get_record(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<Json<Record>, ApiError> {
    let id = parse_id(&raw_id)?;
    let started = Instant::now();
    let result = state.store.get(id).await;
    track(&state, "get", started, &result);
    Ok(Json(result?))
}

/// POST /records
#[instrument(skip(state, payload))]
pub async fn create_record(
    State(state): State<AppState>,
    payload: Result<Json<NewRecord>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(candidate) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;

    let started = Instant::now();
    let result = state.store.insert(candidate).await;
    track(&state, "insert", started, &result);
    let created = result?;

    if let Some(metrics) = &state.metrics {
        metrics.records_created.inc();
    }
    refresh_gauge(&state).await;
    info!(id = created.id, amount = created.amount, "Record created");

    Ok((StatusCode::CREATED, Json(created)))
}

/// DELETE /records/:id
#[instrument(skip(state))]
pub async fn delete_record(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_id(&raw_id)?;

    let started = Instant::now();
    let result = state.store.delete(id).await;
    track(&state, "delete", started, &result);
    result?;

    if let Some(metrics) = &state.metrics {
        metrics.records_deleted.inc();
    }
    refresh_gauge(&state).await;
    info!(id, "Record deleted");

    Ok((StatusCode::OK, format!("Record with ID {id} has been deleted")))
}

/// GET /total
pub async fn total_amount(State(state): State<AppState>) -> String {
    format!("Total amount: {}", state.store.total_amount().await)
}

/// GET /metrics
pub async fn metrics(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let metrics = state.metrics.as_ref().ok_or(ApiError::MetricsDisabled)?;
    let body = metrics
        .render()
        .map_err(|e| ApiError::Internal(e.to_string()))?;
    Ok((
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        body,
    ))
}
