use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::{
    api_errors::AppError,
    app_state::AppState,
    trace_record::{NewTrace, TraceRecord},
};

/// POST /api/traces: persist a batch of trace records.
///
/// The body is a JSON array of trace objects without ids. Missing or
/// ill-typed required fields (`kind`, `ts`) surface as 422 with the serde
/// detail in the error body. An empty array is accepted and creates
/// nothing.
pub async fn create_traces(
    State(st): State<Arc<AppState>>,
    payload: Result<Json<Vec<NewTrace>>, JsonRejection>,
) -> Result<(StatusCode, Json<Vec<TraceRecord>>), AppError> {
    let Json(records) = payload.map_err(|rej| AppError::validation(rej.body_text()))?;

    let created = {
        let mut store = st
            .store
            .lock()
            .map_err(|e| AppError::internal(format!("trace store lock poisoned: {e}")))?;
        store.append(records)?
    };

    tracing::info!("Trace create: count={}", created.len());

    Ok((StatusCode::CREATED, Json(created)))
}

#[derive(Debug, Deserialize)]
pub struct ListParams {
    #[serde(default)]
    pub skip: u64,
    #[serde(default = "default_limit")]
    pub limit: u64,
}

fn default_limit() -> u64 {
    100
}

/// GET /api/traces?skip=&limit=: page through records in insertion order.
pub async fn list_traces(
    State(st): State<Arc<AppState>>,
    params: Result<Query<ListParams>, QueryRejection>,
) -> Result<Json<Vec<TraceRecord>>, AppError> {
    let Query(params) = params.map_err(|rej| AppError::validation(rej.body_text()))?;

    let records = {
        let store = st
            .store
            .lock()
            .map_err(|e| AppError::internal(format!("trace store lock poisoned: {e}")))?;
        store.list(params.skip, params.limit)?
    };

    Ok(Json(records))
}
