use anyhow::Context;
use axum::{
    http::HeaderValue,
    response::Json,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{AllowHeaders, AllowMethods, CorsLayer};

use crate::{
    api::traces::{create_traces, list_traces},
    app_state::AppState,
    config_loader::CorsConfig,
};

/// Build the API router: health check plus the trace create/list routes,
/// with CORS restricted to the one configured origin.
pub fn build_api_router(state: Arc<AppState>, cors: &CorsConfig) -> anyhow::Result<Router> {
    let origin: HeaderValue = cors
        .allowed_origin
        .parse()
        .with_context(|| format!("invalid CORS origin: {}", cors.allowed_origin))?;

    // Mirrored methods/headers instead of wildcards: tower-http rejects
    // wildcard values combined with credentials.
    let cors_layer = CorsLayer::new()
        .allow_origin(origin)
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(cors.allow_credentials);

    let router = Router::new()
        .route("/health", get(health))
        .route("/api/traces", post(create_traces).get(list_traces))
        .layer(cors_layer)
        .with_state(state);

    Ok(router)
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}
