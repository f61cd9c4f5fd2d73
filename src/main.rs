use std::sync::{Arc, Mutex};

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use mcpclick_api::{
    app_state::AppState, config_loader::load_config, trace_store::TraceStore,
    trace_store_sqlite::SqliteTraceStore, web::build_api_router,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = load_config().context("failed to load configuration")?;
    tracing::info!(
        "Config loaded: listen_addr={}, database_path={}, cors_origin={}",
        config.listen_addr,
        config.database_path,
        config.cors.allowed_origin
    );

    let store = SqliteTraceStore::open(&config.database_path)
        .with_context(|| format!("failed to open trace database {}", config.database_path))?;
    let store: Arc<Mutex<dyn TraceStore>> = Arc::new(Mutex::new(store));
    let state = Arc::new(AppState::new(store));

    let app = build_api_router(state, &config.cors)?;

    let listener = tokio::net::TcpListener::bind(&config.listen_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.listen_addr))?;
    tracing::info!("mcpclick-api listening on http://{}", config.listen_addr);
    axum::serve(listener, app).await.context("server error")?;

    Ok(())
}
