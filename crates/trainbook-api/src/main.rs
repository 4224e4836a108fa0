//! Trainbook API Server
//!
//! GraphQL server for the trainbook gym booking system.

use std::sync::Arc;

use trainbook_api::{create_router, state::AppState};
use trainbook_core::{AppConfig, Store};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = AppConfig::from_env()?;

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                tracing_subscriber::EnvFilter::new(format!(
                    "trainbook_api={0},tower_http={0}",
                    config.logging.level
                ))
            }),
        )
        .init();

    // Connect the store
    let store = Store::new(&config.database.postgres_url, config.database.pool_size).await?;

    let addr = format!("{}:{}", config.server.host, config.server.port);

    // Create application state
    let state = Arc::new(AppState::new(config, store));

    // Create router
    let app = create_router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Trainbook API server starting on http://{}", addr);
    tracing::info!("GraphQL endpoint at http://{}/graphql", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
