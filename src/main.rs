use std::sync::Arc;

use pantry_api::{
    config::Config,
    routes::{create_router, AppState},
    services::{ClarifaiDetector, RecipeCatalog},
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("pantry_api=info,tower_http=info")),
        )
        .init();

    let config = Config::from_env()?;

    // Catalog is loaded once and shared read-only for the life of the process
    let catalog = match &config.recipes_path {
        Some(path) => RecipeCatalog::from_path(path).await?,
        None => RecipeCatalog::builtin()?,
    };

    tracing::info!(
        recipes = catalog.len(),
        match_limit = ?config.match_limit,
        "Recipe catalog ready"
    );

    let detector = ClarifaiDetector::new(
        config.clarifai_pat.clone(),
        config.clarifai_api_url.clone(),
        config.detection_timeout(),
    )?;

    let state = AppState::new(catalog, Arc::new(detector))
        .with_detection_settings(config.detection_settings())
        .with_match_limit(config.match_limit);

    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(config.bind_address()).await?;
    tracing::info!(address = %listener.local_addr()?, "Server listening");

    axum::serve(listener, app).await?;

    Ok(())
}
