//! catalog-searchbar service entry point

use anyhow::Result;
use catalog_searchbar::{
    config::{self, Settings},
    web::{create_router, AppState},
    GraphQlBackend,
};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration before logging so `debug` can raise the level
    let (settings, source) = load_settings()?;
    let settings = config::init(settings)?;

    init_logging(settings.general.debug);

    info!("Starting catalog-searchbar v{}", catalog_searchbar::VERSION);
    info!("Configuration: {}", source);
    info!(
        "Search bar strategy: {} (debounce {}ms)",
        settings.search_bar.api_variant, settings.search_bar.debounce_ms
    );

    let backend = GraphQlBackend::with_settings(&settings.backend)?;
    info!("Catalog GraphQL endpoint: {}", settings.backend.graphql_url);

    let state = AppState::new(settings.clone(), Arc::new(backend));
    let app = create_router(state);

    let addr = SocketAddr::new(settings.server.bind_address.parse()?, settings.server.port);
    info!("Starting server on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn init_logging(debug: bool) {
    let default_level = if debug { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

/// Load settings from file or use defaults, then apply env overrides
fn load_settings() -> Result<(Settings, String)> {
    let mut candidates = Vec::new();

    if let Ok(path) = std::env::var("CATALOG_SEARCH_SETTINGS_PATH") {
        candidates.push(PathBuf::from(path));
    }
    candidates.push(PathBuf::from("settings.yml"));
    candidates.push(PathBuf::from("config/settings.yml"));
    candidates.push(PathBuf::from("/etc/catalog-searchbar/settings.yml"));
    if let Some(dir) = dirs::config_dir() {
        candidates.push(dir.join("catalog-searchbar/settings.yml"));
    }

    for path in candidates {
        if path.exists() {
            let mut settings = Settings::from_file(&path)?;
            settings.merge_env();
            return Ok((settings, path.display().to_string()));
        }
    }

    let mut settings = Settings::default();
    settings.merge_env();
    Ok((settings, "defaults".to_string()))
}
