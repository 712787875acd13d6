//! Project showcase backend.
//!
//! Serves the project API and the static site from one process.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use showcase_backend::config::{Config, DEFAULT_PORT};
use showcase_backend::{create_router, AppState};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env();

    // Initialize logging
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting project showcase backend");
    if let Some(raw) = &config.ignored_port {
        tracing::warn!("Ignoring invalid PORT value {:?}, using {}", raw, DEFAULT_PORT);
    }
    tracing::info!("Data path: {:?}", config.data_path);
    tracing::info!("Public directory: {:?}", config.public_dir);

    let bind_addr = config.bind_addr;
    let state = AppState::new(config);

    // Create or repair the project document before accepting requests
    state.store.ensure().await?;

    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    tracing::info!("Server listening on http://{}", bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}
