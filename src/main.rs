//! Book Library Server
//!
//! JSON API for a MongoDB-backed list of books.

use std::net::SocketAddr;

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use book_library_server::{api, config::AppConfig, store::DataStore, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Load configuration
    let config = AppConfig::load().context("Failed to load configuration")?;

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!(
            "book_library_server={},tower_http=debug",
            config.logging.level
        )
        .into()
    });

    let registry = tracing_subscriber::registry().with(filter);
    if config.logging.format == "json" {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }

    tracing::info!("Starting Book Library Server v{}", env!("CARGO_PKG_VERSION"));

    // Create the data store client; connection happens in the retry loop
    let store = DataStore::new(&config.mongo)
        .await
        .context("Invalid MongoDB configuration")?;

    if config.server.wait_for_store {
        tracing::info!("Waiting for MongoDB before accepting requests");
        store.connect_with_retry().await;
    } else {
        store.spawn_connect();
    }

    // Save server address before moving config
    let addr = SocketAddr::new(
        config
            .server
            .host
            .parse()
            .context("Invalid server host address")?,
        config.server.port,
    );

    let app = api::create_router(AppState::new(config, store));

    tracing::info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
