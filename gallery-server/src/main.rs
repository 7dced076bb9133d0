//! Gallery Server - catalogue images by their dominant color
//!
//! Serves the gallery, search and submission form over HTTP. Configuration
//! comes from the environment; see [`gallery_server::Config::from_env`].

use std::net::SocketAddr;
use std::sync::Arc;

use gallery_core::{
    FileBlobStore, HttpColorExtractor, HttpColorExtractorConfig, ImageStore, Ingestor,
};
use gallery_server::{create_router_with_config, AppState, Config};
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                EnvFilter::new("gallery_server=info,gallery_core=info,tower_http=info")
            }),
        )
        .with_target(true)
        .init();

    let config = Config::from_env();
    tracing::info!(?config, "Starting gallery server");

    let store = ImageStore::load(Arc::new(FileBlobStore::new(&config.data_file)));

    let extractor = HttpColorExtractor::with_config(HttpColorExtractorConfig {
        timeout: config.extract_timeout(),
        max_bytes: config.max_image_mb * 1024 * 1024,
        ..Default::default()
    })?;

    let ingestor =
        Ingestor::new(store, Arc::new(extractor)).with_extract_timeout(config.extract_timeout());
    let app = create_router_with_config(AppState::new(ingestor), &config);

    let addr = config.socket_addr();
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{}", addr);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    tracing::info!("Server stopped");
    Ok(())
}

/// Resolves on Ctrl-C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
