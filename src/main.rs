use axum::{routing::get, Router};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use impostor::{
    api,
    config::ServerConfig,
    metrics::{HttpCounter, PlayStats},
    state::AppState,
    ws,
};

#[tokio::main]
async fn main() {
    // Load .env file if present (before any env var reads)
    if let Err(e) = dotenvy::dotenv() {
        // Not an error if .env doesn't exist, only log if it's a different issue
        if !matches!(e, dotenvy::Error::Io(_)) {
            eprintln!("Warning: Failed to load .env file: {}", e);
        }
    }

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "impostor=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Impostor...");

    let config = ServerConfig::from_env();

    let stats = match config.metrics_url.as_deref() {
        Some(url) => match HttpCounter::new(url, config.metrics_timeout) {
            Ok(counter) => {
                tracing::info!("Play counter at {}", url);
                PlayStats::with_remote(Arc::new(counter))
            }
            Err(e) => {
                tracing::warn!("Failed to set up play counter: {}. Counting in memory.", e);
                PlayStats::new()
            }
        },
        None => PlayStats::new(),
    };

    let state = Arc::new(AppState::with_stats(stats));

    let app = Router::new()
        .route("/ws", get(ws::ws_handler))
        .route("/api/stats", get(api::stats))
        .route("/healthz", get(api::healthz))
        .fallback_service(ServeDir::new(&config.static_dir))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state);

    let addr = config.socket_addr();
    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!("Failed to bind {}: {}", addr, e);
            std::process::exit(1);
        }
    };
    tracing::info!("Listening on http://{}", addr);

    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
