use std::sync::Arc;

use tracing_subscriber::EnvFilter;

mod api;
mod config;
mod error;
mod scratch;
mod text;
mod tts;

use api::routes::{create_router, AppState};
use config::Config;
use scratch::{Janitor, ScratchSpace};
use tts::{GoogleTranslateEngine, TtsService};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env();
    let addr = config.bind_address();

    tracing::info!("Decisão TTS Server v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Starting server on http://{}", addr);
    tracing::info!("Scratch directory: {}", config.scratch_dir.display());
    tracing::info!("Speech engine: {}", config.engine_url);

    let engine = GoogleTranslateEngine::new(config.engine_url.clone(), config.engine_timeout)?;
    let scratch = ScratchSpace::new(config.scratch_dir.clone());
    let tts = TtsService::new(Arc::new(engine), scratch.clone());
    let janitor = Janitor::new(scratch);

    match config.cleanup_interval {
        Some(every) => {
            tracing::info!("Periodic cleanup every {}s", every.as_secs());
            janitor.clone().spawn_periodic(every);
        }
        None => tracing::info!("Periodic cleanup disabled; use GET /cleanup"),
    }

    let state = Arc::new(AppState { tts, janitor });
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
