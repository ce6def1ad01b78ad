use std::{path::Path, sync::Arc};

use anyhow::Context;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cinesim_api::{
    api::{create_router, with_middleware, AppState},
    config::Config,
    model::Model,
    services::{providers::HttpSource, RecommendationEngine},
};

fn init_tracing() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info,tower_http=debug".into()))
        .with(fmt::layer())
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = Config::from_env()?;

    // The model must be fully loaded before anything is served
    let model_path = config.model_path.clone();
    let model = tokio::task::spawn_blocking(move || Model::load(Path::new(&model_path)))
        .await
        .context("Model loading task panicked")?
        .with_context(|| format!("Failed to load model from {}", config.model_path))?;

    let engine = RecommendationEngine::new(config.default_top_k, config.max_top_k);
    let mut state = AppState::new(Arc::new(model), engine);

    if let Some(upstream) = &config.voice_upstream_url {
        let source = HttpSource::new(upstream, config.upstream_timeout())?;
        state = state.with_voice_source(Arc::new(source));
        tracing::info!(upstream = %upstream, "Voice adapter uses remote recommendations");
    }

    let app = with_middleware(create_router(state), config.request_timeout());

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!(address = %addr, "Server running");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
    tracing::info!("Shutting down");
}
