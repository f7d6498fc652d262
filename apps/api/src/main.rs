mod config;
mod errors;
mod extract;
mod llm_client;
mod review;
mod routes;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting resume review API v{}", env!("CARGO_PKG_VERSION"));

    // Capability providers. Either may be compiled out; the corresponding
    // endpoints report a typed unavailability error instead of crashing.
    let extractor = extract::default_extractor();
    match &extractor {
        Some(_) => info!("PDF text extractor initialized"),
        None => warn!("Built without the `pdf` feature; PDF extraction disabled"),
    }

    if config.openai_api_key.is_none() {
        // Discoverable at startup, reported per-request as CREDENTIAL_MISSING.
        warn!("No OpenAI API key found (secret file or OPENAI_API_KEY)");
    }
    let llm = llm_client::default_backend(config.openai_api_key.clone());
    match &llm {
        Some(_) => info!("Completion client initialized"),
        None => warn!("Built without the `openai` feature; completion calls disabled"),
    }

    let state = AppState {
        config: config.clone(),
        extractor,
        llm,
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: tighten CORS in production

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
