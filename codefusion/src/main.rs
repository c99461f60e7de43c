//! CodeFusion 2025 registration server.
//!
//! # Usage
//!
//! ```bash
//! # Optional: EmailJS credentials and render service in .env
//! cargo run --bin codefusion-server
//! ```

use anyhow::Context;
use codefusion::export::ConfiguredSnapshotter;
use codefusion::ids::RandomTicketIds;
use codefusion::notification::ConfiguredNotifier;
use codefusion::server::shutdown_signal;
use codefusion::{build_router, AppState, Config};
use codefusion_core::environment::SystemClock;
use codefusion_web::correlation_id;
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Upper bound for any single request, above the collaborator timeouts.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    let _ = dotenvy::dotenv();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "codefusion=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting CodeFusion 2025 registration server");

    let config = Config::from_env().context("Invalid configuration")?;
    let notifier = ConfiguredNotifier::from_config(&config.notification)
        .context("Failed to build notification client")?;
    let snapshotter = ConfiguredSnapshotter::from_config(&config.export)
        .context("Failed to build render service client")?;

    if !notifier.delivers_email() {
        tracing::warn!("EmailJS not configured, registrations are only logged");
    }
    if !snapshotter.renders_markup() {
        tracing::warn!("Render service not configured, PDFs show a locally drawn card");
    }

    let addr = config.bind_address();
    let grace = Duration::from_secs(config.server.shutdown_timeout);
    tracing::info!(
        address = %addr,
        public_url = %config.server.public_base_url,
        starts_at = %config.countdown.starts_at,
        "Configuration loaded"
    );

    let state = AppState::new(
        notifier,
        snapshotter,
        Arc::new(SystemClock),
        Arc::new(RandomTicketIds),
        config,
    );

    let app = build_router(state)
        .layer(axum::middleware::from_fn(correlation_id))
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(REQUEST_TIMEOUT))
        .layer(CorsLayer::permissive());

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    tracing::info!(address = %addr, "Listening");

    let mut server = tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
    });

    // Open countdown streams would hold the graceful shutdown forever.
    tokio::select! {
        result = &mut server => {
            result.context("Server task failed")?.context("Server error")?;
        },
        () = async {
            shutdown_signal().await;
            tokio::time::sleep(grace).await;
        } => {
            tracing::warn!(grace_secs = grace.as_secs(), "Graceful shutdown timed out, closing connections");
            server.abort();
        },
    }

    tracing::info!("Server stopped");
    Ok(())
}
