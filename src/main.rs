//! instant-on-presence - Aruba Instant On device presence scanner
//!
//! Scans one Instant On site for connected clients and serves the
//! resulting presence list to the home-automation host.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::sync::Mutex;
use tokio::time::Duration;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use instant_on_presence::api::{self, AppState};
use instant_on_presence::config::Config;
use instant_on_presence::error::AppError;
use instant_on_presence::presence::PresenceSyncer;
use instant_on_presence::{DeviceScanner, InstantOnClient};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "instant_on_presence=info,tower_http=debug".into()),
        )
        .init();

    tracing::info!("Starting instant-on-presence...");

    // Load configuration
    let config = Config::load()?;
    tracing::info!("Configuration loaded: {:?}", config.instant_on);

    let client = InstantOnClient::new(config.instant_on.clone())
        .context("Failed to create Instant On HTTP client")?;

    // First fetch decides whether the integration is usable
    let scanner = DeviceScanner::new(
        Arc::new(client),
        config.instant_on.site_id.clone(),
        Duration::from_secs(config.scanner.min_update_interval_secs),
    )
    .await;

    if !scanner.success_init() {
        tracing::error!(
            "Initial scan of site {} failed, rejecting configuration",
            config.instant_on.site_id
        );
        return Err(AppError::ConfigError(format!(
            "initial scan of site {} failed",
            config.instant_on.site_id
        ))
        .into());
    }

    tracing::info!(
        "Scanner ready for site {} ({} devices)",
        scanner.site_id(),
        scanner.device_count()
    );

    let scanner = Arc::new(Mutex::new(scanner));

    // Presence syncer (host scan cadence)
    let syncer = Arc::new(PresenceSyncer::new(
        scanner.clone(),
        Duration::from_secs(config.scanner.scan_interval_secs),
    ));
    tokio::spawn(async move {
        syncer.start().await;
    });

    let app = api::routes(AppState::new(scanner)).layer(
        ServiceBuilder::new().layer(TraceLayer::new_for_http()),
    );

    let host: std::net::IpAddr = config
        .server
        .host
        .parse()
        .with_context(|| format!("Invalid server.host: {}", config.server.host))?;
    let addr = SocketAddr::new(host, config.server.port);
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
