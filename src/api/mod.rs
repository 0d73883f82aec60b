//! API module - host read interface over HTTP

pub mod handlers;

use std::sync::Arc;

use axum::{routing::get, Router};
use tokio::sync::Mutex;

use crate::scanner::DeviceScanner;

/// Shared state for the read interface.
///
/// The mutex serializes scans so the scanner only ever sees one caller.
#[derive(Clone)]
pub struct AppState {
    pub scanner: Arc<Mutex<DeviceScanner>>,
}

impl AppState {
    pub fn new(scanner: Arc<Mutex<DeviceScanner>>) -> Self {
        Self { scanner }
    }
}

pub fn routes(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        .route("/api/health", get(handlers::health_check))
        // Presence
        .route("/api/devices", get(handlers::list_devices))
        .route("/api/devices/:mac", get(handlers::get_device))
        .route("/api/status", get(handlers::get_status))
        .with_state(state)
}
