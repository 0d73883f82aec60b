//! Presence handlers
//!
//! Device list (throttled refresh), name lookup and scanner status.

use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::api::AppState;
use crate::error::AppError;
use crate::scanner::ClientRecord;

#[derive(Debug, Serialize)]
pub struct DeviceListResponse {
    pub devices: Vec<ClientRecord>,
    pub count: usize,
    pub last_update_ok: bool,
}

#[derive(Debug, Serialize)]
pub struct DeviceNameResponse {
    pub mac: String,
    pub name: String,
}

#[derive(Debug, Serialize)]
pub struct ScannerStatusResponse {
    pub site_id: String,
    pub success_init: bool,
    pub last_update_ok: bool,
    pub last_success_at: Option<DateTime<Utc>>,
    pub device_count: usize,
}

/// GET /api/devices - Scan (throttled) and list known devices
pub async fn list_devices(State(state): State<AppState>) -> impl IntoResponse {
    let mut scanner = state.scanner.lock().await;
    scanner.scan_devices().await;

    let devices: Vec<ClientRecord> = scanner.devices().cloned().collect();

    Json(DeviceListResponse {
        count: devices.len(),
        devices,
        last_update_ok: scanner.last_update_ok(),
    })
}

/// GET /api/devices/:mac - Cached name lookup, never fetches
pub async fn get_device(
    State(state): State<AppState>,
    Path(mac): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    if mac.trim().is_empty() {
        return Err(AppError::BadRequest("mac must not be empty".to_string()));
    }

    let scanner = state.scanner.lock().await;
    let name = scanner
        .get_device_name(&mac)
        .ok_or_else(|| AppError::NotFound(format!("Device {} not found", mac)))?
        .to_string();

    Ok(Json(DeviceNameResponse { mac, name }))
}

/// GET /api/status - Scanner state without triggering a fetch
pub async fn get_status(State(state): State<AppState>) -> impl IntoResponse {
    let scanner = state.scanner.lock().await;

    Json(ScannerStatusResponse {
        site_id: scanner.site_id().to_string(),
        success_init: scanner.success_init(),
        last_update_ok: scanner.last_update_ok(),
        last_success_at: scanner.last_success_at(),
        device_count: scanner.device_count(),
    })
}
