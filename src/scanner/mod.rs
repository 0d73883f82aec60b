//! DeviceScanner: presence scanner for one Instant On site
//!
//! - `throttle`: Minimum-interval gate in front of the network fetch
//! - `records`: Cached client records

pub mod records;
pub mod throttle;

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::time::Duration;

use crate::instant_on::ClientSummaryApi;

pub use records::{ClientRecord, ClientTable};
pub use throttle::{Gate, Throttle};

/// Default minimum time between two client list fetches
pub const MIN_TIME_BETWEEN_UPDATES: Duration = Duration::from_secs(30);

/// Queries the Instant On API for connected devices
pub struct DeviceScanner {
    api: Arc<dyn ClientSummaryApi>,
    site_id: String,
    last_results: ClientTable,
    throttle: Throttle<bool>,
    success_init: bool,
    last_success_at: Option<DateTime<Utc>>,
}

impl DeviceScanner {
    /// Build the scanner and run the first fetch.
    ///
    /// Check [`DeviceScanner::success_init`] afterwards; a scanner whose
    /// first fetch failed should be discarded.
    pub async fn new(
        api: Arc<dyn ClientSummaryApi>,
        site_id: impl Into<String>,
        min_update_interval: Duration,
    ) -> Self {
        let mut scanner = Self {
            api,
            site_id: site_id.into(),
            last_results: ClientTable::default(),
            throttle: Throttle::new(min_update_interval),
            success_init: false,
            last_success_at: None,
        };

        scanner.success_init = scanner.update_info().await;
        scanner
    }

    pub fn success_init(&self) -> bool {
        self.success_init
    }

    pub fn site_id(&self) -> &str {
        &self.site_id
    }

    /// Refresh (throttled) and return the known device ids
    pub async fn scan_devices(&mut self) -> Vec<String> {
        self.update_info().await;
        self.last_results.ids()
    }

    /// Name of a cached device. Never fetches.
    pub fn get_device_name(&self, mac: &str) -> Option<&str> {
        self.last_results.get(mac).map(|r| r.name.as_str())
    }

    pub fn devices(&self) -> impl Iterator<Item = &ClientRecord> {
        self.last_results.iter()
    }

    pub fn device_count(&self) -> usize {
        self.last_results.len()
    }

    /// Result of the last fetch that actually ran
    pub fn last_update_ok(&self) -> bool {
        self.throttle.last_value().copied().unwrap_or(false)
    }

    pub fn last_success_at(&self) -> Option<DateTime<Utc>> {
        self.last_success_at
    }

    /// Make sure the cached client list is up to date.
    ///
    /// Runs at most once per minimum interval; calls inside the interval
    /// return the previous result without touching the network.
    pub async fn update_info(&mut self) -> bool {
        match self.throttle.acquire() {
            Gate::Closed(last) => {
                tracing::debug!(
                    "[Scanner] Update throttled for site {} (interval {:?})",
                    self.site_id,
                    self.throttle.interval()
                );
                last.unwrap_or(false)
            }
            Gate::Open => {
                // a fetch dropped before it finishes counts as failed
                self.throttle.complete(false);
                let ok = self.fetch().await;
                self.throttle.complete(ok);
                ok
            }
        }
    }

    async fn fetch(&mut self) -> bool {
        match self.api.client_summary(&self.site_id).await {
            Ok(summary) => {
                self.last_results = ClientTable::from_entries(summary.elements);
                self.last_success_at = Some(Utc::now());
                tracing::debug!(
                    "[Scanner] Site {} reports {} clients",
                    self.site_id,
                    self.last_results.len()
                );
                true
            }
            Err(e) => {
                tracing::error!(
                    error = ?e,
                    "[Scanner] Instant On API error for site {}: {}",
                    self.site_id,
                    e
                );
                false
            }
        }
    }
}
