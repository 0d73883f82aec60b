//! PresenceSyncer: Periodic device scan
//!
//! Runs in a background tokio task. Every scan interval it asks the scanner
//! for the current device ids and logs arrivals and departures. The scanner's
//! throttle decides whether a scan actually reaches the network.

use std::collections::HashSet;
use std::sync::Arc;

use tokio::sync::Mutex;
use tokio::time::{self, Duration};

use crate::scanner::DeviceScanner;

/// Device ids that appeared or disappeared between two scans
#[derive(Debug, Default, PartialEq, Eq)]
pub struct PresenceDiff {
    pub arrived: Vec<String>,
    pub departed: Vec<String>,
}

impl PresenceDiff {
    pub fn between(previous: &[String], current: &[String]) -> Self {
        let prev: HashSet<&str> = previous.iter().map(String::as_str).collect();
        let curr: HashSet<&str> = current.iter().map(String::as_str).collect();

        Self {
            arrived: current
                .iter()
                .filter(|id| !prev.contains(id.as_str()))
                .cloned()
                .collect(),
            departed: previous
                .iter()
                .filter(|id| !curr.contains(id.as_str()))
                .cloned()
                .collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.arrived.is_empty() && self.departed.is_empty()
    }
}

/// Background scan service
pub struct PresenceSyncer {
    scanner: Arc<Mutex<DeviceScanner>>,
    interval: Duration,
    seen: Mutex<Vec<String>>,
}

impl PresenceSyncer {
    pub fn new(scanner: Arc<Mutex<DeviceScanner>>, interval: Duration) -> Self {
        Self {
            scanner,
            interval,
            seen: Mutex::new(Vec::new()),
        }
    }

    /// Start the background scan loop (runs forever)
    pub async fn start(self: Arc<Self>) {
        tracing::info!(
            "[Presence] Starting background scan (interval: {:?})",
            self.interval
        );

        let mut ticker = time::interval(self.interval);

        loop {
            ticker.tick().await;
            self.sync_once().await;
        }
    }

    /// Run one scan and log what changed since the previous one
    pub async fn sync_once(&self) -> PresenceDiff {
        let mut scanner = self.scanner.lock().await;
        let current = scanner.scan_devices().await;

        let mut seen = self.seen.lock().await;
        let diff = PresenceDiff::between(&seen, &current);

        for mac in &diff.arrived {
            tracing::info!(
                "[Presence] {} ({}) is home",
                mac,
                scanner.get_device_name(mac).unwrap_or("unknown")
            );
        }
        for mac in &diff.departed {
            tracing::info!("[Presence] {} left", mac);
        }

        if diff.is_empty() {
            tracing::debug!("[Presence] {} devices, no changes", current.len());
        }

        *seen = current;
        diff
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scanner::tests::{http_error, summary, ScriptedApi};
    use crate::scanner::MIN_TIME_BETWEEN_UPDATES;

    fn ids(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_diff_between() {
        let diff = PresenceDiff::between(&ids(&["aa:bb", "cc:dd"]), &ids(&["cc:dd", "ee:ff"]));
        assert_eq!(diff.arrived, ids(&["ee:ff"]));
        assert_eq!(diff.departed, ids(&["aa:bb"]));
    }

    #[test]
    fn test_diff_unchanged_is_empty() {
        let diff = PresenceDiff::between(&ids(&["aa:bb"]), &ids(&["aa:bb"]));
        assert!(diff.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_sync_reports_arrivals_then_departures() {
        let api = ScriptedApi::new(vec![
            summary(&[("aa:bb", "Phone")]),
            summary(&[("cc:dd", "Laptop")]),
        ]);
        let scanner = DeviceScanner::new(api.clone(), "site-1", MIN_TIME_BETWEEN_UPDATES).await;
        let syncer = PresenceSyncer::new(Arc::new(Mutex::new(scanner)), Duration::from_secs(12));

        let first = syncer.sync_once().await;
        assert_eq!(first.arrived, ids(&["aa:bb"]));
        assert!(first.departed.is_empty());

        // inside the throttle window: no fetch, no change
        time::advance(Duration::from_secs(12)).await;
        assert!(syncer.sync_once().await.is_empty());
        assert_eq!(api.calls(), 1);

        time::advance(MIN_TIME_BETWEEN_UPDATES).await;
        let third = syncer.sync_once().await;
        assert_eq!(third.arrived, ids(&["cc:dd"]));
        assert_eq!(third.departed, ids(&["aa:bb"]));
        assert_eq!(api.calls(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_scan_keeps_devices_present() {
        let api = ScriptedApi::new(vec![summary(&[("aa:bb", "Phone")]), http_error()]);
        let scanner = DeviceScanner::new(api.clone(), "site-1", MIN_TIME_BETWEEN_UPDATES).await;
        let syncer = PresenceSyncer::new(Arc::new(Mutex::new(scanner)), Duration::from_secs(12));

        syncer.sync_once().await;
        time::advance(MIN_TIME_BETWEEN_UPDATES + Duration::from_secs(1)).await;

        assert!(syncer.sync_once().await.is_empty());
        assert_eq!(api.calls(), 2);
    }
}
