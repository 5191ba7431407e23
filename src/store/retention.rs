//! History retention.
//!
//! # Responsibilities
//! - Periodically delete history entries older than the retention window
//! - Run one sweep immediately at startup

use std::time::Duration;

use chrono::Utc;
use tokio::sync::broadcast;
use tokio::time;

use crate::observability::metrics;
use crate::store::HistoryStore;

/// Background task that purges history outside the retention window.
pub struct RetentionSweeper {
    history: HistoryStore,
    interval: Duration,
}

impl RetentionSweeper {
    /// Create a sweeper that purges `history` every `interval`.
    pub fn new(history: HistoryStore, interval: Duration) -> Self {
        Self { history, interval }
    }

    /// Sweep once immediately, then on every tick until `shutdown` fires.
    pub async fn run(self, mut shutdown: broadcast::Receiver<()>) {
        tracing::info!(
            interval_secs = self.interval.as_secs(),
            retention_secs = self.history.retention().num_seconds(),
            "Retention sweeper starting"
        );

        // The first tick completes immediately.
        let mut ticker = time::interval(self.interval);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    self.sweep().await;
                }
                _ = shutdown.recv() => {
                    tracing::info!("Retention sweeper received shutdown signal, exiting loop");
                    break;
                }
            }
        }
    }

    /// Run one purge. Failures are logged and retried on the next tick.
    pub async fn sweep(&self) -> u64 {
        match self.history.purge_expired(Utc::now()).await {
            Ok(0) => {
                tracing::debug!("Retention sweep found nothing to purge");
                0
            }
            Ok(purged) => {
                tracing::info!(purged, "Purged expired history entries");
                metrics::record_history_purged(purged);
                purged
            }
            Err(e) => {
                tracing::error!(error = %e, "Retention sweep failed");
                0
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{HistoryDraft, Pagination};
    use crate::lifecycle::Shutdown;
    use crate::store::memory_store;
    use serde_json::Value;
    use std::collections::BTreeMap;

    #[tokio::test]
    async fn test_sweep_removes_only_expired() {
        let store = memory_store().await;
        let now = Utc::now();
        for age_days in [0, 3, 8, 30] {
            let entry = HistoryDraft {
                method: "GET".to_string(),
                url: format!("https://example.com/{}", age_days),
                headers: BTreeMap::new(),
                body: None,
                status: 204,
                response_headers: BTreeMap::new(),
                data: Value::Null,
            }
            .validate(now - chrono::Duration::days(age_days))
            .unwrap();
            store.history().insert(&entry).await.unwrap();
        }

        let sweeper = RetentionSweeper::new(store.history().clone(), Duration::from_secs(60));
        assert_eq!(sweeper.sweep().await, 2);
        assert_eq!(store.history().list(Pagination::default()).await.unwrap().1, 2);
    }

    #[tokio::test]
    async fn test_run_stops_on_shutdown() {
        let store = memory_store().await;
        let shutdown = Shutdown::new();
        let sweeper = RetentionSweeper::new(store.history().clone(), Duration::from_secs(3600));
        let handle = tokio::spawn(sweeper.run(shutdown.subscribe()));

        tokio::time::sleep(Duration::from_millis(50)).await;
        shutdown.trigger();
        tokio::time::timeout(Duration::from_secs(2), handle)
            .await
            .expect("sweeper did not stop")
            .unwrap();
    }
}
