//! Background sweep for unanswered calls.
//!
//! Only runs when a called-timeout is configured. The sweep uses the same
//! CALLED->NO_SHOW compare-and-swap as operators, so losing a race against a
//! real `mark_attending` is harmless: the stale result is simply skipped.

use std::sync::Arc;

use chrono::Utc;
use tokio::time::{interval, Duration};
use tracing::{info, warn};

use super::coordinator::QueueCoordinator;
use super::error::QueueError;
use super::types::EntryStatus;

const SWEEP_INTERVAL_SECS: u64 = 1;

impl QueueCoordinator {
    /// Run background tasks until shutdown.
    pub(crate) async fn background_tasks(self: Arc<Self>) {
        let mut sweep_ticker = interval(Duration::from_secs(SWEEP_INTERVAL_SECS));

        info!("Background tasks started");
        loop {
            if self.is_shutdown() {
                info!("Background tasks stopped");
                return;
            }
            sweep_ticker.tick().await;
            self.expire_unanswered_calls().await;
        }
    }

    /// Sweep CALLED entries whose last announcement is older than the
    /// configured timeout into NO_SHOW. Recall resets the clock.
    pub(crate) async fn expire_unanswered_calls(&self) {
        let Some(timeout) = self.config.called_timeout else {
            return;
        };
        let now = Utc::now();

        let overdue: Vec<_> = self
            .snapshot_today()
            .into_iter()
            .filter(|e| e.status == EntryStatus::Called)
            .filter(|e| {
                let announced = e.last_announced_at.or(e.called_at).unwrap_or(e.checked_in_at);
                now - announced >= timeout
            })
            .collect();

        for entry in overdue {
            match self.mark_no_show(entry.id).await {
                Ok(_) => {
                    info!(
                        entry_id = %entry.id,
                        display_number = entry.display_number,
                        "Unanswered call expired to no-show"
                    );
                }
                // An operator acted first; nothing to do.
                Err(QueueError::StaleState { .. }) | Err(QueueError::NotFound(_)) => {}
                Err(e) => {
                    warn!(entry_id = %entry.id, error = %e, "No-show sweep failed");
                }
            }
        }
    }
}
