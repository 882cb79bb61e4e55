use chrono::Utc;
use std::sync::atomic::Ordering;
use std::sync::Arc;

use super::{SpawnTracker, REFRESH_INTERVAL};

impl SpawnTracker {
    /// Recompute remaining time for the held entries, drop the expired ones
    /// and arm the next pass 5s out. Any previously armed pass is cancelled.
    pub async fn refresh_expiry(self: &Arc<Self>) {
        let (kept, dropped) = self.state.recompute_entries(Utc::now()).await;
        self.refresh_passes.fetch_add(1, Ordering::Relaxed);

        if dropped > 0 {
            tracing::debug!("{} spawn(s) despawned, {} remaining", dropped, kept);
        } else {
            tracing::trace!("Refreshed time left for {} spawn(s)", kept);
        }

        self.arm_refresh_timer();
    }

    /// Whether a refresh pass is currently scheduled
    pub fn refresh_pending(&self) -> bool {
        match self.refresh_timer.lock() {
            Ok(slot) => slot.as_ref().is_some_and(|handle| !handle.is_finished()),
            Err(poisoned) => poisoned.into_inner().as_ref().is_some_and(|handle| !handle.is_finished()),
        }
    }

    fn arm_refresh_timer(self: &Arc<Self>) {
        let mut slot = match self.refresh_timer.lock() {
            Ok(slot) => slot,
            Err(poisoned) => poisoned.into_inner(),
        };

        if let Some(previous) = slot.take() {
            // The timer that is firing right now re-arms through here; only
            // cancel timers that are still waiting.
            if tokio::task::try_id() != Some(previous.id()) {
                previous.abort();
            }
        }

        let tracker = self.clone();
        *slot = Some(tokio::spawn(async move {
            tokio::time::sleep(REFRESH_INTERVAL).await;
            tracker.refresh_expiry().await;
        }));
    }
}
