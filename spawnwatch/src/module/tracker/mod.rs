///! Spawn tracker
///!
///! Three timer-driven routines share one `SessionState`:
///! - address resolver: finds the public address, then kicks off fetching
///! - spawn fetcher: location-gated poll of the spawn cache every 45s
///! - expiry refresher: recomputes remaining time every 5s

pub mod fetcher;
pub mod refresher;
pub mod resolver;
pub mod state;

pub use fetcher::FetchOutcome;
pub use state::SessionState;

use spawnwatch_common::{Denylist, Entry, Status};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::task::JoinHandle;

use crate::module::location::LocationSource;
use crate::module::notify::Notifier;
use crate::module::provider::{AddressLookup, SpawnSource};

pub const ADDRESS_RETRY_DELAY: Duration = Duration::from_secs(10);
pub const LOCATION_RETRY_DELAY: Duration = Duration::from_secs(3);
pub const FETCH_INTERVAL: Duration = Duration::from_secs(45);
pub const REFRESH_INTERVAL: Duration = Duration::from_secs(5);
pub const NOTICE_DISMISS_AFTER: Duration = Duration::from_secs(2);

/// Owns the session state and the collaborators the routines talk to.
pub struct SpawnTracker {
    state: SessionState,
    address_lookup: Arc<dyn AddressLookup>,
    spawn_source: Arc<dyn SpawnSource>,
    location: Arc<dyn LocationSource>,
    notifier: Arc<dyn Notifier>,
    /// The one armed refresh timer, if any
    refresh_timer: Mutex<Option<JoinHandle<()>>>,
    refresh_passes: AtomicU64,
}

impl SpawnTracker {
    pub fn new(
        denylist: Denylist,
        address_lookup: Arc<dyn AddressLookup>,
        spawn_source: Arc<dyn SpawnSource>,
        location: Arc<dyn LocationSource>,
        notifier: Arc<dyn Notifier>,
    ) -> Arc<Self> {
        Arc::new(Self {
            state: SessionState::new(denylist),
            address_lookup,
            spawn_source,
            location,
            notifier,
            refresh_timer: Mutex::new(None),
            refresh_passes: AtomicU64::new(0),
        })
    }

    /// Start all loops. The refresher runs right away; fetching begins once
    /// the address is resolved. Returns the resolver task.
    pub async fn start(self: &Arc<Self>) -> JoinHandle<()> {
        tracing::info!(
            "Starting spawn tracker ({} denylisted categories)",
            self.state.denylist().len()
        );

        self.refresh_expiry().await;

        let tracker = self.clone();
        tokio::spawn(async move {
            tracker.resolve_address().await;
        })
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub async fn status(&self) -> Status {
        self.state.status().await
    }

    pub async fn visible_entries(&self) -> Vec<Entry> {
        self.state.visible_entries().await
    }

    /// Number of refresh passes run so far
    pub fn refresh_passes(&self) -> u64 {
        self.refresh_passes.load(Ordering::Relaxed)
    }
}


#[cfg(test)]
mod tests {
    use super::testing::harness;
    use super::*;
    use crate::module::location::Coordinates;
    use chrono::{Duration as ChronoDuration, Utc};

    #[tokio::test(start_paused = true)]
    async fn test_start_refreshes_immediately_and_fetches_after_resolution() {
        let h = harness(Coordinates::new(48.85, 2.35), 1);
        let now = Utc::now();
        h.source.push(Ok(vec![
            Entry::new("Pidgey", now + ChronoDuration::seconds(600)),
            Entry::new("Snorlax", now + ChronoDuration::seconds(600)),
        ]));

        let resolver = h.tracker.start().await;
        assert_eq!(h.tracker.refresh_passes(), 1);
        assert_eq!(h.tracker.status().await, Status::Unknown);

        // first lookup fails, second succeeds 10s later
        resolver.await.unwrap();
        tokio::time::sleep(Duration::from_millis(10)).await;

        assert_eq!(h.source.query_count(), 1);
        assert_eq!(h.tracker.status().await, Status::Online);
        assert_eq!(h.tracker.state().entries().await.len(), 2);

        let visible = h.tracker.visible_entries().await;
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].category, "Snorlax");

        // the refresher kept ticking while the resolver was retrying
        assert!(h.tracker.refresh_passes() >= 3);
    }
}
