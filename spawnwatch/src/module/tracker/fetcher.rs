use chrono::Utc;
use spawnwatch_common::Status;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

use super::{SpawnTracker, FETCH_INTERVAL, LOCATION_RETRY_DELAY, NOTICE_DISMISS_AFTER};
use crate::module::notify::Notice;
use crate::module::provider::SpawnQuery;

/// What one fetch attempt did, and therefore when the next one is due
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// No complete position yet; nothing was queried
    LocationPending,
    /// Called before the public address is known; nothing was queried
    AddressPending,
    /// Entries replaced; `dropped` were already expired on arrival
    Updated { kept: usize, dropped: usize },
    /// Query failed; entries left as they were
    Failed,
}

impl FetchOutcome {
    pub fn next_delay(&self) -> Duration {
        match self {
            FetchOutcome::LocationPending | FetchOutcome::AddressPending => LOCATION_RETRY_DELAY,
            FetchOutcome::Updated { .. } | FetchOutcome::Failed => FETCH_INTERVAL,
        }
    }
}

impl SpawnTracker {
    /// One fetch attempt against the spawn cache.
    ///
    /// The location is read fresh on every call. Scheduling is left to the
    /// caller through [`FetchOutcome::next_delay`].
    pub async fn fetch_spawns(&self) -> FetchOutcome {
        let Some((latitude, longitude)) = self.location.current().pair() else {
            tracing::debug!(
                "No location yet, retrying spawn fetch in {}s",
                LOCATION_RETRY_DELAY.as_secs()
            );
            return FetchOutcome::LocationPending;
        };

        let Some(address) = self.state.address().await else {
            tracing::debug!(
                "Public address unknown, retrying spawn fetch in {}s",
                LOCATION_RETRY_DELAY.as_secs()
            );
            return FetchOutcome::AddressPending;
        };

        let query = SpawnQuery {
            address,
            latitude,
            longitude,
        };

        match self.spawn_source.fetch(&query).await {
            Ok(spawns) => {
                let received = spawns.len();
                self.state.set_status(Status::Online).await;
                let kept = self.state.replace_entries(spawns, Utc::now()).await;
                tracing::info!(
                    "Fetched {} spawns near ({:.5}, {:.5}), {} already expired",
                    received,
                    latitude,
                    longitude,
                    received - kept
                );
                FetchOutcome::Updated {
                    kept,
                    dropped: received - kept,
                }
            }
            Err(e) => {
                self.state.set_status(Status::Offline).await;
                self.notifier.notify(Notice::warning(
                    "Could not get spawns",
                    e.to_string(),
                    NOTICE_DISMISS_AFTER,
                ));
                tracing::error!("Failed to fetch spawns: {}", e);
                FetchOutcome::Failed
            }
        }
    }

    /// Run `fetch_spawns` forever, each attempt arming exactly one successor.
    pub(crate) fn spawn_fetch_loop(self: &Arc<Self>) -> JoinHandle<()> {
        let tracker = self.clone();
        tokio::spawn(async move {
            loop {
                let outcome = tracker.fetch_spawns().await;
                tokio::time::sleep(outcome.next_delay()).await;
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::super::testing::{harness, provider_failure};
    use super::*;
    use crate::module::location::Coordinates;
    use chrono::Duration as ChronoDuration;
    use spawnwatch_common::Entry;

    async fn resolved(location: Coordinates) -> super::super::testing::Harness {
        let h = harness(location, 0);
        h.tracker.state().set_address("203.0.113.7".to_string()).await;
        h
    }

    #[tokio::test]
    async fn test_missing_location_skips_query() {
        let h = resolved(Coordinates::default()).await;

        let outcome = h.tracker.fetch_spawns().await;

        assert_eq!(outcome, FetchOutcome::LocationPending);
        assert_eq!(outcome.next_delay(), Duration::from_secs(3));
        assert_eq!(h.source.query_count(), 0);
        assert_eq!(h.tracker.status().await, Status::Unknown);
        assert!(h.notifier.notices.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_half_location_is_still_missing() {
        let h = resolved(Coordinates {
            latitude: Some(48.85),
            longitude: None,
        })
        .await;

        assert_eq!(h.tracker.fetch_spawns().await, FetchOutcome::LocationPending);
        assert_eq!(h.source.query_count(), 0);
    }

    #[tokio::test]
    async fn test_success_drops_expired_on_ingestion() {
        let h = resolved(Coordinates::new(48.85, 2.35)).await;
        let now = Utc::now();
        h.source.push(Ok(vec![
            Entry::new("Snorlax", now + ChronoDuration::milliseconds(10_000)),
            Entry::new("Lapras", now - ChronoDuration::milliseconds(1_000)),
        ]));

        let outcome = h.tracker.fetch_spawns().await;

        assert_eq!(outcome, FetchOutcome::Updated { kept: 1, dropped: 1 });
        assert_eq!(outcome.next_delay(), Duration::from_secs(45));
        assert_eq!(h.tracker.status().await, Status::Online);
        let entries = h.tracker.state().entries().await;
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].category, "Snorlax");
        assert!(entries[0].time_left.is_some());
    }

    #[tokio::test]
    async fn test_failure_keeps_entries_and_notifies() {
        let h = resolved(Coordinates::new(48.85, 2.35)).await;
        let now = Utc::now();
        h.source.push(Ok(vec![Entry::new("Snorlax", now + ChronoDuration::seconds(600))]));
        h.source.push(Err(provider_failure()));

        h.tracker.fetch_spawns().await;
        let before = h.tracker.state().entries().await;

        let outcome = h.tracker.fetch_spawns().await;

        assert_eq!(outcome, FetchOutcome::Failed);
        assert_eq!(outcome.next_delay(), Duration::from_secs(45));
        assert_eq!(h.tracker.status().await, Status::Offline);
        assert_eq!(h.tracker.state().entries().await, before);

        let notices = h.notifier.notices.lock().unwrap();
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].title, "Could not get spawns");
        assert!(notices[0].body.starts_with("malformed response"));
        assert_eq!(notices[0].dismiss_after, Duration::from_secs(2));
    }

    #[tokio::test]
    async fn test_status_recovers_after_failure() {
        let h = resolved(Coordinates::new(48.85, 2.35)).await;
        h.source.push(Err(provider_failure()));
        h.source.push(Ok(Vec::new()));

        h.tracker.fetch_spawns().await;
        assert_eq!(h.tracker.status().await, Status::Offline);
        h.tracker.fetch_spawns().await;
        assert_eq!(h.tracker.status().await, Status::Online);
    }

    #[tokio::test]
    async fn test_unresolved_address_skips_query() {
        let h = harness(Coordinates::new(48.85, 2.35), 0);
        assert_eq!(h.tracker.fetch_spawns().await, FetchOutcome::AddressPending);
        assert_eq!(h.source.query_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_loop_waits_for_location_then_polls_every_45s() {
        let h = resolved(Coordinates::default()).await;
        h.tracker.spawn_fetch_loop();

        tokio::time::sleep(Duration::from_millis(2_900)).await;
        assert_eq!(h.source.query_count(), 0);
        h.location.set(Coordinates::new(48.85, 2.35));

        // location retry fires at 3s, not 45s
        tokio::time::sleep(Duration::from_millis(200)).await;
        assert_eq!(h.source.query_count(), 1);

        tokio::time::sleep(Duration::from_millis(44_800)).await;
        assert_eq!(h.source.query_count(), 1);

        tokio::time::sleep(Duration::from_millis(200)).await;
        assert_eq!(h.source.query_count(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_loop_keeps_polling_after_failure() {
        let h = resolved(Coordinates::new(48.85, 2.35)).await;
        h.source.push(Err(provider_failure()));
        h.tracker.spawn_fetch_loop();

        tokio::time::sleep(Duration::from_millis(10)).await;
        assert_eq!(h.source.query_count(), 1);
        assert_eq!(h.tracker.status().await, Status::Offline);

        tokio::time::sleep(Duration::from_secs(45)).await;
        assert_eq!(h.source.query_count(), 2);
        assert_eq!(h.tracker.status().await, Status::Online);
    }
}
