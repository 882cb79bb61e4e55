use std::sync::Arc;

use super::{SpawnTracker, ADDRESS_RETRY_DELAY};

impl SpawnTracker {
    /// Look up the public address, retrying every 10s until it works, then
    /// start the spawn fetch loop.
    ///
    /// Safe to call again: once an address is stored, later calls do not
    /// start a second fetch loop.
    pub async fn resolve_address(self: &Arc<Self>) {
        loop {
            match self.address_lookup.lookup().await {
                Ok(address) => {
                    tracing::info!("Public address resolved: {}", address);
                    if self.state.set_address(address).await {
                        self.spawn_fetch_loop();
                    }
                    return;
                }
                Err(e) => {
                    tracing::warn!(
                        "Could not resolve public address, retry in {}s: {}",
                        ADDRESS_RETRY_DELAY.as_secs(),
                        e
                    );
                    tokio::time::sleep(ADDRESS_RETRY_DELAY).await;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::testing::harness;
    use crate::module::location::Coordinates;
    use std::sync::atomic::Ordering;
    use std::time::Duration;
    use tokio::time::Instant;

    #[tokio::test(start_paused = true)]
    async fn test_retries_every_ten_seconds_until_resolved() {
        let h = harness(Coordinates::new(48.85, 2.35), 2);
        let started = Instant::now();

        h.tracker.resolve_address().await;

        assert_eq!(h.lookup.calls.load(Ordering::SeqCst), 3);
        let elapsed = started.elapsed();
        assert!(elapsed >= Duration::from_secs(20) && elapsed < Duration::from_secs(21));
        assert_eq!(h.tracker.state().address().await.as_deref(), Some("203.0.113.7"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_resolution_triggers_first_fetch() {
        let h = harness(Coordinates::new(48.85, 2.35), 0);
        assert_eq!(h.source.query_count(), 0);

        h.tracker.resolve_address().await;
        tokio::time::sleep(Duration::from_millis(10)).await;

        assert_eq!(h.source.query_count(), 1);
        let query = h.source.queries.lock().unwrap()[0].clone();
        assert_eq!(query.address, "203.0.113.7");
        assert_eq!((query.latitude, query.longitude), (48.85, 2.35));
    }

    #[tokio::test(start_paused = true)]
    async fn test_second_resolution_does_not_double_fetch() {
        let h = harness(Coordinates::new(48.85, 2.35), 0);

        h.tracker.resolve_address().await;
        h.tracker.resolve_address().await;
        tokio::time::sleep(Duration::from_millis(10)).await;

        assert_eq!(h.lookup.calls.load(Ordering::SeqCst), 2);
        assert_eq!(h.source.query_count(), 1);
    }
}
