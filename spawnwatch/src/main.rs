use spawnwatch::config::{self, TrackerConfig};
use spawnwatch::module::display::{spawn_display_task, spawn_notice_task};
use spawnwatch::module::location::{FileLocation, LocationSource, SharedLocation};
use spawnwatch::module::notify::ChannelNotifier;
use spawnwatch::module::provider::{IpifyClient, SpawnCacheClient};
use spawnwatch::module::tracker::{SpawnTracker, REFRESH_INTERVAL};

use anyhow::Result;
use spawnwatch_common::Denylist;
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration
    let config = TrackerConfig::load(config::CONFIG_PATH)?;

    // Initialize logging
    let _logging_guard = spawnwatch::logging::init_logging(
        &config.log_dir,
        "spawnwatch",
        &config.log_level,
        config.log_retention_days,
    )?;

    tracing::info!("Spawnwatch starting...");

    let location: Arc<dyn LocationSource> = match &config.location_file {
        Some(path) => {
            tracing::info!("Polling location from {:?}", path);
            Arc::new(FileLocation::new(path))
        }
        None => {
            if config.coordinates().pair().is_none() {
                tracing::warn!("No location configured, spawns will not be fetched");
            }
            Arc::new(SharedLocation::new(config.coordinates()))
        }
    };

    let notifier = ChannelNotifier::new(16);
    spawn_notice_task(notifier.subscribe());

    let tracker = SpawnTracker::new(
        Denylist::default(),
        Arc::new(IpifyClient::new()?),
        Arc::new(SpawnCacheClient::new()?),
        location,
        Arc::new(notifier),
    );
    tracker.start().await;
    spawn_display_task(tracker.clone(), REFRESH_INTERVAL);
    tracing::info!("✓ Spawn tracker running (fetch every 45s, refresh every 5s)");

    // Keep the program running
    tokio::signal::ctrl_c().await?;
    tracing::info!("Shutdown signal received.");

    Ok(())
}
