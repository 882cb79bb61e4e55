///! Console display
///!
///! Stands in for a UI: prints the visible spawn list and shows notices
///! until they are dismissed.

use spawnwatch_common::{Entry, Status};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;

use super::notify::Notice;
use super::tracker::SpawnTracker;

/// One line per entry, `"<category>: <time left>"`.
pub fn render_lines(entries: &[Entry]) -> Vec<String> {
    entries
        .iter()
        .map(|entry| {
            format!(
                "{}: {}",
                entry.category,
                entry.time_left.as_deref().unwrap_or("?")
            )
        })
        .collect()
}

pub fn render_summary(status: Status, visible: usize) -> String {
    format!("[{}] {} spawn(s) nearby", status, visible)
}

pub fn spawn_display_task(tracker: Arc<SpawnTracker>, interval: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            tokio::time::sleep(interval).await;

            let status = tracker.status().await;
            let visible = tracker.visible_entries().await;
            tracing::info!("{}", render_summary(status, visible.len()));
            for line in render_lines(&visible) {
                tracing::info!("  {}", line);
            }
        }
    })
}

pub fn spawn_notice_task(mut notices: broadcast::Receiver<Notice>) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            match notices.recv().await {
                Ok(notice) => {
                    tracing::warn!("{}: {}", notice.title, notice.body);
                    let dismiss_after = notice.dismiss_after;
                    tokio::spawn(async move {
                        tokio::time::sleep(dismiss_after).await;
                        tracing::debug!("Notice dismissed: {}", notice.title);
                    });
                }
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::debug!("Skipped {} notice(s)", skipped);
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    })
}
